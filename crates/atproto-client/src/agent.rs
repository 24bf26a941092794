//! AtpAgent - Main client for AT Protocol services
//!
//! The agent pairs an [`XrpcClient`] with a [`SessionHandle`] and resolves, for
//! every call, which service URL to talk to and which token to present. The
//! endpoint wrappers in [`crate::api`] are methods on the agent.
//!
//! # Example
//!
//! ```rust,no_run
//! use atproto_client::{AtpAgent, SessionHandle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = SessionHandle::new();
//!     let agent = AtpAgent::new("https://bsky.social", session.clone())?;
//!
//!     agent.login("alice.bsky.social", "app-password").await?;
//!
//!     let follows = agent.get_follows("alice.bsky.social", Some(25), None).await?;
//!     println!("{} follows", follows.follows.len());
//!
//!     Ok(())
//! }
//! ```

use crate::session::{Session, SessionHandle};
use crate::xrpc::{
    AuthRequirement, HttpTransport, ReqwestTransport, RequestDescriptor, XrpcClient,
    XrpcClientConfig, XrpcRequest,
};
use crate::Result;
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::debug;

/// Default DID of the Bluesky chat service
pub const DEFAULT_CHAT_SERVICE: &str = "did:web:api.bsky.chat";

/// Header asking the PDS to proxy a call to another service
pub const PROXY_HEADER: &str = "atproto-proxy";

/// Configuration for AtpAgent
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Service URL used for login and whenever no session is active
    pub service: String,
    /// DID of the chat service that `chat.bsky.*` calls are proxied to
    pub chat_service: String,
    /// XRPC client configuration
    pub xrpc_config: XrpcClientConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new("https://bsky.social")
    }
}

impl AgentConfig {
    /// Create a new agent configuration
    pub fn new(service: impl Into<String>) -> Self {
        let service = service.into();
        Self {
            xrpc_config: XrpcClientConfig::new(service.clone()),
            service,
            chat_service: DEFAULT_CHAT_SERVICE.to_string(),
        }
    }

    /// Set the chat service DID
    pub fn with_chat_service(mut self, did: impl Into<String>) -> Self {
        self.chat_service = did.into();
        self
    }

    /// Set XRPC client configuration
    ///
    /// The service URL of the XRPC config is replaced by [`AgentConfig::service`].
    pub fn with_xrpc_config(mut self, config: XrpcClientConfig) -> Self {
        self.xrpc_config = XrpcClientConfig {
            service_url: self.service.clone(),
            ..config
        };
        self
    }

    /// Value of the `atproto-proxy` header for chat calls
    pub fn chat_proxy(&self) -> String {
        format!("{}#bsky_chat", self.chat_service)
    }
}

/// Main agent for interacting with AT Protocol services
///
/// Authenticated calls go to the PDS recorded in the session; calls without a
/// session go to the configured service. The agent never retries and never
/// refreshes on its own: callers check [`crate::Error::is_expired_token`] and
/// call [`AtpAgent::refresh_session`].
pub struct AtpAgent<T: HttpTransport = ReqwestTransport> {
    /// Dispatcher
    client: XrpcClient<T>,
    /// Shared session state
    session: SessionHandle,
    /// Configuration
    config: AgentConfig,
}

impl<T: HttpTransport> Clone for AtpAgent<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            session: self.session.clone(),
            config: self.config.clone(),
        }
    }
}

impl<T: HttpTransport> fmt::Debug for AtpAgent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtpAgent")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl AtpAgent<ReqwestTransport> {
    /// Create an agent with default configuration
    ///
    /// # Example
    ///
    /// ```rust
    /// use atproto_client::{AtpAgent, SessionHandle};
    ///
    /// let agent = AtpAgent::new("https://bsky.social", SessionHandle::new()).unwrap();
    /// assert_eq!(agent.service(), "https://bsky.social");
    /// ```
    pub fn new(service: impl Into<String>, session: SessionHandle) -> Result<Self> {
        Self::with_config(AgentConfig::new(service), session)
    }

    /// Create an agent with custom configuration
    pub fn with_config(config: AgentConfig, session: SessionHandle) -> Result<Self> {
        let client = XrpcClient::new(config.xrpc_config.clone())?;
        Ok(Self {
            client,
            session,
            config,
        })
    }
}

impl<T: HttpTransport> AtpAgent<T> {
    /// Create an agent over a custom transport
    pub fn with_transport(config: AgentConfig, session: SessionHandle, transport: T) -> Self {
        let client = XrpcClient::with_transport(config.xrpc_config.clone(), transport);
        Self {
            client,
            session,
            config,
        }
    }

    /// Get the session handle
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Get the configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Get the configured service URL
    pub fn service(&self) -> &str {
        &self.config.service
    }

    /// Get the dispatcher
    pub fn client(&self) -> &XrpcClient<T> {
        &self.client
    }

    /// Build a request against the current session
    ///
    /// Uses the session's PDS and access token, or the configured service and no
    /// token when there is no session.
    pub async fn prepare(&self, request: &XrpcRequest) -> Result<RequestDescriptor> {
        let session = self.session.snapshot().await;
        self.prepare_for(request, session.as_ref())
    }

    /// Build a request against an explicit session
    pub fn prepare_for(
        &self,
        request: &XrpcRequest,
        session: Option<&Session>,
    ) -> Result<RequestDescriptor> {
        let base = session
            .map(|s| s.service_endpoint.as_str())
            .unwrap_or(self.config.service.as_str());
        let token = session.map(|s| s.access_jwt.as_str());
        request.build(base, token)
    }

    /// Run a query and decode its output
    pub async fn query<O>(&self, request: XrpcRequest) -> Result<O>
    where
        O: DeserializeOwned,
    {
        let descriptor = self.prepare(&request).await?;
        Ok(self.client.send(descriptor).await?.data)
    }

    /// Run a procedure and decode its output
    pub async fn procedure<O>(&self, request: XrpcRequest) -> Result<O>
    where
        O: DeserializeOwned,
    {
        let descriptor = self.prepare(&request).await?;
        Ok(self.client.send(descriptor).await?.data)
    }

    /// Run a procedure that has no output body
    pub async fn procedure_without_output(&self, request: XrpcRequest) -> Result<()> {
        let descriptor = self.prepare(&request).await?;
        self.client.send_without_output(descriptor).await?;
        Ok(())
    }

    /// Build a request presenting the session's refresh token
    pub(crate) fn prepare_with_refresh_token(
        &self,
        request: XrpcRequest,
        session: &Session,
    ) -> Result<RequestDescriptor> {
        let descriptor = request
            .auth(AuthRequirement::Required)
            .build(&session.service_endpoint, Some(&session.refresh_jwt))?;
        debug!(did = %session.did, url = %descriptor.url, "using refresh token");
        Ok(descriptor)
    }

    /// Add the chat proxy header to a request
    pub(crate) fn chat(&self, request: XrpcRequest) -> XrpcRequest {
        request.header(PROXY_HEADER, self.config.chat_proxy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xrpc::{HttpMethod, MockHttpTransport};
    use crate::Error;

    fn session() -> Session {
        Session::new(
            "https://pds.example",
            "did:plc:alice",
            "alice.test",
            "access",
            "refresh",
        )
    }

    #[test]
    fn test_agent_new() {
        let agent = AtpAgent::new("https://bsky.social", SessionHandle::new()).unwrap();
        assert_eq!(agent.service(), "https://bsky.social");
        assert_eq!(agent.client().service_url(), "https://bsky.social");
    }

    #[test]
    fn test_agent_config() {
        let config = AgentConfig::new("https://entryway.example")
            .with_chat_service("did:web:chat.example")
            .with_xrpc_config(XrpcClientConfig::new("https://ignored").with_user_agent("Test/1.0"));

        assert_eq!(config.service, "https://entryway.example");
        assert_eq!(config.xrpc_config.service_url, "https://entryway.example");
        assert_eq!(config.xrpc_config.user_agent, "Test/1.0");
        assert_eq!(config.chat_proxy(), "did:web:chat.example#bsky_chat");
        assert_eq!(AgentConfig::default().chat_proxy(), "did:web:api.bsky.chat#bsky_chat");
    }

    #[tokio::test]
    async fn test_prepare_uses_session_endpoint_and_token() {
        let agent = AtpAgent::with_transport(
            AgentConfig::new("https://bsky.social"),
            SessionHandle::with_session(session()),
            MockHttpTransport::new(),
        );

        let descriptor = agent
            .prepare(&XrpcRequest::query("app.bsky.graph.getFollowers").param("actor", "bob.test"))
            .await
            .unwrap();

        assert_eq!(
            descriptor.url.as_str(),
            "https://pds.example/xrpc/app.bsky.graph.getFollowers?actor=bob.test"
        );
        assert_eq!(descriptor.header("Authorization"), Some("Bearer access"));
    }

    #[tokio::test]
    async fn test_prepare_without_session_uses_service() {
        let agent = AtpAgent::with_transport(
            AgentConfig::new("https://bsky.social"),
            SessionHandle::new(),
            MockHttpTransport::new(),
        );

        let request = XrpcRequest::query("app.bsky.graph.getFollows").auth(AuthRequirement::Optional);
        let descriptor = agent.prepare(&request).await.unwrap();
        assert!(descriptor.url.as_str().starts_with("https://bsky.social/xrpc/"));
        assert_eq!(descriptor.header("Authorization"), None);

        let request = XrpcRequest::query("app.bsky.graph.getLists");
        assert!(matches!(agent.prepare(&request).await, Err(Error::MissingSession)));
    }

    #[tokio::test]
    async fn test_query_without_session_sends_nothing() {
        let mut transport = MockHttpTransport::new();
        transport.expect_execute().never();

        let agent = AtpAgent::with_transport(AgentConfig::default(), SessionHandle::new(), transport);
        let err = agent
            .query::<serde_json::Value>(XrpcRequest::query("chat.bsky.convo.getLog"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingSession));
    }

    #[tokio::test]
    async fn test_chat_header() {
        let agent = AtpAgent::with_transport(
            AgentConfig::default(),
            SessionHandle::with_session(session()),
            MockHttpTransport::new(),
        );
        let request = agent.chat(XrpcRequest::query("chat.bsky.convo.getLog"));
        let descriptor = agent.prepare(&request).await.unwrap();
        assert_eq!(
            descriptor.header(PROXY_HEADER),
            Some("did:web:api.bsky.chat#bsky_chat")
        );
    }

    #[test]
    fn test_prepare_with_refresh_token() {
        let agent = AtpAgent::with_transport(
            AgentConfig::new("https://bsky.social"),
            SessionHandle::new(),
            MockHttpTransport::new(),
        );
        let descriptor = agent
            .prepare_with_refresh_token(
                XrpcRequest::procedure("com.atproto.server.refreshSession")
                    .auth(AuthRequirement::None),
                &session(),
            )
            .unwrap();

        assert_eq!(descriptor.method, HttpMethod::Post);
        assert_eq!(
            descriptor.url.as_str(),
            "https://pds.example/xrpc/com.atproto.server.refreshSession"
        );
        assert_eq!(descriptor.header("Authorization"), Some("Bearer refresh"));
    }
}
