//! `com.atproto.server.*` endpoints

use crate::agent::AtpAgent;
use crate::lexicon::com_atproto::server::{
    AppPassword, CreateAppPasswordInput, CreateSessionInput, CreateSessionOutput,
    RefreshSessionOutput,
};
use crate::session::Session;
use crate::xrpc::{AuthRequirement, HttpTransport, XrpcRequest};
use crate::{Error, Result};
use tracing::{debug, info};

const CREATE_SESSION: &str = "com.atproto.server.createSession";
const REFRESH_SESSION: &str = "com.atproto.server.refreshSession";
const DELETE_SESSION: &str = "com.atproto.server.deleteSession";
const CREATE_APP_PASSWORD: &str = "com.atproto.server.createAppPassword";

impl<T: HttpTransport> AtpAgent<T> {
    /// Log in and store the new session
    ///
    /// Sent to the configured service without authorization. The stored
    /// session points at the PDS named in the returned DID document.
    pub async fn create_session(&self, input: CreateSessionInput) -> Result<Session> {
        let descriptor = XrpcRequest::procedure(CREATE_SESSION)
            .auth(AuthRequirement::None)
            .json_body(&input)?
            .build(self.service(), None)?;

        let output: CreateSessionOutput = self.client().send(descriptor).await?.data;
        let session = Session::from_create_session(output, self.service());
        info!(did = %session.did, pds = %session.service_endpoint, "session created");

        self.session().replace(session.clone()).await;
        Ok(session)
    }

    /// Log in with a handle (or email) and password
    pub async fn login(
        &self,
        identifier: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Session> {
        self.create_session(CreateSessionInput::new(identifier, password))
            .await
    }

    /// Refresh the current session
    ///
    /// See [`AtpAgent::refresh_session_from`] for callers that know which
    /// session failed.
    pub async fn refresh_session(&self) -> Result<Session> {
        let stale = self.session().snapshot().await.ok_or(Error::MissingSession)?;
        self.refresh_session_from(&stale).await
    }

    /// Refresh the session, unless it has moved on from `stale`
    ///
    /// Concurrent callers passing the same stale session cause a single
    /// `refreshSession` call; the others receive its result.
    pub async fn refresh_session_from(&self, stale: &Session) -> Result<Session> {
        self.session()
            .refresh_with(stale, |current| async move {
                let descriptor =
                    self.prepare_with_refresh_token(XrpcRequest::procedure(REFRESH_SESSION), &current)?;
                let output: RefreshSessionOutput = self.client().send(descriptor).await?.data;
                debug!(did = %output.did, "session refreshed");
                Ok::<_, Error>(current.refreshed(output))
            })
            .await
    }

    /// Log out: revoke the refresh token and clear the session
    ///
    /// The session is kept if the server rejects the call, or if it was
    /// refreshed while the call was in flight.
    pub async fn delete_session(&self) -> Result<()> {
        let session = self.session().snapshot().await.ok_or(Error::MissingSession)?;
        let descriptor =
            self.prepare_with_refresh_token(XrpcRequest::procedure(DELETE_SESSION), &session)?;

        self.client().send_without_output(descriptor).await?;
        if self.session().clear_if_current(&session).await {
            info!(did = %session.did, "session deleted");
        } else {
            debug!(did = %session.did, "session refreshed during logout, keeping it");
        }
        Ok(())
    }

    /// Create an app password
    pub async fn create_app_password(
        &self,
        name: impl Into<String>,
        privileged: Option<bool>,
    ) -> Result<AppPassword> {
        let input = CreateAppPasswordInput {
            name: name.into(),
            privileged,
        };
        self.procedure(XrpcRequest::procedure(CREATE_APP_PASSWORD).json_body(&input)?)
            .await
    }
}
