//! XRPC client implementation
//!
//! This module implements the XRPC call pipeline used by AT Protocol services:
//! a request builder that composes `<service>/xrpc/<nsid>` URLs with ordered,
//! individually encoded query parameters and authorization headers, a pluggable
//! transport, and a dispatcher that classifies failures and decodes typed
//! responses.
//!
//! Every call is a single send. There is no retry, backoff or caching at this
//! layer; callers own those decisions.

use crate::codec::union;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

// =============================================================================
// Request Types
// =============================================================================

/// HTTP method for XRPC requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request (used for queries)
    Get,
    /// POST request (used for procedures)
    Post,
}

impl HttpMethod {
    /// Method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Whether an endpoint needs a bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthRequirement {
    /// Refuse to build the request without a token
    #[default]
    Required,
    /// Attach a token when one is available
    Optional,
    /// Never attach a token
    None,
}

/// Inclusive bounds for a numeric page-size parameter
///
/// Values are clamped as `max(min, min(value, max))` before they are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitRange {
    /// Smallest value the server accepts
    pub min: u32,
    /// Largest value the server accepts
    pub max: u32,
}

impl LimitRange {
    /// The usual lexicon bound for `limit`: 1 to 100 (server default 50)
    pub const STANDARD: LimitRange = LimitRange { min: 1, max: 100 };

    /// Create a new range
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Clamp a value into the range
    ///
    /// # Examples
    /// ```
    /// use atproto_client::LimitRange;
    ///
    /// assert_eq!(LimitRange::STANDARD.clamp(0), 1);
    /// assert_eq!(LimitRange::STANDARD.clamp(42), 42);
    /// assert_eq!(LimitRange::STANDARD.clamp(500), 100);
    /// ```
    pub fn clamp(&self, value: u32) -> u32 {
        value.min(self.max).max(self.min)
    }
}

/// XRPC request parameters
///
/// Describes a call to an XRPC endpoint before it is bound to a service URL and
/// a session: method, NSID, ordered query parameters, extra headers, optional
/// body and authorization requirement.
///
/// # Examples
/// ```
/// use atproto_client::xrpc::XrpcRequest;
/// use atproto_client::LimitRange;
///
/// let request = XrpcRequest::query("app.bsky.graph.getFollows")
///     .param("actor", "did:plc:abc")
///     .limit(Some(500), LimitRange::STANDARD)
///     .param_opt("cursor", None::<String>);
///
/// let descriptor = request.build("https://pds.example/", Some("token")).unwrap();
/// assert_eq!(
///     descriptor.url.as_str(),
///     "https://pds.example/xrpc/app.bsky.graph.getFollows?actor=did:plc:abc&limit=100"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct XrpcRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// NSID path (e.g., "com.atproto.repo.getRecord")
    pub nsid: String,
    /// Query parameters in the order they will be sent
    pub params: Vec<(String, String)>,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
    /// Request body (for procedures)
    pub body: Option<Vec<u8>>,
    /// Encoding type (e.g., "application/json")
    pub encoding: Option<String>,
    /// Authorization requirement
    pub auth: AuthRequirement,
}

impl XrpcRequest {
    /// Create a new GET request (query)
    pub fn query(nsid: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            nsid: nsid.into(),
            params: Vec::new(),
            headers: Vec::new(),
            body: None,
            encoding: None,
            auth: AuthRequirement::Required,
        }
    }

    /// Create a new POST request (procedure)
    pub fn procedure(nsid: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            nsid: nsid.into(),
            params: Vec::new(),
            headers: Vec::new(),
            body: None,
            encoding: Some("application/json".to_string()),
            auth: AuthRequirement::Required,
        }
    }

    /// Append a query parameter
    ///
    /// Repeating a key sends it several times, which is how array parameters
    /// are encoded.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Append a query parameter only when a value is present
    pub fn param_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Append a clamped `limit` parameter, or nothing when absent
    pub fn limit(self, limit: Option<u32>, range: LimitRange) -> Self {
        match limit {
            Some(limit) => self.param("limit", range.clamp(limit).to_string()),
            None => self,
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set the request body (for procedures)
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the request body from JSON
    pub fn json_body<T: Serialize>(mut self, value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value).map_err(Error::Encode)?;
        self.body = Some(body);
        self.encoding = Some("application/json".to_string());
        Ok(self)
    }

    /// Set encoding type
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Set the authorization requirement
    pub fn auth(mut self, auth: AuthRequirement) -> Self {
        self.auth = auth;
        self
    }

    /// Bind the request to a service URL and token
    ///
    /// Fails without producing any traffic when the endpoint requires a token
    /// and none is given ([`Error::MissingSession`]), when the URL cannot be
    /// composed ([`Error::InvalidUrl`]), or when a header is malformed
    /// ([`Error::InvalidHeader`]).
    pub fn build(&self, base_url: &str, access_token: Option<&str>) -> Result<RequestDescriptor> {
        let authorization = match (self.auth, access_token) {
            (AuthRequirement::None, _) => None,
            (AuthRequirement::Required, None) => return Err(Error::MissingSession),
            (_, token) => token.map(|token| format!("Bearer {}", token)),
        };

        let base = parse_base_url(base_url)?;
        if !is_valid_nsid(&self.nsid) {
            return Err(Error::InvalidUrl(format!("invalid NSID `{}`", self.nsid)));
        }

        let mut text = format!("{}/xrpc/{}", base.as_str().trim_end_matches('/'), self.nsid);
        for (index, (key, value)) in self.params.iter().enumerate() {
            text.push(if index == 0 { '?' } else { '&' });
            text.push_str(&encode_query_component(key));
            text.push('=');
            text.push_str(&encode_query_component(value));
        }
        let url = Url::parse(&text).map_err(|e| Error::InvalidUrl(format!("{}: {}", text, e)))?;

        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if self.body.is_some() {
            let encoding = self.encoding.as_deref().unwrap_or("application/json");
            headers.push(("Content-Type".to_string(), encoding.to_string()));
        }
        if let Some(authorization) = authorization {
            headers.push(("Authorization".to_string(), authorization));
        }
        for (key, value) in &self.headers {
            validate_header(key, value)?;
            headers.push((key.clone(), value.clone()));
        }

        Ok(RequestDescriptor {
            method: self.method,
            url,
            headers,
            body: self.body.clone(),
        })
    }
}

/// A fully built request, ready for a transport
///
/// Immutable once built; one is produced per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: HttpMethod,
    /// Complete URL including the encoded query
    pub url: Url,
    /// Headers in the order they were added
    pub headers: Vec<(String, String)>,
    /// Request body
    pub body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    /// First header with this name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let base = Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))?;

    if !matches!(base.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(format!(
            "{}: unsupported scheme `{}`",
            base_url,
            base.scheme()
        )));
    }
    if base.host_str().is_none() {
        return Err(Error::InvalidUrl(format!("{}: missing host", base_url)));
    }
    if base.query().is_some() || base.fragment().is_some() {
        return Err(Error::InvalidUrl(format!(
            "{}: base URL cannot carry a query or fragment",
            base_url
        )));
    }

    Ok(base)
}

fn is_valid_nsid(nsid: &str) -> bool {
    let segments: Vec<&str> = nsid.split('.').collect();
    segments.len() >= 3
        && segments.iter().all(|segment| {
            !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// Characters that may stay literal inside a query key or value
fn is_query_safe(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '-' | '.' | '_' | '~' | ':' | '@' | '/' | '?' | '!' | '$' | '(' | ')' | '*' | ',' | ';'
        )
}

/// Percent-encode one query key or value
///
/// Separators (`&`, `=`, `+`, `#`), whitespace and non-ASCII text are escaped;
/// identifiers such as `did:plc:abc` or `at://` URIs stay readable.
pub fn encode_query_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    let mut buf = [0u8; 4];
    for c in value.chars() {
        if is_query_safe(c) {
            encoded.push(c);
        } else {
            encoded.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    encoded
}

fn validate_header(key: &str, value: &str) -> Result<()> {
    HeaderName::from_bytes(key.as_bytes())
        .map_err(|e| Error::InvalidHeader(format!("{}: {}", key, e)))?;
    HeaderValue::from_str(value).map_err(|e| Error::InvalidHeader(format!("{}: {}", key, e)))?;
    Ok(())
}

// =============================================================================
// Response Types
// =============================================================================

/// XRPC response
///
/// Generic response from an XRPC endpoint with headers and data.
#[derive(Debug, Clone)]
pub struct XrpcResponse<T> {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Response data
    pub data: T,
}

impl<T> XrpcResponse<T> {
    /// Create a new response
    pub fn new(status: u16, headers: HashMap<String, String>, data: T) -> Self {
        Self {
            status,
            headers,
            data,
        }
    }

    /// Get a header value
    pub fn header(&self, key: &str) -> Option<&String> {
        self.headers.get(key)
    }

    /// Check if the response is successful (2xx status)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Undecoded response as returned by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers (lowercase names)
    pub headers: HashMap<String, String>,
    /// Response body bytes
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Response with a JSON body and no headers
    pub fn json(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        Self { status, headers, body: body.into() }
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for XRPC client
#[derive(Debug, Clone)]
pub struct XrpcClientConfig {
    /// Base service URL (e.g., "https://bsky.social")
    pub service_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Custom headers to include in all requests
    pub default_headers: HashMap<String, String>,
}

impl Default for XrpcClientConfig {
    fn default() -> Self {
        Self {
            service_url: "https://bsky.social".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("atproto-kit/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
        }
    }
}

impl XrpcClientConfig {
    /// Create a new config with a service URL
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            ..Default::default()
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// Error Response Format
// =============================================================================

/// Standard XRPC error response format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XrpcErrorResponse {
    /// Error code
    pub error: String,
    /// Error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// =============================================================================
// Transport
// =============================================================================

/// Sends built requests over the network
///
/// The default implementation is [`ReqwestTransport`]. Connection reuse,
/// timeouts and cancellation are the transport's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request and read the whole response
    ///
    /// Transport failures are reported as [`Error::Network`]; any HTTP status,
    /// including errors, is a successful exchange at this level.
    async fn execute(&self, request: RequestDescriptor) -> Result<RawResponse>;
}

/// [`HttpTransport`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport from client configuration
    ///
    /// Applies the timeout, user agent and default headers.
    pub fn new(config: &XrpcClientConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        for (key, value) in &config.default_headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| Error::InvalidHeader(format!("{}: {}", key, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::InvalidHeader(format!("{}: {}", key, e)))?;
            default_headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(default_headers)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: RequestDescriptor) -> Result<RawResponse> {
        let mut req = match request.method {
            HttpMethod::Get => self.client.get(request.url),
            HttpMethod::Post => self.client.post(request.url),
        };

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let response = req.send().await.map_err(network_error)?;

        let status = response.status().as_u16();
        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(key.to_string(), value_str.to_string());
            }
        }

        let body = response.bytes().await.map_err(network_error)?;

        Ok(RawResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

fn network_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Network(format!("request timed out: {}", error))
    } else {
        Error::Network(error.to_string())
    }
}

// =============================================================================
// XRPC Client Implementation
// =============================================================================

/// XRPC client for making requests to AT Protocol services
///
/// The client owns a transport and a configuration. [`XrpcClient::send`] is
/// the dispatcher: one transport call, status classification, typed decode.
///
/// # Examples
/// ```
/// use atproto_client::xrpc::{XrpcClient, XrpcClientConfig, XrpcRequest};
/// use atproto_client::AuthRequirement;
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let config = XrpcClientConfig::new("https://bsky.social");
///     let client = XrpcClient::new(config)?;
///
///     let request = XrpcRequest::query("com.atproto.server.describeServer")
///         .auth(AuthRequirement::None);
///     let response = client.query::<serde_json::Value>(request, None).await?;
///     println!("{}", response.data);
///
///     Ok(())
/// }
/// ```
pub struct XrpcClient<T: HttpTransport = ReqwestTransport> {
    /// Transport used for every call
    transport: Arc<T>,
    /// Configuration
    config: XrpcClientConfig,
}

impl<T: HttpTransport> Clone for XrpcClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: self.config.clone(),
        }
    }
}

impl<T: HttpTransport> fmt::Debug for XrpcClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XrpcClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl XrpcClient<ReqwestTransport> {
    /// Create a new XRPC client over `reqwest`
    pub fn new(config: XrpcClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: HttpTransport> XrpcClient<T> {
    /// Create a client over a custom transport
    pub fn with_transport(config: XrpcClientConfig, transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            config,
        }
    }

    /// Build a request against the configured service URL
    pub fn build(&self, request: &XrpcRequest, access_token: Option<&str>) -> Result<RequestDescriptor> {
        request.build(&self.config.service_url, access_token)
    }

    /// Make a query request (GET) against the configured service URL
    pub async fn query<O>(
        &self,
        request: XrpcRequest,
        access_token: Option<&str>,
    ) -> Result<XrpcResponse<O>>
    where
        O: DeserializeOwned,
    {
        let descriptor = self.build(&request, access_token)?;
        self.send(descriptor).await
    }

    /// Make a procedure request (POST) against the configured service URL
    pub async fn procedure<O>(
        &self,
        request: XrpcRequest,
        access_token: Option<&str>,
    ) -> Result<XrpcResponse<O>>
    where
        O: DeserializeOwned,
    {
        let descriptor = self.build(&request, access_token)?;
        self.send(descriptor).await
    }

    /// Send a built request and decode the body as `O`
    pub async fn send<O>(&self, descriptor: RequestDescriptor) -> Result<XrpcResponse<O>>
    where
        O: DeserializeOwned,
    {
        let response = self.exchange(descriptor).await?;
        let data = decode_body(&response.body)?;
        Ok(XrpcResponse::new(response.status, response.headers, data))
    }

    /// Send a built request whose endpoint has no output body
    pub async fn send_without_output(&self, descriptor: RequestDescriptor) -> Result<XrpcResponse<()>> {
        let response = self.exchange(descriptor).await?;
        Ok(XrpcResponse::new(response.status, response.headers, ()))
    }

    /// Transport call plus status classification
    async fn exchange(&self, descriptor: RequestDescriptor) -> Result<RawResponse> {
        let method = descriptor.method;
        let url = descriptor.url.clone();
        debug!(method = method.as_str(), url = %url, "sending xrpc request");

        let response = match self.transport.execute(descriptor).await {
            Ok(response) => response,
            Err(err) => {
                warn!(method = method.as_str(), url = %url, error = %err, "xrpc transport failure");
                return Err(err);
            }
        };

        debug!(status = response.status, url = %url, "xrpc response received");
        check_status(response).inspect_err(|err| {
            warn!(url = %url, error = %err, "xrpc call rejected");
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &XrpcClientConfig {
        &self.config
    }

    /// Get the service URL
    pub fn service_url(&self) -> &str {
        &self.config.service_url
    }
}

/// Classify a non-2xx response
fn check_status(response: RawResponse) -> Result<RawResponse> {
    if (200..300).contains(&response.status) {
        return Ok(response);
    }

    match serde_json::from_slice::<XrpcErrorResponse>(&response.body) {
        Ok(error_response) => Err(Error::Api {
            status: response.status,
            error: error_response.error,
            message: error_response.message.unwrap_or_default(),
        }),
        Err(_) => Err(Error::UnexpectedStatus {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        }),
    }
}

/// Decode a 2xx body, locating the offending key on failure
fn decode_body<O>(body: &[u8]) -> Result<O>
where
    O: DeserializeOwned,
{
    match serde_json::from_slice(body) {
        Ok(data) => Ok(data),
        Err(err) => {
            // Second pass only to recover the key path
            let mut deserializer = serde_json::Deserializer::from_slice(body);
            let path = serde_path_to_error::deserialize::<_, O>(&mut deserializer)
                .err()
                .map(|e| e.path().to_string())
                .unwrap_or_else(|| ".".to_string());
            let message = err.to_string();

            Err(Error::Decode {
                path: union::nested_path(&path, &message),
                message,
            })
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_follows_url_with_clamped_limit() {
        let request = XrpcRequest::query("app.bsky.graph.getFollows")
            .param("actor", "did:plc:abc")
            .limit(Some(500), LimitRange::STANDARD)
            .param_opt("cursor", None::<String>);

        let descriptor = request.build("https://pds.example/", Some("token")).unwrap();

        assert_eq!(descriptor.method, HttpMethod::Get);
        assert_eq!(
            descriptor.url.as_str(),
            "https://pds.example/xrpc/app.bsky.graph.getFollows?actor=did:plc:abc&limit=100"
        );
        assert_eq!(descriptor.header("authorization"), Some("Bearer token"));
        assert_eq!(descriptor.header("Accept"), Some("application/json"));
        assert!(descriptor.body.is_none());
    }

    #[test]
    fn test_limit_clamp_bounds() {
        let range = LimitRange::STANDARD;
        assert_eq!(range.clamp(0), 1);
        for value in 1..=100 {
            assert_eq!(range.clamp(value), value);
        }
        for value in [101, 500, 10_000, u32::MAX] {
            assert_eq!(range.clamp(value), 100);
        }

        let custom = LimitRange::new(10, 25);
        assert_eq!(custom.clamp(3), 10);
        assert_eq!(custom.clamp(30), 25);
    }

    #[test]
    fn test_absent_limit_is_omitted() {
        let descriptor = XrpcRequest::query("app.bsky.graph.getLists")
            .param("actor", "alice.test")
            .limit(None, LimitRange::STANDARD)
            .build("https://pds.example", Some("t"))
            .unwrap();
        assert_eq!(descriptor.url.query(), Some("actor=alice.test"));
    }

    #[test]
    fn test_params_keep_caller_order_and_repeat() {
        let descriptor = XrpcRequest::query("app.bsky.actor.getProfiles")
            .param("z", "1")
            .param("actors", "did:plc:b")
            .param("actors", "did:plc:a")
            .param("a", "2")
            .build("https://pds.example", Some("t"))
            .unwrap();
        assert_eq!(
            descriptor.url.query(),
            Some("z=1&actors=did:plc:b&actors=did:plc:a&a=2")
        );
    }

    #[test]
    fn test_query_values_are_encoded_individually() {
        let descriptor = XrpcRequest::query("app.bsky.actor.searchActors")
            .param("q", "rust & serde=fun+more #tag")
            .param("cursor", "opaque/token?x")
            .param("uri", "at://did:plc:abc/app.bsky.graph.list/3k")
            .param("name", "Zoë")
            .build("https://pds.example", Some("t"))
            .unwrap();

        assert_eq!(
            descriptor.url.query(),
            Some(
                "q=rust%20%26%20serde%3Dfun%2Bmore%20%23tag\
                 &cursor=opaque/token?x\
                 &uri=at://did:plc:abc/app.bsky.graph.list/3k\
                 &name=Zo%C3%AB"
            )
        );

        let pairs: Vec<(String, String)> = descriptor
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs[0].1, "rust & serde=fun+more #tag");
        assert_eq!(pairs[3].1, "Zoë");
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let descriptor = XrpcRequest::query("com.atproto.server.describeServer")
            .auth(AuthRequirement::None)
            .build("https://host.example/pds/", None)
            .unwrap();
        assert_eq!(
            descriptor.url.as_str(),
            "https://host.example/pds/xrpc/com.atproto.server.describeServer"
        );
    }

    #[test]
    fn test_invalid_base_urls() {
        let request = XrpcRequest::query("app.bsky.graph.getFollows").auth(AuthRequirement::None);

        for base in ["", "pds.example", "ftp://pds.example", "https://pds.example/?a=b", "mailto:x@y.z"] {
            let err = request.build(base, None).unwrap_err();
            assert!(matches!(err, Error::InvalidUrl(_)), "{base}: {err:?}");
        }
    }

    #[test]
    fn test_invalid_nsid() {
        for nsid in ["", "getFollows", "app..getFollows", "app.bsky.graph.get Follows"] {
            let err = XrpcRequest::query(nsid)
                .auth(AuthRequirement::None)
                .build("https://pds.example", None)
                .unwrap_err();
            assert!(matches!(err, Error::InvalidUrl(_)), "{nsid}");
        }
    }

    #[test]
    fn test_required_auth_without_token_fails() {
        let err = XrpcRequest::query("app.bsky.graph.getFollowers")
            .build("https://pds.example", None)
            .unwrap_err();
        assert!(matches!(err, Error::MissingSession));
        assert_eq!(err.kind(), crate::ErrorKind::RequestPreparation);
    }

    #[test]
    fn test_missing_session_reported_before_url_problems() {
        let err = XrpcRequest::query("app.bsky.graph.getFollowers")
            .build("not a url", None)
            .unwrap_err();
        assert!(matches!(err, Error::MissingSession));
    }

    #[test]
    fn test_optional_and_no_auth() {
        let optional = XrpcRequest::query("app.bsky.graph.getFollows").auth(AuthRequirement::Optional);
        let descriptor = optional.build("https://pds.example", None).unwrap();
        assert_eq!(descriptor.header("Authorization"), None);
        let descriptor = optional.build("https://pds.example", Some("abc")).unwrap();
        assert_eq!(descriptor.header("Authorization"), Some("Bearer abc"));

        let descriptor = XrpcRequest::procedure("com.atproto.server.createSession")
            .auth(AuthRequirement::None)
            .build("https://pds.example", Some("abc"))
            .unwrap();
        assert_eq!(descriptor.header("Authorization"), None);
    }

    #[test]
    fn test_procedure_json_body() {
        #[derive(Serialize)]
        struct TestData {
            foo: String,
        }

        let data = TestData {
            foo: "bar".to_string(),
        };

        let descriptor = XrpcRequest::procedure("com.example.test.method")
            .json_body(&data)
            .unwrap()
            .build("https://pds.example", Some("token"))
            .unwrap();

        assert_eq!(descriptor.method, HttpMethod::Post);
        assert_eq!(descriptor.header("Content-Type"), Some("application/json"));
        assert_eq!(descriptor.body.as_deref(), Some(&br#"{"foo":"bar"}"#[..]));
    }

    #[test]
    fn test_custom_encoding_and_headers() {
        let descriptor = XrpcRequest::procedure("com.atproto.repo.uploadBlob")
            .body(vec![1, 2, 3])
            .encoding("image/png")
            .header("atproto-proxy", "did:web:api.bsky.chat#bsky_chat")
            .build("https://pds.example", Some("token"))
            .unwrap();

        assert_eq!(descriptor.header("content-type"), Some("image/png"));
        assert_eq!(
            descriptor.header("atproto-proxy"),
            Some("did:web:api.bsky.chat#bsky_chat")
        );
    }

    #[test]
    fn test_invalid_header_rejected() {
        let err = XrpcRequest::query("com.example.test.method")
            .header("bad header", "x")
            .build("https://pds.example", Some("t"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));

        let err = XrpcRequest::query("com.example.test.method")
            .header("x-ok", "line\nbreak")
            .build("https://pds.example", Some("t"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));
    }

    #[test]
    fn test_xrpc_response() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        let response = XrpcResponse::new(200, headers, "test data");

        assert_eq!(response.status, 200);
        assert!(response.is_success());
        assert_eq!(
            response.header("content-type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(response.data, "test data");
    }

    #[test]
    fn test_client_config_default() {
        let config = XrpcClientConfig::default();
        assert_eq!(config.service_url, "https://bsky.social");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("atproto-kit/"));
    }

    #[test]
    fn test_client_config_builder() {
        let config = XrpcClientConfig::new("https://custom.server")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("CustomAgent/1.0")
            .with_header("X-Custom", "value");

        assert_eq!(config.service_url, "https://custom.server");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "CustomAgent/1.0");
        assert_eq!(
            config.default_headers.get("X-Custom"),
            Some(&"value".to_string())
        );
    }

    #[test]
    fn test_http_method_as_str() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
    }

    #[test]
    fn test_error_response_without_message() {
        let body: XrpcErrorResponse = serde_json::from_str(r#"{"error":"AuthMissing"}"#).unwrap();
        assert_eq!(body.error, "AuthMissing");
        assert!(body.message.is_none());
    }
}
