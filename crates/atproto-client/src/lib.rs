//! AT Protocol Client Library
//!
//! This crate provides a typed Rust client for the AT Protocol: an XRPC request
//! builder and dispatcher, lexicon models, wire codecs, explicit session handling,
//! and the `AtpAgent` with endpoint wrappers.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod agent;
pub mod api;
pub mod codec;
pub mod lexicon;
pub mod session;
pub mod types;
pub mod xrpc;

#[cfg(test)]
mod test_utils;

pub use agent::{AgentConfig, AtpAgent};
pub use session::{Session, SessionHandle};
pub use types::StrongRef;
pub use xrpc::{AuthRequirement, LimitRange, RequestDescriptor, XrpcClient, XrpcRequest};

/// Result type for AT Protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request could not be built; nothing was sent
    RequestPreparation,
    /// The transport failed before a response arrived
    Network,
    /// The server answered with a structured XRPC error body
    Api,
    /// The server answered with a non-2xx status and an unrecognised body
    UnexpectedStatus,
    /// A 2xx body did not match the expected shape
    Decode,
    /// The HTTP client itself could not be configured
    Configuration,
}

/// Error types for AT Protocol operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Base URL or composed request URL is not usable
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// Endpoint requires authorization but no session is active
    #[error("No active session - please login first")]
    MissingSession,

    /// Header name or value cannot be sent
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Transport-level failure (DNS, connection, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error with status code and server-supplied error body
    #[error("API error ({status}) {error}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error code from server (e.g. "InvalidRequest")
        error: String,
        /// Error message from server
        message: String,
    },

    /// Non-2xx status whose body is not an XRPC error
    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Response body did not match the expected type
    #[error("Failed to decode response at `{path}`: {message}")]
    Decode {
        /// Key path of the offending value (`.` for the document root)
        path: String,
        /// Underlying deserializer message
        message: String,
    },

    /// HTTP client could not be constructed
    #[error("HTTP client configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUrl(_)
            | Error::MissingSession
            | Error::InvalidHeader(_)
            | Error::Encode(_) => ErrorKind::RequestPreparation,
            Error::Network(_) => ErrorKind::Network,
            Error::Api { .. } => ErrorKind::Api,
            Error::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::Config(_) => ErrorKind::Configuration,
        }
    }

    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } | Error::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server error code, for [`Error::Api`]
    pub fn api_error(&self) -> Option<&str> {
        match self {
            Error::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Check if this is a transport failure
    pub fn is_network_error(&self) -> bool {
        self.kind() == ErrorKind::Network
    }

    /// Check if the server rejected the access token as expired
    ///
    /// Callers use this to decide when to run a session refresh.
    pub fn is_expired_token(&self) -> bool {
        self.api_error() == Some("ExpiredToken")
    }
}
