//! AT Protocol Session Management
//!
//! A [`Session`] is the authenticated state returned by
//! `com.atproto.server.createSession`: tokens, identity, and the PDS endpoint
//! that further calls go to. Sessions are not stored globally; they live in a
//! [`SessionHandle`] that is handed to the agent explicitly.
//!
//! # Example
//!
//! ```rust
//! use atproto_client::session::{Session, SessionHandle};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let session = Session::new(
//!     "https://pds.example",
//!     "did:plc:abc123",
//!     "alice.bsky.social",
//!     "access_token",
//!     "refresh_token",
//! );
//!
//! let handle = SessionHandle::with_session(session);
//! assert_eq!(handle.access_token().await.as_deref(), Some("access_token"));
//! # }
//! ```

mod handle;

pub use handle::SessionHandle;

use crate::lexicon::com_atproto::server::{CreateSessionOutput, RefreshSessionOutput};
use serde::{Deserialize, Serialize};

/// Service entry id of a PDS inside a DID document
const PDS_SERVICE_ID: &str = "#atproto_pds";
/// Service type of a PDS inside a DID document
const PDS_SERVICE_TYPE: &str = "AtprotoPersonalDataServer";

/// Authenticated session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// PDS URL that authenticated calls are sent to
    pub service_endpoint: String,
    /// The user's DID
    pub did: String,
    /// The user's handle
    pub handle: String,
    /// Access JWT token
    pub access_jwt: String,
    /// Refresh JWT token
    pub refresh_jwt: String,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the email has been confirmed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_confirmed: Option<bool>,
    /// Whether email is used as an auth factor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_auth_factor: Option<bool>,
    /// Whether the account is active
    pub active: bool,
    /// Account status (e.g., "takendown", "suspended", "deactivated")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Session {
    /// Create an active session from its required parts
    pub fn new(
        service_endpoint: impl Into<String>,
        did: impl Into<String>,
        handle: impl Into<String>,
        access_jwt: impl Into<String>,
        refresh_jwt: impl Into<String>,
    ) -> Self {
        Self {
            service_endpoint: service_endpoint.into(),
            did: did.into(),
            handle: handle.into(),
            access_jwt: access_jwt.into(),
            refresh_jwt: refresh_jwt.into(),
            email: None,
            email_confirmed: None,
            email_auth_factor: None,
            active: true,
            status: None,
        }
    }

    /// Build a session from a login response
    ///
    /// The endpoint is the PDS named in the DID document when there is one,
    /// otherwise `login_service`, the URL the login was sent to.
    pub fn from_create_session(output: CreateSessionOutput, login_service: &str) -> Self {
        let service_endpoint = output
            .did_doc
            .as_ref()
            .and_then(pds_endpoint)
            .unwrap_or_else(|| login_service.to_string());

        Self {
            service_endpoint,
            did: output.did,
            handle: output.handle,
            access_jwt: output.access_jwt,
            refresh_jwt: output.refresh_jwt,
            email: output.email,
            email_confirmed: output.email_confirmed,
            email_auth_factor: output.email_auth_factor,
            active: output.active.unwrap_or(true),
            status: output.status,
        }
    }

    /// Apply a refresh response, keeping what it does not carry
    pub fn refreshed(&self, output: RefreshSessionOutput) -> Self {
        let service_endpoint = output
            .did_doc
            .as_ref()
            .and_then(pds_endpoint)
            .unwrap_or_else(|| self.service_endpoint.clone());

        Self {
            service_endpoint,
            did: output.did,
            handle: output.handle,
            access_jwt: output.access_jwt,
            refresh_jwt: output.refresh_jwt,
            email: self.email.clone(),
            email_confirmed: self.email_confirmed,
            email_auth_factor: self.email_auth_factor,
            active: output.active.unwrap_or(true),
            status: output.status,
        }
    }
}

/// Find the PDS endpoint in a DID document
///
/// Looks for the `#atproto_pds` service of type `AtprotoPersonalDataServer`.
/// The id may be relative (`#atproto_pds`) or absolute (`did:plc:...#atproto_pds`).
pub fn pds_endpoint(did_doc: &serde_json::Value) -> Option<String> {
    did_doc
        .get("service")?
        .as_array()?
        .iter()
        .find(|service| {
            let id = service.get("id").and_then(|v| v.as_str()).unwrap_or_default();
            let kind = service.get("type").and_then(|v| v.as_str()).unwrap_or_default();
            id.ends_with(PDS_SERVICE_ID) && kind == PDS_SERVICE_TYPE
        })
        .and_then(|service| service.get("serviceEndpoint"))
        .and_then(|endpoint| endpoint.as_str())
        .map(|endpoint| endpoint.to_string())
}
