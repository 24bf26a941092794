//! `com.atproto.server.*` models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input for `com.atproto.server.createSession`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionInput {
    /// Handle, DID or email of the account
    pub identifier: String,
    /// Account password or app password
    pub password: String,
    /// Email 2FA token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_factor_token: Option<String>,
    /// Allow signing in to a taken-down account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_takendown: Option<bool>,
}

impl CreateSessionInput {
    /// Password login without a second factor
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
            auth_factor_token: None,
            allow_takendown: None,
        }
    }

    /// Set the email 2FA token
    pub fn with_auth_factor_token(mut self, token: impl Into<String>) -> Self {
        self.auth_factor_token = Some(token.into());
        self
    }
}

/// Output of `com.atproto.server.createSession`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionOutput {
    /// Access JWT token
    pub access_jwt: String,
    /// Refresh JWT token
    pub refresh_jwt: String,
    /// User handle
    pub handle: String,
    /// User DID
    pub did: String,
    /// DID document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did_doc: Option<serde_json::Value>,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Email confirmed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_confirmed: Option<bool>,
    /// Email auth factor enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_auth_factor: Option<bool>,
    /// Session active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Account status ("takendown", "suspended", "deactivated")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Output of `com.atproto.server.refreshSession`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSessionOutput {
    /// New access JWT token
    pub access_jwt: String,
    /// New refresh JWT token
    pub refresh_jwt: String,
    /// User handle
    pub handle: String,
    /// User DID
    pub did: String,
    /// DID document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did_doc: Option<serde_json::Value>,
    /// Session active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Account status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Input for `com.atproto.server.createAppPassword`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppPasswordInput {
    /// Human-readable name for the password
    pub name: String,
    /// Allow access to privileged endpoints such as direct messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,
}

/// A newly created app password (`com.atproto.server.createAppPassword#appPassword`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppPassword {
    /// Name given at creation
    pub name: String,
    /// Generated password; only ever returned once
    pub password: String,
    /// Creation time
    #[serde(with = "crate::codec::datetime")]
    pub created_at: DateTime<Utc>,
    /// Whether the password is privileged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,
}

/// Invite code (`com.atproto.server.defs#inviteCode`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteCode {
    /// The code
    pub code: String,
    /// Remaining uses
    pub available: i64,
    /// Whether the code was disabled
    pub disabled: bool,
    /// Account the code was issued for
    pub for_account: String,
    /// Issuer
    pub created_by: String,
    /// Issue time
    #[serde(with = "crate::codec::datetime")]
    pub created_at: DateTime<Utc>,
    /// Redemptions so far
    #[serde(default)]
    pub uses: Vec<InviteCodeUse>,
}

/// One redemption of an invite code (`com.atproto.server.defs#inviteCodeUse`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteCodeUse {
    /// Account that redeemed the code
    pub used_by: String,
    /// Redemption time
    #[serde(with = "crate::codec::datetime")]
    pub used_at: DateTime<Utc>,
}
