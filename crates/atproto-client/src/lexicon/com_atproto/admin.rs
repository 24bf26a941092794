//! `com.atproto.admin.*` models

use super::server::InviteCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account as seen by an administrator (`com.atproto.admin.defs#accountView`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    /// Account DID
    pub did: String,
    /// Current handle
    pub handle: String,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Records linked to the account (e.g. its profile)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_records: Vec<serde_json::Value>,
    /// When the account was indexed
    #[serde(with = "crate::codec::datetime")]
    pub indexed_at: DateTime<Utc>,
    /// Invite code the account signed up with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invited_by: Option<InviteCode>,
    /// Invite codes issued to the account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invites: Option<Vec<InviteCode>>,
    /// Whether the account may issue invites
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invites_disabled: Option<bool>,
    /// When the email was confirmed
    #[serde(
        default,
        with = "crate::codec::datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    /// Moderator note on the invite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_note: Option<String>,
    /// When the account was deactivated
    #[serde(
        default,
        with = "crate::codec::datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub deactivated_at: Option<DateTime<Utc>>,
}

/// Input for `com.atproto.admin.updateAccountEmail`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountEmailInput {
    /// Handle or DID of the account
    pub account: String,
    /// New email address
    pub email: String,
}
