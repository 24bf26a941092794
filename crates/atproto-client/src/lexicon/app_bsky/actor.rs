//! `app.bsky.actor.defs` views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Relationship between the requesting account and a profile
///
/// Only filled in for authenticated requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerState {
    /// Viewer has muted this account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
    /// This account blocks the viewer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<bool>,
    /// URI of the viewer's block record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocking: Option<String>,
    /// URI of the viewer's follow record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following: Option<String>,
    /// URI of this account's follow record for the viewer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followed_by: Option<String>,
}

/// Compact profile (`app.bsky.actor.defs#profileViewBasic`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileViewBasic {
    /// Account DID
    pub did: String,
    /// Account handle
    pub handle: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Viewer relationship
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer: Option<ViewerState>,
    /// Moderation labels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<serde_json::Value>,
    /// Account creation time
    #[serde(
        default,
        with = "crate::codec::datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Profile with description (`app.bsky.actor.defs#profileView`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    /// Account DID
    pub did: String,
    /// Account handle
    pub handle: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Profile description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// When the profile was last indexed
    #[serde(
        default,
        with = "crate::codec::datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub indexed_at: Option<DateTime<Utc>>,
    /// Account creation time
    #[serde(
        default,
        with = "crate::codec::datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Viewer relationship
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer: Option<ViewerState>,
    /// Moderation labels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<serde_json::Value>,
}
