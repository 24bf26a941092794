//! `chat.bsky.actor.defs`

use crate::lexicon::app_bsky::actor::ViewerState;
use serde::{Deserialize, Serialize};

/// Conversation member (`chat.bsky.actor.defs#profileViewBasic`)
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
    /// Account has been disabled for chat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_disabled: Option<bool>,
}
