//! `app.bsky.graph.*` models

use super::actor::ProfileView;
use super::richtext::Facet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Moderation list: members are muted or blocked together
pub const LIST_PURPOSE_MODLIST: &str = "app.bsky.graph.defs#modlist";
/// Curation list: used for feeds and starter packs
pub const LIST_PURPOSE_CURATELIST: &str = "app.bsky.graph.defs#curatelist";
/// Reference list: used by starter packs
pub const LIST_PURPOSE_REFERENCELIST: &str = "app.bsky.graph.defs#referencelist";

/// Output of `app.bsky.graph.getFollows`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetFollowsOutput {
    /// Account whose follows were listed
    pub subject: ProfileView,
    /// Pagination cursor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Followed accounts
    pub follows: Vec<ProfileView>,
}

/// Output of `app.bsky.graph.getFollowers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetFollowersOutput {
    /// Account whose followers were listed
    pub subject: ProfileView,
    /// Pagination cursor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Following accounts
    pub followers: Vec<ProfileView>,
}

/// Output of `app.bsky.graph.getLists`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetListsOutput {
    /// Pagination cursor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Lists created by the actor
    pub lists: Vec<ListView>,
}

/// A list (`app.bsky.graph.defs#listView`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    /// List URI
    pub uri: String,
    /// List record CID
    pub cid: String,
    /// List owner
    pub creator: ProfileView,
    /// List name
    pub name: String,
    /// One of the `LIST_PURPOSE_*` values, or a newer one
    pub purpose: String,
    /// Description text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Facets over the description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_facets: Option<Vec<Facet>>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Number of members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_item_count: Option<u64>,
    /// Viewer relationship
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer: Option<ListViewerState>,
    /// When the list was indexed
    #[serde(with = "crate::codec::datetime")]
    pub indexed_at: DateTime<Utc>,
}

impl ListView {
    /// Check if this is a moderation list
    pub fn is_modlist(&self) -> bool {
        self.purpose == LIST_PURPOSE_MODLIST
    }
}

/// Viewer relationship to a list (`app.bsky.graph.defs#listViewerState`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListViewerState {
    /// Viewer mutes the list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
    /// URI of the viewer's list block record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked: Option<String>,
}
