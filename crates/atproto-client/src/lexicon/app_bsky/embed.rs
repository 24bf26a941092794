//! `app.bsky.embed.record`
//!
//! Record embeds, used by posts and chat messages to quote another record.

use super::actor::ProfileViewBasic;
use crate::types::StrongRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Embed of another record by strong reference (`app.bsky.embed.record`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedRecord {
    /// Embedded record
    pub record: StrongRef,
}

/// Hydrated record embed (`app.bsky.embed.record#view`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedRecordView {
    /// Resolved record, or why it could not be shown
    pub record: EmbeddedRecord,
}

/// Resolved embedded record (`app.bsky.embed.record#viewRecord`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecord {
    /// Record URI
    pub uri: String,
    /// Record CID
    pub cid: String,
    /// Record author
    pub author: ProfileViewBasic,
    /// Record value as stored in the repository
    pub value: serde_json::Value,
    /// When the record was indexed
    #[serde(with = "crate::codec::datetime")]
    pub indexed_at: DateTime<Utc>,
}

/// Embedded record that no longer exists (`app.bsky.embed.record#viewNotFound`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewNotFound {
    /// Record URI
    pub uri: String,
    /// Always true
    pub not_found: bool,
}

/// Embedded record hidden by a block (`app.bsky.embed.record#viewBlocked`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewBlocked {
    /// Record URI
    pub uri: String,
    /// Always true
    pub blocked: bool,
}

/// Embedded record detached by its author (`app.bsky.embed.record#viewDetached`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDetached {
    /// Record URI
    pub uri: String,
    /// Always true
    pub detached: bool,
}

crate::lexicon_union! {
    /// Possible contents of an [`EmbedRecordView`]
    pub enum EmbeddedRecord {
        /// Resolved record
        Record(ViewRecord) = "app.bsky.embed.record#viewRecord",
        /// Record not found
        NotFound(ViewNotFound) = "app.bsky.embed.record#viewNotFound",
        /// Record blocked
        Blocked(ViewBlocked) = "app.bsky.embed.record#viewBlocked",
        /// Record detached
        Detached(ViewDetached) = "app.bsky.embed.record#viewDetached",
    }
}
