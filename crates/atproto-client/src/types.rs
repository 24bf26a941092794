//! Core AT Protocol types

use serde::{Deserialize, Serialize};

/// Strong reference to a record: its AT URI plus the CID of the exact version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrongRef {
    /// AT URI of the record
    pub uri: String,
    /// CID of the record
    pub cid: String,
}

impl StrongRef {
    /// Create a new strong reference
    pub fn new(uri: impl Into<String>, cid: impl Into<String>) -> Self {
        Self { uri: uri.into(), cid: cid.into() }
    }
}
