//! Lexicon models
//!
//! Typed request and response shapes for the endpoints this crate wraps,
//! grouped by NSID namespace. Field names follow Rust conventions and map to
//! lexicon keys through `serde` renames; optional lexicon fields tolerate
//! absence and are skipped when encoding.
//!
//! Reference: <https://atproto.com/specs/lexicon>

pub mod app_bsky;
pub mod chat_bsky;
pub mod com_atproto;
