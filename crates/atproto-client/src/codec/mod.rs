//! Wire codecs for lexicon models
//!
//! Models keep native Rust types in memory (`DateTime<Utc>`, `String`, enums) and
//! apply these helpers at the serde boundary:
//!
//! - [`datetime`]: the protocol timestamp text format
//! - [`truncate`]: grapheme-aware truncation of length-limited text before encoding
//! - [`union`]: `$type`-tagged union members with lossless unknown variants

pub mod datetime;
pub mod truncate;
pub mod union;

pub use truncate::{grapheme_count, truncate_graphemes, truncate_to_limits};
pub use union::UnknownUnion;
