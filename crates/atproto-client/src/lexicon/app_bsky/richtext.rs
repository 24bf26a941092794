//! `app.bsky.richtext.facet`
//!
//! Facets annotate byte ranges of a text with mentions, links and tags.

use crate::codec::truncate;
use serde::{Deserialize, Serialize, Serializer};

/// Byte range inside the UTF-8 text a facet applies to
///
/// `byte_start` is inclusive and `byte_end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByteSlice {
    /// Inclusive start offset
    pub byte_start: usize,
    /// Exclusive end offset
    pub byte_end: usize,
}

/// Annotation over a range of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    /// Annotated range
    pub index: ByteSlice,
    /// What the range means
    pub features: Vec<FacetFeature>,
}

/// Mention of an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    /// Mentioned account
    pub did: String,
}

/// Hyperlink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Target URI
    pub uri: String,
}

/// Hashtag, without the leading `#`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag text, at most 64 graphemes and 640 bytes
    #[serde(serialize_with = "tag_text")]
    pub tag: String,
}

fn tag_text<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    truncate::serialize_with_bytes(value, 64, 640, serializer)
}

crate::lexicon_union! {
    /// Facet feature union
    pub enum FacetFeature {
        /// Account mention
        Mention(Mention) = "app.bsky.richtext.facet#mention",
        /// Hyperlink
        Link(Link) = "app.bsky.richtext.facet#link",
        /// Hashtag
        Tag(Tag) = "app.bsky.richtext.facet#tag",
    }
}
