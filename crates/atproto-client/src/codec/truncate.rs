//! Length-limited text fields
//!
//! Lexicons bound text by `maxGraphemes` (user-perceived characters) and often
//! also by `maxLength` (UTF-8 bytes). Values are cut to fit before they are
//! encoded, always on an extended grapheme cluster boundary so an emoji
//! sequence or a base letter with combining marks is never split.

use serde::Serializer;
use unicode_segmentation::UnicodeSegmentation;

/// Number of extended grapheme clusters in `value`
pub fn grapheme_count(value: &str) -> usize {
    value.graphemes(true).count()
}

/// Longest prefix of `value` holding at most `max_graphemes` grapheme clusters
pub fn truncate_graphemes(value: &str, max_graphemes: usize) -> &str {
    match value.grapheme_indices(true).nth(max_graphemes) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}

/// Longest prefix of `value` within both a grapheme and a byte budget
///
/// The byte budget never splits a cluster: a cluster that does not fit whole is
/// dropped.
pub fn truncate_to_limits(value: &str, max_graphemes: usize, max_bytes: usize) -> &str {
    let mut end = 0;
    for (index, (offset, cluster)) in value.grapheme_indices(true).enumerate() {
        if index == max_graphemes || offset + cluster.len() > max_bytes {
            break;
        }
        end = offset + cluster.len();
    }
    &value[..end]
}

/// Serialize `value` truncated to `max_graphemes`
///
/// Models bind this through a small per-field function:
///
/// ```
/// use atproto_client::codec::truncate;
/// use serde::Serialize;
///
/// fn name_64<S: serde::Serializer>(value: &str, s: S) -> Result<S::Ok, S::Error> {
///     truncate::serialize(value, 64, s)
/// }
///
/// #[derive(Serialize)]
/// struct Named {
///     #[serde(serialize_with = "name_64")]
///     name: String,
/// }
///
/// let json = serde_json::to_string(&Named { name: "x".repeat(100) }).unwrap();
/// assert_eq!(json.len(), r#"{"name":""}"#.len() + 64);
/// ```
pub fn serialize<S>(value: &str, max_graphemes: usize, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(truncate_graphemes(value, max_graphemes))
}

/// Serialize `value` truncated to both a grapheme and a byte budget
pub fn serialize_with_bytes<S>(
    value: &str,
    max_graphemes: usize,
    max_bytes: usize,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(truncate_to_limits(value, max_graphemes, max_bytes))
}
