//! Datetime fields
//!
//! The protocol writes timestamps as RFC 3339 text in UTC with millisecond
//! precision (`2024-05-20T09:41:00.000Z`). Decoding is lenient: any RFC 3339
//! timestamp is accepted and normalized to UTC.
//!
//! Use with `#[serde(with = "crate::codec::datetime")]`, or the [`option`]
//! submodule for optional fields.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Format a timestamp the way the protocol expects it on the wire
pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a timestamp received from the wire
pub fn parse(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|dt| dt.with_timezone(&Utc))
}

/// Serialize a required datetime field
pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(value))
}

/// Deserialize a required datetime field
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse(&text).map_err(|e| {
        serde::de::Error::custom(format!("invalid datetime `{}`: {}", text, e))
    })
}

/// Optional datetime fields
///
/// Pair with `#[serde(default, skip_serializing_if = "Option::is_none")]` so an
/// absent key decodes to `None` and `None` is not written.
pub mod option {
    use super::*;

    /// Serialize an optional datetime field
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => super::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional datetime field
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => parse(&text).map(Some).map_err(|e| {
                serde::de::Error::custom(format!("invalid datetime `{}`: {}", text, e))
            }),
            None => Ok(None),
        }
    }
}
