//! Lexicon unions
//!
//! A union field holds one of several lexicon shapes, discriminated by a `$type`
//! key. Unions are declared with [`lexicon_union!`], which generates an enum
//! with one variant per known member plus `Unknown(UnknownUnion)`.
//!
//! Decoding rules:
//!
//! 1. `$type` names a known member: decode straight into that variant.
//! 2. `$type` names anything else: keep the raw JSON in `Unknown`.
//! 3. No `$type`: try members in declaration order, first match wins,
//!    otherwise `Unknown`.
//!
//! `Unknown` re-encodes to exactly the bytes it was decoded from, so data from
//! newer servers survives a decode/encode cycle. Unions decode from JSON text
//! (`serde_json::from_str`/`from_slice`), which is how the dispatcher reads
//! response bodies.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;

/// Marks the key path inside a member in decode error messages
const MEMBER_PATH_MARKER: &str = "member at `";

/// A union member this client has no model for
///
/// Holds the original JSON text verbatim.
#[derive(Debug, Clone)]
pub struct UnknownUnion {
    type_name: Option<String>,
    raw: Box<RawValue>,
}

impl UnknownUnion {
    /// Wrap a raw member with its (possibly missing) `$type`
    pub fn new(type_name: Option<String>, raw: Box<RawValue>) -> Self {
        Self { type_name, raw }
    }

    /// The `$type` the member carried, if any
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Original JSON text
    pub fn raw_json(&self) -> &str {
        self.raw.get()
    }

    /// Decode the raw member as some other type
    pub fn decode<T>(&self) -> serde_json::Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        serde_json::from_str(self.raw.get())
    }
}

impl PartialEq for UnknownUnion {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.raw.get() == other.raw.get()
    }
}

impl Serialize for UnknownUnion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.raw.serialize(serializer)
    }
}

#[derive(Deserialize)]
struct TypeProbe {
    #[serde(rename = "$type")]
    type_name: Option<String>,
}

/// Read the `$type` discriminant of a raw member
///
/// Non-object members have no discriminant.
pub fn read_type_tag(raw: &RawValue) -> Option<String> {
    serde_json::from_str::<TypeProbe>(raw.get())
        .ok()
        .and_then(|probe| probe.type_name)
}

/// Decode a known member, keeping the key path of any failure
///
/// The member is decoded from its buffered text, so the failing key is
/// written into the message as ``invalid `<tag>` member at `<path>`: ...``.
/// [`nested_path`] reads it back out.
pub fn decode_member<T, E>(type_name: &str, raw: &RawValue) -> Result<T, E>
where
    T: DeserializeOwned,
    E: serde::de::Error,
{
    let mut deserializer = serde_json::Deserializer::from_str(raw.get());
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        E::custom(format!(
            "invalid `{type_name}` {MEMBER_PATH_MARKER}{path}`: {}",
            err.into_inner()
        ))
    })
}

/// Extend `outer` with the member key paths recorded in `message`
///
/// Unions nested inside union members record one path each, outermost
/// first.
pub(crate) fn nested_path(outer: &str, message: &str) -> String {
    let mut path = outer.to_string();
    let mut rest = message;

    while let Some(start) = rest.find(MEMBER_PATH_MARKER) {
        let after = &rest[start + MEMBER_PATH_MARKER.len()..];
        let Some(end) = after.find('`') else { break };
        let segment = &after[..end];

        if segment != "." && !segment.is_empty() {
            if path == "." {
                path = segment.to_string();
            } else if segment.starts_with('[') {
                path.push_str(segment);
            } else {
                path.push('.');
                path.push_str(segment);
            }
        }
        rest = &after[end..];
    }

    path
}

/// Serialize a known member with its `$type` tag added
pub fn serialize_tagged<T, S>(type_name: &str, value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    use serde::ser::Error as _;

    let mut json = serde_json::to_value(value).map_err(S::Error::custom)?;
    if let serde_json::Value::Object(map) = &mut json {
        map.insert("$type".to_string(), serde_json::Value::String(type_name.to_string()));
    }
    json.serialize(serializer)
}

/// Paths used by the expansion of [`lexicon_union!`]
#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;
}

/// Declare a lexicon union
///
/// ```
/// use atproto_client::lexicon_union;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// pub struct Link {
///     pub uri: String,
/// }
///
/// lexicon_union! {
///     /// Facet features
///     pub enum Feature {
///         /// A hyperlink
///         Link(Link) = "app.bsky.richtext.facet#link",
///     }
/// }
///
/// let feature: Feature =
///     serde_json::from_str(r#"{"$type":"app.bsky.richtext.facet#link","uri":"https://a.b"}"#)
///         .unwrap();
/// assert!(matches!(feature, Feature::Link(_)));
/// ```
#[macro_export]
macro_rules! lexicon_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident($ty:ty) = $tag:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant($ty),
            )+
            /// Member not known to this client, kept verbatim
            Unknown($crate::codec::union::UnknownUnion),
        }

        impl $name {
            /// `$type` values with a dedicated variant
            pub const KNOWN_TYPES: &'static [&'static str] = &[$($tag),+];

            /// `$type` of this member, if known or carried by the raw value
            pub fn type_name(&self) -> Option<&str> {
                match self {
                    $( Self::$variant(_) => Some($tag), )+
                    Self::Unknown(unknown) => unknown.type_name(),
                }
            }

            /// Check if this member has no dedicated variant
            pub fn is_unknown(&self) -> bool {
                matches!(self, Self::Unknown(_))
            }
        }

        impl<'de> $crate::codec::union::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::codec::union::__private::serde::Deserializer<'de>,
            {
                let raw = <::std::boxed::Box<$crate::codec::union::__private::serde_json::value::RawValue>
                    as $crate::codec::union::__private::serde::Deserialize>::deserialize(deserializer)?;
                let type_name = $crate::codec::union::read_type_tag(&raw);

                match type_name.as_deref() {
                    $(
                        Some($tag) => $crate::codec::union::decode_member::<$ty, D::Error>($tag, &raw)
                            .map(Self::$variant),
                    )+
                    Some(_) => Ok(Self::Unknown($crate::codec::union::UnknownUnion::new(
                        type_name.clone(),
                        raw,
                    ))),
                    None => {
                        $(
                            if let Ok(value) = $crate::codec::union::__private::serde_json::from_str::<$ty>(raw.get()) {
                                return Ok(Self::$variant(value));
                            }
                        )+
                        Ok(Self::Unknown($crate::codec::union::UnknownUnion::new(None, raw)))
                    }
                }
            }
        }

        impl $crate::codec::union::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::codec::union::__private::serde::Serializer,
            {
                match self {
                    $( Self::$variant(value) => $crate::codec::union::serialize_tagged($tag, value, serializer), )+
                    Self::Unknown(unknown) => $crate::codec::union::__private::serde::Serialize::serialize(unknown, serializer),
                }
            }
        }
    };
}
