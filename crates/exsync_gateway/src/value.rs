//! Dynamic values exchanged with the SDK.

use std::fmt;

/// A dynamically typed value crossing the SDK boundary.
///
/// Maps preserve insertion order and are keyed by string.
#[derive(Debug, Clone, PartialEq)]
pub enum SdkValue {
    /// Absence of a value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Ordered list.
    List(Vec<SdkValue>),
    /// Ordered string-keyed map.
    Map(Vec<(String, SdkValue)>),
}

impl SdkValue {
    /// Creates a map value from key/value pairs.
    pub fn map(pairs: impl IntoIterator<Item = (String, SdkValue)>) -> Self {
        Self::Map(pairs.into_iter().collect())
    }

    /// Creates a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Returns true if this is `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SdkValue::Null)
    }

    /// Returns the boolean value, if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SdkValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer value, if this is an `Integer`.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SdkValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the text value, if this is a `Text`.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SdkValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the bytes, if this is a `Bytes`.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            SdkValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the list items, if this is a `List`.
    #[must_use]
    pub fn as_list(&self) -> Option<&[SdkValue]> {
        match self {
            SdkValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the map pairs, if this is a `Map`.
    #[must_use]
    pub fn as_map(&self) -> Option<&[(String, SdkValue)]> {
        match self {
            SdkValue::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Looks up a key in a map value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SdkValue> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

impl fmt::Display for SdkValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdkValue::Null => f.write_str("null"),
            SdkValue::Bool(b) => write!(f, "{b}"),
            SdkValue::Integer(i) => write!(f, "{i}"),
            SdkValue::Float(x) => write!(f, "{x}"),
            SdkValue::Text(s) => f.write_str(s),
            SdkValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            SdkValue::List(items) => write!(f, "<list of {}>", items.len()),
            SdkValue::Map(pairs) => write!(f, "<map of {}>", pairs.len()),
        }
    }
}

impl From<&str> for SdkValue {
    fn from(s: &str) -> Self {
        SdkValue::Text(s.to_string())
    }
}

impl From<String> for SdkValue {
    fn from(s: String) -> Self {
        SdkValue::Text(s)
    }
}

impl From<i64> for SdkValue {
    fn from(i: i64) -> Self {
        SdkValue::Integer(i)
    }
}

impl From<bool> for SdkValue {
    fn from(b: bool) -> Self {
        SdkValue::Bool(b)
    }
}

impl From<Vec<u8>> for SdkValue {
    fn from(bytes: Vec<u8>) -> Self {
        SdkValue::Bytes(bytes)
    }
}

/// Conversion from a normalized [`SdkValue`] to a concrete type.
///
/// `Null` converts to the type's default ("zero") value.
pub trait FromSdkValue: Sized + Default {
    /// The shape name used in conversion errors.
    const EXPECTED: &'static str;

    /// Converts from a value; `None` on shape mismatch.
    fn from_sdk_value(value: &SdkValue) -> Option<Self>;
}

impl FromSdkValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_sdk_value(value: &SdkValue) -> Option<Self> {
        value.as_integer()
    }
}

impl FromSdkValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_sdk_value(value: &SdkValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromSdkValue for String {
    const EXPECTED: &'static str = "text";

    fn from_sdk_value(value: &SdkValue) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

impl FromSdkValue for Vec<u8> {
    const EXPECTED: &'static str = "bytes";

    fn from_sdk_value(value: &SdkValue) -> Option<Self> {
        value.as_bytes().map(<[u8]>::to_vec)
    }
}
