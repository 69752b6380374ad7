//! Storage value model and JSON codec
//!
//! This module defines the attribute-typed value representation the backing
//! engine stores:
//! - Attr: tagged union over string/number/bool/binary/null/list/map
//! - Number: exact-decimal numeric attribute (text form, never binary float)
//! - Item: an attribute map addressed by its table's key attributes
//!
//! Application code works in `serde_json::Value`; the codec converts at the
//! boundary. Floats are converted to their shortest round-trip decimal text
//! on the way in, and back to `f64` only on the way out, so the stored form
//! never accumulates binary-float noise.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, StashError};

/// An item: attribute name to value mapping.
///
/// Must contain a value for every key attribute of its table; otherwise
/// schema-free.
pub type Item = BTreeMap<String, Attr>;

/// A primary key: the subset of an item covering its table's key attributes.
pub type Key = BTreeMap<String, Attr>;

/// Exact-decimal numeric attribute.
///
/// Stored as normalized decimal text. Integers pass through unchanged;
/// floats are rendered via their shortest round-trip representation
/// (`3.14f64` becomes `"3.14"`, not `"3.1400000000000001"`). Equality is
/// textual on the stored form.
///
/// # Examples
///
/// ```
/// use stash_core::Number;
///
/// let n = Number::from_f64(3.14).unwrap();
/// assert_eq!(n.as_str(), "3.14");
/// assert_eq!(n.as_f64(), Some(3.14));
///
/// let i = Number::from_i64(42);
/// assert_eq!(i.as_str(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Number(String);

impl Number {
    /// Create from a float's shortest round-trip decimal form.
    ///
    /// Fails with `UnsupportedValue` for NaN and infinities; the storage
    /// format has no representation for them.
    pub fn from_f64(v: f64) -> Result<Self> {
        if !v.is_finite() {
            return Err(StashError::UnsupportedValue {
                reason: format!("non-finite number: {}", v),
            });
        }
        Ok(Number(format!("{}", v)))
    }

    /// Create from a signed integer.
    pub fn from_i64(v: i64) -> Self {
        Number(v.to_string())
    }

    /// Create from an unsigned integer.
    pub fn from_u64(v: u64) -> Self {
        Number(v.to_string())
    }

    /// Parse a decimal string.
    ///
    /// The text is validated by parsing, but stored as given (no
    /// re-rendering), so `"3.140"` keeps its trailing zero.
    pub fn parse(s: &str) -> Result<Self> {
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Number(s.to_string())),
            _ => Err(StashError::UnsupportedValue {
                reason: format!("not a decimal number: {:?}", s),
            }),
        }
    }

    /// The exact stored decimal form.
    ///
    /// Callers needing exactness read this rather than `as_f64`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to the native float at the presentation boundary.
    ///
    /// Lossy past ~15 significant digits; the stored form is untouched.
    pub fn as_f64(&self) -> Option<f64> {
        self.0.parse::<f64>().ok()
    }

    /// Convert to a signed integer if the stored form is integral.
    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse::<i64>().ok()
    }

    /// Convert to an unsigned integer if the stored form is integral and
    /// non-negative.
    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse::<u64>().ok()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::from_i64(v)
    }
}

impl From<u64> for Number {
    fn from(v: u64) -> Self {
        Number::from_u64(v)
    }
}

impl From<i32> for Number {
    fn from(v: i32) -> Self {
        Number::from_i64(v as i64)
    }
}

/// Storage-side value: the closed set of types the backing engine accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Attr {
    /// String
    S(String),
    /// Exact-decimal number
    N(Number),
    /// Boolean
    Bool(bool),
    /// Binary payload (base64 in serialized form)
    B(#[serde(with = "b64")] Vec<u8>),
    /// Null
    Null,
    /// Ordered list
    L(Vec<Attr>),
    /// String-keyed map
    M(BTreeMap<String, Attr>),
}

impl Attr {
    /// Convert an application JSON value into its storage form.
    ///
    /// Recursive over objects and arrays. Integral JSON numbers pass
    /// through unchanged; floats take their shortest round-trip decimal
    /// form. Fails with `UnsupportedValue` for numbers outside the
    /// representable set.
    pub fn from_json(value: &serde_json::Value) -> Result<Attr> {
        match value {
            serde_json::Value::Null => Ok(Attr::Null),
            serde_json::Value::Bool(b) => Ok(Attr::Bool(*b)),
            serde_json::Value::String(s) => Ok(Attr::S(s.clone())),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Attr::N(Number::from_i64(i)))
                } else if let Some(u) = n.as_u64() {
                    Ok(Attr::N(Number::from_u64(u)))
                } else if let Some(f) = n.as_f64() {
                    Ok(Attr::N(Number::from_f64(f)?))
                } else {
                    Err(StashError::UnsupportedValue {
                        reason: format!("unrepresentable number: {}", n),
                    })
                }
            }
            serde_json::Value::Array(items) => {
                let converted: Result<Vec<Attr>> = items.iter().map(Attr::from_json).collect();
                Ok(Attr::L(converted?))
            }
            serde_json::Value::Object(map) => {
                let mut out = BTreeMap::new();
                for (k, v) in map {
                    out.insert(k.clone(), Attr::from_json(v)?);
                }
                Ok(Attr::M(out))
            }
        }
    }

    /// Convert back to an application JSON value for presentation.
    ///
    /// Numbers become native floats (or integers where integral); binary
    /// payloads surface as base64 text since JSON has no binary form. The
    /// stored form is not mutated; callers needing exact decimals read
    /// `Attr::N` directly.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Attr::S(s) => serde_json::Value::String(s.clone()),
            Attr::N(n) => {
                // Integers stay exact: JSON carries i64 and u64 natively,
                // so only fractional values go through the float fallback
                if let Some(i) = n.as_i64() {
                    serde_json::Value::Number(i.into())
                } else if let Some(u) = n.as_u64() {
                    serde_json::Value::Number(u.into())
                } else if let Some(f) = n.as_f64().and_then(serde_json::Number::from_f64) {
                    serde_json::Value::Number(f)
                } else {
                    serde_json::Value::String(n.as_str().to_string())
                }
            }
            Attr::Bool(b) => serde_json::Value::Bool(*b),
            Attr::B(bytes) => {
                use base64::Engine as _;
                serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(bytes))
            }
            Attr::Null => serde_json::Value::Null,
            Attr::L(items) => serde_json::Value::Array(items.iter().map(Attr::to_json).collect()),
            Attr::M(map) => {
                let mut out = serde_json::Map::new();
                for (k, v) in map {
                    out.insert(k.clone(), v.to_json());
                }
                serde_json::Value::Object(out)
            }
        }
    }

    /// The string payload, if this is a string attribute.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Attr::S(s) => Some(s),
            _ => None,
        }
    }

    /// The number payload, if this is a numeric attribute.
    pub fn as_n(&self) -> Option<&Number> {
        match self {
            Attr::N(n) => Some(n),
            _ => None,
        }
    }

    /// The list payload, if this is a list attribute.
    pub fn as_l(&self) -> Option<&[Attr]> {
        match self {
            Attr::L(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Attr {
    fn from(v: &str) -> Self {
        Attr::S(v.to_string())
    }
}

impl From<String> for Attr {
    fn from(v: String) -> Self {
        Attr::S(v)
    }
}

impl From<bool> for Attr {
    fn from(v: bool) -> Self {
        Attr::Bool(v)
    }
}

impl From<i64> for Attr {
    fn from(v: i64) -> Self {
        Attr::N(Number::from_i64(v))
    }
}

impl From<Number> for Attr {
    fn from(v: Number) -> Self {
        Attr::N(v)
    }
}

/// Convert a whole JSON object into an item.
///
/// Fails with `Validation` when the value is not an object.
pub fn item_from_json(value: &serde_json::Value) -> Result<Item> {
    match Attr::from_json(value)? {
        Attr::M(map) => Ok(map),
        _ => Err(StashError::Validation {
            reason: "item must be a JSON object".to_string(),
        }),
    }
}

/// Convert an item back to a JSON object for presentation.
pub fn item_to_json(item: &Item) -> serde_json::Value {
    Attr::M(item.clone()).to_json()
}

mod b64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(de)?;
        STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom)
    }
}
