//! Generic nested key/value model of a daemon message.
//!
//! The daemon speaks in loosely typed dictionaries: integers, strings, raw
//! data, UUIDs, arrays and nested dictionaries. [`Value`] mirrors exactly
//! that subset and [`Dict`] adds the typed accessors the dispatcher needs.
//! Every accessor returns a [`DecodeError`] instead of panicking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DecodeError;

/// One value in a daemon message.
///
/// Serialises externally tagged (`{"int":5}`, `{"data":"0a0b"}`) so capture
/// files stay unambiguous about data vs. string payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Int(i64),
    Str(String),
    Data(#[serde(with = "hex::serde")] Vec<u8>),
    Uuid(Uuid),
    Array(Vec<Value>),
    Dict(Dict),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Data(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Self::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Interpret the value as a 128-bit identifier.
    ///
    /// Accepts a native UUID, 16 raw bytes, or a textual UUID.
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(u) => Some(*u),
            Self::Data(d) => Uuid::from_slice(d).ok(),
            Self::Str(s) => Uuid::parse_str(s).ok(),
            _ => None,
        }
    }

    /// Short type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Str(_) => "string",
            Self::Data(_) => "data",
            Self::Uuid(_) => "uuid",
            Self::Array(_) => "array",
            Self::Dict(_) => "dict",
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Self::Int(v.into())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Data(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Data(v.to_vec())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Self::Array(v.into_iter().map(Value::Str).collect())
    }
}

impl From<Dict> for Value {
    fn from(v: Dict) -> Self {
        Self::Dict(v)
    }
}

// ───────────────────────────────────────────────────────────────
// Dict
// ───────────────────────────────────────────────────────────────

/// String-keyed dictionary, the shape of every message's argument block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dict(BTreeMap<String, Value>);

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_owned(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn require(&self, key: &'static str) -> Result<&Value, DecodeError> {
        self.get(key).ok_or(DecodeError::MissingArgument(key))
    }

    // ── Required accessors ────────────────────────────────────

    pub fn int(&self, key: &'static str) -> Result<i64, DecodeError> {
        self.require(key)?.as_int().ok_or(DecodeError::WrongType {
            key,
            expected: "int",
        })
    }

    /// Required integer narrowed to `T`, e.g. an attribute handle.
    pub fn int_as<T: TryFrom<i64>>(&self, key: &'static str) -> Result<T, DecodeError> {
        let value = self.int(key)?;
        T::try_from(value).map_err(|_| DecodeError::OutOfRange { key, value })
    }

    pub fn bytes(&self, key: &'static str) -> Result<&[u8], DecodeError> {
        self.require(key)?.as_bytes().ok_or(DecodeError::WrongType {
            key,
            expected: "data",
        })
    }

    pub fn array(&self, key: &'static str) -> Result<&[Value], DecodeError> {
        self.require(key)?.as_array().ok_or(DecodeError::WrongType {
            key,
            expected: "array",
        })
    }

    pub fn dict(&self, key: &'static str) -> Result<&Dict, DecodeError> {
        self.require(key)?.as_dict().ok_or(DecodeError::WrongType {
            key,
            expected: "dict",
        })
    }

    pub fn uuid(&self, key: &'static str) -> Result<Uuid, DecodeError> {
        self.require(key)?.as_uuid().ok_or(DecodeError::WrongType {
            key,
            expected: "uuid",
        })
    }

    // ── Defaulting accessors ──────────────────────────────────

    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(Value::as_int).unwrap_or(default)
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_owned()
    }

    pub fn bytes_or_empty(&self, key: &str) -> Vec<u8> {
        self.get(key)
            .and_then(Value::as_bytes)
            .map(<[u8]>::to_vec)
            .unwrap_or_default()
    }

    /// Array under `key`, or an empty slice when absent or mistyped.
    pub fn array_or_empty(&self, key: &str) -> &[Value] {
        self.get(key).and_then(Value::as_array).unwrap_or(&[])
    }
}

impl FromIterator<(String, Value)> for Dict {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
