//! Attribute identifiers as the daemon reports them.
//!
//! Standard attributes arrive in 2-byte short form, vendor ones as the full
//! 128-bit value. Both render as contiguous lowercase hex of the wire bytes,
//! which is also the key the directory indexes by.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::{DecodeError, Error};
use crate::wire::Value;

/// A GATT attribute UUID in the width it was reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GattUuid {
    Short16(u16),
    Short32(u32),
    Long(Uuid),
}

impl GattUuid {
    /// Decode the raw bytes of an attribute UUID (big-endian, 2/4/16 bytes).
    pub fn from_wire(bytes: &[u8]) -> Result<Self, DecodeError> {
        match *bytes {
            [a, b] => Ok(Self::Short16(u16::from_be_bytes([a, b]))),
            [a, b, c, d] => Ok(Self::Short32(u32::from_be_bytes([a, b, c, d]))),
            _ => Uuid::from_slice(bytes)
                .map(Self::Long)
                .map_err(|_| DecodeError::UuidLength(bytes.len())),
        }
    }

    /// Decode a UUID-valued argument: raw data, text or a native UUID.
    pub fn from_value(value: &Value, key: &'static str) -> Result<Self, DecodeError> {
        match value {
            Value::Data(bytes) => Self::from_wire(bytes),
            Value::Uuid(u) => Ok(Self::Long(*u)),
            Value::Str(s) => s.parse().map_err(|_| DecodeError::WrongType {
                key,
                expected: "uuid",
            }),
            _ => Err(DecodeError::WrongType {
                key,
                expected: "uuid",
            }),
        }
    }

    pub fn to_wire(self) -> Vec<u8> {
        match self {
            Self::Short16(v) => v.to_be_bytes().to_vec(),
            Self::Short32(v) => v.to_be_bytes().to_vec(),
            Self::Long(u) => u.as_bytes().to_vec(),
        }
    }

    pub fn is_short(self) -> bool {
        !matches!(self, Self::Long(_))
    }

    /// Expand a short identifier onto the Bluetooth base UUID.
    pub fn to_uuid(self) -> Uuid {
        const BASE_LOW: u128 = 0x0000_1000_8000_0080_5f9b_34fb;
        match self {
            Self::Short16(v) => Uuid::from_u128((u128::from(v) << 96) | BASE_LOW),
            Self::Short32(v) => Uuid::from_u128((u128::from(v) << 96) | BASE_LOW),
            Self::Long(u) => u,
        }
    }
}

impl fmt::Display for GattUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short16(v) => write!(f, "{v:04x}"),
            Self::Short32(v) => write!(f, "{v:08x}"),
            Self::Long(u) => write!(f, "{}", u.simple()),
        }
    }
}

impl FromStr for GattUuid {
    type Err = Error;

    /// Accepts `1800`, `0x1800`, `0000180f`, 32 hex digits, or the
    /// hyphenated 128-bit form. Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidUuid(s.to_owned());
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let digits: String = body.chars().filter(|c| *c != '-').collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        match digits.len() {
            4 => u16::from_str_radix(&digits, 16)
                .map(Self::Short16)
                .map_err(|_| invalid()),
            8 => u32::from_str_radix(&digits, 16)
                .map(Self::Short32)
                .map_err(|_| invalid()),
            32 => Uuid::parse_str(&digits).map(Self::Long).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

impl From<u16> for GattUuid {
    fn from(v: u16) -> Self {
        Self::Short16(v)
    }
}

impl From<Uuid> for GattUuid {
    fn from(u: Uuid) -> Self {
        Self::Long(u)
    }
}

impl Serialize for GattUuid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GattUuid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
