//! Hex encoding of raw bytes.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseHexError;

/// Encode bytes as lowercase hex without a prefix.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Encode bytes as lowercase hex with a `0x` prefix.
pub fn encode_prefixed(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode a hex string, with or without a `0x` prefix.
///
/// An empty string (or a bare `0x`) decodes to no bytes.
pub fn decode(s: &str) -> Result<Vec<u8>, ParseHexError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| match e {
        hex::FromHexError::OddLength => ParseHexError::InvalidLength(s.to_string()),
        _ => ParseHexError::InvalidHexChars(s.to_string()),
    })
}

/// An owned byte string that renders as `0x`-prefixed hex.
///
/// # Example
///
/// ```
/// use aptos_kit::Hex;
///
/// let hex: Hex = "0xcafe".parse().unwrap();
/// assert_eq!(hex.as_bytes(), &[0xca, 0xfe]);
/// assert_eq!(hex.to_string(), "0xcafe");
/// assert_eq!(hex.to_string_without_prefix(), "cafe");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Hex(Vec<u8>);

impl Hex {
    /// Wrap raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume and return the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Lowercase hex without the `0x` prefix.
    pub fn to_string_without_prefix(&self) -> String {
        encode(&self.0)
    }
}

impl FromStr for Hex {
    type Err = ParseHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).map(Self)
    }
}

impl Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl Debug for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hex({})", self)
    }
}

impl AsRef<[u8]> for Hex {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Hex {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Serialize for Hex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Hex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s: String = Deserialize::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            Vec::<u8>::deserialize(deserializer).map(Self)
        }
    }
}
