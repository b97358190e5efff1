//! # Value Objects
//!
//! Immutable fixed-width identities used by the registry.
//! These types represent concepts that are defined by their value, not identity.
//!
//! All of them print and serialize as `0x`-prefixed lowercase hex and parse
//! from hex with or without the prefix, in any letter case.

use super::errors::ParseError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Decode a hex string with an optional single `0x`/`0X` prefix.
pub fn decode_hex_bytes(input: &str) -> Result<Vec<u8>, ParseError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    hex::decode(digits).map_err(|e| ParseError::InvalidHex(e.to_string()))
}

/// Decode a hex string (optional `0x` prefix) into exactly `N` bytes.
pub(crate) fn decode_fixed<const N: usize>(input: &str) -> Result<[u8; N], ParseError> {
    let bytes = decode_hex_bytes(input)?;
    if bytes.len() != N {
        return Err(ParseError::InvalidLength {
            expected: N,
            got: bytes.len(),
        });
    }

    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Width in bytes.
            pub const LEN: usize = $len;

            /// The all-zero value.
            pub const ZERO: Self = Self([0u8; $len]);

            /// Wraps a fixed-size byte array.
            #[must_use]
            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Creates a value from a slice. Returns None if wrong length.
            #[must_use]
            pub fn from_slice(slice: &[u8]) -> Option<Self> {
                <[u8; $len]>::try_from(slice).ok().map(Self)
            }

            /// Returns the underlying bytes.
            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Returns true if every byte is zero.
            #[must_use]
            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; $len]
            }

            /// Full `0x`-prefixed lowercase hex form.
            #[must_use]
            pub fn to_hex(&self) -> String {
                format!("0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                decode_fixed::<$len>(s).map(Self)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl From<$name> for [u8; $len] {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    };
}

fixed_bytes!(
    /// A 20-byte identity of an application unit (main unit or shard).
    UnitAddress,
    20
);

fixed_bytes!(
    /// A 32-byte content identifier of the program a unit runs.
    TemplateHash,
    32
);

fixed_bytes!(
    /// A 32-byte caller-chosen discriminator between shards of one main unit.
    ///
    /// Also used verbatim as the creation salt.
    ShardId,
    32
);

impl ShardId {
    /// Shard id holding `n` as a big-endian integer, e.g. `0x…01` for 1.
    #[must_use]
    pub fn from_u64(n: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }
}
