//! # Registry Configuration
//!
//! Deployment constants the registry is wired with.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SHARD_FACTORY_ADDRESS` | zero address | Application factory the shards are created by |
//! | `SHARD_UNIT_CREATION_CODE` | empty | Hex creation code of the unit contract |
//! | `SHARD_REGISTRY_ADDRESS` | zero address | Identity the registry appends inputs as |
//! | `SHARD_LOCK_STRIPES` | `64` | Number of per-tuple critical sections |

use crate::domain::{decode_hex_bytes, Create2Deriver, ParseError, UnitAddress};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Default number of lock stripes.
pub const DEFAULT_LOCK_STRIPES: usize = 64;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds an unparsable value.
    #[error("invalid value for {var}: {reason}")]
    InvalidVar {
        /// Variable name.
        var: &'static str,
        /// What went wrong.
        reason: String,
    },

    /// Zero lock stripes would leave nothing to lock.
    #[error("lock_stripes must be at least 1")]
    NoLockStripes,

    /// Factory address is unset.
    #[error("factory address is the zero address; set SHARD_FACTORY_ADDRESS")]
    ZeroFactoryAddress,
}

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Application factory shards are created by.
    pub factory_address: UnitAddress,
    /// Creation code of the unit contract.
    #[serde(with = "hex_bytes")]
    pub unit_creation_code: Vec<u8>,
    /// Identity the registry appends inputs as.
    pub registry_address: UnitAddress,
    /// Number of critical sections tuples are hashed onto.
    pub lock_stripes: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            factory_address: UnitAddress::ZERO,
            unit_creation_code: Vec::new(),
            registry_address: UnitAddress::ZERO,
            lock_stripes: DEFAULT_LOCK_STRIPES,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            factory_address: address_var("SHARD_FACTORY_ADDRESS")?
                .unwrap_or(defaults.factory_address),
            unit_creation_code: match env::var("SHARD_UNIT_CREATION_CODE") {
                Ok(value) => decode_hex_bytes(&value).map_err(|e| ConfigError::InvalidVar {
                    var: "SHARD_UNIT_CREATION_CODE",
                    reason: e.to_string(),
                })?,
                Err(_) => defaults.unit_creation_code,
            },
            registry_address: address_var("SHARD_REGISTRY_ADDRESS")?
                .unwrap_or(defaults.registry_address),
            lock_stripes: match env::var("SHARD_LOCK_STRIPES") {
                Ok(value) => value.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::InvalidVar {
                        var: "SHARD_LOCK_STRIPES",
                        reason: e.to_string(),
                    }
                })?,
                Err(_) => defaults.lock_stripes,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Structural checks every configuration must pass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lock_stripes == 0 {
            return Err(ConfigError::NoLockStripes);
        }
        Ok(())
    }

    /// Validate configuration for a real deployment.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the structural checks fail
    /// - the factory address is the zero address
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.factory_address.is_zero() {
            return Err(ConfigError::ZeroFactoryAddress);
        }
        Ok(())
    }

    /// Deriver mirroring the configured factory.
    pub fn deriver(&self) -> Create2Deriver {
        Create2Deriver::new(self.factory_address, self.unit_creation_code.clone())
    }
}

fn address_var(var: &'static str) -> Result<Option<UnitAddress>, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|e: ParseError| ConfigError::InvalidVar {
                var,
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

mod hex_bytes {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::decode_hex_bytes(&s).map_err(de::Error::custom)
    }
}
