//! # Domain Errors
//!
//! Error types for the shard registry.

use super::value_objects::UnitAddress;
use thiserror::Error;

/// Errors surfaced by `create_shard` and the ports it drives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The factory refused creation: the deterministic address is occupied.
    #[error("identity collision: a unit already exists at {0}")]
    IdentityCollision(UnitAddress),

    /// The factory created the unit somewhere other than the derived address.
    #[error("address mismatch: derived {expected}, factory created {actual}")]
    AddressMismatch {
        /// Address predicted by the deriver.
        expected: UnitAddress,
        /// Address reported by the factory.
        actual: UnitAddress,
    },

    /// Any other factory failure.
    #[error("factory error: {0}")]
    Factory(String),

    /// Input queue failure.
    #[error("input queue error: {0}")]
    Queue(String),
}

impl RegistryError {
    /// Fatal errors indicate a broken derivation/factory contract.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AddressMismatch { .. })
    }

    /// Whether repeating the same call could succeed.
    ///
    /// Collisions and mismatches repeat deterministically for the same inputs.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Factory(_) | Self::Queue(_))
    }
}

/// Errors decoding a notice payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoticeError {
    /// Payload has the wrong size for the notice kind.
    #[error("invalid {kind} length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Notice kind being decoded.
        kind: &'static str,
        /// Required length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Payload length matches no known notice.
    #[error("unrecognized notice payload of {0} bytes")]
    Unrecognized(usize),
}

/// Errors parsing fixed-width hex values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Not valid hexadecimal.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded to the wrong number of bytes.
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Decoded length.
        got: usize,
    },
}
