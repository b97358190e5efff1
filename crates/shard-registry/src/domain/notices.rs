//! # Notices
//!
//! Payloads appended to the input queue when a shard is created.
//!
//! ```text
//! MainNotice  (to main unit, 104 bytes)
//! ┌──────────────┬──────────────┬──────────────────────┬──────────────────┐
//! │ shard [0,20) │ owner[20,40) │ template hash[40,72) │ shard id[72,104) │
//! └──────────────┴──────────────┴──────────────────────┴──────────────────┘
//!
//! ShardNotice (to new shard, 20 bytes)
//! ┌───────────────────┐
//! │ main unit [0,20)  │
//! └───────────────────┘
//! ```

use super::errors::NoticeError;
use super::value_objects::{ShardId, TemplateHash, UnitAddress};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Encoded size of a [`MainNotice`].
pub const MAIN_NOTICE_LEN: usize = 104;

/// Encoded size of a [`ShardNotice`].
pub const SHARD_NOTICE_LEN: usize = 20;

const SHARD_RANGE: Range<usize> = 0..20;
const OWNER_RANGE: Range<usize> = 20..40;
const TEMPLATE_RANGE: Range<usize> = 40..72;
const SHARD_ID_RANGE: Range<usize> = 72..104;

/// Tells the main unit that a shard now exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainNotice {
    /// Address of the new shard.
    pub shard: UnitAddress,
    /// Account that requested the shard.
    pub owner: UnitAddress,
    /// Program the shard runs.
    pub verifier_template_hash: TemplateHash,
    /// Caller-chosen shard discriminator.
    pub shard_id: ShardId,
}

impl MainNotice {
    /// Packed payload: shard ‖ owner ‖ template hash ‖ shard id.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(MAIN_NOTICE_LEN);
        payload.extend_from_slice(self.shard.as_bytes());
        payload.extend_from_slice(self.owner.as_bytes());
        payload.extend_from_slice(self.verifier_template_hash.as_bytes());
        payload.extend_from_slice(self.shard_id.as_bytes());
        payload
    }

    /// Decode a payload produced by [`MainNotice::encode`].
    pub fn decode(payload: &[u8]) -> Result<Self, NoticeError> {
        if payload.len() != MAIN_NOTICE_LEN {
            return Err(NoticeError::InvalidLength {
                kind: "main notice",
                expected: MAIN_NOTICE_LEN,
                got: payload.len(),
            });
        }

        Ok(Self {
            shard: UnitAddress::new(read_field(payload, SHARD_RANGE)),
            owner: UnitAddress::new(read_field(payload, OWNER_RANGE)),
            verifier_template_hash: TemplateHash::new(read_field(payload, TEMPLATE_RANGE)),
            shard_id: ShardId::new(read_field(payload, SHARD_ID_RANGE)),
        })
    }
}

/// Copy one fixed-width field out of a length-checked payload.
fn read_field<const N: usize>(payload: &[u8], range: Range<usize>) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&payload[range]);
    out
}

/// Tells a new shard which main unit it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardNotice {
    /// Address of the main unit.
    pub main_unit: UnitAddress,
}

impl ShardNotice {
    /// Payload is the bare main unit address.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        self.main_unit.as_bytes().to_vec()
    }

    /// Decode a payload produced by [`ShardNotice::encode`].
    pub fn decode(payload: &[u8]) -> Result<Self, NoticeError> {
        UnitAddress::from_slice(payload)
            .map(|main_unit| Self { main_unit })
            .ok_or(NoticeError::InvalidLength {
                kind: "shard notice",
                expected: SHARD_NOTICE_LEN,
                got: payload.len(),
            })
    }
}

/// Either notice kind, recovered from a raw queue payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Payload addressed to a main unit.
    Main(MainNotice),
    /// Payload addressed to a shard.
    Shard(ShardNotice),
}

impl Notice {
    /// Classify a payload by its length and decode it.
    pub fn classify(payload: &[u8]) -> Result<Self, NoticeError> {
        match payload.len() {
            MAIN_NOTICE_LEN => MainNotice::decode(payload).map(Self::Main),
            SHARD_NOTICE_LEN => ShardNotice::decode(payload).map(Self::Shard),
            other => Err(NoticeError::Unrecognized(other)),
        }
    }

    /// Encoded payload.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Main(notice) => notice.encode(),
            Self::Shard(notice) => notice.encode(),
        }
    }
}
