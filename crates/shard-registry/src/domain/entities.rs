//! # Domain Entities
//!
//! Requests and acknowledgments exchanged with the factory and input queue.

use super::value_objects::{ShardId, TemplateHash, UnitAddress};
use serde::{Deserialize, Serialize};

/// Request handed to the factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCreation {
    /// Unit the new unit is bound to (the main unit for shards).
    pub parent: UnitAddress,
    /// Account that owns the new unit.
    pub owner: UnitAddress,
    /// Program the new unit runs.
    pub template_hash: TemplateHash,
    /// CREATE2 salt.
    pub salt: ShardId,
}

/// Factory acknowledgment of a created unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCreated {
    /// Where the unit now lives.
    pub address: UnitAddress,
    /// Unit it is bound to.
    pub parent: UnitAddress,
    /// Owning account.
    pub owner: UnitAddress,
    /// Program it runs.
    pub template_hash: TemplateHash,
    /// Salt it was created with.
    pub salt: ShardId,
}

impl UnitCreated {
    /// Acknowledgment for `request` placed at `address`.
    pub fn from_request(address: UnitAddress, request: &UnitCreation) -> Self {
        Self {
            address,
            parent: request.parent,
            owner: request.owner,
            template_hash: request.template_hash,
            salt: request.salt,
        }
    }
}

/// Queue acknowledgment of an appended input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputReceipt {
    /// Unit the input is addressed to.
    pub target: UnitAddress,
    /// Position within the target's inbox.
    pub index: u64,
    /// Position in the global append order.
    pub sequence: u64,
}

/// An input stored in the queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEntry {
    /// Where it was appended.
    pub receipt: InputReceipt,
    /// Identity that appended it.
    pub sender: UnitAddress,
    /// Opaque payload.
    pub payload: Vec<u8>,
}

/// Everything a successful `create_shard` produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardCreation {
    /// The new shard's address.
    pub shard: UnitAddress,
    /// Factory acknowledgment.
    pub created: UnitCreated,
    /// Receipt of the notice sent to the main unit.
    pub main_receipt: InputReceipt,
    /// Receipt of the notice sent to the shard.
    pub shard_receipt: InputReceipt,
}
