//! # Domain Services
//!
//! Pure address derivation for shards.
//! These functions are deterministic and have no side effects.
//!
//! The application factory places every unit with CREATE2 (EIP-1014):
//!
//! ```text
//! init_code_hash = keccak256(creation_code ‖ pad32(parent) ‖ template_hash)
//! address        = keccak256(0xff ‖ factory ‖ salt ‖ init_code_hash)[12..32]
//! ```
//!
//! The registry mirrors that rule client-side so the shard address is known
//! before the factory is asked to create it.

use super::value_objects::{ShardId, TemplateHash, UnitAddress};
use sha3::{Digest, Keccak256};

/// Computes a CREATE2 address.
///
/// Address = keccak256(0xff ++ deployer ++ salt ++ init_code_hash)\[12:\]
#[must_use]
pub fn compute_create2_address(
    deployer: &UnitAddress,
    salt: &[u8; 32],
    init_code_hash: &[u8; 32],
) -> UnitAddress {
    let mut data = [0u8; 85];
    data[0] = 0xff;
    data[1..21].copy_from_slice(deployer.as_bytes());
    data[21..53].copy_from_slice(salt);
    data[53..85].copy_from_slice(init_code_hash);

    let hash = keccak256(&data);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    UnitAddress::new(addr)
}

/// Hash of the init code deploying a unit bound to `parent` running `template`.
///
/// Constructor arguments are ABI-encoded: the address left-padded to a word,
/// followed by the template hash word.
#[must_use]
pub fn unit_init_code_hash(
    creation_code: &[u8],
    parent: &UnitAddress,
    template: &TemplateHash,
) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(creation_code);
    hasher.update([0u8; 12]);
    hasher.update(parent.as_bytes());
    hasher.update(template.as_bytes());
    finalize(hasher)
}

/// Digest of a `(main, template, shard id)` tuple.
///
/// Identifies one shard request in logs and selects its lock stripe.
#[must_use]
pub fn shard_key(main: &UnitAddress, template: &TemplateHash, shard_id: &ShardId) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(main.as_bytes());
    hasher.update(template.as_bytes());
    hasher.update(shard_id.as_bytes());
    finalize(hasher)
}

/// Helper: keccak256 hash.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    finalize(hasher)
}

fn finalize(hasher: Keccak256) -> [u8; 32] {
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Predicts the address a shard will be created at.
pub trait AddressDeriver: Send + Sync {
    /// Address of the shard of `main` running `verifier_template_hash`
    /// under `shard_id`. Total and deterministic.
    fn derive(
        &self,
        main: &UnitAddress,
        verifier_template_hash: &TemplateHash,
        shard_id: &ShardId,
    ) -> UnitAddress;
}

/// CREATE2 mirror of the application factory's placement rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Create2Deriver {
    factory: UnitAddress,
    creation_code: Vec<u8>,
}

impl Create2Deriver {
    /// Deriver for units deployed by `factory` from `creation_code`.
    pub fn new(factory: UnitAddress, creation_code: impl Into<Vec<u8>>) -> Self {
        Self {
            factory,
            creation_code: creation_code.into(),
        }
    }

    /// Factory address this deriver mirrors.
    pub fn factory(&self) -> &UnitAddress {
        &self.factory
    }

    /// Unit creation code this deriver mirrors.
    pub fn creation_code(&self) -> &[u8] {
        &self.creation_code
    }
}

impl AddressDeriver for Create2Deriver {
    fn derive(
        &self,
        main: &UnitAddress,
        verifier_template_hash: &TemplateHash,
        shard_id: &ShardId,
    ) -> UnitAddress {
        let init_code_hash =
            unit_init_code_hash(&self.creation_code, main, verifier_template_hash);
        compute_create2_address(&self.factory, shard_id.as_bytes(), &init_code_hash)
    }
}

impl<T: AddressDeriver + ?Sized> AddressDeriver for std::sync::Arc<T> {
    fn derive(
        &self,
        main: &UnitAddress,
        verifier_template_hash: &TemplateHash,
        shard_id: &ShardId,
    ) -> UnitAddress {
        (**self).derive(main, verifier_template_hash, shard_id)
    }
}
