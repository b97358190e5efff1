//! # Inbound Ports
//!
//! API trait defining what the shard registry can do.

use crate::domain::{RegistryError, ShardCreation, ShardId, TemplateHash, UnitAddress};

/// Shard registry API - inbound port.
pub trait ShardRegistryApi: Send + Sync {
    /// Address a shard would be created at, without creating it.
    fn calculate_shard_address(
        &self,
        main: &UnitAddress,
        verifier_template_hash: &TemplateHash,
        shard_id: &ShardId,
    ) -> UnitAddress;

    /// Create a shard of `main` and notify both units.
    ///
    /// Returns the new shard's address.
    fn create_shard(
        &self,
        main: &UnitAddress,
        owner: &UnitAddress,
        verifier_template_hash: &TemplateHash,
        shard_id: &ShardId,
    ) -> Result<UnitAddress, RegistryError> {
        self.create_shard_detailed(main, owner, verifier_template_hash, shard_id)
            .map(|creation| creation.shard)
    }

    /// Like [`ShardRegistryApi::create_shard`], returning the factory
    /// acknowledgment and both queue receipts.
    fn create_shard_detailed(
        &self,
        main: &UnitAddress,
        owner: &UnitAddress,
        verifier_template_hash: &TemplateHash,
        shard_id: &ShardId,
    ) -> Result<ShardCreation, RegistryError>;
}
