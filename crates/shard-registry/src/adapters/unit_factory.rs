//! In-Memory Application Factory
//!
//! Implements `UnitFactory` by placing units with CREATE2 and remembering
//! which addresses are occupied.

use crate::domain::{
    compute_create2_address, unit_init_code_hash, RegistryError, UnitAddress, UnitCreated,
    UnitCreation,
};
use crate::ports::outbound::UnitFactory;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// In-memory application factory.
///
/// Placement follows the same CREATE2 rule as the on-chain factory.
pub struct InMemoryUnitFactory {
    /// Address the factory deploys from.
    address: UnitAddress,
    /// Creation code shared by every unit.
    creation_code: Vec<u8>,
    /// Occupied addresses.
    units: RwLock<HashMap<UnitAddress, UnitCreated>>,
    /// Creation acknowledgments in creation order.
    events: RwLock<Vec<UnitCreated>>,
}

impl InMemoryUnitFactory {
    /// Factory deploying from `address` with `creation_code`.
    pub fn new(address: UnitAddress, creation_code: impl Into<Vec<u8>>) -> Self {
        Self {
            address,
            creation_code: creation_code.into(),
            units: RwLock::new(HashMap::new()),
            events: RwLock::new(Vec::new()),
        }
    }

    /// Factory's own address.
    pub fn address(&self) -> &UnitAddress {
        &self.address
    }

    /// Address `request` would be placed at.
    pub fn calculate_address(&self, request: &UnitCreation) -> UnitAddress {
        let init_code_hash =
            unit_init_code_hash(&self.creation_code, &request.parent, &request.template_hash);
        compute_create2_address(&self.address, request.salt.as_bytes(), &init_code_hash)
    }

    /// Unit living at `address`, if any.
    pub fn unit(&self, address: &UnitAddress) -> Option<UnitCreated> {
        self.units.read().get(address).copied()
    }

    /// Number of live units.
    pub fn unit_count(&self) -> usize {
        self.units.read().len()
    }

    /// Every creation acknowledgment emitted so far, including discarded units.
    pub fn events(&self) -> Vec<UnitCreated> {
        self.events.read().clone()
    }
}

impl UnitFactory for InMemoryUnitFactory {
    fn create(&self, request: &UnitCreation) -> Result<UnitCreated, RegistryError> {
        let address = self.calculate_address(request);

        let mut units = self.units.write();
        if units.contains_key(&address) {
            return Err(RegistryError::IdentityCollision(address));
        }

        let created = UnitCreated::from_request(address, request);
        units.insert(address, created);
        self.events.write().push(created);

        debug!(
            unit = %address,
            parent = %request.parent,
            template = %request.template_hash,
            "[factory] Unit created"
        );
        Ok(created)
    }

    fn discard(&self, address: &UnitAddress) -> Result<(), RegistryError> {
        match self.units.write().remove(address) {
            Some(_) => {
                debug!(unit = %address, "[factory] Unit discarded");
                Ok(())
            }
            None => Err(RegistryError::Factory(format!("no unit at {address}"))),
        }
    }
}
