//! # Outbound Ports
//!
//! Traits for the external collaborators: the application factory and the
//! input queue. Implementations synchronize themselves.

use crate::domain::{InputReceipt, RegistryError, UnitAddress, UnitCreated, UnitCreation};
use std::sync::Arc;

/// Application factory - outbound port.
pub trait UnitFactory: Send + Sync {
    /// Create a unit at its deterministic address.
    ///
    /// Fails with [`RegistryError::IdentityCollision`] if that address is
    /// already occupied.
    fn create(&self, request: &UnitCreation) -> Result<UnitCreated, RegistryError>;

    /// Undo a creation made earlier in the same orchestration.
    ///
    /// Platforms that revert the whole transaction on failure may treat this
    /// as a no-op.
    fn discard(&self, address: &UnitAddress) -> Result<(), RegistryError>;
}

/// Append-only input queue - outbound port.
pub trait InputQueue: Send + Sync {
    /// Append `payload` to the inbox of `target`.
    fn append(&self, target: &UnitAddress, payload: &[u8]) -> Result<InputReceipt, RegistryError>;

    /// Remove an input appended earlier in the same orchestration.
    ///
    /// Platforms that revert the whole transaction on failure may treat this
    /// as a no-op.
    fn retract(&self, receipt: &InputReceipt) -> Result<(), RegistryError>;

    /// Append several inputs in order, all or nothing.
    ///
    /// The default appends one by one and retracts what it already appended
    /// when a later append fails. Adapters that can commit the batch
    /// atomically should override it.
    fn append_batch(
        &self,
        inputs: &[(UnitAddress, Vec<u8>)],
    ) -> Result<Vec<InputReceipt>, RegistryError> {
        let mut receipts = Vec::with_capacity(inputs.len());
        for (target, payload) in inputs {
            match self.append(target, payload) {
                Ok(receipt) => receipts.push(receipt),
                Err(err) => {
                    return Err(match retract_all(self, &receipts) {
                        Ok(()) => err,
                        Err(rollback) => {
                            RegistryError::Queue(format!("{err}; rollback failed: {rollback}"))
                        }
                    });
                }
            }
        }
        Ok(receipts)
    }
}

/// Retract `receipts` newest first.
pub fn retract_all<Q: InputQueue + ?Sized>(
    queue: &Q,
    receipts: &[InputReceipt],
) -> Result<(), RegistryError> {
    receipts
        .iter()
        .rev()
        .try_for_each(|receipt| queue.retract(receipt))
}

impl<T: UnitFactory + ?Sized> UnitFactory for Arc<T> {
    fn create(&self, request: &UnitCreation) -> Result<UnitCreated, RegistryError> {
        (**self).create(request)
    }

    fn discard(&self, address: &UnitAddress) -> Result<(), RegistryError> {
        (**self).discard(address)
    }
}

impl<T: InputQueue + ?Sized> InputQueue for Arc<T> {
    fn append(&self, target: &UnitAddress, payload: &[u8]) -> Result<InputReceipt, RegistryError> {
        (**self).append(target, payload)
    }

    fn retract(&self, receipt: &InputReceipt) -> Result<(), RegistryError> {
        (**self).retract(receipt)
    }

    fn append_batch(
        &self,
        inputs: &[(UnitAddress, Vec<u8>)],
    ) -> Result<Vec<InputReceipt>, RegistryError> {
        (**self).append_batch(inputs)
    }
}
