//! # Domain Invariants
//!
//! Rules that must hold for every shard creation.

use super::entities::InputReceipt;
use super::errors::RegistryError;
use super::value_objects::UnitAddress;

/// Invariant: the factory placed the unit where the deriver predicted.
pub fn invariant_address_agreement(
    expected: &UnitAddress,
    actual: &UnitAddress,
) -> Result<(), RegistryError> {
    if expected != actual {
        return Err(RegistryError::AddressMismatch {
            expected: *expected,
            actual: *actual,
        });
    }
    Ok(())
}

/// Invariant: the main notice was appended strictly before the shard notice,
/// each to its own target.
pub fn invariant_notice_order(
    main: &UnitAddress,
    shard: &UnitAddress,
    main_receipt: &InputReceipt,
    shard_receipt: &InputReceipt,
) -> Result<(), RegistryError> {
    if main_receipt.target != *main || shard_receipt.target != *shard {
        return Err(RegistryError::Queue(format!(
            "notices delivered to {} and {}, expected {} and {}",
            main_receipt.target, shard_receipt.target, main, shard
        )));
    }
    if main_receipt.sequence >= shard_receipt.sequence {
        return Err(RegistryError::Queue(format!(
            "main notice at sequence {} not before shard notice at {}",
            main_receipt.sequence, shard_receipt.sequence
        )));
    }
    Ok(())
}
