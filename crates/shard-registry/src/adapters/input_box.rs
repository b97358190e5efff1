//! In-Memory Input Box
//!
//! Implements `InputQueue` as an append-only log with per-target inboxes.

use crate::domain::{InputEntry, InputReceipt, RegistryError, UnitAddress};
use crate::ports::outbound::InputQueue;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

#[derive(Default)]
struct InboxState {
    /// Every entry in global append order.
    entries: Vec<InputEntry>,
    /// Next inbox index per target.
    next_index: HashMap<UnitAddress, u64>,
    /// Next global sequence. Retracted sequences are never reused.
    next_sequence: u64,
}

impl InboxState {
    fn push(&mut self, sender: UnitAddress, target: UnitAddress, payload: Vec<u8>) -> InputReceipt {
        let index = self.next_index.entry(target).or_insert(0);
        let receipt = InputReceipt {
            target,
            index: *index,
            sequence: self.next_sequence,
        };
        *index += 1;
        self.next_sequence += 1;

        self.entries.push(InputEntry {
            receipt,
            sender,
            payload,
        });
        receipt
    }

    fn remove(&mut self, receipt: &InputReceipt) -> Result<(), RegistryError> {
        let position = self
            .entries
            .iter()
            .rposition(|entry| entry.receipt == *receipt)
            .ok_or_else(|| {
                RegistryError::Queue(format!("no input at sequence {}", receipt.sequence))
            })?;
        self.entries.remove(position);

        // Free the inbox slot only if it was the target's newest.
        if let Some(next) = self.next_index.get_mut(&receipt.target) {
            if *next == receipt.index + 1 {
                *next -= 1;
            }
        }
        Ok(())
    }
}

/// In-memory input box.
pub struct InMemoryInputBox {
    /// Identity recorded as the sender of every input.
    sender: UnitAddress,
    state: RwLock<InboxState>,
}

impl InMemoryInputBox {
    /// Input box recording `sender` on every entry.
    pub fn new(sender: UnitAddress) -> Self {
        Self {
            sender,
            state: RwLock::new(InboxState::default()),
        }
    }

    /// Inputs addressed to `target`, in inbox order.
    pub fn inputs_for(&self, target: &UnitAddress) -> Vec<InputEntry> {
        self.state
            .read()
            .entries
            .iter()
            .filter(|entry| entry.receipt.target == *target)
            .cloned()
            .collect()
    }

    /// Every input in global append order.
    pub fn all_inputs(&self) -> Vec<InputEntry> {
        self.state.read().entries.clone()
    }

    /// Total number of inputs.
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// True if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InputQueue for InMemoryInputBox {
    fn append(&self, target: &UnitAddress, payload: &[u8]) -> Result<InputReceipt, RegistryError> {
        let receipt = self.state.write().push(self.sender, *target, payload.to_vec());
        debug!(
            target = %target,
            index = receipt.index,
            sequence = receipt.sequence,
            len = payload.len(),
            "[input-box] Input added"
        );
        Ok(receipt)
    }

    fn retract(&self, receipt: &InputReceipt) -> Result<(), RegistryError> {
        self.state.write().remove(receipt)?;
        debug!(
            target = %receipt.target,
            sequence = receipt.sequence,
            "[input-box] Input retracted"
        );
        Ok(())
    }

    /// Commits the whole batch under one lock so no other append interleaves.
    fn append_batch(
        &self,
        inputs: &[(UnitAddress, Vec<u8>)],
    ) -> Result<Vec<InputReceipt>, RegistryError> {
        let mut state = self.state.write();
        let receipts: Vec<_> = inputs
            .iter()
            .map(|(target, payload)| state.push(self.sender, *target, payload.clone()))
            .collect();
        drop(state);

        debug!(count = receipts.len(), "[input-box] Input batch added");
        Ok(receipts)
    }
}
