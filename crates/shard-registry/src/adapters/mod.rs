//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory implementations of the outbound ports, following the same
//! placement and ordering rules as the on-chain factory and input box.

mod input_box;
mod unit_factory;

pub use input_box::InMemoryInputBox;
pub use unit_factory::InMemoryUnitFactory;
