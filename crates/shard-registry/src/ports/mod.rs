//! # Ports Layer (Hexagonal Architecture)
//!
//! - `inbound`: what the registry offers its callers
//! - `outbound`: what the registry needs from the platform

pub mod inbound;
pub mod outbound;

pub use inbound::ShardRegistryApi;
pub use outbound::{retract_all, InputQueue, UnitFactory};
