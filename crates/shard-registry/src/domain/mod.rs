//! # Domain Module
//!
//! Core domain types for the shard registry.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod notices;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use notices::*;
pub use services::*;
pub use value_objects::*;
