//! # Shard Registry
//!
//! Deterministic shard creation for rollup applications.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Given a main unit and a `(verifier template, shard id)` descriptor:
//! - derive the address the shard will live at (CREATE2 mirror)
//! - create the shard through the application factory
//! - check the factory placed it where predicted
//! - tell the main unit about the shard, then the shard about the main unit
//!
//! ## Guarantees
//!
//! | Property | Description |
//! |----------|-------------|
//! | Determinism | Same inputs always derive the same address |
//! | Agreement | Returned address equals the derived address |
//! | Ordering | Main notice is appended strictly before shard notice |
//! | Atomicity | A failed creation leaves no unit and no notice behind |
//!
//! ## Module Structure
//!
//! ```text
//! shard-registry/
//! ├── domain/          # Value objects, notices, CREATE2 derivation, invariants
//! ├── ports/           # API trait + factory/queue traits
//! ├── adapters/        # In-memory factory and input box
//! ├── config.rs        # Deployment wiring from environment
//! └── service.rs       # create_shard orchestration
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{InMemoryInputBox, InMemoryUnitFactory};
pub use config::{ConfigError, RegistryConfig, DEFAULT_LOCK_STRIPES};
pub use domain::{
    compute_create2_address, decode_hex_bytes, invariant_address_agreement,
    invariant_notice_order, keccak256, shard_key, unit_init_code_hash, AddressDeriver,
    Create2Deriver, InputEntry, InputReceipt, MainNotice, Notice, NoticeError, ParseError,
    RegistryError, ShardCreation, ShardId, ShardNotice, TemplateHash, UnitAddress, UnitCreated,
    UnitCreation, MAIN_NOTICE_LEN, SHARD_NOTICE_LEN,
};
pub use ports::{retract_all, InputQueue, ShardRegistryApi, UnitFactory};
pub use service::{create_shard, ServiceStats, ShardRegistryService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
