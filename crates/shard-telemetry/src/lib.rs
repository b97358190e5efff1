//! # Shard Telemetry
//!
//! Structured logging for the shard registry tools.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shard_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     // Logs are now being collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SHARD_SERVICE_NAME` | `shard-registry` | Service name in logs |
//! | `SHARD_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `SHARD_JSON_LOGS` | `false` | JSON output (defaults to true in containers) |
//! | `SHARD_LOG_SOURCE` | `false` | Include file and line |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber is already installed or could not be set.
    #[error("Failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),

    /// Configuration could not be turned into a subscriber.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    init_logging(&config)?;
    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active. Logs shutdown on drop.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::debug!(service = %self.service_name, "Shutting down telemetry");
    }
}
