//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for structured logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or full directive
    pub log_level: String,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Whether to include source file and line
    pub with_source: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "shard-registry".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_source: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SHARD_SERVICE_NAME`: Service name (default: shard-registry)
    /// - `SHARD_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `SHARD_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `SHARD_LOG_SOURCE`: Include file/line in logs (default: false)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("SHARD_SERVICE_NAME")
                .unwrap_or_else(|_| "shard-registry".to_string()),

            log_level: env::var("SHARD_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("SHARD_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),

            with_source: env::var("SHARD_LOG_SOURCE")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    /// Same configuration with a different log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
