//! # StaffDesk Telemetry
//!
//! Structured logging for the StaffDesk binaries.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sd_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // Spans and events are now written to stderr
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SD_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `SD_JSON_LOGS` | `false` | Emit one JSON object per line |
//! | `SD_SERVICE_NAME` | `staffdesk` | Service name recorded at startup |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{build_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter {filter:?}: {reason}")]
    Filter { filter: String, reason: String },

    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),
}

/// Initialize logging for the process.
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_tracing(config)?;
    tracing::debug!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
    Ok(())
}

/// Span for one store operation, carrying the fields every log line inside
/// it should share.
///
/// ```rust,ignore
/// let span = sd_telemetry::operation_span!("accounts/fetchAll", %seq);
/// ```
#[macro_export]
macro_rules! operation_span {
    ($operation:expr $(, $($field:tt)*)?) => {
        tracing::info_span!("operation", operation = $operation $(, $($field)*)?)
    };
}
