//! Structured logging setup and the error sink.
//!
//! Logs are JSON lines filtered by `RUST_LOG`. Classified errors are logged
//! once, at the transport boundary, at the level their kind maps to.

use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use crate::domain::{Error, Severity};

/// Install the global JSON subscriber.
///
/// Falls back to `info` when `RUST_LOG` is unset or invalid. Returns an
/// error message when a subscriber is already installed.
pub fn init_tracing() -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .json()
        .try_init()
        .map_err(|err| err.to_string())
}

/// Log `err` at the level its kind maps to, with its code, origin, and
/// trace identifier as fields.
///
/// # Examples
/// ```
/// use registry::domain::Error;
/// use registry::logging::log_error;
///
/// log_error(&Error::not_found("User not found"));
/// ```
pub fn log_error(err: &Error) {
    let code = err.kind().as_str();
    let origin = err.origin();
    let trace_id = err.trace_id().unwrap_or_default();
    match err.kind().severity() {
        Severity::Error => error!(code, %origin, trace_id, "{}", err.message()),
        Severity::Warn => warn!(code, %origin, trace_id, "{}", err.message()),
        Severity::Info => info!(code, %origin, trace_id, "{}", err.message()),
    }
}
