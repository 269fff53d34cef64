//! Logging and observability
//!
//! Three separate outputs:
//! - structured `tracing` events (console, optionally a JSON rolling file)
//! - the append-only [`ErrorLog`] file, one timestamped line per failure
//! - tagged [`console`] progress lines for the operator
//!
//! # Example
//!
//! ```no_run
//! use comunica::logging::init_logging;
//! use comunica::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod console;
pub mod error_log;
pub mod structured;

pub use console::Tag;
pub use error_log::ErrorLog;
pub use structured::{init_logging, LoggingGuard};

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use comunica::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, "Erro 500");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying page"
        );
    };
}

/// Log a checkpoint write
///
/// # Example
///
/// ```no_run
/// use comunica::log_checkpoint_saved;
///
/// log_checkpoint_saved!("casos_tjmg_backup.json", 1500);
/// ```
#[macro_export]
macro_rules! log_checkpoint_saved {
    ($path:expr, $count:expr) => {
        tracing::info!(
            path = %$path,
            records = $count,
            "Checkpoint saved"
        );
    };
}
