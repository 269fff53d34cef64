//! Configuration management.
//!
//! The collector reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `COMUNICA_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ApiConfig`] - Endpoint, tribunal, page size, timeouts
//! - [`CollectionConfig`] - Date range, retry budget, backoff, resume policy
//! - [`OutputConfig`] - Output, checkpoint and error log paths
//! - [`LoggingConfig`] - Rolling JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! tribunal = "TJMG"
//! page_size = 100
//!
//! [collection]
//! start_date = "2025-01-01"
//! end_date = "2025-01-31"
//! max_retries = 3
//! backoff_seconds = 60
//!
//! [output]
//! output_path = "casos_tjmg_jan2025.json"
//! checkpoint_path = "casos_tjmg_backup.json"
//! error_log_path = "erros.log"
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApiConfig, ApplicationConfig, CollectionConfig, CollectorConfig, LoggingConfig, OutputConfig,
    ResumeMode, DATE_FORMAT,
};
