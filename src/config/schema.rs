//! Configuration schema types
//!
//! This module defines the configuration structure that maps to `comunica.toml`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used by the API and by the configuration file
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// What to do with the date range when a checkpoint is found at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResumeMode {
    /// Continue from the day after the last checkpointed day
    #[default]
    AfterCheckpoint,
    /// Walk the whole range again, appending to the loaded records
    Restart,
}

/// Main configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section has defaults, so an empty file is a valid configuration
/// for the January 2025 TJMG collection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CollectorConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Date range and retry policy
    #[serde(default)]
    pub collection: CollectionConfig,

    /// Output, checkpoint and error log locations
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CollectorConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate()?;
        self.collection.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Comunica API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Endpoint queried for communications
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Tribunal code sent as `siglaTribunal`
    #[serde(default = "default_tribunal")]
    pub tribunal: String,

    /// Items requested per page (`itensPorPagina`)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Connection establishment timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ApiConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("api.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("api.base_url must start with http:// or https://".to_string());
        }

        crate::domain::TribunalCode::new(self.tribunal.as_str())
            .map_err(|e| format!("api.tribunal is invalid: {e}"))?;

        if !(1..=1000).contains(&self.page_size) {
            return Err(format!(
                "api.page_size must be between 1 and 1000, got {}",
                self.page_size
            ));
        }

        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tribunal: default_tribunal(),
            page_size: default_page_size(),
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

/// Collection range and retry policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// First day to collect (inclusive, YYYY-MM-DD)
    #[serde(default = "default_start_date")]
    pub start_date: String,

    /// Last day to collect (inclusive, YYYY-MM-DD)
    #[serde(default = "default_end_date")]
    pub end_date: String,

    /// Consecutive failures on one page before the day is skipped
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed pause between retries of the same page, in seconds
    #[serde(default = "default_backoff_seconds")]
    pub backoff_seconds: u64,

    /// Resume policy when a checkpoint exists
    #[serde(default)]
    pub resume: ResumeMode,
}

impl CollectionConfig {
    /// Parsed start date
    pub fn start(&self) -> Result<NaiveDate, String> {
        parse_date("collection.start_date", &self.start_date)
    }

    /// Parsed end date
    pub fn end(&self) -> Result<NaiveDate, String> {
        parse_date("collection.end_date", &self.end_date)
    }

    fn validate(&self) -> Result<(), String> {
        let start = self.start()?;
        let end = self.end()?;
        if start > end {
            return Err(format!(
                "collection.start_date ({start}) must not be after collection.end_date ({end})"
            ));
        }

        if self.max_retries == 0 {
            return Err("collection.max_retries must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            end_date: default_end_date(),
            max_retries: default_max_retries(),
            backoff_seconds: default_backoff_seconds(),
            resume: ResumeMode::default(),
        }
    }
}

/// Output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Final document, written once at the end of a complete run
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// Checkpoint document, overwritten after every day that yielded records
    #[serde(default = "default_checkpoint_path")]
    pub checkpoint_path: String,

    /// Append-only error log
    #[serde(default = "default_error_log_path")]
    pub error_log_path: String,

    /// Indent written documents
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_path.is_empty() {
            return Err("output.output_path cannot be empty".to_string());
        }
        if self.checkpoint_path.is_empty() {
            return Err("output.checkpoint_path cannot be empty".to_string());
        }
        if self.output_path == self.checkpoint_path {
            return Err("output.output_path and output.checkpoint_path must differ".to_string());
        }
        if self.error_log_path.is_empty() {
            return Err("output.error_log_path cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            checkpoint_path: default_checkpoint_path(),
            error_log_path: default_error_log_path(),
            pretty: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to a rolling file
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for rolling log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log rotation (daily, hourly, never)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| format!("{field} must be a YYYY-MM-DD date, got '{value}': {e}"))
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://comunicaapi.pje.jus.br/api/v1/comunicacao".to_string()
}

fn default_tribunal() -> String {
    "TJMG".to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_connect_timeout_seconds() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("comunica/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_start_date() -> String {
    "2025-01-01".to_string()
}

fn default_end_date() -> String {
    "2025-01-31".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_seconds() -> u64 {
    60
}

fn default_output_path() -> String {
    "casos_tjmg_jan2025.json".to_string()
}

fn default_checkpoint_path() -> String {
    "casos_tjmg_backup.json".to_string()
}

fn default_error_log_path() -> String {
    "erros.log".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

fn default_true() -> bool {
    true
}
