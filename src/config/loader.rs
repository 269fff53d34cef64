//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{CollectorConfig, ResumeMode};
use crate::domain::errors::CollectorError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into [`CollectorConfig`]
/// 4. Applies environment variable overrides (COMUNICA_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use comunica::config::loader::load_config;
///
/// let config = load_config("comunica.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CollectorConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CollectorError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CollectorError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut config = parse_config(&contents)?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        CollectorError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Loads the configuration file if it exists, otherwise starts from defaults
///
/// Environment overrides and validation are applied in both cases.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<CollectorConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::info!(
        path = %path.display(),
        "Configuration file not found, using built-in defaults"
    );
    let mut config = CollectorConfig::default();
    apply_env_overrides(&mut config);
    config.validate().map_err(|e| {
        CollectorError::Configuration(format!("Configuration validation failed: {e}"))
    })?;
    Ok(config)
}

fn parse_config(contents: &str) -> Result<CollectorConfig> {
    let contents = substitute_env_vars(contents)?;
    toml::from_str(&contents)
        .map_err(|e| CollectorError::Configuration(format!("Failed to parse TOML: {e}")))
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| CollectorError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CollectorError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the COMUNICA_* prefix
///
/// Variables follow the pattern COMUNICA_<SECTION>_<KEY>, for example
/// COMUNICA_API_TRIBUNAL or COMUNICA_COLLECTION_START_DATE. Values that fail
/// to parse are ignored.
fn apply_env_overrides(config: &mut CollectorConfig) {
    if let Ok(val) = std::env::var("COMUNICA_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // API overrides
    if let Ok(val) = std::env::var("COMUNICA_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("COMUNICA_API_TRIBUNAL") {
        config.api.tribunal = val;
    }
    if let Ok(val) = std::env::var("COMUNICA_API_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.api.page_size = size;
        }
    }
    if let Ok(val) = std::env::var("COMUNICA_API_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.api.timeout_seconds = secs;
        }
    }

    // Collection overrides
    if let Ok(val) = std::env::var("COMUNICA_COLLECTION_START_DATE") {
        config.collection.start_date = val;
    }
    if let Ok(val) = std::env::var("COMUNICA_COLLECTION_END_DATE") {
        config.collection.end_date = val;
    }
    if let Ok(val) = std::env::var("COMUNICA_COLLECTION_MAX_RETRIES") {
        if let Ok(retries) = val.parse() {
            config.collection.max_retries = retries;
        }
    }
    if let Ok(val) = std::env::var("COMUNICA_COLLECTION_BACKOFF_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.collection.backoff_seconds = secs;
        }
    }
    if let Ok(val) = std::env::var("COMUNICA_COLLECTION_RESUME") {
        match val.as_str() {
            "after_checkpoint" => config.collection.resume = ResumeMode::AfterCheckpoint,
            "restart" => config.collection.resume = ResumeMode::Restart,
            other => tracing::warn!(value = %other, "Ignoring unknown COMUNICA_COLLECTION_RESUME"),
        }
    }

    // Output overrides
    if let Ok(val) = std::env::var("COMUNICA_OUTPUT_OUTPUT_PATH") {
        config.output.output_path = val;
    }
    if let Ok(val) = std::env::var("COMUNICA_OUTPUT_CHECKPOINT_PATH") {
        config.output.checkpoint_path = val;
    }
    if let Ok(val) = std::env::var("COMUNICA_OUTPUT_ERROR_LOG_PATH") {
        config.output.error_log_path = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("COMUNICA_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("COMUNICA_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
