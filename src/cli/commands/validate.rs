//! Validate config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates too, so a failure here covers both cases
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is not valid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  API Endpoint: {}", config.api.base_url);
        println!("  Tribunal: {}", config.api.tribunal);
        println!("  Page Size: {}", config.api.page_size);
        println!("  Request Timeout: {}s", config.api.timeout_seconds);
        println!(
            "  Date Range: {} to {}",
            config.collection.start_date, config.collection.end_date
        );
        println!(
            "  Retries: {} (backoff {}s)",
            config.collection.max_retries, config.collection.backoff_seconds
        );
        println!("  Resume: {:?}", config.collection.resume);
        println!("  Output: {}", config.output.output_path);
        println!("  Checkpoint: {}", config.output.checkpoint_path);
        println!("  Error Log: {}", config.output.error_log_path);
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[api]\ntribunal = \"TJRJ\"").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let code = ValidateArgs {}
            .execute(path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_invalid_range() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[collection]\nstart_date = \"2025-02-01\"\nend_date = \"2025-01-01\""
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
