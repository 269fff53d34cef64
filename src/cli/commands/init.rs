//! Init command implementation
//!
//! Writes a sample `comunica.toml`.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "comunica.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Comunica configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your tribunal and date range", self.output);
                println!("  2. Validate configuration: comunica validate-config");
                println!("  3. Run the collection: comunica collect");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    fn generate_minimal_config() -> String {
        r#"# Comunica Configuration File

[api]
tribunal = "TJMG"

[collection]
start_date = "2025-01-01"
end_date = "2025-01-31"

[output]
output_path = "casos_tjmg_jan2025.json"
checkpoint_path = "casos_tjmg_backup.json"
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# Comunica Configuration File
#
# Every value below is the built-in default. Values may reference
# environment variables as ${VAR}, and any key can be overridden with
# COMUNICA_<SECTION>_<KEY>, e.g. COMUNICA_API_TRIBUNAL=TJSP.

[application]
# trace, debug, info, warn, error
log_level = "info"

[api]
base_url = "https://comunicaapi.pje.jus.br/api/v1/comunicacao"
tribunal = "TJMG"
# Records per page; a shorter page ends the day
page_size = 100
timeout_seconds = 30
connect_timeout_seconds = 10
# user_agent = "comunica/0.4.0"

[collection]
# Inclusive range, YYYY-MM-DD
start_date = "2025-01-01"
end_date = "2025-01-31"
# Consecutive failures on one page before the day is abandoned
max_retries = 3
# Pause before retrying a failed page
backoff_seconds = 60
# after_checkpoint: continue from the day after the last checkpointed day
# restart: walk the whole range again, appending to the checkpointed records
resume = "after_checkpoint"

[output]
output_path = "casos_tjmg_jan2025.json"
checkpoint_path = "casos_tjmg_backup.json"
error_log_path = "erros.log"
# Indent JSON files
pretty = true

[logging]
# JSON log files in addition to the console
local_enabled = false
local_path = "logs"
# daily, hourly, never
local_rotation = "daily"
"#
        .to_string()
    }
}
