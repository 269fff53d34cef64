//! Status command implementation
//!
//! Reports what the checkpoint file holds and where the next run would start.

use crate::config::load_config_or_default;
use crate::core::collect::RunPlan;
use crate::core::state::{CheckpointStore, RunState};
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug, Default)]
pub struct StatusArgs {
    /// Inspect this checkpoint file instead of the configured one
    #[arg(long)]
    pub checkpoint: Option<String>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking collection status");

        println!("📊 Collection Status");
        println!();

        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };
        if let Some(checkpoint) = &self.checkpoint {
            config.output.checkpoint_path = checkpoint.clone();
        }

        let plan = match RunPlan::from_config(&config) {
            Ok(p) => p,
            Err(e) => {
                println!("❌ Invalid configuration");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let store = CheckpointStore::new(&plan.checkpoint_path, plan.pretty);
        let checkpoint = match store.load() {
            Ok(Some(c)) => c,
            Ok(None) => {
                println!("No checkpoint found at {}.", plan.checkpoint_path.display());
                println!("Run 'comunica collect' to start collecting.");
                return Ok(0);
            }
            Err(e) => {
                println!("❌ Failed to read checkpoint");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        println!("  Checkpoint: {}", plan.checkpoint_path.display());
        println!(
            "  Tribunal: {}",
            checkpoint
                .tribunal
                .as_ref()
                .map_or("unknown (legacy file)".to_string(), ToString::to_string)
        );
        println!("  Records: {}", checkpoint.items.len());
        println!(
            "  Last completed day: {}",
            checkpoint
                .last_completed_day
                .map_or("unknown".to_string(), |d| d.to_string())
        );
        if let Some(saved_at) = checkpoint.saved_at {
            println!("  Saved at: {}", saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }

        if checkpoint
            .tribunal
            .as_ref()
            .is_some_and(|t| t != &plan.tribunal)
        {
            println!();
            println!(
                "⚠️  Checkpoint belongs to a different tribunal than configured ({}).",
                plan.tribunal
            );
            println!("   A collect run would move it aside and start empty.");
            return Ok(0);
        }

        let state = RunState::from_checkpoint(plan.tribunal.clone(), checkpoint);
        match state.first_day_to_collect(plan.start, plan.end, plan.resume) {
            Some(day) => println!("  Next day to collect: {day}"),
            None => println!("  Range {} to {} already covered", plan.start, plan.end),
        }
        println!();

        Ok(0)
    }
}
