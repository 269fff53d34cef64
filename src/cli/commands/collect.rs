//! Collect command implementation
//!
//! Runs the collection for the configured tribunal and date range, with
//! optional overrides from the command line.

use crate::config::{load_config_or_default, CollectorConfig, ResumeMode};
use crate::core::collect::{RunController, RunSummary};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the collect command
#[derive(Args, Debug, Default)]
pub struct CollectArgs {
    /// Override first day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Override last day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Override tribunal code
    #[arg(long)]
    pub tribunal: Option<String>,

    /// Override final output file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override checkpoint file
    #[arg(long)]
    pub checkpoint: Option<String>,

    /// Walk the whole range again instead of resuming after the checkpoint
    #[arg(long)]
    pub restart: bool,
}

impl CollectArgs {
    /// Execute the collect command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting collect command");

        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let controller = match RunController::from_config(&config, shutdown_signal) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize collection");
                eprintln!("Failed to initialize collection: {e}");
                return Ok(if e.is_configuration() { 2 } else { 5 });
            }
        };

        let plan = controller.plan();
        println!("🚀 Coletando {} de {} a {}", plan.tribunal, plan.start, plan.end);
        println!();

        let summary = controller.run().await;
        print_summary(&summary);

        Ok(summary.exit_code())
    }

    fn apply_overrides(&self, config: &mut CollectorConfig) {
        if let Some(start) = &self.start {
            tracing::info!(start = %start, "Overriding start date from CLI");
            config.collection.start_date = start.clone();
        }
        if let Some(end) = &self.end {
            tracing::info!(end = %end, "Overriding end date from CLI");
            config.collection.end_date = end.clone();
        }
        if let Some(tribunal) = &self.tribunal {
            tracing::info!(tribunal = %tribunal, "Overriding tribunal from CLI");
            config.api.tribunal = tribunal.clone();
        }
        if let Some(output) = &self.output {
            config.output.output_path = output.clone();
        }
        if let Some(checkpoint) = &self.checkpoint {
            config.output.checkpoint_path = checkpoint.clone();
        }
        if self.restart {
            tracing::info!("Restart mode enabled from CLI");
            config.collection.resume = ResumeMode::Restart;
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("📊 Resumo da coleta:");
    println!("  Casos anteriores: {}", summary.initial_records);
    println!("  Casos novos: {}", summary.new_records());
    println!("  Total: {}", summary.total_records);
    println!("  Dias processados: {}", summary.days_processed);
    println!("  Dias com casos: {}", summary.days_with_records);
    println!(
        "  Requisições: {} ({} com falha)",
        summary.requests, summary.failed_requests
    );
    println!("  Duração: {:.2}s", summary.duration.as_secs_f64());
    println!();

    let abandoned = abandoned_days_lines(summary);
    if !abandoned.is_empty() {
        for line in abandoned {
            println!("{line}");
        }
        println!();
    }

    if summary.interrupted {
        println!("⚠️  Coleta interrompida. Progresso salvo no backup.");
        println!("   Execute o mesmo comando para continuar.");
    } else if let Some(error) = &summary.fatal_error {
        println!("❌ Coleta abortada: {error}");
        println!("   O backup mantém os dias já concluídos.");
    } else if let Some(path) = &summary.output_path {
        println!(
            "✅ Coleta concluída! Total: {} casos salvos em '{}'",
            summary.total_records,
            path.display()
        );
    }
}

/// Lines listing incomplete days, with how to collect them again
///
/// The checkpoint cursor moves past an abandoned day, so resuming never
/// revisits it.
fn abandoned_days_lines(summary: &RunSummary) -> Vec<String> {
    if summary.abandoned_days.is_empty() {
        return Vec::new();
    }

    let mut lines = vec!["⚠️  Dias incompletos:".to_string()];
    for abandoned in &summary.abandoned_days {
        lines.push(format!(
            "  - {} (página {}, {} casos mantidos): {}",
            abandoned.day, abandoned.page, abandoned.kept_records, abandoned.reason
        ));
    }
    lines.push("   Retomar a coleta não volta a esses dias.".to_string());
    lines.push(
        "   Para recoletar um dia, rode com --start e --end nesse dia e --restart; \
         os casos mantidos dele serão duplicados."
            .to_string(),
    );
    lines
}
