//! Run controller - drives the day collector across the date range
//!
//! Owns the [`RunState`] for the whole run: loads it from the checkpoint,
//! appends each finished day, rewrites the checkpoint after every day that
//! produced records, and writes the final output when the range is done.

use super::day::{DayCollector, RetryPolicy};
use super::summary::RunSummary;
use crate::adapters::comunica::{ComunicaClient, PageSource};
use crate::config::{CollectorConfig, ResumeMode};
use crate::core::state::{write_records, CheckpointStore, RunState};
use crate::domain::{CollectorError, Result, TribunalCode};
use crate::logging::console::{self, Tag};
use crate::logging::ErrorLog;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Everything a run needs to know, resolved from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    pub tribunal: TribunalCode,
    /// First day of the range (inclusive)
    pub start: NaiveDate,
    /// Last day of the range (inclusive)
    pub end: NaiveDate,
    pub resume: ResumeMode,
    pub retry: RetryPolicy,
    pub output_path: PathBuf,
    pub checkpoint_path: PathBuf,
    pub error_log_path: PathBuf,
    pub pretty: bool,
}

impl RunPlan {
    /// Resolve a plan from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the tribunal or dates are invalid.
    pub fn from_config(config: &CollectorConfig) -> Result<Self> {
        let tribunal = TribunalCode::new(config.api.tribunal.as_str())
            .map_err(CollectorError::Configuration)?;
        let start = config
            .collection
            .start()
            .map_err(CollectorError::Configuration)?;
        let end = config
            .collection
            .end()
            .map_err(CollectorError::Configuration)?;

        Ok(Self {
            tribunal,
            start,
            end,
            resume: config.collection.resume,
            retry: RetryPolicy {
                max_retries: config.collection.max_retries,
                backoff: Duration::from_secs(config.collection.backoff_seconds),
            },
            output_path: PathBuf::from(&config.output.output_path),
            checkpoint_path: PathBuf::from(&config.output.checkpoint_path),
            error_log_path: PathBuf::from(&config.output.error_log_path),
            pretty: config.output.pretty,
        })
    }
}

enum RangeEnd {
    Completed,
    Interrupted,
}

/// Collection run controller
pub struct RunController {
    plan: RunPlan,
    collector: DayCollector,
    store: CheckpointStore,
    error_log: ErrorLog,
    shutdown: watch::Receiver<bool>,
}

impl RunController {
    /// Create a controller over any page source
    pub fn new(
        plan: RunPlan,
        source: Arc<dyn PageSource>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let error_log = ErrorLog::new(&plan.error_log_path);
        let store = CheckpointStore::new(&plan.checkpoint_path, plan.pretty);
        let collector = DayCollector::new(source, plan.retry, error_log.clone(), shutdown.clone());

        Self {
            plan,
            collector,
            store,
            error_log,
            shutdown,
        }
    }

    /// Create a controller that talks to the configured Comunica endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the plan cannot be resolved or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &CollectorConfig, shutdown: watch::Receiver<bool>) -> Result<Self> {
        let plan = RunPlan::from_config(config)?;
        let client = ComunicaClient::new(&config.api)?;
        Ok(Self::new(plan, Arc::new(client), shutdown))
    }

    pub fn plan(&self) -> &RunPlan {
        &self.plan
    }

    /// Execute the run
    ///
    /// Never returns an error: interruption and fatal failures are reported
    /// through the returned [`RunSummary`] and the error log.
    pub async fn run(&self) -> RunSummary {
        let started = Instant::now();

        tracing::info!(
            tribunal = %self.plan.tribunal,
            start = %self.plan.start,
            end = %self.plan.end,
            resume = ?self.plan.resume,
            "Starting collection run"
        );

        let mut state = match self.load_initial_state() {
            Ok(state) => state,
            Err(e) => {
                let mut summary = RunSummary::new(0);
                self.record_fatal(&e, &mut summary);
                return Self::finish(summary, started);
            }
        };
        let mut summary = RunSummary::new(state.len());

        match self.collect_range(&mut state, &mut summary).await {
            Ok(RangeEnd::Completed) => {
                if let Err(e) = self.write_output(&state, &mut summary) {
                    self.record_fatal(&e, &mut summary);
                }
            }
            Ok(RangeEnd::Interrupted) => self.persist_on_interrupt(&state, &mut summary),
            Err(e) => self.record_fatal(&e, &mut summary),
        }

        summary.total_records = state.len();
        Self::finish(summary, started)
    }

    fn finish(summary: RunSummary, started: Instant) -> RunSummary {
        let summary = summary.with_duration(started.elapsed());
        summary.log_summary();
        summary
    }

    /// Recover the accumulator from the checkpoint, or start empty
    ///
    /// A checkpoint written for another tribunal is renamed out of the way
    /// before starting empty, so it is never overwritten. The run only fails
    /// if that rename fails.
    fn load_initial_state(&self) -> Result<RunState> {
        let state = match self.store.load() {
            Ok(Some(checkpoint)) => {
                if let Some(tribunal) = checkpoint.tribunal.as_ref() {
                    if tribunal != &self.plan.tribunal {
                        let moved_to = self.store.set_aside(tribunal.as_str()).map_err(|e| {
                            CollectorError::Checkpoint(format!(
                                "checkpoint belongs to {tribunal} and could not be moved aside: {e}"
                            ))
                        })?;
                        self.record_load_failure(&format!(
                            "checkpoint belongs to {tribunal}, expected {}; moved to {}",
                            self.plan.tribunal,
                            moved_to.display()
                        ));
                        console::report(
                            Tag::Warn,
                            format!(
                                "Backup de {tribunal} preservado em '{}'",
                                moved_to.display()
                            ),
                        );
                        return Ok(RunState::empty(self.plan.tribunal.clone()));
                    }
                }

                let state = RunState::from_checkpoint(self.plan.tribunal.clone(), checkpoint);
                console::report(
                    Tag::Info,
                    format!("Backup carregado com {} casos anteriores", state.len()),
                );
                tracing::info!(
                    path = %self.store.path().display(),
                    records = state.len(),
                    last_completed_day = ?state.last_completed_day(),
                    "Loaded checkpoint"
                );
                state
            }
            Ok(None) => {
                tracing::debug!(path = %self.store.path().display(), "No checkpoint found");
                RunState::empty(self.plan.tribunal.clone())
            }
            Err(e) => {
                self.record_load_failure(&e.to_string());
                RunState::empty(self.plan.tribunal.clone())
            }
        };
        Ok(state)
    }

    fn record_load_failure(&self, detail: &str) {
        self.error_log
            .record(format!("Erro ao carregar backup: {detail}"));
        console::report(Tag::Warn, "Backup ignorado, iniciando sem dados anteriores");
        tracing::warn!(
            path = %self.store.path().display(),
            error = %detail,
            "Checkpoint could not be loaded, starting empty"
        );
    }

    async fn collect_range(
        &self,
        state: &mut RunState,
        summary: &mut RunSummary,
    ) -> Result<RangeEnd> {
        let Some(first) = state.first_day_to_collect(self.plan.start, self.plan.end, self.plan.resume)
        else {
            console::report(
                Tag::Info,
                format!("Backup já cobre até {}, nada a coletar", self.plan.end),
            );
            return Ok(RangeEnd::Completed);
        };

        if self.plan.resume == ResumeMode::AfterCheckpoint
            && state.cursor_outside(self.plan.start, self.plan.end)
        {
            let last = state
                .last_completed_day()
                .map_or_else(String::new, |d| d.to_string());
            console::report(
                Tag::Warn,
                format!(
                    "Backup vai até {last}, fora do período {} a {}; coletando o período inteiro",
                    self.plan.start, self.plan.end
                ),
            );
            tracing::warn!(
                last_completed_day = %last,
                start = %self.plan.start,
                end = %self.plan.end,
                "Checkpoint cursor outside the requested range, collecting from start"
            );
        }

        summary.first_day = Some(first);
        if first > self.plan.start {
            console::report(Tag::Info, format!("Retomando a partir de {first}"));
            tracing::info!(resume_from = %first, "Resuming after checkpointed day");
        }

        for day in first.iter_days().take_while(|d| *d <= self.plan.end) {
            if *self.shutdown.borrow() {
                return Ok(RangeEnd::Interrupted);
            }

            console::day_banner(day);
            let result = self.collector.collect_day(day).await;
            summary.record_day(&result);

            if result.is_interrupted() {
                return Ok(RangeEnd::Interrupted);
            }

            let added = result.records.len();
            state.complete_day(day, result.records);

            if added > 0 {
                console::report(
                    Tag::Info,
                    format!("{added} casos adicionados ({} total)", state.len()),
                );
                self.store.save(state)?;
                summary.checkpoints_written += 1;
                console::report(Tag::Info, format!("Backup salvo com {} itens", state.len()));
                crate::log_checkpoint_saved!(self.store.path().display(), state.len());
            }
        }

        Ok(RangeEnd::Completed)
    }

    fn write_output(&self, state: &RunState, summary: &mut RunSummary) -> Result<()> {
        write_records(&self.plan.output_path, state.records(), self.plan.pretty)?;
        summary.output_path = Some(self.plan.output_path.clone());
        tracing::info!(
            path = %self.plan.output_path.display(),
            records = state.len(),
            "Final output written"
        );
        Ok(())
    }

    /// Save whatever has been accumulated so the next run can pick it up
    fn persist_on_interrupt(&self, state: &RunState, summary: &mut RunSummary) {
        summary.interrupted = true;
        console::report(
            Tag::Interrupcao,
            "Execução cancelada. Salvando progresso...",
        );

        if state.is_empty() && state.last_completed_day().is_none() {
            tracing::info!("Nothing collected yet, leaving checkpoint untouched");
            return;
        }

        match self.store.save(state) {
            Ok(()) => {
                summary.checkpoints_written += 1;
                console::report(Tag::Info, format!("Backup salvo com {} itens", state.len()));
                crate::log_checkpoint_saved!(self.store.path().display(), state.len());
            }
            Err(e) => self.record_fatal(&e, summary),
        }
    }

    fn record_fatal(&self, error: &CollectorError, summary: &mut RunSummary) {
        self.error_log.record(format!("Erro fatal: {error}"));
        console::report(Tag::ErroFatal, error);
        tracing::error!(error = %error, "Collection run failed");
        summary.fatal_error = Some(error.to_string());
    }
}
