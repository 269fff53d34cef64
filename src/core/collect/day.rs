//! Day collector
//!
//! Walks the pages of a single day in order until a short page ends the day,
//! or until the same page has failed `max_retries` times in a row.
//!
//! ```text
//! FETCHING(page, failures)
//!   Items, n == page_size  -> FETCHING(page + 1, 0)
//!   Items, n <  page_size  -> DONE
//!   EndOfDay               -> DONE
//!   RetryableFailure       -> failures + 1 >= max ? SKIPPED : sleep, FETCHING(page, failures + 1)
//!   FatalSkip              -> SKIPPED
//! ```

use super::wait_for_shutdown;
use crate::adapters::comunica::{FailureReason, PageResult, PageSource};
use crate::domain::Record;
use crate::logging::console::{self, Tag};
use crate::logging::ErrorLog;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Bounded retry with a fixed pause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Consecutive failures on one page before the day is abandoned
    pub max_retries: u32,
    /// Pause before retrying the same page
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_secs(60),
        }
    }
}

/// How a day ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayOutcome {
    /// A short or empty page was reached
    Complete,
    /// The retry budget ran out, or the API returned an unusable page
    Abandoned { page: u32, reason: String },
    /// Shutdown was requested before the day finished
    Interrupted,
}

/// Records gathered for one day, with how the day ended
#[derive(Debug, Clone)]
pub struct DayResult {
    pub day: NaiveDate,
    /// Records from every page consumed before the day ended
    pub records: Vec<Record>,
    pub outcome: DayOutcome,
    /// Requests issued, including failed ones
    pub requests: u32,
    /// Failed requests
    pub failures: u32,
}

impl DayResult {
    fn new(day: NaiveDate) -> Self {
        Self {
            day,
            records: Vec::new(),
            outcome: DayOutcome::Complete,
            requests: 0,
            failures: 0,
        }
    }

    fn finish(mut self, outcome: DayOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.outcome == DayOutcome::Complete
    }

    pub fn is_abandoned(&self) -> bool {
        matches!(self.outcome, DayOutcome::Abandoned { .. })
    }

    pub fn is_interrupted(&self) -> bool {
        self.outcome == DayOutcome::Interrupted
    }
}

/// Collects every page of a day from a [`PageSource`]
///
/// Holds no state between calls; each [`DayCollector::collect_day`] starts at
/// page 1 with a clean failure counter.
pub struct DayCollector {
    source: Arc<dyn PageSource>,
    policy: RetryPolicy,
    error_log: ErrorLog,
    shutdown: watch::Receiver<bool>,
}

impl DayCollector {
    pub fn new(
        source: Arc<dyn PageSource>,
        policy: RetryPolicy,
        error_log: ErrorLog,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            source,
            policy,
            error_log,
            shutdown,
        }
    }

    /// Collect all pages of `day`
    ///
    /// Failures never escape as errors; they end up in the error log and in
    /// the returned [`DayOutcome`].
    pub async fn collect_day(&self, day: NaiveDate) -> DayResult {
        let page_size = self.source.page_size();
        let mut shutdown = self.shutdown.clone();
        let mut result = DayResult::new(day);
        let mut page: u32 = 1;
        let mut consecutive_failures: u32 = 0;

        loop {
            if *shutdown.borrow() {
                tracing::info!(day = %day, page = page, "Shutdown requested, leaving day");
                return result.finish(DayOutcome::Interrupted);
            }

            result.requests += 1;
            match self.source.fetch_page(day, page).await {
                PageResult::Items(items) => {
                    let count = items.len();
                    console::report(Tag::Ok, format!("{day} - Página {page} ({count} itens)"));
                    tracing::debug!(day = %day, page = page, items = count, "Page collected");
                    result.records.extend(items);

                    if count < page_size {
                        return result.finish(DayOutcome::Complete);
                    }
                    page += 1;
                    consecutive_failures = 0;
                }
                PageResult::EndOfDay => {
                    console::report(Tag::Ok, format!("{day} - Página {page} (0 itens)"));
                    return result.finish(DayOutcome::Complete);
                }
                PageResult::RetryableFailure(reason) => {
                    consecutive_failures += 1;
                    result.failures += 1;
                    self.error_log.record(failure_entry(&reason, page, day));

                    if consecutive_failures >= self.policy.max_retries {
                        let tag = if reason.is_server_side() {
                            Tag::Aviso
                        } else {
                            Tag::Erro
                        };
                        console::report(
                            tag,
                            format!(
                                "{} falhas seguidas, pulando o dia {day}",
                                self.policy.max_retries
                            ),
                        );
                        tracing::warn!(
                            day = %day,
                            page = page,
                            failures = consecutive_failures,
                            reason = %reason,
                            kept_records = result.records.len(),
                            "Retry budget exhausted, abandoning day"
                        );
                        return result.finish(DayOutcome::Abandoned {
                            page,
                            reason: reason.to_string(),
                        });
                    }

                    console::report(
                        Tag::Warn,
                        format!(
                            "{reason}, aguardando {}s...",
                            self.policy.backoff.as_secs()
                        ),
                    );
                    crate::log_retry_attempt!(consecutive_failures, self.policy.max_retries, reason);

                    if !self.backoff(&mut shutdown).await {
                        tracing::info!(day = %day, page = page, "Shutdown requested during backoff");
                        return result.finish(DayOutcome::Interrupted);
                    }
                }
                PageResult::FatalSkip(reason) => {
                    result.failures += 1;
                    self.error_log
                        .record(format!("Resposta inutilizável na página {page} ({day}): {reason}"));
                    console::report(Tag::Erro, format!("Resposta inutilizável, pulando o dia {day}"));
                    tracing::error!(day = %day, page = page, reason = %reason, "Unusable page, abandoning day");
                    return result.finish(DayOutcome::Abandoned { page, reason });
                }
            }
        }
    }

    /// Sleeps for the backoff interval; returns `false` if shutdown was
    /// requested first
    async fn backoff(&self, shutdown: &mut watch::Receiver<bool>) -> bool {
        if self.policy.backoff.is_zero() {
            return !*shutdown.borrow();
        }

        tokio::select! {
            _ = tokio::time::sleep(self.policy.backoff) => true,
            _ = wait_for_shutdown(shutdown) => false,
        }
    }
}

/// Error log line for a failed page
fn failure_entry(reason: &FailureReason, page: u32, day: NaiveDate) -> String {
    match reason {
        FailureReason::Status(code) => format!("Erro {code} na página {page} ({day})"),
        other => format!("{other} (página {page}, dia {day})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Replays scripted page results and records every request
    struct ScriptedSource {
        page_size: usize,
        script: Mutex<VecDeque<PageResult>>,
        requests: Mutex<Vec<(NaiveDate, u32)>>,
    }

    impl ScriptedSource {
        fn new(page_size: usize, script: Vec<PageResult>) -> Arc<Self> {
            Arc::new(Self {
                page_size,
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn pages_requested(&self) -> Vec<u32> {
            self.requests.lock().unwrap().iter().map(|(_, p)| *p).collect()
        }
    }

    #[async_trait]
    impl PageSource for ScriptedSource {
        async fn fetch_page(&self, day: NaiveDate, page: u32) -> PageResult {
            self.requests.lock().unwrap().push((day, page));
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(PageResult::EndOfDay)
        }

        fn page_size(&self) -> usize {
            self.page_size
        }
    }

    fn items(n: usize) -> PageResult {
        PageResult::Items((0..n).map(|i| Record::from(json!({"id": i}))).collect())
    }

    fn server_error() -> PageResult {
        PageResult::RetryableFailure(FailureReason::Status(500))
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn collector(
        source: Arc<ScriptedSource>,
        max_retries: u32,
        dir: &TempDir,
    ) -> (DayCollector, watch::Sender<bool>) {
        let (tx, rx) = watch::channel(false);
        let policy = RetryPolicy {
            max_retries,
            backoff: Duration::ZERO,
        };
        let collector = DayCollector::new(
            source,
            policy,
            ErrorLog::new(dir.path().join("erros.log")),
            rx,
        );
        (collector, tx)
    }

    fn error_log_lines(dir: &TempDir) -> Vec<String> {
        std::fs::read_to_string(dir.path().join("erros.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_full_pages_advance_until_short_page() {
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource::new(100, vec![items(100), items(100), items(40)]);
        let (collector, _tx) = collector(source.clone(), 3, &dir);

        let result = collector.collect_day(day()).await;

        assert!(result.is_complete());
        assert_eq!(result.records.len(), 240);
        assert_eq!(result.requests, 3);
        assert_eq!(source.pages_requested(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_page_ends_day() {
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource::new(100, vec![items(100), PageResult::EndOfDay]);
        let (collector, _tx) = collector(source.clone(), 3, &dir);

        let result = collector.collect_day(day()).await;

        assert!(result.is_complete());
        assert_eq!(result.records.len(), 100);
        assert_eq!(source.pages_requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_retry_then_success_resets_counter() {
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource::new(
            10,
            vec![
                server_error(),
                server_error(),
                items(10),
                server_error(),
                server_error(),
                items(3),
            ],
        );
        let (collector, _tx) = collector(source.clone(), 3, &dir);

        let result = collector.collect_day(day()).await;

        assert!(result.is_complete());
        assert_eq!(result.records.len(), 13);
        assert_eq!(result.failures, 4);
        assert_eq!(source.pages_requested(), vec![1, 1, 1, 2, 2, 2]);
        assert_eq!(error_log_lines(&dir).len(), 4);
    }

    #[tokio::test]
    async fn test_exhausted_retries_abandon_day() {
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource::new(100, vec![server_error(), server_error(), server_error()]);
        let (collector, _tx) = collector(source.clone(), 3, &dir);

        let result = collector.collect_day(day()).await;

        assert!(result.is_abandoned());
        assert!(result.records.is_empty());
        assert_eq!(result.requests, 3);
        let lines = error_log_lines(&dir);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("Erro 500 na página 1 (2025-01-01)"));
    }

    #[tokio::test]
    async fn test_abandoned_day_keeps_earlier_pages() {
        let dir = TempDir::new().unwrap();
        let transport = || PageResult::RetryableFailure(FailureReason::Transport("reset".into()));
        let source = ScriptedSource::new(
            100,
            vec![items(100), items(100), transport(), transport(), transport()],
        );
        let (collector, _tx) = collector(source.clone(), 3, &dir);

        let result = collector.collect_day(day()).await;

        assert_eq!(
            result.outcome,
            DayOutcome::Abandoned {
                page: 3,
                reason: "Exceção: reset".to_string()
            }
        );
        assert_eq!(result.records.len(), 200);
        assert!(error_log_lines(&dir)[0].contains("(página 3, dia 2025-01-01)"));
    }

    #[tokio::test]
    async fn test_fatal_skip_abandons_without_retry() {
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource::new(
            100,
            vec![items(100), PageResult::FatalSkip("field 'items' is not an array".into())],
        );
        let (collector, _tx) = collector(source.clone(), 3, &dir);

        let result = collector.collect_day(day()).await;

        assert!(result.is_abandoned());
        assert_eq!(result.records.len(), 100);
        assert_eq!(source.pages_requested(), vec![1, 2]);
        assert_eq!(error_log_lines(&dir).len(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_before_first_page() {
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource::new(100, vec![items(100)]);
        let (collector, tx) = collector(source.clone(), 3, &dir);
        tx.send(true).unwrap();

        let result = collector.collect_day(day()).await;

        assert!(result.is_interrupted());
        assert!(source.pages_requested().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_backoff() {
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource::new(100, vec![server_error(), items(1)]);
        let (tx, rx) = watch::channel(false);
        let collector = DayCollector::new(
            source.clone(),
            RetryPolicy {
                max_retries: 3,
                backoff: Duration::from_secs(3600),
            },
            ErrorLog::new(dir.path().join("erros.log")),
            rx,
        );

        let handle = tokio::spawn(async move { collector.collect_day(day()).await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("backoff was not interrupted")
            .unwrap();
        assert!(result.is_interrupted());
        assert_eq!(source.pages_requested(), vec![1]);
    }

    #[test]
    fn test_failure_entry_format() {
        let d = day();
        assert_eq!(
            failure_entry(&FailureReason::Status(503), 2, d),
            "Erro 503 na página 2 (2025-01-01)"
        );
        assert_eq!(
            failure_entry(&FailureReason::Timeout("30s".into()), 1, d),
            "Timeout: 30s (página 1, dia 2025-01-01)"
        );
    }
}
