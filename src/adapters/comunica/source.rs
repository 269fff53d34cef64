//! Page source trait and page outcome types
//!
//! This module defines the `PageSource` trait that abstracts how one page of
//! communications is fetched. The collector only ever talks to this trait, so
//! tests can script page outcomes without a network.

use crate::domain::Record;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;

/// Why a page fetch failed in a way worth retrying
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Server answered with something other than 200
    Status(u16),
    /// Request exceeded the per-request timeout
    Timeout(String),
    /// Connection, DNS or TLS failure
    Transport(String),
    /// 200 response whose body was not JSON
    Decode(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "Erro {code}"),
            Self::Timeout(msg) => write!(f, "Timeout: {msg}"),
            Self::Transport(msg) => write!(f, "Exceção: {msg}"),
            Self::Decode(msg) => write!(f, "Resposta inválida: {msg}"),
        }
    }
}

impl FailureReason {
    /// Whether the failure came from the server rather than the connection
    pub fn is_server_side(&self) -> bool {
        matches!(self, Self::Status(_) | Self::Decode(_))
    }
}

/// Outcome of a single page request
#[derive(Debug, Clone, PartialEq)]
pub enum PageResult {
    /// Items returned for the page, in API order (never empty)
    Items(Vec<Record>),
    /// The page had no items; the day is finished
    EndOfDay,
    /// The request failed; the same page may be tried again
    RetryableFailure(FailureReason),
    /// The response can never be used; the day must be abandoned
    FatalSkip(String),
}

/// Source of paginated communications for a single day
///
/// # Example
///
/// ```no_run
/// use comunica::adapters::comunica::{ComunicaClient, PageResult, PageSource};
/// use comunica::config::ApiConfig;
/// use chrono::NaiveDate;
///
/// # async fn example() -> comunica::domain::Result<()> {
/// let client = ComunicaClient::new(&ApiConfig::default())?;
/// let day = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
///
/// match client.fetch_page(day, 1).await {
///     PageResult::Items(items) => println!("{} items", items.len()),
///     other => println!("{other:?}"),
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch page `page` (1-based) of the single-day window `day`
    ///
    /// Never retries and never returns an error: every failure is classified
    /// into a [`PageResult`] variant for the caller to act on.
    async fn fetch_page(&self, day: NaiveDate, page: u32) -> PageResult;

    /// Number of items a full page carries
    fn page_size(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reason_display() {
        assert_eq!(FailureReason::Status(500).to_string(), "Erro 500");
        assert!(FailureReason::Transport("connection reset".to_string())
            .to_string()
            .contains("connection reset"));
    }

    #[test]
    fn test_failure_reason_side() {
        assert!(FailureReason::Status(502).is_server_side());
        assert!(!FailureReason::Timeout("30s".to_string()).is_server_side());
    }
}
