//! reqwest-backed page fetcher for the Comunica API
//!
//! Issues exactly one GET per call and classifies the outcome. Retrying is
//! the day collector's job, so nothing in here loops or sleeps.

use super::models::{extract_items, PageQuery};
use super::source::{FailureReason, PageResult, PageSource};
use crate::config::ApiConfig;
use crate::domain::{ApiError, Result, TribunalCode};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;

/// HTTP client for the communications endpoint
///
/// # Example
///
/// ```no_run
/// use comunica::adapters::comunica::ComunicaClient;
/// use comunica::config::ApiConfig;
///
/// # fn example() -> comunica::domain::Result<()> {
/// let client = ComunicaClient::new(&ApiConfig::default())?;
/// assert_eq!(client.tribunal().as_str(), "TJMG");
/// # Ok(())
/// # }
/// ```
pub struct ComunicaClient {
    base_url: String,
    tribunal: TribunalCode,
    page_size: usize,
    client: Client,
}

impl ComunicaClient {
    /// Build a client from the API configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the tribunal code is invalid or the underlying
    /// HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let tribunal = TribunalCode::new(config.tribunal.as_str())
            .map_err(crate::domain::CollectorError::Configuration)?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::ClientSetup(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            tribunal,
            page_size: config.page_size,
            client,
        })
    }

    /// Tribunal this client queries
    pub fn tribunal(&self) -> &TribunalCode {
        &self.tribunal
    }

    /// Endpoint this client queries
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn classify_send_error(err: reqwest::Error) -> FailureReason {
        if err.is_timeout() {
            FailureReason::Timeout(err.to_string())
        } else {
            FailureReason::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl PageSource for ComunicaClient {
    async fn fetch_page(&self, day: NaiveDate, page: u32) -> PageResult {
        let query = PageQuery::for_day(self.tribunal.as_str(), day, page, self.page_size);

        tracing::debug!(
            url = %self.base_url,
            tribunal = %self.tribunal,
            day = %day,
            page = page,
            "Requesting page"
        );

        let resp = match self.client.get(&self.base_url).query(&query).send().await {
            Ok(resp) => resp,
            Err(e) => return PageResult::RetryableFailure(Self::classify_send_error(e)),
        };

        let status = resp.status();
        if status != StatusCode::OK {
            tracing::debug!(status = status.as_u16(), day = %day, page = page, "Non-200 response");
            return PageResult::RetryableFailure(FailureReason::Status(status.as_u16()));
        }

        let bytes = match resp.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return PageResult::RetryableFailure(Self::classify_send_error(e)),
        };

        let body: serde_json::Value = match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(e) => return PageResult::RetryableFailure(FailureReason::Decode(e.to_string())),
        };

        match extract_items(body) {
            Ok(items) if items.is_empty() => PageResult::EndOfDay,
            Ok(items) => PageResult::Items(items),
            Err(reason) => PageResult::FatalSkip(reason),
        }
    }

    fn page_size(&self) -> usize {
        self.page_size
    }
}
