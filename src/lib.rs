//! # Comunica - court notification collector
//!
//! Collects the communications a tribunal publishes on the PJe Comunica API,
//! one day at a time, into a single JSON file. Progress is checkpointed after
//! every productive day so an interrupted run resumes where it stopped.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Day collection, run control, checkpointing
//! - [`adapters`] - The Comunica HTTP client
//! - [`domain`] - Records, identifiers, errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging, the error log and console progress
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use comunica::config::load_config_or_default;
//! use comunica::core::collect::RunController;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("comunica.toml")?;
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//!     let controller = RunController::from_config(&config, shutdown_rx)?;
//!     let summary = controller.run().await;
//!
//!     println!("Collected {} records", summary.total_records);
//!     std::process::exit(summary.exit_code());
//! }
//! ```
//!
//! ## Custom page sources
//!
//! The controller only talks to the API through
//! [`adapters::comunica::PageSource`], so tests and alternative transports
//! can drive a full run:
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use chrono::NaiveDate;
//! use comunica::adapters::comunica::{PageResult, PageSource};
//!
//! struct Quiet;
//!
//! #[async_trait]
//! impl PageSource for Quiet {
//!     async fn fetch_page(&self, _day: NaiveDate, _page: u32) -> PageResult {
//!         PageResult::EndOfDay
//!     }
//!
//!     fn page_size(&self) -> usize {
//!         100
//!     }
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
