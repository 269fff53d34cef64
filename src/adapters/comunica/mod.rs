//! Comunica API adapter
//!
//! This module provides the page-level integration with the PJe Comunica API:
//! the [`PageSource`] seam, the reqwest implementation and the wire models.

pub mod client;
pub mod models;
pub mod source;

pub use client::ComunicaClient;
pub use models::PageQuery;
pub use source::{FailureReason, PageResult, PageSource};
