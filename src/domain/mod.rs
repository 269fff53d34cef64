//! Domain models and types for the collector.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Opaque records** ([`Record`]) exactly as the API returns them
//! - **Strongly-typed identifiers** ([`TribunalCode`])
//! - **Error types** ([`CollectorError`], [`ApiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, CollectorError>`]:
//!
//! ```rust,no_run
//! use comunica::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = comunica::config::load_config("comunica.toml")?;
//!     println!("{}", config.api.tribunal);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod record;
pub mod result;
pub mod tribunal;

pub use errors::{ApiError, CollectorError};
pub use record::Record;
pub use result::Result;
pub use tribunal::TribunalCode;
