//! Result type alias for the collector

use super::errors::CollectorError;

/// Result type alias for collector operations
///
/// # Examples
///
/// ```
/// use comunica::domain::result::Result;
/// use comunica::domain::errors::CollectorError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CollectorError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CollectorError>;
