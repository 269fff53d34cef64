//! Notification records
//!
//! A record is one communication entry exactly as the API published it. The
//! collector never looks inside it: records are counted, concatenated and
//! written back out untouched.

use serde::{Deserialize, Serialize};

/// One published notification, kept as opaque JSON
///
/// # Examples
///
/// ```
/// use comunica::domain::Record;
///
/// let record = Record::from(serde_json::json!({"id": 1, "numeroprocessocommascara": "0000"}));
/// assert!(record.as_value().is_object());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(serde_json::Value);

impl Record {
    /// Wraps a raw JSON value
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Borrows the raw JSON value
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Consumes self and returns the raw JSON value
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for Record {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}
