//! Append-only error log
//!
//! One human-readable line per failure, prefixed with a local timestamp:
//!
//! ```text
//! [2025-01-05 10:31:02.114503] Erro 500 na página 1 (2025-01-05)
//! ```
//!
//! Writing here must never take the run down, so I/O failures are reported
//! through tracing and otherwise ignored.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Timestamped line log for failures
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    /// Error log that appends to `path`, creating it on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry
    pub fn record(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        let line = format!(
            "[{}] {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
            message.replace('\n', " ")
        );

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        if let Err(e) = result {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                entry = %message,
                "Failed to write error log entry"
            );
        }
    }
}
