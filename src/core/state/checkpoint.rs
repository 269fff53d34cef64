//! Checkpoint and output documents
//!
//! The checkpoint is a single JSON document, rewritten in full after every
//! day that produced records:
//!
//! ```json
//! {
//!     "tribunal": "TJMG",
//!     "last_completed_day": "2025-01-10",
//!     "saved_at": "2025-01-11T03:12:44Z",
//!     "items": [ ... ]
//! }
//! ```
//!
//! A bare JSON array of records is also accepted on load; that is what
//! earlier collectors wrote, and it carries no resume cursor.
//!
//! Writes go through a sibling `.tmp` file and a rename, so a crash mid-write
//! leaves the previous checkpoint intact.

use super::run_state::RunState;
use crate::domain::{CollectorError, Record, Result, TribunalCode};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Contents of a checkpoint file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Tribunal the records belong to (absent in legacy files)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tribunal: Option<TribunalCode>,

    /// Last day fully processed when the checkpoint was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_day: Option<NaiveDate>,

    /// When the checkpoint was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,

    /// Every record collected so far, in collection order
    pub items: Vec<Record>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCheckpoint {
    Legacy(Vec<Record>),
    Envelope(Checkpoint),
}

impl From<StoredCheckpoint> for Checkpoint {
    fn from(stored: StoredCheckpoint) -> Self {
        match stored {
            StoredCheckpoint::Envelope(checkpoint) => checkpoint,
            StoredCheckpoint::Legacy(items) => Checkpoint {
                tribunal: None,
                last_completed_day: None,
                saved_at: None,
                items,
            },
        }
    }
}

#[derive(Serialize)]
struct CheckpointRef<'a> {
    tribunal: &'a TribunalCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_completed_day: Option<NaiveDate>,
    saved_at: DateTime<Utc>,
    items: &'a [Record],
}

/// Reads and writes the checkpoint file
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
    pretty: bool,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            path: path.into(),
            pretty,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the checkpoint
    ///
    /// Returns `Ok(None)` when no checkpoint file exists.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Checkpoint`] if the file cannot be read or is
    /// neither an envelope nor a bare record array.
    pub fn load(&self) -> Result<Option<Checkpoint>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read(&self.path).map_err(|e| {
            CollectorError::Checkpoint(format!("Failed to read {}: {e}", self.path.display()))
        })?;

        let stored: StoredCheckpoint = serde_json::from_slice(&contents).map_err(|e| {
            CollectorError::Checkpoint(format!("Failed to parse {}: {e}", self.path.display()))
        })?;

        Ok(Some(stored.into()))
    }

    /// Overwrites the checkpoint with the full current state
    pub fn save(&self, state: &RunState) -> Result<()> {
        let document = CheckpointRef {
            tribunal: state.tribunal(),
            last_completed_day: state.last_completed_day(),
            saved_at: Utc::now(),
            items: state.records(),
        };
        write_json_atomic(&self.path, &document, self.pretty)
    }

    /// Renames the checkpoint to `<name>.<label>.bak`, replacing any earlier
    /// file with that name, and returns the new path
    pub fn set_aside(&self, label: &str) -> Result<PathBuf> {
        let target = sibling_with_suffix(&self.path, &format!(".{label}.bak"));
        fs::rename(&self.path, &target)?;
        tracing::info!(
            from = %self.path.display(),
            to = %target.display(),
            "Checkpoint moved aside"
        );
        Ok(target)
    }
}

/// Writes the final output document: a bare JSON array of records
pub fn write_records(path: impl AsRef<Path>, records: &[Record], pretty: bool) -> Result<()> {
    write_json_atomic(path.as_ref(), &records, pretty)
}

fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path_for(path);
    let file = fs::File::create(&tmp_path)?;
    let mut writer = BufWriter::new(file);

    if pretty {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        value.serialize(&mut serializer)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| CollectorError::Io(e.to_string()))?
        .sync_all()?;

    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    sibling_with_suffix(path, ".tmp")
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
