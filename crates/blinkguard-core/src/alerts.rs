//! Alert history persisted as JSON lines.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::monitor::{Acknowledgement, Alert, AlertSink};

/// One alert as recorded in `alerts.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub at: DateTime<Utc>,
    pub blinks_per_minute: u32,
    pub safe_boundary: u32,
    pub acknowledgement: Acknowledgement,
}

impl AlertRecord {
    pub fn new(alert: &Alert, acknowledgement: Acknowledgement) -> Self {
        Self {
            at: Utc::now(),
            blinks_per_minute: alert.blinks_per_minute,
            safe_boundary: alert.safe_boundary,
            acknowledgement,
        }
    }
}

/// Appends a record to the history file, creating parent directories.
pub fn append(path: &Path, record: &AlertRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let mut line = serde_json::to_string(record).context("serialize alert record")?;
    line.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.write_all(line.as_bytes())
        .with_context(|| format!("Failed to append to {}", path.display()))
}

/// Loads all records, oldest first. A missing file is an empty history.
pub fn load(path: &Path) -> Result<Vec<AlertRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read alert history from {}", path.display()))?;

    let mut records = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<AlertRecord>(line) {
            Ok(record) => records.push(record),
            Err(err) => warn!(line = idx + 1, error = %err, "skipping malformed alert record"),
        }
    }
    Ok(records)
}

/// Wraps a sink and records every acknowledged alert.
pub struct RecordingSink<S> {
    inner: S,
    path: PathBuf,
}

impl<S: AlertSink> RecordingSink<S> {
    pub fn new(inner: S, path: PathBuf) -> Self {
        Self { inner, path }
    }
}

impl<S: AlertSink> AlertSink for RecordingSink<S> {
    fn alert(&mut self, alert: &Alert) -> Result<Acknowledgement> {
        let ack = self.inner.alert(alert)?;
        // Recording failures are logged, not propagated.
        if let Err(err) = append(&self.path, &AlertRecord::new(alert, ack)) {
            warn!(error = %format!("{err:#}"), "failed to record alert");
        }
        Ok(ack)
    }
}
