//! Generation log: bounded, append-only record of builds.
//!
//! Persisted as JSON in the state dir, deliberately separate from the
//! configuration file so appending a line never rewrites config. The ring
//! is capped at [`LOG_CAPACITY`] entries; a periodic cleanup additionally
//! drops entries older than [`RETENTION_DAYS`].

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::debug;

/// Maximum retained entries; oldest evicted first.
pub const LOG_CAPACITY: usize = 50;

/// Entries older than this are dropped by `cleanup`.
pub const RETENTION_DAYS: i64 = 7;

const LOG_FILE: &str = "generation-log.json";
const LAST_UPDATE_FILE: &str = "last-update";

/// One build's log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationLogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub article_count: usize,
    pub duration_ms: u64,
}

/// The persisted ring buffer of build records.
pub struct GenerationLog {
    path: PathBuf,
    entries: VecDeque<GenerationLogEntry>,
}

impl GenerationLog {
    /// Load the log from the state dir; a missing or corrupt file starts
    /// an empty log.
    pub fn open(state_dir: &Path) -> Self {
        let path = state_dir.join(LOG_FILE);
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self { path, entries }
    }

    /// Append an entry, evicting the oldest beyond capacity.
    pub fn append(&mut self, entry: GenerationLogEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > LOG_CAPACITY {
            self.entries.pop_front();
        }
    }

    /// Drop entries older than the retention window. Returns the number
    /// of removed entries.
    pub fn cleanup(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::days(RETENTION_DAYS);
        let before = self.entries.len();
        self.entries.retain(|e| e.timestamp >= cutoff);
        before - self.entries.len()
    }

    /// Persist the log. Write-then-rename so a crash mid-save cannot
    /// corrupt the existing file.
    pub fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &GenerationLogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Record the instant of the last successful publish.
pub fn write_last_update(state_dir: &Path, now: DateTime<Utc>) {
    let path = state_dir.join(LAST_UPDATE_FILE);
    if let Err(e) = fs::write(&path, now.to_rfc3339()) {
        debug!("genlog"; "failed to write last-update marker: {}", e);
    }
}

/// Read the instant of the last successful publish, if any.
pub fn read_last_update(state_dir: &Path) -> Option<DateTime<Utc>> {
    let content = fs::read_to_string(state_dir.join(LAST_UPDATE_FILE)).ok()?;
    DateTime::parse_from_rfc3339(content.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
