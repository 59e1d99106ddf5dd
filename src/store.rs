//! Flat-file entry store: one pretty-printed JSON document.

use crate::error::{ArchiveError, Result};
use crate::models::{Entry, EntryDraft};
use crate::utils::warning;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Persists the entry collection as a single JSON array.
///
/// Every mutation is a full-document read-modify-write; the rewrite goes
/// through a temp file in the same directory and an atomic rename, so a
/// failed write never leaves a truncated document behind.
pub struct EntryStore {
    path: PathBuf,
}

impl EntryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all persisted entries in storage order.
    ///
    /// A missing document is an empty collection; an unreadable or
    /// malformed document is an error.
    pub fn load(&self) -> Result<Vec<Entry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        let entries = serde_json::from_str(&content)?;
        Ok(entries)
    }

    /// Fail-soft load: report the problem as a warning and return the
    /// empty collection.
    pub fn load_or_empty(&self) -> Vec<Entry> {
        match self.load() {
            Ok(entries) => entries,
            Err(e) => {
                warning(&format!("Error loading entries: {e}"));
                Vec::new()
            }
        }
    }

    /// Append a new entry and rewrite the full collection.
    ///
    /// The id is derived from the persisted document at write time
    /// (`max(id) + 1`), not from a possibly-stale in-memory count, and the
    /// creation timestamp is stamped here. Returns the stored entry.
    pub fn append(&self, draft: EntryDraft) -> Result<Entry> {
        let mut entries = self.load()?;
        let id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let entry = Entry {
            id,
            title: draft.title,
            description: draft.description,
            language: draft.language,
            category: draft.category,
            location_name: draft.location_name,
            latitude: draft.latitude,
            longitude: draft.longitude,
            image_path: draft.image_path,
            audio_path: draft.audio_path,
            timestamp: now_iso8601(),
            contributor: draft.contributor,
            contributor_full_name: draft.contributor_full_name,
        };
        entries.push(entry.clone());
        self.write_atomic(&entries)?;
        Ok(entry)
    }

    /// Replace the persisted collection with an empty one. Idempotent.
    pub fn clear(&self) -> Result<()> {
        self.write_atomic(&[])
    }

    fn write_atomic(&self, entries: &[Entry]) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        // serde_json keeps non-ASCII text unescaped
        let content = serde_json::to_string_pretty(entries)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(content.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path)
            .map_err(|e| ArchiveError::Io(e.error))?;
        Ok(())
    }
}

/// Current local time as an ISO-8601 string. Lexicographic order on these
/// strings matches chronological order within one offset.
pub fn now_iso8601() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f%:z").to_string()
}
