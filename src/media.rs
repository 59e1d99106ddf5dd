//! Media file management: timestamped storage and orphan cleanup.

use crate::error::{ArchiveError, Result};
use crate::models::Entry;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores entry attachments under a dedicated media directory.
///
/// Files are named with a creation-timestamp prefix plus the original
/// filename to avoid collisions. Entries reference them by the path string
/// returned from [`MediaStore::store`]; the store does not own the files'
/// lifecycle beyond orphan cleanup.
pub struct MediaStore {
    dir: PathBuf,
}

impl MediaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy an external file into the media directory and return the path
    /// string to record on the entry.
    pub fn store(&self, source: &Path) -> Result<String> {
        if !source.is_file() {
            return Err(ArchiveError::MediaNotFound(source.to_path_buf()));
        }
        let original = source
            .file_name()
            .ok_or_else(|| ArchiveError::MediaNotFound(source.to_path_buf()))?
            .to_string_lossy();

        fs::create_dir_all(&self.dir)?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let mut dest = self.dir.join(format!("{stamp}_{original}"));
        // Same name stored twice within one second must not overwrite
        let mut n = 1;
        while dest.exists() {
            dest = self.dir.join(format!("{stamp}_{n}_{original}"));
            n += 1;
        }
        fs::copy(source, &dest)?;
        Ok(dest.to_string_lossy().into_owned())
    }

    /// Remove media files no entry references. Returns the removed count.
    ///
    /// Referenced paths are matched by file name within the media directory,
    /// so the comparison is insensitive to how the data directory was spelled
    /// when the entry was recorded (`data` vs `./data`, relative vs absolute).
    pub fn cleanup_orphans(&self, entries: &[Entry]) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let used: HashSet<OsString> = entries
            .iter()
            .flat_map(|e| [e.image_path.as_deref(), e.audio_path.as_deref()])
            .flatten()
            .filter_map(|p| Path::new(p).file_name().map(OsStr::to_os_string))
            .collect();

        let mut removed = 0;
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if !path.is_file() {
                continue;
            }
            let referenced = path.file_name().is_some_and(|name| used.contains(name));
            if !referenced {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Human-readable file size.
pub fn human_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} TB")
}
