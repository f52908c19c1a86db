//! Directory-of-JSON-files scoped store.
//!
//! Each key maps to `<dir>/<sanitised key>.json`. Writes go to a hidden
//! temporary file in the same directory, are fsynced, then renamed over the
//! target so a reader never observes a half-written payload.

use kindred_core::error::{KindredError, Result};
use kindred_core::session::ScopedStore;
use std::fs::{self, File};
use std::io::{ErrorKind, Write as IoWrite};
use std::path::{Path, PathBuf};

/// A `ScopedStore` that keeps one JSON document per key in a directory.
#[derive(Debug, Clone)]
pub struct JsonDirScopedStore {
    dir: PathBuf,
}

impl JsonDirScopedStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds the payload of `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        Ok(self.dir.join(format!("{}.json", sanitise_key(key)?)))
    }

    fn temp_path_for(&self, key: &str) -> Result<PathBuf> {
        Ok(self.dir.join(format!(".{}.json.tmp", sanitise_key(key)?)))
    }
}

/// Maps a store key onto a portable file stem.
///
/// Lowercase ASCII letters, digits, `.` and `-` are kept; every other byte
/// becomes `_` followed by two hex digits. `_` is itself escaped, so distinct
/// keys never share a file, even on case-insensitive file systems.
fn sanitise_key(key: &str) -> Result<String> {
    if key.trim().is_empty() {
        return Err(KindredError::storage("store key must not be empty"));
    }

    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_lowercase() || byte.is_ascii_digit() || matches!(byte, b'.' | b'-') {
            stem.push(char::from(byte));
        } else {
            stem.push('_');
            stem.push_str(&hex::encode([byte]));
        }
    }
    Ok(stem)
}

impl ScopedStore for JsonDirScopedStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // Reject payloads that would not load back
        serde_json::from_str::<serde_json::Value>(value)?;

        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key)?;
        let tmp_path = self.temp_path_for(key)?;

        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(value.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &path)?;
        tracing::trace!("stored {} bytes at {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
