//! Unified path management for Kindred files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/kindred/           # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/kindred/      # Data directory
//! └── sessions/                # Session context files (file store backend)
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "kindred";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config/data directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for kindred_core::KindredError {
    fn from(err: PathError) -> Self {
        kindred_core::KindredError::config(err.to_string())
    }
}

/// Unified path management for Kindred.
///
/// Uses the platform conventions of the `dirs` crate (XDG on Linux,
/// `Library/Application Support` on macOS, `AppData` on Windows).
pub struct KindredPaths;

impl KindredPaths {
    /// Returns the Kindred configuration directory (e.g. `~/.config/kindred/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the Kindred data directory (e.g. `~/.local/share/kindred/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the directory used by the file-backed session store.
    pub fn sessions_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("sessions"))
    }
}
