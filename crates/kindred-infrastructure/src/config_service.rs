//! Configuration service implementation.
//!
//! Loads the root configuration from `~/.config/kindred/config.toml` (or an
//! explicit path) and caches it.

use crate::paths::KindredPaths;
use kindred_core::config::KindredConfig;
use kindred_core::error::{KindredError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the root configuration.
///
/// A missing file is not an error and yields the defaults; a file that
/// exists but does not parse is a `Config` error.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<KindredConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the platform default config file.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<KindredConfig> {
        if let Ok(read_lock) = self.config.read() {
            if let Some(cached) = read_lock.as_ref() {
                return Ok(cached.clone());
            }
        }

        let path = self.config_path()?;
        let loaded = Self::load_from(&path)?;

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn config_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(KindredPaths::config_file()?),
        }
    }

    /// Reads and parses one config file.
    pub fn load_from(path: &Path) -> Result<KindredConfig> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                return Ok(KindredConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        toml::from_str(&content).map_err(|e| {
            KindredError::config(format!(
                "Failed to parse configuration file at {}: {}",
                path.display(),
                e
            ))
        })
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
