//! Scoped store implementations.

mod json_dir_store;
mod memory_store;

pub use json_dir_store::JsonDirScopedStore;
pub use memory_store::InMemoryScopedStore;

use kindred_core::config::{StorageBackend, StorageConfig};
use kindred_core::error::Result;
use kindred_core::session::ScopedStore;
use std::sync::Arc;

use crate::paths::KindredPaths;

/// Builds the scoped store selected by `config`.
///
/// The file backend uses `config.directory` when set and the platform
/// sessions directory otherwise.
pub fn open_scoped_store(config: &StorageConfig) -> Result<Arc<dyn ScopedStore>> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryScopedStore::new())),
        StorageBackend::File => {
            let dir = match &config.directory {
                Some(dir) => dir.clone(),
                None => KindredPaths::sessions_dir()?,
            };
            tracing::debug!("using file session store at {}", dir.display());
            Ok(Arc::new(JsonDirScopedStore::new(dir)))
        }
    }
}
