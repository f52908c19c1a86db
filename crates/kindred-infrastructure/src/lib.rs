//! Infrastructure layer for Kindred: scoped store backends, paths and
//! configuration loading.

pub mod config_service;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::paths::KindredPaths;
pub use crate::storage::{InMemoryScopedStore, JsonDirScopedStore, open_scoped_store};
