pub mod chat;
pub mod classify;

use anyhow::{Context, Result};
use kindred_core::config::KindredConfig;
use kindred_infrastructure::ConfigService;
use std::path::Path;

/// Loads the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<KindredConfig> {
    let service = match path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    service.get_config().context("Failed to load kindred config")
}
