//! Configuration model for Kindred.
//!
//! The file form lives at `<config_dir>/kindred/config.toml`; every section
//! and field is optional and falls back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of exchanges that stay in the intake stage.
pub const DEFAULT_INTAKE_FLOOR: u64 = 3;

/// Default simulated "thinking" delay before a reply is shown.
pub const DEFAULT_THINKING_DELAY_MS: u64 = 600;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct KindredConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Settings that shape stage routing.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Exchanges below this count are routed to intake (unless crisis).
    #[serde(default = "default_intake_floor")]
    pub intake_floor: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            intake_floor: DEFAULT_INTAKE_FLOOR,
        }
    }
}

fn default_intake_floor() -> u64 {
    DEFAULT_INTAKE_FLOOR
}

/// Which scoped store backs the session context.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process memory only; cleared when the process exits.
    #[default]
    Memory,
    /// One JSON file per session key.
    File,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Overrides the session directory of the file backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

/// Presentation settings for the chat front end.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    #[serde(default = "default_thinking_delay_ms")]
    pub thinking_delay_ms: u64,
    /// Pins template selection; random when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            thinking_delay_ms: DEFAULT_THINKING_DELAY_MS,
            seed: None,
        }
    }
}

fn default_thinking_delay_ms() -> u64 {
    DEFAULT_THINKING_DELAY_MS
}
