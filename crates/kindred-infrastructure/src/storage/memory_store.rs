//! Process-memory scoped store.

use kindred_core::error::{KindredError, Result};
use kindred_core::session::ScopedStore;
use std::collections::HashMap;
use std::sync::Mutex;

/// A `ScopedStore` backed by a mutex-guarded map.
///
/// Contents live as long as the value; nothing is written to disk.
#[derive(Debug, Default)]
pub struct InMemoryScopedStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryScopedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> KindredError {
    KindredError::storage("in-memory store lock poisoned")
}

impl ScopedStore for InMemoryScopedStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }
}
