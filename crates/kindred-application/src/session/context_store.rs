//! Session context persistence with in-memory degradation.
//!
//! `SessionContextStore` wraps an injected `ScopedStore` and a single session
//! key. It never reports storage failures to its caller: a failing backend
//! is logged and the store switches to an in-memory copy for the rest of the
//! session.

use kindred_core::error::Result;
use kindred_core::session::{ScopedStore, SessionContext, session_key};
use std::sync::Arc;

/// Load/save/clear for one conversation's `SessionContext`.
///
/// One instance per active conversation; there is no process-wide store.
pub struct SessionContextStore {
    backend: Arc<dyn ScopedStore>,
    key: String,
    /// Last saved context; the source of truth once degraded.
    memory: Option<SessionContext>,
    degraded: bool,
}

impl SessionContextStore {
    /// Creates a store for `session_id` on top of `backend`.
    pub fn new(backend: Arc<dyn ScopedStore>, session_id: &str) -> Self {
        Self {
            backend,
            key: session_key(session_id),
            memory: None,
            degraded: false,
        }
    }

    /// The backend key this store reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// True once a backend failure moved the store to memory-only mode.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Returns a fresh context for a new session.
    pub fn init(&self) -> SessionContext {
        SessionContext::init()
    }

    /// Loads the stored context.
    ///
    /// Returns `None` when nothing was stored yet or the payload does not
    /// decode. Callers fall back to [`init`](Self::init).
    pub fn load(&mut self) -> Option<SessionContext> {
        if self.degraded {
            return self.memory.clone();
        }

        let payload = match self.backend.get(&self.key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                self.degrade("load", &e.to_string());
                return self.memory.clone();
            }
        };

        match serde_json::from_str::<SessionContext>(&payload) {
            Ok(context) => {
                self.memory = Some(context.clone());
                Some(context)
            }
            Err(e) => {
                tracing::warn!(key = %self.key, "discarding undecodable session context: {}", e);
                None
            }
        }
    }

    /// Loads the stored context, or returns a fresh one.
    pub fn load_or_init(&mut self) -> SessionContext {
        self.load().unwrap_or_else(|| self.init())
    }

    /// Persists `context`. Always succeeds from the caller's point of view.
    pub fn save(&mut self, context: &SessionContext) {
        self.memory = Some(context.clone());
        if self.degraded {
            return;
        }

        if let Err(e) = self.write(context) {
            self.degrade("save", &e.to_string());
        }
    }

    /// Removes the stored context (the user left the conversation).
    pub fn clear(&mut self) {
        self.memory = None;
        if self.degraded {
            return;
        }

        if let Err(e) = self.backend.remove(&self.key) {
            // Whatever is left in the backend must not be read back
            self.degrade("clear", &e.to_string());
        }
    }

    fn write(&self, context: &SessionContext) -> Result<()> {
        let payload = serde_json::to_string(context)?;
        self.backend.set(&self.key, &payload)
    }

    fn degrade(&mut self, operation: &str, reason: &str) {
        tracing::warn!(
            key = %self.key,
            "session store {} failed, continuing in memory only: {}",
            operation,
            reason
        );
        self.degraded = true;
    }
}
