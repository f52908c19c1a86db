//! Companion conversation use case.
//!
//! Binds one `ResponseGenerator` and one `SessionContextStore` to a chat
//! session and drives the context lifecycle: created on start, replaced and
//! persisted after every turn, cleared when the user leaves.

use crate::generator::ResponseGenerator;
use crate::session::SessionContextStore;
use kindred_core::dialogue::StageResponse;
use kindred_core::session::{ScopedStore, SessionContext};
use std::sync::Arc;

/// A single companion chat session.
///
/// Turns are processed one at a time (`respond` takes `&mut self`), so the
/// context is never mutated by two turns at once.
pub struct CompanionConversation {
    session_id: String,
    generator: ResponseGenerator,
    store: SessionContextStore,
    context: SessionContext,
}

impl CompanionConversation {
    /// Starts a new conversation, replacing anything stored for `session_id`.
    pub fn start(
        session_id: impl Into<String>,
        generator: ResponseGenerator,
        backend: Arc<dyn ScopedStore>,
    ) -> Self {
        let session_id = session_id.into();
        let mut store = SessionContextStore::new(backend, &session_id);
        let context = store.init();
        store.save(&context);
        tracing::info!(session_id = %session_id, "companion session started");

        Self {
            session_id,
            generator,
            store,
            context,
        }
    }

    /// Continues the stored conversation for `session_id`, or starts a fresh
    /// context when nothing usable is stored.
    pub fn resume(
        session_id: impl Into<String>,
        generator: ResponseGenerator,
        backend: Arc<dyn ScopedStore>,
    ) -> Self {
        let session_id = session_id.into();
        let mut store = SessionContextStore::new(backend, &session_id);
        let context = store.load_or_init();
        tracing::info!(
            session_id = %session_id,
            exchange_count = context.exchange_count,
            "companion session resumed"
        );

        Self {
            session_id,
            generator,
            store,
            context,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Current context snapshot.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// True when storage failed and the context only lives in memory.
    pub fn is_storage_degraded(&self) -> bool {
        self.store.is_degraded()
    }

    /// Processes one user turn and persists the updated context.
    pub fn respond(&mut self, utterance: &str) -> StageResponse {
        let generation = self.generator.generate(utterance, &self.context);
        self.store.save(&generation.updated_context);
        self.context = generation.updated_context;
        generation.response
    }

    /// Ends the conversation and clears the stored context.
    pub fn leave(mut self) {
        self.store.clear();
        tracing::info!(
            session_id = %self.session_id,
            exchanges = self.context.exchange_count,
            "companion session left"
        );
    }
}
