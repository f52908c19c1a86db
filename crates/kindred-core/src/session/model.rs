//! Session context domain model.
//!
//! This module contains the small per-conversation state that the
//! companion carries from one user turn to the next.

use crate::dialogue::ConversationStage;
use serde::{Deserialize, Serialize};

/// Per-conversation state of the companion.
///
/// A context is owned by exactly one chat session. It is created when the
/// session starts, replaced once per user turn, and cleared when the user
/// leaves the conversation.
///
/// Field names serialise in camelCase (`exchangeCount`, `lastUpdated`) so the
/// stored payload matches the web client's session storage format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    /// Stage assigned on the most recent turn.
    pub stage: ConversationStage,
    /// Topic tags detected so far, in the order they were seen.
    #[serde(default)]
    pub themes: Vec<String>,
    /// Number of user turns processed.
    pub exchange_count: u64,
    /// Milliseconds since the Unix epoch of the last update.
    pub last_updated: i64,
}

impl SessionContext {
    /// Creates a fresh context stamped with the current time.
    pub fn init() -> Self {
        Self::init_at(chrono::Utc::now().timestamp_millis())
    }

    /// Creates a fresh context stamped with `now_ms`.
    pub fn init_at(now_ms: i64) -> Self {
        Self {
            stage: ConversationStage::Intake,
            themes: Vec::new(),
            exchange_count: 0,
            last_updated: now_ms,
        }
    }

    /// Returns the context that follows this one after a processed turn.
    ///
    /// The exchange count always grows by exactly one; detected themes are
    /// appended as-is.
    pub fn advanced(
        &self,
        stage: ConversationStage,
        detected_themes: impl IntoIterator<Item = String>,
        now_ms: i64,
    ) -> Self {
        let mut themes = self.themes.clone();
        themes.extend(detected_themes);

        Self {
            stage,
            themes,
            exchange_count: self.exchange_count + 1,
            last_updated: now_ms,
        }
    }
}
