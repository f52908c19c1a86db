//! Reply returned to the chat front end.

use super::stage::ConversationStage;
use serde::{Deserialize, Serialize};

/// The rendered reply for one user turn.
///
/// `message` is final display text and already includes the follow-up
/// question (and the safety message on crisis turns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageResponse {
    pub message: String,
    pub stage: ConversationStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_question: Option<String>,
}
