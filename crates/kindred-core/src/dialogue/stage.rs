//! Conversation stage tags.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The current phase of the companion conversation.
///
/// No total precedence is defined between stages, except that `Crisis`
/// overrides every other classification for the turn it is assigned to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ConversationStage {
    /// Onboarding: getting to know the user.
    #[default]
    Intake,
    /// Mirroring back what the user shared.
    Reflective,
    /// Grounding when the user is dysregulated.
    Regulation,
    /// Explaining why feelings happen.
    Psychoeducation,
    /// Talking about what the user wants to change.
    Goals,
    /// Offering coping strategies.
    Coping,
    /// Acknowledging improvement.
    Progress,
    /// Self-harm language detected.
    Crisis,
    /// Pointing toward professional support.
    Referral,
}

impl ConversationStage {
    pub fn is_crisis(self) -> bool {
        matches!(self, Self::Crisis)
    }
}
