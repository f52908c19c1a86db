//! Stage templates and the fixed safety copy.
//!
//! Each stage owns a non-empty set of templates. A template is a reply with
//! an optional follow-up question; both may carry `{{emotion}}`,
//! `{{difficulty}}` or `{{topic}}` placeholders.

use super::stage::ConversationStage;
use crate::error::{KindredError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::IntoEnumIterator;

/// Appended to every crisis-stage reply.
pub const CRISIS_SAFETY_MESSAGE: &str = "If you are thinking about harming yourself, please reach out for immediate support: call or text 988 (Suicide & Crisis Lifeline, US) or contact your local emergency services. You don't have to go through this alone.";

/// Substituted when a rendered reply fails validation.
pub const SAFE_FALLBACK_MESSAGE: &str =
    "I'm here to listen and support you. Your feelings are valid.";

/// A reply template with an optional follow-up question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTemplate {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
}

impl StageTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            follow_up: None,
        }
    }

    pub fn with_follow_up(mut self, follow_up: impl Into<String>) -> Self {
        self.follow_up = Some(follow_up.into());
        self
    }
}

fn t(text: &str, follow_up: Option<&str>) -> StageTemplate {
    StageTemplate {
        text: text.to_string(),
        follow_up: follow_up.map(str::to_string),
    }
}

/// Returns the built-in templates for `stage`.
pub fn default_templates(stage: ConversationStage) -> Vec<StageTemplate> {
    match stage {
        ConversationStage::Intake => vec![
            t(
                "Hi, I'm really glad you reached out. This is a safe space to share whatever is on your mind.",
                Some("How have you been feeling lately?"),
            ),
            t(
                "Thank you for being here. I'm here to listen, without judgement.",
                Some("What would you like to talk about today?"),
            ),
            t(
                "It's good to meet you. Taking a moment to check in with yourself is a meaningful step.",
                Some("What's been on your mind recently?"),
            ),
            t(
                "I'm here with you. There's no right or wrong way to start.",
                None,
            ),
        ],
        ConversationStage::Reflective => vec![
            t(
                "It sounds like you're feeling {{emotion}}, and that makes sense given what you've shared.",
                Some("Would you like to tell me more about {{topic}}?"),
            ),
            t(
                "Thank you for sharing that with me. Going through {{difficulty}} moments like this takes a lot of energy.",
                Some("What part of it feels the heaviest right now?"),
            ),
            t(
                "I hear you. It's completely understandable to feel {{emotion}} about {{topic}}.",
                None,
            ),
        ],
        ConversationStage::Regulation => vec![
            t(
                "That sounds really {{difficulty}}. Let's slow things down together for a moment.",
                Some(
                    "Can you try breathing in for four counts, holding for four, and breathing out for six?",
                ),
            ),
            t(
                "When everything feels like too much, grounding can help. Try naming five things you can see around you.",
                Some("How does your body feel right now?"),
            ),
            t(
                "You're safe in this moment. Let's take one slow breath at a time.",
                None,
            ),
        ],
        ConversationStage::Psychoeducation => vec![
            t(
                "Feeling {{emotion}} is a very human response. Our minds often react strongly when something matters to us.",
                Some("Have you noticed anything that tends to bring this feeling on?"),
            ),
            t(
                "Emotions like these often come in waves. They rise, peak, and then ease, even when that's hard to believe in the moment.",
                Some("What usually happens for you when the feeling starts to build?"),
            ),
            t(
                "Stress about {{topic}} can show up in our thoughts, our bodies, and our sleep. Noticing those patterns is a useful first step.",
                None,
            ),
        ],
        ConversationStage::Goals => vec![
            t(
                "It's great that you're thinking about what you want. Small, specific steps tend to be easier to start with.",
                Some("What is one small thing you'd like to try this week?"),
            ),
            t(
                "Having something to work toward, even around {{topic}}, can give the days a bit more shape.",
                Some("What would progress look like for you?"),
            ),
        ],
        ConversationStage::Coping => vec![
            t(
                "When things feel {{difficulty}}, it can help to have a few go-to strategies. Some people find a short walk, journaling, or talking to a friend helpful.",
                Some("Which of those sounds most doable for you right now?"),
            ),
            t(
                "One thing you could try when you're feeling {{emotion}} is writing down what's going on for five minutes, without editing.",
                Some("Would you be open to trying that today?"),
            ),
            t(
                "Looking after the basics, like rest, food, and a bit of movement, can make {{difficulty}} days a little more manageable.",
                None,
            ),
        ],
        ConversationStage::Progress => vec![
            t(
                "That's really encouraging to hear. It takes effort to notice the progress you're making.",
                Some("What do you think helped the most?"),
            ),
            t(
                "I'm glad things are feeling a bit lighter. It's worth taking a moment to recognise that.",
                Some("How would you like to build on this?"),
            ),
        ],
        ConversationStage::Crisis => vec![
            t(
                "I'm really sorry you're feeling this much pain. Your safety matters, and you deserve support right now.",
                None,
            ),
            t(
                "Thank you for telling me. What you're going through sounds incredibly hard, and you don't have to face it alone.",
                None,
            ),
        ],
        ConversationStage::Referral => vec![
            t(
                "Talking to a mental health professional can be a really helpful step. They can offer support that goes beyond what I can provide here.",
                Some("Would it help to think through how you might reach out to someone?"),
            ),
            t(
                "It sounds like support from a counselor or therapist could be valuable as you work through {{topic}}.",
                Some("Is there anything holding you back from reaching out?"),
            ),
        ],
    }
}

/// Stage → candidate templates.
///
/// Every stage always has at least one template; overrides that would leave
/// a stage empty are rejected.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    templates: HashMap<ConversationStage, Vec<StageTemplate>>,
}

impl Default for TemplateStore {
    fn default() -> Self {
        let templates = ConversationStage::iter()
            .map(|stage| (stage, default_templates(stage)))
            .collect();
        Self { templates }
    }
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate templates for `stage`.
    pub fn templates_for(&self, stage: ConversationStage) -> &[StageTemplate] {
        self.templates
            .get(&stage)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Replaces the templates of one stage.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if `templates` is empty.
    pub fn set_templates(
        &mut self,
        stage: ConversationStage,
        templates: Vec<StageTemplate>,
    ) -> Result<()> {
        if templates.is_empty() {
            return Err(KindredError::config(format!(
                "stage '{stage}' needs at least one template"
            )));
        }
        self.templates.insert(stage, templates);
        Ok(())
    }

    /// Builder form of [`set_templates`](Self::set_templates).
    pub fn with_templates(
        mut self,
        stage: ConversationStage,
        templates: Vec<StageTemplate>,
    ) -> Result<Self> {
        self.set_templates(stage, templates)?;
        Ok(self)
    }
}
