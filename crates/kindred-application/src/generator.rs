//! Response generation.
//!
//! `ResponseGenerator` is the public entry point of the conversation
//! policy. One call processes one user turn:
//!
//! 1. route the utterance to a stage
//! 2. pick the constraint set for that stage
//! 3. fetch the stage's templates
//! 4. select and adapt a template
//! 5. append the follow-up question, if any
//! 6. append the safety message on crisis turns
//! 7. validate, substituting the fallback message on failure
//! 8. derive the updated context
//!
//! The caller persists the returned context.

use kindred_core::config::EngineConfig;
use kindred_core::dialogue::{
    CRISIS_SAFETY_MESSAGE, ConstraintSet, ConversationStage, RandomSelector, SAFE_FALLBACK_MESSAGE,
    StageResponse, StageRouter, TemplateSelector, TemplateStore, TemplateVariables,
    combine_response_and_follow_up, detect_themes, violations,
};
use kindred_core::session::SessionContext;

/// Result of one processed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub response: StageResponse,
    pub updated_context: SessionContext,
}

/// Turns (utterance, context) into (reply, next context).
///
/// Generation never fails: classification misses fall back to the
/// reflective stage, unknown placeholders to generic words, and rejected
/// text to [`SAFE_FALLBACK_MESSAGE`].
pub struct ResponseGenerator {
    router: StageRouter,
    templates: TemplateStore,
    selector: Box<dyn TemplateSelector>,
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self::with_selector(Box::new(RandomSelector))
    }
}

impl ResponseGenerator {
    pub fn new(
        router: StageRouter,
        templates: TemplateStore,
        selector: Box<dyn TemplateSelector>,
    ) -> Self {
        Self {
            router,
            templates,
            selector,
        }
    }

    /// Default router and templates with the given selection strategy.
    pub fn with_selector(selector: Box<dyn TemplateSelector>) -> Self {
        Self::new(StageRouter::default(), TemplateStore::default(), selector)
    }

    pub fn from_config(config: &EngineConfig, selector: Box<dyn TemplateSelector>) -> Self {
        Self::new(
            StageRouter::from_config(config),
            TemplateStore::default(),
            selector,
        )
    }

    pub fn router(&self) -> &StageRouter {
        &self.router
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    /// Processes one turn stamped with the current time.
    pub fn generate(&mut self, utterance: &str, context: &SessionContext) -> Generation {
        self.generate_at(utterance, context, chrono::Utc::now().timestamp_millis())
    }

    /// Processes one turn stamped with `now_ms`.
    pub fn generate_at(
        &mut self,
        utterance: &str,
        context: &SessionContext,
        now_ms: i64,
    ) -> Generation {
        let route = self.router.route(utterance, context);
        let stage = route.stage;
        tracing::debug!(
            %stage,
            exchange_count = context.exchange_count,
            "routed turn: {}",
            route.reason
        );

        let constraints = ConstraintSet::for_stage(stage);
        let (mut message, follow_up_question) = self.render(stage, utterance);

        if stage.is_crisis() {
            message = combine_response_and_follow_up(&message, Some(CRISIS_SAFETY_MESSAGE));
        }

        let violated = violations(&message, &constraints);
        let response = if violated.is_empty() {
            StageResponse {
                message,
                stage,
                follow_up_question,
            }
        } else {
            let names: Vec<&str> = violated.iter().map(|c| c.name()).collect();
            tracing::warn!(%stage, "reply rejected ({}), using fallback", names.join(", "));
            StageResponse {
                message: fallback_message(stage),
                stage,
                follow_up_question: None,
            }
        };

        let updated_context = context.advanced(stage, detect_themes(utterance), now_ms);

        Generation {
            response,
            updated_context,
        }
    }

    /// Selects and adapts a template for `stage`. Returns the reply with its
    /// follow-up already appended, plus the follow-up on its own.
    fn render(&mut self, stage: ConversationStage, utterance: &str) -> (String, Option<String>) {
        let candidates = self.templates.templates_for(stage);
        if candidates.is_empty() {
            return (SAFE_FALLBACK_MESSAGE.to_string(), None);
        }

        let index = self.selector.select(candidates.len()) % candidates.len();
        let template = &candidates[index];

        let variables = TemplateVariables::extract(utterance);
        let text = variables.render(&template.text);
        let follow_up = template
            .follow_up
            .as_deref()
            .map(|f| variables.render(f).into_owned());

        let message = combine_response_and_follow_up(&text, follow_up.as_deref());
        (message, follow_up)
    }
}

fn fallback_message(stage: ConversationStage) -> String {
    if stage.is_crisis() {
        combine_response_and_follow_up(SAFE_FALLBACK_MESSAGE, Some(CRISIS_SAFETY_MESSAGE))
    } else {
        SAFE_FALLBACK_MESSAGE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_core::dialogue::adapter::has_placeholder;
    use kindred_core::dialogue::{FixedSelector, SeededSelector, StageTemplate};
    use strum::IntoEnumIterator;

    fn context_with(exchange_count: u64) -> SessionContext {
        SessionContext {
            exchange_count,
            ..SessionContext::init_at(0)
        }
    }

    fn expected_intake_messages() -> Vec<String> {
        TemplateStore::default()
            .templates_for(ConversationStage::Intake)
            .iter()
            .map(|t| combine_response_and_follow_up(&t.text, t.follow_up.as_deref()))
            .collect()
    }

    #[test]
    fn test_sad_on_fresh_context_is_intake() {
        let mut generator = ResponseGenerator::with_selector(Box::new(SeededSelector::new(3)));
        let generation = generator.generate_at("I feel really sad today", &context_with(0), 10);

        assert_eq!(generation.response.stage, ConversationStage::Intake);
        assert!(expected_intake_messages().contains(&generation.response.message));
        assert_eq!(generation.updated_context.stage, ConversationStage::Intake);
        assert_eq!(generation.updated_context.themes, vec!["sad"]);
    }

    #[test]
    fn test_crisis_includes_safety_message() {
        for count in [0, 2, 3, 40] {
            let mut generator = ResponseGenerator::default();
            let generation = generator.generate("I want to kill myself", &context_with(count));

            assert_eq!(generation.response.stage, ConversationStage::Crisis);
            assert!(generation.response.message.contains(CRISIS_SAFETY_MESSAGE));
            assert_eq!(generation.updated_context.stage, ConversationStage::Crisis);
        }
    }

    #[test]
    fn test_why_after_intake_is_psychoeducation() {
        let mut generator = ResponseGenerator::default();
        let generation = generator.generate("why do I feel this way", &context_with(5));
        assert_eq!(generation.response.stage, ConversationStage::Psychoeducation);
    }

    #[test]
    fn test_exchange_count_increments_by_one() {
        let mut generator = ResponseGenerator::with_selector(Box::new(SeededSelector::new(9)));
        let mut context = SessionContext::init_at(0);
        let utterances = [
            "",
            "hello",
            "I want to kill myself",
            "why is this happening",
            "I'm overwhelmed",
        ];

        for (turn, utterance) in utterances.iter().enumerate() {
            let generation = generator.generate_at(utterance, &context, turn as i64 + 1);
            assert_eq!(
                generation.updated_context.exchange_count,
                context.exchange_count + 1
            );
            assert_eq!(generation.updated_context.last_updated, turn as i64 + 1);
            context = generation.updated_context;
        }
        assert_eq!(context.exchange_count, 5);
    }

    #[test]
    fn test_same_seed_same_output() {
        let context = context_with(4);
        let mut first = ResponseGenerator::with_selector(Box::new(SeededSelector::new(42)));
        let mut second = ResponseGenerator::with_selector(Box::new(SeededSelector::new(42)));

        for utterance in ["I'm stressed about work", "how do I cope", "it got better"] {
            assert_eq!(
                first.generate_at(utterance, &context, 77),
                second.generate_at(utterance, &context, 77)
            );
        }
    }

    #[test]
    fn test_fixed_selector_pins_template() {
        let mut generator = ResponseGenerator::with_selector(Box::new(FixedSelector(0)));
        let generation = generator.generate_at("I'm so stressed about work", &context_with(3), 0);

        assert_eq!(generation.response.stage, ConversationStage::Reflective);
        assert_eq!(
            generation.response.message,
            "It sounds like you're feeling stressed, and that makes sense given what you've shared.\n\nWould you like to tell me more about work?"
        );
        assert_eq!(
            generation.response.follow_up_question.as_deref(),
            Some("Would you like to tell me more about work?")
        );
        assert_eq!(generation.updated_context.themes, vec!["stressed", "work"]);
    }

    #[test]
    fn test_no_placeholder_leaks_for_any_template() {
        let context = context_with(10);
        let utterances = ["", "hmm", "I'm angry at my boss and it's hard"];
        for stage in ConversationStage::iter() {
            let count = TemplateStore::default().templates_for(stage).len();
            for index in 0..count {
                let store = TemplateStore::default()
                    .with_templates(
                        ConversationStage::Reflective,
                        TemplateStore::default().templates_for(stage).to_vec(),
                    )
                    .unwrap();
                let mut generator = ResponseGenerator::new(
                    StageRouter::default(),
                    store,
                    Box::new(FixedSelector(index)),
                );
                for utterance in utterances {
                    let generation = generator.generate_at(utterance, &context, 0);
                    assert!(
                        !has_placeholder(&generation.response.message),
                        "{stage}[{index}] leaked: {}",
                        generation.response.message
                    );
                }
            }
        }
    }

    #[test]
    fn test_unsafe_template_is_replaced_by_fallback() {
        let store = TemplateStore::default()
            .with_templates(
                ConversationStage::Reflective,
                vec![StageTemplate::new("You have an anxiety disorder")],
            )
            .unwrap();
        let mut generator =
            ResponseGenerator::new(StageRouter::default(), store, Box::new(FixedSelector(0)));

        let generation = generator.generate_at("nothing special", &context_with(6), 0);

        assert_eq!(generation.response.stage, ConversationStage::Reflective);
        assert_eq!(generation.response.message, SAFE_FALLBACK_MESSAGE);
        assert_eq!(
            generation.response.message,
            "I'm here to listen and support you. Your feelings are valid."
        );
        assert_eq!(generation.response.follow_up_question, None);
        assert_eq!(generation.updated_context.exchange_count, 7);
    }

    #[test]
    fn test_unsafe_follow_up_is_replaced() {
        let store = TemplateStore::default()
            .with_templates(
                ConversationStage::Coping,
                vec![
                    StageTemplate::new("Try a short walk.")
                        .with_follow_up("This will cure your {{emotion}} feelings."),
                ],
            )
            .unwrap();
        let mut generator =
            ResponseGenerator::new(StageRouter::default(), store, Box::new(FixedSelector(0)));

        let generation = generator.generate_at("help me cope, I'm anxious", &context_with(3), 0);
        assert_eq!(generation.response.stage, ConversationStage::Coping);
        assert_eq!(generation.response.message, SAFE_FALLBACK_MESSAGE);
    }

    #[test]
    fn test_unsafe_crisis_template_keeps_safety_message() {
        let store = TemplateStore::default()
            .with_templates(
                ConversationStage::Crisis,
                vec![StageTemplate::new("I guarantee this will get better.")],
            )
            .unwrap();
        let mut generator =
            ResponseGenerator::new(StageRouter::default(), store, Box::new(FixedSelector(0)));

        let generation = generator.generate_at("I want to end it all", &context_with(1), 0);
        assert_eq!(generation.response.stage, ConversationStage::Crisis);
        assert!(generation.response.message.starts_with(SAFE_FALLBACK_MESSAGE));
        assert!(generation.response.message.contains(CRISIS_SAFETY_MESSAGE));
    }

    #[test]
    fn test_blank_utterance_produces_valid_reply() {
        let mut generator = ResponseGenerator::default();
        for (count, expected) in [
            (0, ConversationStage::Intake),
            (5, ConversationStage::Reflective),
        ] {
            let generation = generator.generate(" \n\t ", &context_with(count));
            assert_eq!(generation.response.stage, expected);
            assert!(!generation.response.message.is_empty());
            assert!(generation.updated_context.themes.is_empty());
        }
    }

    #[test]
    fn test_from_config_uses_intake_floor() {
        let mut generator = ResponseGenerator::from_config(
            &EngineConfig { intake_floor: 10 },
            Box::new(FixedSelector(0)),
        );
        let generation = generator.generate_at("why do I feel this way", &context_with(5), 0);
        assert_eq!(generation.response.stage, ConversationStage::Intake);
        assert_eq!(generator.router().intake_floor(), 10);
    }
}
