//! Stage routing.
//!
//! Routing is an ordered rule list evaluated top to bottom, first match wins:
//!
//! 1. crisis phrases (always first, ignores every other signal)
//! 2. the intake floor for the first few exchanges
//! 3. the keyword table, in table order
//! 4. `reflective` when nothing else matched

use super::stage::ConversationStage;
use super::text::NormalizedText;
use crate::config::{DEFAULT_INTAKE_FLOOR, EngineConfig};
use crate::session::SessionContext;
use std::fmt;

/// Self-harm phrases that force the crisis stage.
pub const CRISIS_PHRASES: &[&str] = &[
    "suicide",
    "suicidal",
    "kill myself",
    "killing myself",
    "end it all",
    "end my life",
    "ending my life",
    "take my own life",
    "want to die",
    "wanna die",
    "better off dead",
    "no reason to live",
    "self harm",
    "hurt myself",
    "hurting myself",
    "cut myself",
    "cutting myself",
];

/// One row of the keyword table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRule {
    pub name: &'static str,
    pub stage: ConversationStage,
    pub phrases: &'static [&'static str],
}

impl StageRule {
    /// Returns the first phrase of this rule found in `text`.
    pub fn find(&self, text: &NormalizedText) -> Option<&'static str> {
        text.first_match(self.phrases)
    }

    pub fn matches(&self, text: &NormalizedText) -> bool {
        self.find(text).is_some()
    }
}

/// The keyword table in evaluation order.
pub fn default_rules() -> Vec<StageRule> {
    vec![
        StageRule {
            name: "explanatory",
            stage: ConversationStage::Psychoeducation,
            phrases: &[
                "why",
                "explain",
                "explanation",
                "understand",
                "what is",
                "what's happening",
                "what causes",
                "how does",
                "is it normal",
                "is this normal",
                "learn about",
            ],
        },
        StageRule {
            name: "aspirational",
            stage: ConversationStage::Goals,
            phrases: &[
                "goal",
                "goals",
                "want to",
                "hope to",
                "i'd like to",
                "wish i could",
                "plan",
                "plans",
                "achieve",
                "work on",
            ],
        },
        StageRule {
            name: "coping-request",
            stage: ConversationStage::Coping,
            phrases: &[
                "cope",
                "coping",
                "calm down",
                "relax",
                "deal with",
                "handle",
                "help me",
                "what can i do",
                "strategy",
                "strategies",
                "tips",
            ],
        },
        StageRule {
            name: "dysregulation",
            stage: ConversationStage::Regulation,
            phrases: &[
                "overwhelmed",
                "panic",
                "panicking",
                "can't breathe",
                "breathe",
                "racing",
                "shaking",
                "freaking out",
                "too much",
            ],
        },
        StageRule {
            name: "improvement",
            stage: ConversationStage::Progress,
            phrases: &[
                "better",
                "progress",
                "improved",
                "improving",
                "proud",
                "getting easier",
                "managed to",
            ],
        },
        StageRule {
            name: "professional-help",
            stage: ConversationStage::Referral,
            phrases: &[
                "therapist",
                "therapy",
                "counselor",
                "counsellor",
                "psychiatrist",
                "psychologist",
                "professional",
                "doctor",
                "medication",
            ],
        },
    ]
}

/// Why a stage was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteReason {
    Crisis { phrase: &'static str },
    IntakeFloor { exchange_count: u64, floor: u64 },
    Keyword { rule: &'static str, phrase: &'static str },
    Default,
}

impl fmt::Display for RouteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteReason::Crisis { phrase } => write!(f, "crisis phrase \"{phrase}\""),
            RouteReason::IntakeFloor {
                exchange_count,
                floor,
            } => write!(f, "intake floor ({exchange_count} < {floor})"),
            RouteReason::Keyword { rule, phrase } => {
                write!(f, "keyword rule {rule} (\"{phrase}\")")
            }
            RouteReason::Default => write!(f, "no rule matched"),
        }
    }
}

/// The routing decision for a single turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub stage: ConversationStage,
    pub reason: RouteReason,
}

/// Classifies an utterance plus session history into a conversation stage.
///
/// Routing is deterministic and side-effect free.
#[derive(Debug, Clone)]
pub struct StageRouter {
    intake_floor: u64,
    rules: Vec<StageRule>,
}

impl Default for StageRouter {
    fn default() -> Self {
        Self::new(DEFAULT_INTAKE_FLOOR)
    }
}

impl StageRouter {
    pub fn new(intake_floor: u64) -> Self {
        Self {
            intake_floor,
            rules: default_rules(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.intake_floor)
    }

    /// Replaces the keyword table. Crisis detection and the intake floor
    /// still run ahead of it.
    pub fn with_rules(mut self, rules: Vec<StageRule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn intake_floor(&self) -> u64 {
        self.intake_floor
    }

    pub fn rules(&self) -> &[StageRule] {
        &self.rules
    }

    pub fn is_crisis(&self, utterance: &str) -> bool {
        NormalizedText::new(utterance)
            .first_match(CRISIS_PHRASES)
            .is_some()
    }

    pub fn select_stage(&self, utterance: &str, context: &SessionContext) -> ConversationStage {
        self.route(utterance, context).stage
    }

    /// Same as [`select_stage`](Self::select_stage), also reporting which
    /// rule fired.
    pub fn route(&self, utterance: &str, context: &SessionContext) -> Route {
        let text = NormalizedText::new(utterance);

        if let Some(phrase) = text.first_match(CRISIS_PHRASES) {
            return Route {
                stage: ConversationStage::Crisis,
                reason: RouteReason::Crisis { phrase },
            };
        }

        if context.exchange_count < self.intake_floor {
            return Route {
                stage: ConversationStage::Intake,
                reason: RouteReason::IntakeFloor {
                    exchange_count: context.exchange_count,
                    floor: self.intake_floor,
                },
            };
        }

        for rule in &self.rules {
            if let Some(phrase) = rule.find(&text) {
                return Route {
                    stage: rule.stage,
                    reason: RouteReason::Keyword {
                        rule: rule.name,
                        phrase,
                    },
                };
            }
        }

        Route {
            stage: ConversationStage::Reflective,
            reason: RouteReason::Default,
        }
    }
}
