//! Output constraints.
//!
//! Every reply passes through a constraint set before it reaches the user.
//! Any violation rejects the reply; the generator then substitutes the fixed
//! fallback message instead of surfacing an error.

use super::stage::ConversationStage;
use super::templates::CRISIS_SAFETY_MESSAGE;
use once_cell::sync::Lazy;
use regex::Regex;

/// A possession phrase aimed at the user followed by a clinical label.
static DIAGNOSIS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:you\s+have|you\s+have\s+got|you['’]ve\s+got|you['’]ve\s+developed|you\s+have\s+developed|you\s+suffer\s+from|you['’]re\s+suffering\s+from|you\s+are\s+suffering\s+from|you['’]re\s+showing\s+signs\s+of|you\s+are\s+showing\s+signs\s+of|your\s+diagnosis\s+is|i\s+diagnose\s+you\s+with)\b[^.!?\n]{0,40}?\b(?:disorder|depression|ptsd|adhd|bipolar|schizophrenia|schizophrenic|ocd|psychosis|borderline|anorexia|bulimia)\b",
    )
    .expect("diagnosis pattern is valid")
});

/// Cure wording, guaranteed outcomes, permanent fixes.
static CURE_CLAIM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:cure|cures|cured|curing)\b|\bguarantee[sd]?\b[^.!?\n]{0,40}?\b(?:fix|fixes|better|recover|recovery|heal|well|work|go\s+away)\b|\b(?:fix|fixes|solve|solves|eliminate|eliminates)\b[^.!?\n]{0,40}?\b(?:for\s+good|forever|permanently|completely|once\s+and\s+for\s+all)\b|\bnever\s+(?:feel|be)\s+(?:sad|anxious|depressed|stressed)\s+again\b",
    )
    .expect("cure-claim pattern is valid")
});

/// A single output rule.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Reject text asserting a clinical diagnosis.
    NoDiagnosis,
    /// Reject text claiming a cure or a guaranteed fix.
    NoCureClaim,
    /// Require the crisis safety message.
    RequiresSafetyMessage,
    /// Reject text matching a caller-supplied pattern.
    Forbidden { name: String, pattern: Regex },
}

impl Constraint {
    pub fn name(&self) -> &str {
        match self {
            Constraint::NoDiagnosis => "no-diagnosis",
            Constraint::NoCureClaim => "no-cure-claim",
            Constraint::RequiresSafetyMessage => "requires-safety-message",
            Constraint::Forbidden { name, .. } => name,
        }
    }

    pub fn is_satisfied_by(&self, text: &str) -> bool {
        match self {
            Constraint::NoDiagnosis => !DIAGNOSIS.is_match(text),
            Constraint::NoCureClaim => !CURE_CLAIM.is_match(text),
            Constraint::RequiresSafetyMessage => text.contains(CRISIS_SAFETY_MESSAGE),
            Constraint::Forbidden { pattern, .. } => !pattern.is_match(text),
        }
    }
}

/// An ordered list of constraints.
#[derive(Debug, Clone)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl ConstraintSet {
    /// Rules applied to every stage.
    pub fn standard() -> Self {
        Self {
            constraints: vec![Constraint::NoDiagnosis, Constraint::NoCureClaim],
        }
    }

    /// The standard rules plus the safety-message requirement.
    pub fn crisis() -> Self {
        let mut set = Self::standard();
        set.push(Constraint::RequiresSafetyMessage);
        set
    }

    pub fn for_stage(stage: ConversationStage) -> Self {
        if stage.is_crisis() {
            Self::crisis()
        } else {
            Self::standard()
        }
    }

    pub fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn with(mut self, constraint: Constraint) -> Self {
        self.push(constraint);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

/// Every constraint of `constraints` that `text` violates, in set order.
pub fn violations<'c>(text: &str, constraints: &'c ConstraintSet) -> Vec<&'c Constraint> {
    constraints
        .iter()
        .filter(|constraint| !constraint.is_satisfied_by(text))
        .collect()
}

/// True when `text` satisfies every constraint.
pub fn validate(text: &str, constraints: &ConstraintSet) -> bool {
    constraints.iter().all(|constraint| constraint.is_satisfied_by(text))
}
