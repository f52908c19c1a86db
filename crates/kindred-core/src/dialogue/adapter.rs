//! Template adaptation.
//!
//! Templates carry `{{name}}` placeholders. Each placeholder resolves from a
//! small variable map built by keyword extraction over the user utterance;
//! every variable has a default, and unknown names resolve to a generic
//! word, so a rendered template never contains a placeholder.

use super::text::NormalizedText;
use crate::session::SessionContext;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// Default for `{{emotion}}`.
pub const DEFAULT_EMOTION: &str = "this way";
/// Default for `{{difficulty}}`.
pub const DEFAULT_DIFFICULTY: &str = "challenging";
/// Default for `{{topic}}`.
pub const DEFAULT_TOPIC: &str = "what's on your mind";
/// Substitution for placeholder names the adapter does not know.
pub const DEFAULT_UNKNOWN: &str = "this";

/// Surface word → canonical emotion, in lookup order.
const EMOTION_LEXICON: &[(&str, &str)] = &[
    ("happy", "happy"),
    ("glad", "happy"),
    ("joyful", "happy"),
    ("sad", "sad"),
    ("unhappy", "sad"),
    ("upset", "sad"),
    ("depressed", "sad"),
    ("heartbroken", "sad"),
    ("anxious", "anxious"),
    ("anxiety", "anxious"),
    ("nervous", "anxious"),
    ("worried", "anxious"),
    ("on edge", "anxious"),
    ("angry", "angry"),
    ("mad", "angry"),
    ("furious", "angry"),
    ("irritated", "angry"),
    ("annoyed", "angry"),
    ("stressed", "stressed"),
    ("stress", "stressed"),
    ("under pressure", "stressed"),
    ("lonely", "lonely"),
    ("isolated", "lonely"),
    ("hopeful", "hopeful"),
    ("optimistic", "hopeful"),
    ("scared", "scared"),
    ("afraid", "scared"),
    ("frightened", "scared"),
    ("frustrated", "frustrated"),
    ("tired", "tired"),
    ("exhausted", "tired"),
    ("drained", "tired"),
    ("overwhelmed", "overwhelmed"),
    ("calm", "calm"),
    ("peaceful", "calm"),
    ("excited", "excited"),
];

/// Words that describe how hard something is; used verbatim.
const DIFFICULTY_WORDS: &[&str] = &[
    "overwhelming",
    "difficult",
    "hard",
    "tough",
    "painful",
    "exhausting",
    "heavy",
    "scary",
    "confusing",
];

/// Surface word → canonical topic, in lookup order.
const TOPIC_LEXICON: &[(&str, &str)] = &[
    ("work", "work"),
    ("job", "work"),
    ("boss", "work"),
    ("coworkers", "work"),
    ("school", "school"),
    ("exam", "school"),
    ("exams", "school"),
    ("class", "school"),
    ("college", "school"),
    ("university", "school"),
    ("homework", "school"),
    ("family", "family"),
    ("parents", "family"),
    ("mom", "family"),
    ("dad", "family"),
    ("mother", "family"),
    ("father", "family"),
    ("sister", "family"),
    ("brother", "family"),
    ("relationship", "relationships"),
    ("partner", "relationships"),
    ("boyfriend", "relationships"),
    ("girlfriend", "relationships"),
    ("husband", "relationships"),
    ("wife", "relationships"),
    ("breakup", "relationships"),
    ("friend", "friendships"),
    ("friends", "friendships"),
    ("sleep", "sleep"),
    ("sleeping", "sleep"),
    ("insomnia", "sleep"),
    ("money", "money"),
    ("bills", "money"),
    ("debt", "money"),
    ("rent", "money"),
    ("health", "health"),
    ("sick", "health"),
    ("illness", "health"),
];

fn canonical_matches(text: &NormalizedText, lexicon: &[(&str, &'static str)]) -> Vec<&'static str> {
    let mut found: Vec<&'static str> = Vec::new();
    for (surface, canonical) in lexicon {
        if !found.contains(canonical) && text.contains_phrase(surface) {
            found.push(canonical);
        }
    }
    found
}

/// Canonical emotions mentioned in `utterance`, in lexicon order.
pub fn detect_emotions(utterance: &str) -> Vec<&'static str> {
    canonical_matches(&NormalizedText::new(utterance), EMOTION_LEXICON)
}

/// Canonical topics mentioned in `utterance`, in lexicon order.
pub fn detect_topics(utterance: &str) -> Vec<&'static str> {
    canonical_matches(&NormalizedText::new(utterance), TOPIC_LEXICON)
}

/// Theme tags for the session log: emotions first, then topics.
pub fn detect_themes(utterance: &str) -> Vec<String> {
    let text = NormalizedText::new(utterance);
    canonical_matches(&text, EMOTION_LEXICON)
        .into_iter()
        .chain(canonical_matches(&text, TOPIC_LEXICON))
        .map(str::to_string)
        .collect()
}

/// Values extracted from an utterance for template placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVariables {
    pub emotion: Option<&'static str>,
    pub difficulty: Option<&'static str>,
    pub topic: Option<&'static str>,
}

impl TemplateVariables {
    pub fn extract(utterance: &str) -> Self {
        let text = NormalizedText::new(utterance);
        Self {
            emotion: canonical_matches(&text, EMOTION_LEXICON).first().copied(),
            difficulty: text.first_match(DIFFICULTY_WORDS),
            topic: canonical_matches(&text, TOPIC_LEXICON).first().copied(),
        }
    }

    /// Value for a placeholder name; never fails.
    pub fn resolve(&self, name: &str) -> &'static str {
        match name {
            "emotion" => self.emotion.unwrap_or(DEFAULT_EMOTION),
            "difficulty" => self.difficulty.unwrap_or(DEFAULT_DIFFICULTY),
            "topic" => self.topic.unwrap_or(DEFAULT_TOPIC),
            _ => {
                tracing::warn!(placeholder = name, "unknown template placeholder");
                DEFAULT_UNKNOWN
            }
        }
    }

    /// Substitutes every placeholder of `template` in one pass.
    pub fn render<'t>(&self, template: &'t str) -> Cow<'t, str> {
        PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
            let name = caps.get(1).map_or("", |m| m.as_str());
            self.resolve(name)
        })
    }
}

/// Renders `template` against values extracted from `utterance`.
///
/// Values come from the current utterance only; earlier themes in `context`
/// are not reused, so a reply never names a feeling the user did not just
/// mention.
pub fn adapt_template(template: &str, utterance: &str, _context: &SessionContext) -> String {
    TemplateVariables::extract(utterance)
        .render(template)
        .into_owned()
}

/// Appends the follow-up question after a paragraph break.
pub fn combine_response_and_follow_up(message: &str, follow_up: Option<&str>) -> String {
    match follow_up {
        Some(question) if !question.trim().is_empty() => format!("{message}\n\n{question}"),
        _ => message.to_string(),
    }
}

/// True when `text` still carries a `{{...}}` placeholder.
pub fn has_placeholder(text: &str) -> bool {
    PLACEHOLDER.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapt_fills_detected_values() {
        let adapted = adapt_template(
            "You seem {{emotion}} about {{topic}}, and it sounds {{difficulty}}.",
            "Work has been so hard and I'm really stressed",
            &SessionContext::init_at(0),
        );
        assert_eq!(adapted, "You seem stressed about work, and it sounds hard.");
    }

    #[test]
    fn test_adapt_uses_defaults() {
        let adapted = adapt_template(
            "Feeling {{emotion}} about {{topic}} is {{difficulty}}.",
            "hello there",
            &SessionContext::init_at(0),
        );
        assert_eq!(
            adapted,
            "Feeling this way about what's on your mind is challenging."
        );
    }

    #[test]
    fn test_adapt_ignores_earlier_themes() {
        let mut context = SessionContext::init_at(0);
        context.themes = vec!["angry".to_string(), "family".to_string()];
        context.exchange_count = 6;

        let adapted = adapt_template("Feeling {{emotion}} about {{topic}}.", "hello", &context);
        assert_eq!(adapted, "Feeling this way about what's on your mind.");
    }

    #[test]
    fn test_unknown_and_spaced_placeholders_resolve() {
        let adapted = adapt_template(
            "A {{ emotion }} {{mystery}} {{}} day",
            "I'm so happy",
            &SessionContext::init_at(0),
        );
        assert_eq!(adapted, "A happy this this day");
        assert!(!has_placeholder(&adapted));
    }

    #[test]
    fn test_single_pass_does_not_rescan_values() {
        let vars = TemplateVariables::default();
        assert_eq!(vars.render("{{topic}}"), DEFAULT_TOPIC);
    }

    #[test]
    fn test_no_placeholders_is_borrowed() {
        let vars = TemplateVariables::extract("anything");
        assert!(matches!(vars.render("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_synonyms_map_to_canonical_emotion() {
        assert_eq!(detect_emotions("my anxiety is bad, I'm nervous"), vec!["anxious"]);
        assert_eq!(detect_emotions("upset and exhausted"), vec!["sad", "tired"]);
        assert!(detect_emotions("nothing to report").is_empty());
    }

    #[test]
    fn test_detect_topics_dedupes_synonyms() {
        assert_eq!(detect_topics("my job, my work, all of it"), vec!["work"]);
        assert_eq!(
            detect_topics("the rent is due and I feel sick"),
            vec!["money", "health"]
        );
        assert!(detect_topics("I feel sad").is_empty());
    }

    #[test]
    fn test_detect_themes_emotions_then_topics() {
        let themes = detect_themes("I'm lonely since the breakup and my job is a mess");
        assert_eq!(themes, vec!["lonely", "work", "relationships"]);
    }

    #[test]
    fn test_combine_response_and_follow_up() {
        assert_eq!(
            combine_response_and_follow_up("Hello.", Some("How are you?")),
            "Hello.\n\nHow are you?"
        );
        assert_eq!(combine_response_and_follow_up("Hello.", None), "Hello.");
        assert_eq!(combine_response_and_follow_up("Hello.", Some("  ")), "Hello.");
    }
}
