//! Word-boundary phrase matching over user utterances.

/// An utterance folded into a form suitable for phrase lookup.
///
/// Lower-cased, typographic apostrophes folded to `'`, every character other
/// than alphanumerics and apostrophes turned into a single space, and padded
/// with a space on both ends so phrases match on whole words only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn new(utterance: &str) -> Self {
        let mut folded = String::with_capacity(utterance.len() + 2);
        folded.push(' ');
        let mut last_was_space = true;

        for ch in utterance.chars().flat_map(char::to_lowercase) {
            let ch = match ch {
                '\u{2018}' | '\u{2019}' | '`' => '\'',
                other => other,
            };
            if ch.is_alphanumeric() || ch == '\'' {
                folded.push(ch);
                last_was_space = false;
            } else if !last_was_space {
                folded.push(' ');
                last_was_space = true;
            }
        }

        if !last_was_space {
            folded.push(' ');
        }
        Self(folded)
    }

    /// True when `phrase` (lower-case words separated by single spaces)
    /// occurs as whole words.
    pub fn contains_phrase(&self, phrase: &str) -> bool {
        let mut needle = String::with_capacity(phrase.len() + 2);
        needle.push(' ');
        needle.push_str(phrase);
        needle.push(' ');
        self.0.contains(&needle)
    }

    /// Returns the first phrase of `phrases` present in the text.
    pub fn first_match<'a>(&self, phrases: &[&'a str]) -> Option<&'a str> {
        phrases.iter().copied().find(|p| self.contains_phrase(p))
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        self.0.trim()
    }
}
