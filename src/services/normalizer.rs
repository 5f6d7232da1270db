//! Answer normalization for forgiving comparisons.
//!
//! The pipeline runs in a fixed order, each step relying on the previous:
//!
//! 1. NFKD decomposition, dropping combining marks (`é` → `e`)
//! 2. Lowercasing
//! 3. Apostrophes removed, any other run of punctuation or symbols → one space
//! 4. Whitespace runs collapsed to one space, ends trimmed
//! 5. Whole-token number words replaced by digits (`eleven` → `11`)
//!
//! Two answers match iff their normalized forms are equal.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Spelled-out cardinals recognised by [`AnswerNormalizer`], with their digits.
pub const NUMBER_WORDS: &[(&str, &str)] = &[
    ("zero", "0"),
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
    ("ten", "10"),
    ("eleven", "11"),
    ("twelve", "12"),
    ("thirteen", "13"),
    ("fourteen", "14"),
    ("fifteen", "15"),
    ("sixteen", "16"),
    ("seventeen", "17"),
    ("eighteen", "18"),
    ("nineteen", "19"),
    ("twenty", "20"),
    ("thirty", "30"),
    ("forty", "40"),
    ("fifty", "50"),
    ("sixty", "60"),
    ("seventy", "70"),
    ("eighty", "80"),
    ("ninety", "90"),
    ("hundred", "100"),
    ("thousand", "1000"),
];

static DEFAULT: LazyLock<AnswerNormalizer> = LazyLock::new(AnswerNormalizer::new);

/// Normalize with the shared default [`AnswerNormalizer`].
pub fn normalize(raw: &str) -> String {
    DEFAULT.normalize(raw)
}

/// True iff both answers normalize to the same string.
pub fn answers_match(expected: &str, submitted: &str) -> bool {
    DEFAULT.matches(expected, submitted)
}

/// Canonicalizes free-text answers.
///
/// Patterns are compiled once at construction; [`normalize`] uses a shared
/// instance so callers rarely need their own.
pub struct AnswerNormalizer {
    /// Apostrophe-like marks, deleted so "don't" equals "dont"
    apostrophe_pattern: Regex,

    /// Runs of anything that is not a letter, number or whitespace
    punctuation_pattern: Regex,

    whitespace_pattern: Regex,
}

impl AnswerNormalizer {
    pub fn new() -> Self {
        Self {
            apostrophe_pattern: Regex::new(r"['`‘’ʼ]").expect("Invalid apostrophe regex"),
            punctuation_pattern: Regex::new(r"[^\p{L}\p{N}\s]+")
                .expect("Invalid punctuation regex"),
            whitespace_pattern: Regex::new(r"\s+").expect("Invalid whitespace regex"),
        }
    }

    /// Run the full pipeline. Total: every input yields some output.
    pub fn normalize(&self, raw: &str) -> String {
        let folded: String = raw.nfkd().filter(|c| !is_combining_mark(*c)).collect();
        let lowered = folded.to_lowercase();

        let without_apostrophes = self.apostrophe_pattern.replace_all(&lowered, "");
        let spaced = self
            .punctuation_pattern
            .replace_all(&without_apostrophes, " ");
        let collapsed = self.whitespace_pattern.replace_all(&spaced, " ");

        collapsed
            .trim()
            .split(' ')
            .filter(|token| !token.is_empty())
            .map(|token| number_word_digits(token).unwrap_or(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn matches(&self, expected: &str, submitted: &str) -> bool {
        self.normalize(expected) == self.normalize(submitted)
    }
}

impl Default for AnswerNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn number_word_digits(token: &str) -> Option<&'static str> {
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, digits)| *digits)
}
