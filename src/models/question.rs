use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::services::identifier::identifier_for;

/// Maximum number of words exposed to clients for a question.
pub const MAX_WORDS: usize = 10;

/// A single question/answer pair from the corpus.
///
/// Immutable once parsed. The `answer` is kept exactly as written (trimmed);
/// normalization only happens when an answer is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub answer: String,
    pub words: Vec<String>,
}

impl Question {
    /// Build a question from already-trimmed text and answer.
    pub fn new(text: impl Into<String>, answer: impl Into<String>) -> Self {
        let text = text.into();
        let words = text
            .split_whitespace()
            .take(MAX_WORDS)
            .map(str::to_string)
            .collect();

        Self {
            id: identifier_for(&text),
            text,
            answer: answer.into(),
            words,
        }
    }

    /// The client-facing view of this question, without the answer.
    pub fn payload(&self) -> QuestionPayload {
        QuestionPayload {
            id: self.id.clone(),
            question: self.text.clone(),
            words: self.words.clone(),
        }
    }
}

/// What a client is shown for a question. Never carries the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPayload {
    pub id: String,
    pub question: String,
    pub words: Vec<String>,
}

/// The parsed corpus at one point in time.
///
/// Questions are keyed by id and kept in file order. A snapshot is replaced
/// wholesale on reload and never edited in place.
#[derive(Debug, Clone)]
pub struct CorpusSnapshot {
    questions: IndexMap<String, Question>,
    modified: SystemTime,
}

impl CorpusSnapshot {
    pub fn new(questions: IndexMap<String, Question>, modified: SystemTime) -> Self {
        Self {
            questions,
            modified,
        }
    }

    /// Modification time of the source when this snapshot was parsed.
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.get(id)
    }

    /// Questions in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.values()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.questions.keys().map(String::as_str).collect()
    }
}
