use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::services::normalizer::AnswerNormalizer;
use crate::services::store::QuestionStore;

/// Whether a submitted answer matched the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

impl From<bool> for Verdict {
    fn from(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Incorrect }
    }
}

/// Checks submitted answers against the corpus.
///
/// Validation has no side effects: marking a question served after a correct
/// answer is the caller's job (see [`QuizService::submit_answer`](crate::services::QuizService::submit_answer)).
pub struct ValidationService {
    store: Arc<QuestionStore>,
    normalizer: AnswerNormalizer,
}

impl ValidationService {
    pub fn new(store: Arc<QuestionStore>) -> Self {
        Self {
            store,
            normalizer: AnswerNormalizer::new(),
        }
    }

    /// Compare `submitted` with the answer stored for `id`.
    ///
    /// # Errors
    /// [`QuizError::NotFound`](crate::QuizError::NotFound) if `id` is not in the
    /// current corpus.
    pub fn validate(&self, id: &str, submitted: &str) -> Result<Verdict> {
        let question = self.store.lookup(id)?;
        let verdict = Verdict::from(self.normalizer.matches(&question.answer, submitted));

        tracing::debug!("Answer for {} judged {:?}", id, verdict);
        Ok(verdict)
    }
}
