use thiserror::Error;

/// Errors surfaced by the question store and validation engine.
///
/// Running out of questions is not an error; it is reported through [`NextQuestion::Exhausted`](crate::services::NextQuestion).
#[derive(Error, Debug)]
pub enum QuizError {
    /// The corpus file is missing, unreadable, or not valid UTF-8.
    #[error("Question corpus unavailable at {path}: {source}")]
    CorpusUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The identifier does not name a question in the current corpus.
    #[error("Question {0} not found")]
    NotFound(String),
}

impl QuizError {
    pub(crate) fn corpus_unavailable(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::CorpusUnavailable {
            path: path.into(),
            source,
        }
    }

    /// True for errors a client can fix by asking again (stale or unknown id).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T, E = QuizError> = std::result::Result<T, E>;
