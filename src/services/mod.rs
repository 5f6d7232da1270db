//! Services module - the question store and validation engine.
//!
//! Everything here is framework-agnostic: request handlers, console frontends
//! and tests all drive the same types.
//!
//! # Components
//!
//! - [`identifier`]: stable SHA-256 ids derived from question text
//! - [`CorpusLoader`]: parses the `QUESTION | ANSWER` file, skipping malformed
//!   lines, and re-reads only when the file's modification time changes
//! - [`AnswerNormalizer`]: accent, case, punctuation, whitespace and
//!   number-word folding for forgiving answer comparison
//! - [`QuestionStore`]: owns the cached corpus; next-unseen selection and
//!   lookup by id
//! - [`ValidationService`]: side-effect-free answer checking
//! - [`QuizService`]: the boundary used by frontends, adding session
//!   tracking, metrics and events
//!
//! # Usage Example
//!
//! ```ignore
//! use trivia::services::{NextQuestion, QuizService};
//!
//! let quiz = QuizService::open("questions.txt")?;
//!
//! if let NextQuestion::Question(question) = quiz.get_next_question()? {
//!     let verdict = quiz.submit_answer(&question.id, "Paris")?;
//!     println!("{:?}", verdict);
//! }
//! ```

pub mod corpus;
pub mod identifier;
pub mod normalizer;
pub mod quiz;
pub mod store;
pub mod validation;

pub use corpus::{CorpusLoader, CorpusSource, FileCorpusSource};
pub use identifier::identifier_for;
pub use normalizer::{AnswerNormalizer, normalize};
pub use quiz::{QuizEvent, QuizService};
pub use store::{NextQuestion, QuestionStore};
pub use validation::{ValidationService, Verdict};
