//! Data models for the trivia service.
//!
//! - [`Question`]: one parsed `QUESTION | ANSWER` line with its stable id
//! - [`QuestionPayload`]: the answer-free view handed to clients
//! - [`CorpusSnapshot`]: the whole corpus as parsed at one modification time
//! - [`QuizConfig`]: settings loaded by [`ConfigManager`](crate::config::ConfigManager)

pub mod config;
pub mod question;

pub use config::{LoggingConfig, QuizConfig};
pub use question::{CorpusSnapshot, MAX_WORDS, Question, QuestionPayload};
