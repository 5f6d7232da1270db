// Trivia - question store and answer validation engine
//
// This is the library crate containing the core logic and data structures.
// The binary crate (main.rs) provides a console quiz on top of it.

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use error::QuizError;
pub use models::{CorpusSnapshot, Question, QuestionPayload, QuizConfig};
pub use services::{NextQuestion, QuestionStore, QuizEvent, QuizService, Verdict};
pub use state::UsedTracker;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
