use serde::{Deserialize, Serialize};

/// Service configuration from trivia.yaml (and `TRIVIA_*` environment overrides).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Path of the `QUESTION | ANSWER` corpus. Relative paths are resolved
    /// against the configuration directory.
    pub corpus_path: String,

    /// Number of tokio worker threads used by the console frontend.
    pub worker_threads: usize,

    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub log_prefix: String,
    pub debug_mode: bool,
    pub console_output: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            corpus_path: "questions.txt".to_string(),
            worker_threads: 4,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            log_prefix: "trivia".to_string(),
            debug_mode: false,
            console_output: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_config_defaults() {
        let config = QuizConfig::default();
        assert_eq!(config.corpus_path, "questions.txt");
        assert_eq!(config.worker_threads, 4);
        assert_eq!(config.logging.log_prefix, "trivia");
        assert!(!config.logging.debug_mode);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: QuizConfig = serde_yaml_ng::from_str("corpus_path: trivia.txt\n").unwrap();
        assert_eq!(config.corpus_path, "trivia.txt");
        assert_eq!(config.worker_threads, 4);
        assert_eq!(config.logging, LoggingConfig::default());
    }
}
