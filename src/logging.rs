use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::fs;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::models::LoggingConfig;

/// Setup logging with a rotating file appender and optional console output.
///
/// Logs are written to `log_dir` with daily rotation. `RUST_LOG` takes
/// precedence over `debug_mode` when it is set.
///
/// # Returns
/// A guard that must be held for the duration of the program to keep logging active
pub fn setup_logging(config: &LoggingConfig) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_path = Utf8PathBuf::from(&config.log_dir);
    if !log_path.exists() {
        fs::create_dir_all(&log_path)
            .with_context(|| format!("Failed to create log directory: {}", config.log_dir))?;
    }

    let file_appender = rolling::daily(&config.log_dir, &config.log_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(config.debug_mode)));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI codes in log files
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    // A None layer is a no-op, so one registry covers both cases
    let console_layer = config.console_output.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(
        "Logging initialized: dir={}, prefix={}, debug={}, console={}",
        config.log_dir,
        config.log_prefix,
        config.debug_mode,
        config.console_output
    );

    Ok(guard)
}

fn default_level(debug_mode: bool) -> &'static str {
    if debug_mode { "debug" } else { "info" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(true), "debug");
        assert_eq!(default_level(false), "info");
    }

    #[test]
    #[allow(unused_variables)]
    fn test_setup_logging_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs");
        let config = LoggingConfig {
            log_dir: log_dir.to_str().unwrap().to_string(),
            log_prefix: "test".to_string(),
            debug_mode: false,
            console_output: false,
        };

        // Installing the global subscriber can fail if another test got there
        // first, but the directory is created before that.
        let result = setup_logging(&config);

        assert!(log_dir.exists());
    }
}
