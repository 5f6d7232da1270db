//! Trivia - console quiz
//!
//! Main entry point for the console frontend.
//!
//! # Overview
//!
//! This binary is a thin collaborator over the library. It initializes:
//! - Configuration ([`ConfigManager`], `trivia.yaml` + `TRIVIA_*` variables)
//! - Logging infrastructure (file rotation + console output)
//! - Tokio runtime (event listener task)
//! - The [`QuizService`] over the configured corpus
//!
//! # Execution Flow
//!
//! 1. Load `trivia.yaml` from the working directory (defaults if absent)
//! 2. Initialize logging → logs/trivia.<date>
//! 3. Create tokio runtime and spawn a task that logs [`QuizEvent`]s
//! 4. Open the corpus; a missing corpus aborts with an error
//! 5. Ask questions on stdin until the user quits or input ends
//! 6. Log metrics and shut the runtime down with a 5s timeout
//!
//! # Commands
//!
//! Any other line is taken as an answer.
//! - `:skip` marks the current question served without answering it
//! - `:reset` starts a new session
//! - `:reload` re-reads the corpus
//! - `:quit` exits

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use tokio::sync::broadcast::error::RecvError;
use trivia::services::NextQuestion;
use trivia::{APP_NAME, ConfigManager, QuizEvent, QuizService, VERSION, Verdict};

fn main() -> Result<()> {
    let config_manager = ConfigManager::new(".")?;
    let config = config_manager.load_config()?;

    let _guard = trivia::logging::setup_logging(&config.logging)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    // Config was read before the subscriber existed, so report it now
    if config_manager.config_file_exists() {
        tracing::info!("Configuration loaded from {}", config_manager.config_path());
    } else {
        tracing::warn!(
            "Config file not found at {}, using defaults",
            config_manager.config_path()
        );
    }
    tracing::debug!("Effective configuration: {:?}", config);

    let worker_threads = config.worker_threads.max(1);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(worker_threads)
        .thread_name("trivia-worker")
        .build()?;

    tracing::info!("Tokio runtime initialized with {} worker threads", worker_threads);

    let corpus_path = config_manager.corpus_path(&config);
    let quiz = QuizService::open(&corpus_path)
        .with_context(|| format!("Failed to open question corpus: {}", corpus_path))?;

    let mut events = quiz.subscribe();
    runtime.spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!("Event listener lagged, {} events dropped", missed);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let result = run_console(&quiz);

    tracing::info!("Console closed, shutting down");
    quiz.log_summary();
    // Dropping the service closes the event channel and ends the listener task
    drop(quiz);

    runtime.shutdown_timeout(std::time::Duration::from_secs(5));

    tracing::info!("Shutdown complete");
    result
}

fn log_event(event: &QuizEvent) {
    match event {
        QuizEvent::CorpusReloaded { questions } => {
            tracing::info!("Corpus reloaded with {} questions", questions);
        }
        QuizEvent::QuestionsExhausted => tracing::info!("All questions served"),
        other => tracing::debug!("Quiz event: {:?}", other),
    }
}

#[derive(Debug, PartialEq)]
enum Command<'a> {
    Quit,
    Skip,
    Reset,
    Reload,
    Answer(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    match line.trim() {
        ":quit" | ":q" => Command::Quit,
        ":skip" => Command::Skip,
        ":reset" => Command::Reset,
        ":reload" => Command::Reload,
        answer => Command::Answer(answer),
    }
}

fn run_console(quiz: &QuizService) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    println!(
        "{} v{} - {} questions loaded. Type :quit to exit.",
        APP_NAME,
        VERSION,
        quiz.question_count()?
    );

    loop {
        let current = quiz.get_next_question()?;
        match &current {
            NextQuestion::Question(question) => println!("\n{}", question.question),
            NextQuestion::Exhausted => {
                println!("\nNo more questions. Type :reset to play again or :quit to exit.")
            }
        }
        print!("> ");
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        match parse_command(&line) {
            Command::Quit => break,
            Command::Reset => {
                quiz.reset_session();
                println!("Session reset.");
            }
            Command::Reload => {
                let count = quiz.force_reload()?;
                println!("Reloaded {} questions.", count);
            }
            Command::Skip => {
                if let NextQuestion::Question(question) = &current {
                    quiz.mark_served(&question.id);
                }
            }
            Command::Answer(answer) => {
                let NextQuestion::Question(question) = &current else {
                    println!("Nothing to answer.");
                    continue;
                };
                match quiz.submit_answer(&question.id, answer) {
                    Ok(Verdict::Correct) => println!("Correct!"),
                    Ok(Verdict::Incorrect) => println!("Not quite, try again."),
                    Err(e) if e.is_client_error() => {
                        println!("That question changed on disk, moving on.");
                        tracing::warn!("Answer for stale question: {}", e);
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command(":quit"), Command::Quit);
        assert_eq!(parse_command("  :q "), Command::Quit);
        assert_eq!(parse_command(":skip"), Command::Skip);
        assert_eq!(parse_command(":reset"), Command::Reset);
        assert_eq!(parse_command(":reload"), Command::Reload);
        assert_eq!(parse_command("  Paris "), Command::Answer("Paris"));
    }
}
