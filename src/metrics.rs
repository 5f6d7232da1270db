// Session metrics module
//
// Lightweight counters for what the quiz has served and judged

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Quiz activity counters.
///
/// Uses atomic operations so every worker can record without taking a lock.
/// Counters are process-lifetime totals; a session reset does not clear them.
#[derive(Debug)]
pub struct Metrics {
    /// Next-question requests that returned a question, repeats included
    pub question_requests: AtomicU64,

    /// Questions newly marked served; re-asking an unanswered one doesn't count
    pub questions_served: AtomicU64,

    /// Next-question requests that found nothing left
    pub exhausted_requests: AtomicU64,

    pub answers_correct: AtomicU64,

    pub answers_incorrect: AtomicU64,

    /// Validations against an id missing from the corpus
    pub unknown_ids: AtomicU64,

    pub session_resets: AtomicU64,

    /// Corpus re-parses after the initial load, forced or mtime-driven
    pub corpus_reloads: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            question_requests: AtomicU64::new(0),
            questions_served: AtomicU64::new(0),
            exhausted_requests: AtomicU64::new(0),
            answers_correct: AtomicU64::new(0),
            answers_incorrect: AtomicU64::new(0),
            unknown_ids: AtomicU64::new(0),
            session_resets: AtomicU64::new(0),
            corpus_reloads: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_question_request(&self) {
        self.question_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_question_served(&self) {
        self.questions_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_exhausted(&self) {
        self.exhausted_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of one validation
    pub fn record_answer(&self, correct: bool) {
        if correct {
            self.answers_correct.fetch_add(1, Ordering::Relaxed);
        } else {
            self.answers_incorrect.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_unknown_id(&self) {
        self.unknown_ids.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_reset(&self) {
        self.session_resets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_corpus_reload(&self) {
        self.corpus_reloads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Share of validated answers that were correct, 0.0 when none were checked
    pub fn accuracy(&self) -> f64 {
        let correct = self.answers_correct.load(Ordering::Relaxed);
        let total = correct + self.answers_incorrect.load(Ordering::Relaxed);
        if total > 0 {
            correct as f64 / total as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Quiz Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Questions: {} served, {} requests, {} exhausted requests",
            self.questions_served.load(Ordering::Relaxed),
            self.question_requests.load(Ordering::Relaxed),
            self.exhausted_requests.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Answers: {} correct, {} incorrect ({:.1}% accuracy), {} unknown ids",
            self.answers_correct.load(Ordering::Relaxed),
            self.answers_incorrect.load(Ordering::Relaxed),
            self.accuracy() * 100.0,
            self.unknown_ids.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Session resets: {}, corpus reloads: {}",
            self.session_resets.load(Ordering::Relaxed),
            self.corpus_reloads.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
