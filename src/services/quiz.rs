use camino::Utf8Path;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::error::{QuizError, Result};
use crate::metrics::Metrics;
use crate::models::QuestionPayload;
use crate::services::store::{NextQuestion, QuestionStore};
use crate::services::validation::{ValidationService, Verdict};
use crate::state::UsedTracker;

/// Events emitted as the quiz progresses
///
/// Subscribers (loggers, frontends) get notified without polling the service.
#[derive(Clone, Debug, PartialEq)]
pub enum QuizEvent {
    /// A question was handed to a client
    QuestionServed { id: String },

    /// A next-question request found every question already served
    QuestionsExhausted,

    /// An answer was judged
    AnswerChecked { id: String, correct: bool },

    /// A question entered the served set
    QuestionMarkedServed { id: String },

    /// The served set was cleared
    SessionReset { cleared: usize },

    /// The corpus was re-parsed, either on a detected change or on request
    CorpusReloaded { questions: usize },
}

/// The entry point used by request handlers and frontends.
///
/// Composes the [`QuestionStore`], [`ValidationService`] and [`UsedTracker`]
/// into the three boundary operations: next question, validate answer, reset
/// session. It also keeps [`Metrics`] and broadcasts [`QuizEvent`]s.
///
/// # Usage
///
/// - [`get_next_question()`](Self::get_next_question) for the next unseen question
/// - [`submit_answer()`](Self::submit_answer) to validate and, when correct, mark served
/// - [`validate_answer()`](Self::validate_answer) to judge without marking
/// - [`reset_session()`](Self::reset_session) to allow every question again
/// - [`subscribe()`](Self::subscribe) to listen for events
pub struct QuizService {
    store: Arc<QuestionStore>,
    validator: ValidationService,
    used: Arc<UsedTracker>,
    metrics: Metrics,

    /// Broadcast channel for quiz events; sending with no listener is fine
    events: broadcast::Sender<QuizEvent>,
}

impl QuizService {
    /// Build a service over an existing store and tracker.
    pub fn new(store: Arc<QuestionStore>, used: Arc<UsedTracker>) -> Self {
        let (events, _) = broadcast::channel(100);
        Self {
            validator: ValidationService::new(Arc::clone(&store)),
            store,
            used,
            metrics: Metrics::new(),
            events,
        }
    }

    /// Open the corpus at `path` with a fresh session.
    ///
    /// # Errors
    /// [`QuizError::CorpusUnavailable`] if the corpus cannot be read.
    pub fn open<P: AsRef<Utf8Path>>(path: P) -> Result<Self> {
        let store = Arc::new(QuestionStore::from_path(path)?);
        Ok(Self::new(store, Arc::new(UsedTracker::new())))
    }

    /// Next question not yet served this session, without its answer.
    ///
    /// Does not mark the question served; the same question is returned until
    /// it is answered correctly or explicitly marked.
    pub fn get_next_question(&self) -> Result<NextQuestion<QuestionPayload>> {
        let next = self.watch_reloads(|| self.store.get_next(&self.used))?;

        match &next {
            NextQuestion::Question(question) => {
                self.metrics.record_question_request();
                self.emit(QuizEvent::QuestionServed {
                    id: question.id.clone(),
                });
            }
            NextQuestion::Exhausted => {
                self.metrics.record_exhausted();
                self.emit(QuizEvent::QuestionsExhausted);
            }
        }

        Ok(next.map(|question| question.payload()))
    }

    /// Judge an answer without touching the session.
    ///
    /// # Errors
    /// [`QuizError::NotFound`] for an id missing from the current corpus.
    pub fn validate_answer(&self, id: &str, answer: &str) -> Result<Verdict> {
        let verdict = match self.watch_reloads(|| self.validator.validate(id, answer)) {
            Ok(verdict) => verdict,
            Err(QuizError::NotFound(missing)) => {
                self.metrics.record_unknown_id();
                return Err(QuizError::NotFound(missing));
            }
            Err(e) => return Err(e),
        };

        self.metrics.record_answer(verdict.is_correct());
        self.emit(QuizEvent::AnswerChecked {
            id: id.to_string(),
            correct: verdict.is_correct(),
        });

        Ok(verdict)
    }

    /// Judge an answer and mark the question served when it is correct.
    pub fn submit_answer(&self, id: &str, answer: &str) -> Result<Verdict> {
        let verdict = self.validate_answer(id, answer)?;
        if verdict.is_correct() {
            self.mark_served(id);
        }
        Ok(verdict)
    }

    /// Add `id` to the session's served set. Returns `false` if it was already there.
    pub fn mark_served(&self, id: &str) -> bool {
        let inserted = self.used.mark_served(id);
        if inserted {
            self.metrics.record_question_served();
            self.emit(QuizEvent::QuestionMarkedServed { id: id.to_string() });
        }
        inserted
    }

    /// Forget every served question. Safe to call repeatedly.
    pub fn reset_session(&self) {
        let cleared = self.used.reset();
        self.metrics.record_session_reset();

        tracing::info!("Session reset ({} served questions cleared)", cleared);
        self.emit(QuizEvent::SessionReset { cleared });
    }

    /// Number of questions served in the current session.
    pub fn served_count(&self) -> usize {
        self.used.len()
    }

    /// Number of questions in the current corpus.
    pub fn question_count(&self) -> Result<usize> {
        self.watch_reloads(|| self.store.len())
    }

    /// Re-read the corpus now. Returns the new question count.
    pub fn force_reload(&self) -> Result<usize> {
        let snapshot = self.store.force_reload()?;
        self.metrics.record_corpus_reload();
        self.emit(QuizEvent::CorpusReloaded {
            questions: snapshot.len(),
        });
        Ok(snapshot.len())
    }

    /// Subscribe to quiz events.
    ///
    /// Returns a receiver for all future events; multiple subscribers can
    /// listen at once.
    pub fn subscribe(&self) -> broadcast::Receiver<QuizEvent> {
        self.events.subscribe()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn store(&self) -> &QuestionStore {
        &self.store
    }

    pub fn used(&self) -> &UsedTracker {
        &self.used
    }

    /// Log metrics and reload totals, typically on shutdown.
    pub fn log_summary(&self) {
        self.metrics.log_summary();
        tracing::info!(
            "Corpus {}: {} loads, {} questions served this session",
            self.store.location(),
            self.store.reload_count(),
            self.served_count()
        );
    }

    /// Run `f` and emit [`QuizEvent::CorpusReloaded`] if it triggered a reload.
    fn watch_reloads<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let before = self.store.reload_count();
        let result = f();

        if self.store.reload_count() != before {
            self.metrics.record_corpus_reload();
            if let Some(snapshot) = self.store.cached() {
                self.emit(QuizEvent::CorpusReloaded {
                    questions: snapshot.len(),
                });
            }
        }

        result
    }

    fn emit(&self, event: QuizEvent) {
        // No subscribers is not an error
        let _ = self.events.send(event);
    }
}
