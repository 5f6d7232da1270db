use camino::Utf8Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::{QuizError, Result};
use crate::models::{CorpusSnapshot, Question};
use crate::services::corpus::CorpusLoader;
use crate::state::UsedTracker;

/// Outcome of asking for the next question.
///
/// Running out of questions is a normal end state, not an error.
///
/// The payload type defaults to the full [`Question`]; the client-facing
/// boundary maps it to a [`QuestionPayload`](crate::models::QuestionPayload).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextQuestion<T = Question> {
    Question(T),
    Exhausted,
}

impl<T> NextQuestion<T> {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    pub fn into_question(self) -> Option<T> {
        match self {
            Self::Question(question) => Some(question),
            Self::Exhausted => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> NextQuestion<U> {
        match self {
            Self::Question(question) => NextQuestion::Question(f(question)),
            Self::Exhausted => NextQuestion::Exhausted,
        }
    }
}

/// Owns the cached corpus and answers lookups against it.
///
/// Every read first applies the loader's caching policy: the source's
/// modification time is checked and the snapshot is re-parsed only if it
/// changed. A reload swaps in a whole new `Arc<CorpusSnapshot>`, so concurrent
/// readers see either the old corpus or the new one, never a mix.
///
/// Selection is deterministic: [`get_next`](Self::get_next) returns the first
/// question in file order that the tracker has not seen.
pub struct QuestionStore {
    loader: CorpusLoader,
    snapshot: RwLock<Option<Arc<CorpusSnapshot>>>,
    reloads: AtomicU64,
}

impl QuestionStore {
    /// Create a store that loads lazily on first use.
    pub fn new(loader: CorpusLoader) -> Self {
        Self {
            loader,
            snapshot: RwLock::new(None),
            reloads: AtomicU64::new(0),
        }
    }

    /// Create a store and load the corpus immediately.
    ///
    /// # Errors
    /// [`QuizError::CorpusUnavailable`] if the corpus cannot be read.
    pub fn open(loader: CorpusLoader) -> Result<Self> {
        let store = Self::new(loader);
        store.force_reload()?;
        Ok(store)
    }

    /// Open the corpus file at `path`.
    pub fn from_path<P: AsRef<Utf8Path>>(path: P) -> Result<Self> {
        Self::open(CorpusLoader::from_path(path))
    }

    /// Current snapshot, reloading first if the source changed.
    pub fn snapshot(&self) -> Result<Arc<CorpusSnapshot>> {
        self.refresh(false)
    }

    /// Re-read the source regardless of its modification time.
    pub fn force_reload(&self) -> Result<Arc<CorpusSnapshot>> {
        self.refresh(true)
    }

    /// First question in file order whose id `used` has not seen.
    pub fn get_next(&self, used: &UsedTracker) -> Result<NextQuestion> {
        let snapshot = self.snapshot()?;

        let next = used.read(|served| {
            snapshot
                .iter()
                .find(|question| !served.contains(&question.id))
                .cloned()
        });

        Ok(match next {
            Some(question) => NextQuestion::Question(question),
            None => {
                tracing::debug!("All {} questions served", snapshot.len());
                NextQuestion::Exhausted
            }
        })
    }

    /// Look up a question by id in the current corpus.
    ///
    /// # Errors
    /// - [`QuizError::NotFound`] if no question has this id (including ids
    ///   made stale by an edit to the corpus)
    /// - [`QuizError::CorpusUnavailable`] if the corpus cannot be read
    pub fn lookup(&self, id: &str) -> Result<Question> {
        self.snapshot()?
            .get(id)
            .cloned()
            .ok_or_else(|| QuizError::NotFound(id.to_string()))
    }

    /// Number of questions in the current corpus.
    pub fn len(&self) -> Result<usize> {
        Ok(self.snapshot()?.len())
    }

    /// How many times a snapshot has been (re)parsed.
    pub fn reload_count(&self) -> u64 {
        self.reloads.load(Ordering::Relaxed)
    }

    pub fn location(&self) -> String {
        self.loader.location()
    }

    /// The snapshot currently held, without checking the source.
    pub fn cached(&self) -> Option<Arc<CorpusSnapshot>> {
        self.snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn refresh(&self, force: bool) -> Result<Arc<CorpusSnapshot>> {
        let seen = self.cached();
        let fresh = match &seen {
            Some(current) => match self.loader.load_if_changed(current, force)? {
                Some(fresh) => fresh,
                None => return Ok(Arc::clone(current)),
            },
            None => self.loader.load()?,
        };

        let fresh = Arc::new(fresh);
        {
            let mut slot = self
                .snapshot
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            // An unforced reload only replaces the snapshot it was decided
            // against; anything installed meanwhile is at least as new.
            if !force {
                if let Some(installed) = slot.as_ref() {
                    let superseded = seen
                        .as_ref()
                        .is_none_or(|current| !Arc::ptr_eq(installed, current));
                    if superseded {
                        tracing::debug!("Corpus already reloaded by another caller");
                        return Ok(Arc::clone(installed));
                    }
                }
            }

            *slot = Some(Arc::clone(&fresh));
        }
        self.reloads.fetch_add(1, Ordering::Relaxed);

        Ok(fresh)
    }
}
