//! Corpus loading for the flat `QUESTION | ANSWER` question file.
//!
//! The loader reads through a [`CorpusSource`] so the modification-time
//! caching policy can be exercised without touching the filesystem. Parsing is
//! tolerant: blank lines, lines without a `|`, and lines with an empty
//! question or answer are skipped rather than failing the load.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use indexmap::map::Entry;
use std::fs;
use std::time::SystemTime;

use crate::error::{QuizError, Result};
use crate::models::{CorpusSnapshot, Question};

/// Separator between question text and answer on a corpus line.
pub const SEPARATOR: char = '|';

/// Where corpus text and its modification marker come from.
#[cfg_attr(test, mockall::automock)]
pub trait CorpusSource: Send + Sync {
    /// Last-modification marker of the source.
    fn modified(&self) -> Result<SystemTime>;

    /// Full UTF-8 contents of the source.
    fn read_to_string(&self) -> Result<String>;

    /// Human-readable location for logs.
    fn location(&self) -> String;
}

/// A corpus stored in a file on disk.
#[derive(Debug, Clone)]
pub struct FileCorpusSource {
    path: Utf8PathBuf,
}

impl FileCorpusSource {
    pub fn new<P: AsRef<Utf8Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl CorpusSource for FileCorpusSource {
    fn modified(&self) -> Result<SystemTime> {
        fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .map_err(|e| QuizError::corpus_unavailable(self.path.as_str(), e))
    }

    fn read_to_string(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| QuizError::corpus_unavailable(self.path.as_str(), e))
    }

    fn location(&self) -> String {
        self.path.to_string()
    }
}

/// Parses the corpus source into [`CorpusSnapshot`]s.
pub struct CorpusLoader {
    source: Box<dyn CorpusSource>,
}

impl CorpusLoader {
    /// Loader for a corpus file on disk.
    pub fn from_path<P: AsRef<Utf8Path>>(path: P) -> Self {
        Self::with_source(FileCorpusSource::new(path))
    }

    pub fn with_source(source: impl CorpusSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    pub fn location(&self) -> String {
        self.source.location()
    }

    /// Read and parse the source unconditionally.
    ///
    /// # Errors
    /// [`QuizError::CorpusUnavailable`] if the source is missing or unreadable.
    pub fn load(&self) -> Result<CorpusSnapshot> {
        let modified = self.source.modified()?;
        let contents = self.source.read_to_string()?;
        Ok(self.parse_logged(&contents, modified))
    }

    /// Reload only when needed.
    ///
    /// Returns `Ok(None)` when `current` was parsed from a source with the same
    /// modification marker and `force` is false. Otherwise the source is
    /// re-read and the new snapshot returned. With no snapshot yet, use
    /// [`load`](Self::load).
    ///
    /// The marker is queried even on a cache hit, so a source that disappears
    /// after the first load still fails with [`QuizError::CorpusUnavailable`].
    pub fn load_if_changed(
        &self,
        current: &CorpusSnapshot,
        force: bool,
    ) -> Result<Option<CorpusSnapshot>> {
        let modified = self.source.modified()?;

        if !force && current.modified() == modified {
            tracing::debug!("Corpus unchanged, using cached snapshot");
            return Ok(None);
        }

        let contents = self.source.read_to_string()?;
        Ok(Some(self.parse_logged(&contents, modified)))
    }

    fn parse_logged(&self, contents: &str, modified: SystemTime) -> CorpusSnapshot {
        let snapshot = parse_corpus(contents, modified);
        if snapshot.is_empty() {
            tracing::warn!("No questions found in {}", self.source.location());
        } else {
            tracing::info!(
                "Loaded {} questions from {}",
                snapshot.len(),
                self.source.location()
            );
        }
        snapshot
    }
}

/// Split one corpus line into trimmed `(question, answer)`.
///
/// Only the first `|` separates; anything after it belongs to the answer.
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (question, answer) = line.split_once(SEPARATOR)?;
    let question = question.trim();
    let answer = answer.trim();

    if question.is_empty() || answer.is_empty() {
        return None;
    }

    Some((question, answer))
}

/// Parse corpus text into a snapshot, keeping file order.
///
/// A question whose text repeats an earlier line keeps the first answer.
pub fn parse_corpus(contents: &str, modified: SystemTime) -> CorpusSnapshot {
    let mut questions = IndexMap::new();

    for (index, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let Some((text, answer)) = parse_line(line) else {
            tracing::debug!("Skipping malformed corpus line {}", index + 1);
            continue;
        };

        let question = Question::new(text, answer);
        match questions.entry(question.id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(question);
            }
            Entry::Occupied(_) => {
                tracing::warn!("Duplicate question on line {} ignored: {}", index + 1, text);
            }
        }
    }

    CorpusSnapshot::new(questions, modified)
}
