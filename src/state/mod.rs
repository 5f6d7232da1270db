// Session state module
//
// This module provides the UsedTracker, the set of question ids already served
// in the current session. All access goes through one Mutex so check-then-add
// and clear are atomic with respect to each other.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// Thread-safe set of question ids served in the current session.
///
/// In-memory and per-process only: separate processes keep separate sets.
/// Construct one per session (or per test) and share it behind an `Arc`.
///
/// # Usage
///
/// - [`mark_served()`](Self::mark_served) after a question is answered correctly
/// - [`contains()`](Self::contains) to test a single id
/// - [`read()`](Self::read) to inspect the whole set under one lock
/// - [`reset()`](Self::reset) to start a new session
#[derive(Debug, Default)]
pub struct UsedTracker {
    served: Mutex<HashSet<String>>,
}

impl UsedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` to the served set.
    ///
    /// # Returns
    /// `true` if the id was not already present. Marking twice is harmless.
    pub fn mark_served(&self, id: &str) -> bool {
        let inserted = self.lock().insert(id.to_string());
        if inserted {
            tracing::debug!("Marked question {} as served", id);
        }
        inserted
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains(id)
    }

    /// Empty the served set in one step.
    ///
    /// # Returns
    /// How many ids were cleared, counted under the same lock as the clear.
    pub fn reset(&self) -> usize {
        let mut served = self.lock();
        let cleared = served.len();
        served.clear();
        tracing::debug!("Session reset, {} served ids cleared", cleared);
        cleared
    }

    /// Number of ids served so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Execute a function with the served set locked.
    ///
    /// # Example
    /// ```ignore
    /// let unseen = tracker.read(|served| !served.contains(id));
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&HashSet<String>) -> R,
    {
        let served = self.lock();
        f(&served)
    }

    // Every mutation is a single insert or clear, so the set is consistent
    // even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.served
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
