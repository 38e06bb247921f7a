//! Process-wide set of paths currently tracked by either launcher
//! (`spec.md` §3). Membership is monotonic within a session: a claimed path
//! is never released while the session is live, which prevents a momentarily
//! disappearing-then-reappearing file from acquiring a second worker.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct KnownFiles {
    inner: Arc<Mutex<HashSet<PathBuf>>>,
}

impl KnownFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomic test-and-add. Returns `true` if `path` was newly claimed by
    /// this call, `false` if it was already known.
    pub fn claim(&self, path: &Path) -> bool {
        self.inner.lock().insert(path.to_path_buf())
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }
}

#[cfg(test)]
#[path = "known_files_tests.rs"]
mod tests;
