//! Shared per-worker plumbing: callback delivery and failure reporting.
//! `full_file` and `tail` each implement one poll loop on top of this.

pub(crate) mod full_file;
pub(crate) mod tail;

use crate::config::SupervisorConfig;
use crate::termination::TerminationTrigger;
use multitrack_core::MultitrackError;
use parking_lot::Mutex;
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// First-writer-wins failure slot shared by every worker in a session, used
/// to decide what `terminate()` raises once the session ends.
pub(crate) type FailureSlot = Arc<Mutex<Option<MultitrackError>>>;

/// Everything a worker loop needs beyond its own trackable: the resolved
/// config, where to report failures, the shared termination latch, and the
/// callback lock shared across every worker of both launchers when
/// `lock_callbacks` is configured.
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub(crate) config: Arc<SupervisorConfig>,
    pub(crate) failures: FailureSlot,
    pub(crate) termination: TerminationTrigger,
    callback_lock: Option<Arc<Mutex<()>>>,
}

impl WorkerContext {
    pub(crate) fn new(
        config: Arc<SupervisorConfig>,
        failures: FailureSlot,
        termination: TerminationTrigger,
    ) -> Self {
        let callback_lock = config.lock_callbacks.then(|| Arc::new(Mutex::new(())));
        Self {
            config,
            failures,
            termination,
            callback_lock,
        }
    }

    /// Invoke the user's per-thread callback, converting a panic into a
    /// `MultitrackError::Parser` instead of unwinding across the worker task.
    ///
    /// When `lock_callbacks` is set, holds the shared callback lock across
    /// the callback invocation only — never across the sleep/IO in a
    /// worker's poll loop, so a slow poll on one file can't stall delivery
    /// for every other file.
    pub(crate) fn deliver(&self, record: &Value, metadata: &Value) -> Result<(), MultitrackError> {
        let callback = &self.config.per_thread_callback;
        let outcome = {
            let _guard = self.callback_lock.as_ref().map(|lock| lock.lock());
            catch_unwind(AssertUnwindSafe(|| callback(record, metadata)))
        };
        outcome.map_err(|_| {
            MultitrackError::parser("per_thread_callback panicked while processing a delivery")
        })
    }

    pub(crate) fn notify_new_file(&self, message: &str) {
        if let Some(callback) = &self.config.notification_callback {
            callback(message);
        }
    }

    /// Record a worker failure. Returns `true` if this worker's failure was
    /// the first recorded this session (the one that becomes the session's
    /// reported error).
    pub(crate) fn report_failure(&self, path_label: &str, error: MultitrackError) -> bool {
        if let Some(callback) = &self.config.exception_callback {
            callback(&format!("{path_label}: {error}"));
        }
        let mut slot = self.failures.lock();
        let is_first = slot.is_none();
        if is_first {
            *slot = Some(error);
        }
        if self.config.terminate_all_on_fail {
            self.termination.set();
        }
        is_first
    }
}

/// Seconds since the Unix epoch, for timestamping deliveries. Clamped to 0
/// on a clock set before 1970 rather than panicking.
pub(crate) fn epoch_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
