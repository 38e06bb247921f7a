//! Session-wide configuration — the closed construction-option set from
//! `spec.md` §6.

use crate::termination::TerminationTrigger;
use multitrack_core::MultitrackError;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Invoked on each delivery with `(record, metadata)`.
pub type PerThreadCallback = Arc<dyn Fn(&Value, &Value) + Send + Sync>;
/// Invoked with a human-readable message when a worker fails.
pub type ExceptionCallback = Arc<dyn Fn(&str) + Send + Sync>;
/// Invoked with a human-readable message when a new file enters tracking.
pub type NotificationCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Resolved construction options for a [`crate::supervisor::Supervisor`].
pub struct SupervisorConfig {
    pub(crate) per_thread_callback: PerThreadCallback,
    pub(crate) exception_callback: Option<ExceptionCallback>,
    pub(crate) notification_callback: Option<NotificationCallback>,
    pub(crate) termination_trigger: Option<TerminationTrigger>,
    pub(crate) lock_callbacks: bool,
    pub(crate) interval: Duration,
    pub(crate) flatten_data: bool,
    pub(crate) timeout: Option<Duration>,
    pub(crate) terminate_all_on_fail: bool,
}

impl std::fmt::Debug for SupervisorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupervisorConfig")
            .field("exception_callback", &self.exception_callback.is_some())
            .field(
                "notification_callback",
                &self.notification_callback.is_some(),
            )
            .field("termination_trigger", &self.termination_trigger)
            .field("lock_callbacks", &self.lock_callbacks)
            .field("interval", &self.interval)
            .field("flatten_data", &self.flatten_data)
            .field("timeout", &self.timeout)
            .field("terminate_all_on_fail", &self.terminate_all_on_fail)
            .finish_non_exhaustive()
    }
}

/// Builds a [`SupervisorConfig`]. Mirrors the options-struct-plus-builder
/// shape used for adapter configuration elsewhere in this workspace.
pub struct SupervisorBuilder {
    per_thread_callback: Option<PerThreadCallback>,
    exception_callback: Option<ExceptionCallback>,
    notification_callback: Option<NotificationCallback>,
    termination_trigger: Option<TerminationTrigger>,
    lock_callbacks: bool,
    interval: Duration,
    flatten_data: bool,
    timeout: Option<Duration>,
    terminate_all_on_fail: bool,
}

impl Default for SupervisorBuilder {
    fn default() -> Self {
        Self {
            per_thread_callback: None,
            exception_callback: None,
            notification_callback: None,
            termination_trigger: None,
            lock_callbacks: true,
            interval: Duration::from_millis(1),
            flatten_data: false,
            timeout: None,
            terminate_all_on_fail: false,
        }
    }
}

impl SupervisorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn per_thread_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Value, &Value) + Send + Sync + 'static,
    {
        self.per_thread_callback = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn exception_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.exception_callback = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn notification_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.notification_callback = Some(Arc::new(callback));
        self
    }

    /// Use an externally owned termination handle instead of one the
    /// supervisor manages itself. `run()` blocks until it fires.
    #[must_use]
    pub fn termination_trigger(mut self, trigger: TerminationTrigger) -> Self {
        self.termination_trigger = Some(trigger);
        self
    }

    #[must_use]
    pub fn lock_callbacks(mut self, lock: bool) -> Self {
        self.lock_callbacks = lock;
        self
    }

    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn flatten_data(mut self, flatten: bool) -> Self {
        self.flatten_data = flatten;
        self
    }

    /// Fire the termination signal automatically this many seconds after
    /// `run()`. If a `termination_trigger` was also supplied, the timeout
    /// fires that same trigger rather than introducing a second latch
    /// (`spec.md` §9's recommendation for the unspecified interaction).
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn terminate_all_on_fail(mut self, terminate_all: bool) -> Self {
        self.terminate_all_on_fail = terminate_all;
        self
    }

    pub fn build(self) -> Result<SupervisorConfig, MultitrackError> {
        let per_thread_callback = self
            .per_thread_callback
            .ok_or_else(|| MultitrackError::configuration("per_thread_callback is required"))?;
        Ok(SupervisorConfig {
            per_thread_callback,
            exception_callback: self.exception_callback,
            notification_callback: self.notification_callback,
            termination_trigger: self.termination_trigger,
            lock_callbacks: self.lock_callbacks,
            interval: self.interval,
            flatten_data: self.flatten_data,
            timeout: self.timeout,
            terminate_all_on_fail: self.terminate_all_on_fail,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
