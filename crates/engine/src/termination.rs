//! Edge-triggered, latched signals (`spec.md` §5): once set, never cleared,
//! and every waiter eventually observes the set state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// A termination or completion signal. Cloning shares the underlying state
/// — this is how the supervisor hands launchers a non-owning handle onto
/// its termination signal without either side keeping the other alive
/// (`spec.md` §9's "cyclic lifetime" note).
#[derive(Clone, Debug)]
pub struct TerminationTrigger {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl Default for TerminationTrigger {
    fn default() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }
}

impl TerminationTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the latch. A no-op if already set.
    pub fn set(&self) {
        if !self.flag.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Resolve once the latch is set, whether it was already set at the
    /// time of the call or becomes set while awaiting.
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_set() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
#[path = "termination_tests.rs"]
mod tests;
