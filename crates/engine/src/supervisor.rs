//! The public entry point (`spec.md` §4.1): register trackables, run the
//! session, and observe the one error (if any) it produced.

use crate::config::SupervisorConfig;
use crate::discovery::validate_pattern;
use crate::known_files::KnownFiles;
use crate::launcher::run_launcher;
use crate::termination::TerminationTrigger;
use crate::worker::{full_file, tail, FailureSlot, WorkerContext};
use multitrack_core::{FullFileTrackable, MultitrackError, ParserKind, TailTrackable};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Drives full-file and tail launchers to completion and reports whichever
/// worker failure (if any) ended the session.
pub struct Supervisor {
    config: Arc<SupervisorConfig>,
    full_file: Vec<FullFileTrackable>,
    tail: Vec<TailTrackable>,
    excluded: Vec<glob::Pattern>,
    known: KnownFiles,
    failures: FailureSlot,
    termination: TerminationTrigger,
    completion: TerminationTrigger,
    started: AtomicBool,
    in_scope: AtomicBool,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        let termination = config.termination_trigger.clone().unwrap_or_default();
        Self {
            config: Arc::new(config),
            full_file: Vec::new(),
            tail: Vec::new(),
            excluded: Vec::new(),
            known: KnownFiles::new(),
            failures: Arc::new(Mutex::new(None)),
            termination,
            completion: TerminationTrigger::new(),
            started: AtomicBool::new(false),
            in_scope: AtomicBool::new(false),
        }
    }

    /// Register a full-file trackable. Validates its glob pattern and, if it
    /// carries a custom parser, that the parser is a file parser and passes
    /// its smoke test before the session is allowed to start.
    pub fn track(&mut self, trackable: FullFileTrackable) -> Result<(), MultitrackError> {
        validate_pattern(&trackable.glob)?;
        if let Some(parser) = &trackable.parser {
            if parser.kind() != ParserKind::File {
                return Err(MultitrackError::configuration(
                    "track() requires a file parser; this parser was built with from_log_fn",
                ));
            }
            parser.validate()?;
        }
        self.full_file.push(trackable);
        Ok(())
    }

    /// Register a tail trackable. A custom log parser and tracked-value
    /// selectors are mutually exclusive: a parser already decides what gets
    /// delivered, so per-line selectors would be ambiguous alongside it.
    pub fn tail(&mut self, trackable: TailTrackable) -> Result<(), MultitrackError> {
        validate_pattern(&trackable.glob)?;
        if let Some(parser) = &trackable.parser {
            if parser.kind() != ParserKind::Log {
                return Err(MultitrackError::configuration(
                    "tail() requires a log parser; this parser was built with from_file_fn",
                ));
            }
            if !trackable.selectors.is_empty() {
                return Err(MultitrackError::configuration(
                    "a custom log parser and tracked-value selectors are mutually exclusive",
                ));
            }
            parser.validate()?;
        }
        self.tail.push(trackable);
        Ok(())
    }

    /// Exclude paths matching any of `patterns` from every trackable's
    /// discovery, accepting either a single pattern or a collection.
    pub fn exclude(
        &mut self,
        patterns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<(), MultitrackError> {
        for pattern in patterns {
            let pattern = pattern.into();
            let compiled = glob::Pattern::new(&pattern).map_err(|e| {
                MultitrackError::configuration(format!("invalid exclude pattern {pattern:?}: {e}"))
            })?;
            self.excluded.push(compiled);
        }
        Ok(())
    }

    /// Signal termination. Idempotent; safe to call from a callback.
    /// `run()` observes this and begins draining workers.
    ///
    /// Must be called inside a scoped acquisition (after [`enter_scope`]);
    /// otherwise returns `MultitrackError::ProgrammerError`, mirroring the
    /// requirement that [`run`] itself be called under a scope.
    ///
    /// [`enter_scope`]: Supervisor::enter_scope
    /// [`run`]: Supervisor::run
    pub fn terminate(&self) -> Result<(), MultitrackError> {
        if !self.in_scope.load(Ordering::SeqCst) {
            return Err(MultitrackError::programmer(
                "terminate() called outside a scoped acquisition; call enter_scope() first",
            ));
        }
        self.termination.set();
        Ok(())
    }

    /// Acquire a scope whose `Drop` marks the session complete without
    /// tearing down any worker — a separate signal from termination, for
    /// callers that want to observe "the scope ended" distinctly from
    /// "the session was aborted". `run()` and `terminate()` both require
    /// this scope to be active, the way `monitor.py`'s `FileMonitor` asserts
    /// it is used as a context manager.
    pub fn enter_scope(&self) -> ScopeGuard<'_> {
        self.in_scope.store(true, Ordering::SeqCst);
        ScopeGuard {
            completion: &self.completion,
            in_scope: &self.in_scope,
        }
    }

    pub async fn wait_for_completion(&self) {
        self.completion.wait().await;
    }

    /// Run until termination, then join every launcher and report the
    /// session's outcome. Blocks the calling task; callers that supplied an
    /// external termination trigger effectively block until that trigger
    /// fires, exactly as `terminate()` would otherwise cause.
    pub async fn run(&self) -> Result<(), MultitrackError> {
        if !self.in_scope.load(Ordering::SeqCst) {
            return Err(MultitrackError::programmer(
                "run() called outside a scoped acquisition; call enter_scope() first",
            ));
        }
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(MultitrackError::programmer(
                "run() called more than once on the same Supervisor",
            ));
        }

        let ctx = WorkerContext::new(
            self.config.clone(),
            self.failures.clone(),
            self.termination.clone(),
        );

        if let Some(timeout) = self.config.timeout {
            let termination = self.termination.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                termination.set();
            });
        }

        let full_file_launcher = tokio::spawn(run_launcher(
            self.full_file.clone(),
            self.excluded.clone(),
            self.known.clone(),
            ctx.clone(),
            |path, trackable, ctx| full_file::run(path, trackable, ctx),
        ));
        let tail_launcher = tokio::spawn(run_launcher(
            self.tail.clone(),
            self.excluded.clone(),
            self.known.clone(),
            ctx.clone(),
            |path, trackable, ctx| tail::run(path, trackable, ctx),
        ));

        self.termination.wait().await;
        let _ = full_file_launcher.await;
        let _ = tail_launcher.await;
        self.completion.set();

        if self.known.is_empty() {
            warn!("no files were tracked during this session");
        }

        match self.failures.lock().take() {
            Some(e) if self.config.terminate_all_on_fail => {
                Err(MultitrackError::session_failure(e))
            }
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// RAII handle from [`Supervisor::enter_scope`]; marks the session complete
/// and clears the scope on drop, without aborting any in-flight worker.
pub struct ScopeGuard<'a> {
    completion: &'a TerminationTrigger,
    in_scope: &'a AtomicBool,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.in_scope.store(false, Ordering::SeqCst);
        self.completion.set();
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
