//! Error taxonomy for the tracking engine (`spec.md` §7).

use thiserror::Error;

/// Errors surfaced by the tracking engine.
///
/// Transient I/O failures (a stat/read that hit a disappeared or locked
/// file) are deliberately not a variant here: per the error-handling design
/// they are swallowed at the point of occurrence and retried on the next
/// poll, never propagated.
#[derive(Debug, Error)]
pub enum MultitrackError {
    /// Invalid glob pattern, invalid parser, or contradictory trackable
    /// options. Raised synchronously from `track`/`tail` before any worker
    /// runs.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A user parser raised or returned an ill-shaped value. Terminates the
    /// worker that hit it.
    #[error("parser error: {0}")]
    Parser(String),

    /// A missing or malformed tail capture-group shape (`spec.md` §4.5).
    #[error("schema error: {0}")]
    Schema(String),

    /// Wraps a parser error that aborted the whole session because
    /// `terminate_all_on_fail` was set.
    #[error("session failed: {0}")]
    SessionFailure(Box<MultitrackError>),

    /// `run`/`terminate` called outside a scoped acquisition.
    #[error("programmer error: {0}")]
    ProgrammerError(String),
}

impl MultitrackError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn parser(msg: impl Into<String>) -> Self {
        Self::Parser(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn programmer(msg: impl Into<String>) -> Self {
        Self::ProgrammerError(msg.into())
    }

    pub fn session_failure(inner: MultitrackError) -> Self {
        Self::SessionFailure(Box::new(inner))
    }
}
