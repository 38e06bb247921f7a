//! The parser contract (`spec.md` §6, redesign note in §9).
//!
//! The original attaches a decorator that tags a function with a recognizable
//! name; the supervisor sniffs for that name before trusting the function.
//! Here the contract is a tagged capability instead: [`Parser`] can only be
//! built through [`Parser::from_file_fn`] or [`Parser::from_log_fn`], so
//! holding one *is* the marker. Validation degrades to a smoke test against
//! synthetic input, matching `monitor.py`'s `_check_custom_log_parser`.

use crate::error::MultitrackError;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Opaque keyword arguments threaded through to a user parser unchanged.
pub type ParserArgs = Map<String, Value>;

/// Metadata accompanying a parsed record. Must carry at least a `timestamp`
/// key for file parsers (the file's modification time).
pub type Metadata = Map<String, Value>;

/// What a file parser handed back, normalized to the two shapes `spec.md`
/// §4.3 step 2 allows: a single record (object or array-of-objects) or an
/// already-exploded list of (metadata, record) pairs.
#[derive(Debug, Clone)]
pub enum FileParserOutput {
    Single(Metadata, Value),
    Many(Vec<(Metadata, Value)>),
}

type FileParserFn = dyn Fn(&Path, &ParserArgs) -> Result<FileParserOutput, MultitrackError> + Send + Sync;
type LogParserFn =
    dyn Fn(&str, &ParserArgs) -> Result<(Metadata, Vec<Value>), MultitrackError> + Send + Sync;

/// Which shape of parser a [`Parser`] wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    /// Takes a file path, returns one record or several.
    File,
    /// Takes the newly appended tail content, returns a sequence of records.
    Log,
}

#[derive(Clone)]
enum ParserImpl {
    File(Arc<FileParserFn>),
    Log(Arc<LogParserFn>),
}

/// A validated parser capability bound to a [`Trackable`](crate::trackable).
///
/// [`Parser::validate`] must succeed before a session is allowed to start
/// (`spec.md` §4.1); a parser that panics, errors, or returns the wrong
/// shape on synthetic input fails session construction with a
/// [`MultitrackError::Configuration`].
#[derive(Clone)]
pub struct Parser {
    inner: ParserImpl,
}

impl Parser {
    /// Wrap a file parser: `(path, args) -> (metadata, record-or-records)`.
    pub fn from_file_fn<F>(f: F) -> Self
    where
        F: Fn(&Path, &ParserArgs) -> Result<FileParserOutput, MultitrackError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            inner: ParserImpl::File(Arc::new(f)),
        }
    }

    /// Wrap a log (tail) parser: `(content, args) -> (metadata, records)`.
    pub fn from_log_fn<F>(f: F) -> Self
    where
        F: Fn(&str, &ParserArgs) -> Result<(Metadata, Vec<Value>), MultitrackError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            inner: ParserImpl::Log(Arc::new(f)),
        }
    }

    pub fn kind(&self) -> ParserKind {
        match &self.inner {
            ParserImpl::File(_) => ParserKind::File,
            ParserImpl::Log(_) => ParserKind::Log,
        }
    }

    pub fn call_file(
        &self,
        path: &Path,
        args: &ParserArgs,
    ) -> Result<FileParserOutput, MultitrackError> {
        match &self.inner {
            ParserImpl::File(f) => f(path, args),
            ParserImpl::Log(_) => Err(MultitrackError::programmer(
                "call_file invoked on a log parser",
            )),
        }
    }

    pub fn call_log(
        &self,
        content: &str,
        args: &ParserArgs,
    ) -> Result<(Metadata, Vec<Value>), MultitrackError> {
        match &self.inner {
            ParserImpl::Log(f) => f(content, args),
            ParserImpl::File(_) => Err(MultitrackError::programmer(
                "call_log invoked on a file parser",
            )),
        }
    }

    /// Smoke-test this parser against synthetic input before a session
    /// starts. Mirrors `_check_custom_log_parser`'s repeated ASCII-letter
    /// string: long enough to catch parsers that assume short input, pure
    /// ASCII so it never trips a format-specific decode path.
    pub fn validate(&self) -> Result<(), MultitrackError> {
        let synthetic: String = (0..5200u32)
            .map(|i| (b'a' + (i % 26) as u8) as char)
            .collect();
        let args = ParserArgs::new();
        match &self.inner {
            ParserImpl::Log(f) => f(&synthetic, &args).map(|_| ()).map_err(|e| {
                MultitrackError::configuration(format!("custom parser failed smoke test: {e}"))
            }),
            ParserImpl::File(f) => {
                let mut tmp = tempfile::NamedTempFile::new().map_err(|e| {
                    MultitrackError::configuration(format!(
                        "could not create smoke-test file: {e}"
                    ))
                })?;
                tmp.write_all(synthetic.as_bytes()).map_err(|e| {
                    MultitrackError::configuration(format!(
                        "could not write smoke-test file: {e}"
                    ))
                })?;
                f(tmp.path(), &args).map(|_| ()).map_err(|e| {
                    MultitrackError::configuration(format!(
                        "custom parser failed smoke test: {e}"
                    ))
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
