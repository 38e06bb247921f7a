//! multitrack-core: shared types for the concurrent file-tracking engine.
//!
//! This crate holds the data model only — trackable declarations, the
//! parser capability, and the error taxonomy. The supervisor, launchers,
//! and workers that drive them live in `multitrack-engine`.
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod error;
pub mod id;
pub mod parser;
pub mod trackable;

pub use error::MultitrackError;
pub use id::short_path;
pub use parser::{FileParserOutput, Metadata, Parser, ParserArgs, ParserKind};
pub use trackable::{FullFileTrackable, TailTrackable, TailValueSelector, ValueSelector};
