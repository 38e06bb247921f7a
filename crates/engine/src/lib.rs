//! A concurrent file-tracking engine: discover files by glob, read them
//! incrementally or whole, and deliver parsed records to a callback under a
//! configurable serialization discipline.
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod default_parsers;
mod discovery;
mod extract;
mod flatten;
mod known_files;
mod launcher;
mod supervisor;
mod termination;
mod worker;

pub use config::{ExceptionCallback, NotificationCallback, PerThreadCallback, SupervisorBuilder, SupervisorConfig};
pub use supervisor::{ScopeGuard, Supervisor};
pub use termination::TerminationTrigger;

pub use multitrack_core::{
    FileParserOutput, FullFileTrackable, Metadata, MultitrackError, Parser, ParserArgs,
    ParserKind, TailTrackable, TailValueSelector, ValueSelector,
};
