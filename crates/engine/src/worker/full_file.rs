//! Full-file worker loop (`spec.md` §4.3): poll mtime, re-read the whole
//! file on change, parse, filter, deliver. Exits after one read for
//! trackables marked `static_file`.

use super::WorkerContext;
use crate::default_parsers::json_file_parser;
use crate::extract::filter_full_file_record;
use crate::flatten::flatten;
use multitrack_core::{FileParserOutput, FullFileTrackable, Metadata, MultitrackError, Parser};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

fn resolve_parser(trackable: &FullFileTrackable) -> Parser {
    trackable.parser.clone().unwrap_or_else(json_file_parser)
}

fn normalize_file_deliveries(output: FileParserOutput) -> Vec<(Metadata, Value)> {
    match output {
        FileParserOutput::Single(meta, value) => vec![(meta, value)],
        FileParserOutput::Many(records) => records,
    }
}

fn dispatch_file_parser(
    path: &Path,
    trackable: &FullFileTrackable,
) -> Result<Vec<(Metadata, Value)>, MultitrackError> {
    let parser = resolve_parser(trackable);
    let output = parser.call_file(path, &trackable.parser_args)?;
    Ok(normalize_file_deliveries(output))
}

fn last_modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).ok()?.modified().ok()
}

pub(crate) async fn run(path: PathBuf, trackable: FullFileTrackable, ctx: WorkerContext) {
    let label = multitrack_core::short_path(&path, 3);
    let mut last_seen: Option<SystemTime> = None;

    loop {
        if ctx.termination.is_set() {
            return;
        }

        let modified = last_modified(&path);
        let changed = match (modified, last_seen) {
            (Some(m), Some(prev)) => m != prev,
            (Some(_), None) => true,
            // A disappeared/unreadable file is a transient stat failure,
            // never surfaced as an error; just wait for the next poll.
            (None, _) => false,
        };

        if changed {
            match dispatch_file_parser(&path, &trackable) {
                Ok(records) => {
                    let mut delivery_failed = false;
                    for (metadata, record) in records {
                        let filtered = filter_full_file_record(&record, &trackable.selectors);
                        let filtered = if ctx.config.flatten_data {
                            flatten(&filtered)
                        } else {
                            filtered
                        };
                        if let Err(e) = ctx.deliver(&filtered, &Value::Object(metadata)) {
                            ctx.report_failure(&label, e);
                            delivery_failed = true;
                            break;
                        }
                    }
                    if delivery_failed {
                        return;
                    }
                    last_seen = modified;
                    if trackable.static_file {
                        debug!(file = %label, "static full-file trackable read once, worker exiting");
                        return;
                    }
                }
                Err(e) => {
                    ctx.report_failure(&label, e);
                    return;
                }
            }
        }

        tokio::select! {
            () = tokio::time::sleep(ctx.config.interval) => {}
            () = ctx.termination.wait() => return,
        }
    }
}

#[cfg(test)]
#[path = "full_file_tests.rs"]
mod tests;
