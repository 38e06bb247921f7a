//! Tail worker loop (`spec.md` §4.4): track an append-only file by byte
//! offset, re-reading only what's new each poll.

use super::WorkerContext;
use crate::extract::extract_from_line;
use crate::flatten::flatten;
use multitrack_core::{MultitrackError, TailTrackable};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Byte offset of the start of the last line in `bytes`, ignoring a single
/// trailing newline. Anchoring here rather than at end-of-file means the
/// very first poll still delivers whatever was already the final line when
/// the worker started — an empty file naturally anchors to offset 0, so
/// nothing is delivered until new bytes actually arrive.
fn last_line_start(bytes: &[u8]) -> u64 {
    if bytes.is_empty() {
        return 0;
    }
    let mut end = bytes.len();
    if bytes[end - 1] == b'\n' {
        end -= 1;
    }
    match bytes[..end].iter().rposition(|&b| b == b'\n') {
        Some(pos) => (pos + 1) as u64,
        None => 0,
    }
}

struct TailState {
    offset: u64,
}

/// Read whatever is new since `offset`. A shrunk file resets the offset to
/// zero and re-reads from the start (`spec.md` §4.4's truncation rule); a
/// missing file is a transient failure, reported as "nothing new".
async fn read_new_content(path: &Path, offset: u64) -> Option<(u64, String)> {
    let mut file = tokio::fs::File::open(path).await.ok()?;
    let len = file.metadata().await.ok()?.len();
    let start = if len < offset { 0 } else { offset };
    if start >= len {
        return Some((len, String::new()));
    }
    file.seek(std::io::SeekFrom::Start(start)).await.ok()?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).await.ok()?;
    Some((len, String::from_utf8_lossy(&buf).into_owned()))
}

fn process_line(
    line: &str,
    trackable: &TailTrackable,
    ctx: &WorkerContext,
) -> Result<(), MultitrackError> {
    if trackable.skip_patterns.iter().any(|p| p.is_match(line)) {
        return Ok(());
    }
    let pairs = extract_from_line(line, &trackable.selectors, trackable.convert_numeric)?;
    if pairs.is_empty() {
        return Ok(());
    }
    let mut map = Map::new();
    map.extend(pairs);
    let mut record = Value::Object(map);
    if ctx.config.flatten_data {
        record = flatten(&record);
    }
    ctx.deliver(&record, &Value::Object(Map::new()))
}

fn process_poll(content: &str, trackable: &TailTrackable, ctx: &WorkerContext) -> Result<(), MultitrackError> {
    if let Some(parser) = &trackable.parser {
        let (metadata, records) = parser.call_log(content, &trackable.parser_args)?;
        for record in records {
            ctx.deliver(&record, &Value::Object(metadata.clone()))?;
        }
        return Ok(());
    }
    for line in content.lines() {
        process_line(line, trackable, ctx)?;
    }
    Ok(())
}

pub(crate) async fn run(path: PathBuf, trackable: TailTrackable, ctx: WorkerContext) {
    let label = multitrack_core::short_path(&path, 3);

    let initial = std::fs::read(&path).unwrap_or_default();
    let mut state = TailState {
        offset: last_line_start(&initial),
    };

    loop {
        if ctx.termination.is_set() {
            return;
        }

        if let Some((new_len, content)) = read_new_content(&path, state.offset).await {
            state.offset = new_len;
            if !content.is_empty() {
                if let Err(e) = process_poll(&content, &trackable, &ctx) {
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
#[path = "tail_tests.rs"]
mod tests;
