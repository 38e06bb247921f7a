//! A minimal built-in parser, used only when a full-file trackable supplies
//! no custom parser. Concrete format parsers are out of scope (`spec.md`
//! §1's Non-goals), but the engine must still be exercisable without forcing
//! every caller to hand-write a JSON parser for the common case.

use multitrack_core::{FileParserOutput, Metadata, Parser, ParserArgs};
use multitrack_core::MultitrackError;
use std::fs;
use std::path::Path;

/// Read `path` as whole-file JSON: a single object, or an array of objects
/// each delivered as a separate record sharing one `timestamp` metadata
/// entry (the file's modification time).
pub(crate) fn json_file_parser() -> Parser {
    Parser::from_file_fn(|path: &Path, _args: &ParserArgs| {
        let metadata = file_metadata(path)?;
        let contents = fs::read_to_string(path)
            .map_err(|e| MultitrackError::parser(format!("could not read {path:?}: {e}")))?;
        let value: serde_json::Value = serde_json::from_str(&contents)
            .map_err(|e| MultitrackError::parser(format!("invalid JSON in {path:?}: {e}")))?;
        match value {
            serde_json::Value::Array(records) => Ok(FileParserOutput::Many(
                records.into_iter().map(|r| (metadata.clone(), r)).collect(),
            )),
            other => Ok(FileParserOutput::Single(metadata, other)),
        }
    })
}

fn file_metadata(path: &Path) -> Result<Metadata, MultitrackError> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| MultitrackError::parser(format!("could not stat {path:?}: {e}")))?;
    let mut metadata = Metadata::new();
    metadata.insert(
        "timestamp".to_string(),
        serde_json::Value::from(crate::worker::epoch_seconds(modified)),
    );
    Ok(metadata)
}

#[cfg(test)]
#[path = "default_parsers_tests.rs"]
mod tests;
