use super::*;
use multitrack_core::FileParserOutput;
use std::io::Write;

#[test]
fn parses_a_single_object() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(file, r#"{{"a": 1}}"#).expect("write");
    let parser = json_file_parser();
    let output = parser.call_file(file.path(), &ParserArgs::new()).expect("should parse");
    match output {
        FileParserOutput::Single(meta, value) => {
            assert!(meta.contains_key("timestamp"));
            assert_eq!(value, serde_json::json!({"a": 1}));
        }
        FileParserOutput::Many(_) => panic!("expected a single record"),
    }
}

#[test]
fn parses_an_array_into_many_records_sharing_metadata() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(file, r#"[{{"a": 1}}, {{"a": 2}}]"#).expect("write");
    let parser = json_file_parser();
    let output = parser.call_file(file.path(), &ParserArgs::new()).expect("should parse");
    match output {
        FileParserOutput::Many(records) => {
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].1, serde_json::json!({"a": 1}));
            assert_eq!(records[1].1, serde_json::json!({"a": 2}));
        }
        FileParserOutput::Single(..) => panic!("expected many records"),
    }
}

#[test]
fn invalid_json_is_a_parser_error() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(file, "not json").expect("write");
    let parser = json_file_parser();
    let err = parser.call_file(file.path(), &ParserArgs::new()).unwrap_err();
    assert!(matches!(err, multitrack_core::MultitrackError::Parser(_)));
}
