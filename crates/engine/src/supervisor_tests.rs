use super::*;
use crate::config::SupervisorBuilder;
use multitrack_core::{FileParserOutput, Parser, TailValueSelector, ValueSelector};
use regex::Regex;
use serde_json::json;
use std::time::Duration;

fn supervisor_with<F>(callback: F) -> Supervisor
where
    F: Fn(&serde_json::Value, &serde_json::Value) + Send + Sync + 'static,
{
    let config = SupervisorBuilder::new()
        .per_thread_callback(callback)
        .interval(Duration::from_millis(5))
        .build()
        .expect("should build");
    Supervisor::new(config)
}

#[test]
fn track_rejects_an_invalid_glob() {
    let mut sup = supervisor_with(|_r, _m| {});
    let err = sup.track(FullFileTrackable::new("[unterminated")).unwrap_err();
    assert!(matches!(err, MultitrackError::Configuration(_)));
}

#[test]
fn track_rejects_a_log_parser() {
    let mut sup = supervisor_with(|_r, _m| {});
    let parser = Parser::from_log_fn(|_content, _args| {
        Ok((multitrack_core::Metadata::new(), vec![json!({})]))
    });
    let err = sup
        .track(FullFileTrackable::new("*.json").parser(parser))
        .unwrap_err();
    assert!(matches!(err, MultitrackError::Configuration(_)));
}

#[test]
fn track_rejects_a_parser_that_fails_its_smoke_test() {
    let mut sup = supervisor_with(|_r, _m| {});
    let parser = Parser::from_file_fn(|_path, _args| {
        Err(MultitrackError::parser("always fails"))
    });
    let err = sup
        .track(FullFileTrackable::new("*.json").parser(parser))
        .unwrap_err();
    assert!(matches!(err, MultitrackError::Configuration(_)));
}

#[test]
fn tail_rejects_a_custom_parser_alongside_selectors() {
    let mut sup = supervisor_with(|_r, _m| {});
    let parser = Parser::from_log_fn(|_content, _args| {
        Ok((multitrack_core::Metadata::new(), vec![]))
    });
    let trackable = TailTrackable::new("*.log")
        .parser(parser)
        .select(vec![TailValueSelector::new(Regex::new(r"x").expect("regex"))]);
    let err = sup.tail(trackable).unwrap_err();
    assert!(matches!(err, MultitrackError::Configuration(_)));
}

#[test]
fn tail_rejects_a_file_parser() {
    let mut sup = supervisor_with(|_r, _m| {});
    let parser = Parser::from_file_fn(|_path, _args| {
        Ok(FileParserOutput::Single(multitrack_core::Metadata::new(), json!({})))
    });
    let err = sup.tail(TailTrackable::new("*.log").parser(parser)).unwrap_err();
    assert!(matches!(err, MultitrackError::Configuration(_)));
}

#[test]
fn exclude_rejects_an_invalid_pattern() {
    let mut sup = supervisor_with(|_r, _m| {});
    let err = sup.exclude(vec!["[unterminated"]).unwrap_err();
    assert!(matches!(err, MultitrackError::Configuration(_)));
}

#[tokio::test]
async fn run_delivers_static_full_file_records_then_completes_after_terminate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("data.json");
    std::fs::write(&path, r#"{"a": 1}"#).expect("write");

    let delivered = Arc::new(Mutex::new(Vec::new()));
    let sink = delivered.clone();
    let mut sup = supervisor_with(move |record, _meta| sink.lock().push(record.clone()));
    sup.track(FullFileTrackable::new(path.to_string_lossy().to_string()).static_file(true))
        .expect("should register");

    let sup = Arc::new(sup);
    let _scope = sup.enter_scope();
    let runner = sup.clone();
    let handle = tokio::spawn(async move { runner.run().await });

    tokio::time::sleep(Duration::from_millis(60)).await;
    sup.terminate().expect("should be in scope");
    let result = tokio::time::timeout(Duration::from_millis(500), handle)
        .await
        .expect("run should finish after terminate")
        .expect("task should not panic");

    assert!(result.is_ok());
    assert_eq!(delivered.lock().as_slice(), &[json!({"a": 1})]);
}

#[tokio::test]
async fn run_fails_once_and_reports_the_first_worker_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "not json").expect("write");

    let mut sup = supervisor_with(|_r, _m| {});
    sup.track(FullFileTrackable::new(path.to_string_lossy().to_string()))
        .expect("should register");

    let _scope = sup.enter_scope();
    let result = tokio::time::timeout(Duration::from_millis(500), sup.run())
        .await
        .expect("run should finish once the worker fails");

    assert!(matches!(result, Err(MultitrackError::Parser(_))));
}

#[tokio::test]
async fn terminate_all_on_fail_wraps_the_error_in_session_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "not json").expect("write");

    let config = SupervisorBuilder::new()
        .per_thread_callback(|_r, _m| {})
        .interval(Duration::from_millis(5))
        .terminate_all_on_fail(true)
        .build()
        .expect("should build");
    let mut sup = Supervisor::new(config);
    sup.track(FullFileTrackable::new(path.to_string_lossy().to_string()))
        .expect("should register");

    let _scope = sup.enter_scope();
    let result = tokio::time::timeout(Duration::from_millis(500), sup.run())
        .await
        .expect("run should finish once the worker fails");

    assert!(matches!(result, Err(MultitrackError::SessionFailure(_))));
}

#[tokio::test]
async fn run_called_twice_is_a_programmer_error() {
    let sup = Arc::new(supervisor_with(|_r, _m| {}));
    let _scope = sup.enter_scope();
    let runner = sup.clone();
    let first = tokio::spawn(async move { runner.run().await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    let second = sup.run().await;
    sup.terminate().expect("should be in scope");
    let _ = tokio::time::timeout(Duration::from_millis(200), first).await;
    assert!(matches!(second, Err(MultitrackError::ProgrammerError(_))));
}

#[tokio::test]
async fn run_outside_a_scoped_acquisition_is_a_programmer_error() {
    let sup = supervisor_with(|_r, _m| {});
    let result = sup.run().await;
    assert!(matches!(result, Err(MultitrackError::ProgrammerError(_))));
}

#[test]
fn terminate_outside_a_scoped_acquisition_is_a_programmer_error() {
    let sup = supervisor_with(|_r, _m| {});
    let err = sup.terminate().unwrap_err();
    assert!(matches!(err, MultitrackError::ProgrammerError(_)));
}

#[tokio::test]
async fn terminate_after_the_scope_has_ended_is_a_programmer_error() {
    let sup = supervisor_with(|_r, _m| {});
    sup.enter_scope();
    let err = sup.terminate().unwrap_err();
    assert!(matches!(err, MultitrackError::ProgrammerError(_)));
}

#[tokio::test]
async fn lock_callbacks_serializes_concurrent_worker_deliveries() {
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    let dir = tempfile::tempdir().expect("tempdir");
    let busy = Arc::new(AtomicUsize::new(0));
    let overlapped = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let (busy_cb, overlapped_cb) = (busy.clone(), overlapped.clone());
    let config = SupervisorBuilder::new()
        .per_thread_callback(move |_record, _meta| {
            if busy_cb.fetch_add(1, AtomicOrdering::SeqCst) != 0 {
                overlapped_cb.store(true, AtomicOrdering::SeqCst);
            }
            std::thread::sleep(Duration::from_millis(5));
            busy_cb.fetch_sub(1, AtomicOrdering::SeqCst);
        })
        .interval(Duration::from_millis(1))
        .build()
        .expect("should build");
    let mut sup = Supervisor::new(config);
    for name in ["a.json", "b.json"] {
        let path = dir.path().join(name);
        std::fs::write(&path, r#"{"a": 1}"#).expect("write");
        sup.track(FullFileTrackable::new(path.to_string_lossy().to_string()).static_file(true))
            .expect("should register");
    }

    let sup = Arc::new(sup);
    let _scope = sup.enter_scope();
    let runner = sup.clone();
    let handle = tokio::spawn(async move { runner.run().await });

    tokio::time::sleep(Duration::from_millis(60)).await;
    sup.terminate().expect("should be in scope");
    tokio::time::timeout(Duration::from_millis(500), handle)
        .await
        .expect("run should finish after terminate")
        .expect("task should not panic")
        .expect("session should succeed");

    assert!(!overlapped.load(AtomicOrdering::SeqCst));
}

#[test]
fn filter_full_file_record_example_from_selectors() {
    let record = json!({"a_value": 1, "keep": 2});
    let selectors = vec![ValueSelector::literal("keep")];
    assert_eq!(
        crate::extract::filter_full_file_record(&record, &selectors),
        json!({"keep": 2})
    );
}
