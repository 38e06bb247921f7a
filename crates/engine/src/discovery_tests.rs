use super::*;
use multitrack_core::FullFileTrackable;
use std::fs;

#[test]
fn validate_pattern_rejects_unparseable_glob() {
    assert!(validate_pattern("[").is_err());
    assert!(validate_pattern("*.toml").is_ok());
}

#[test]
fn discover_claims_each_path_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("a.json");
    fs::write(&file_path, "{}").expect("write");

    let trackables = vec![FullFileTrackable::new(format!("{}/*.json", dir.path().display()))];
    let known = KnownFiles::new();

    let first = discover_new_paths(&trackables, &[], &known);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].1, file_path);

    let second = discover_new_paths(&trackables, &[], &known);
    assert!(second.is_empty());
}

#[test]
fn discover_skips_excluded_paths() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("skip.json"), "{}").expect("write");

    let trackables = vec![FullFileTrackable::new(format!("{}/*.json", dir.path().display()))];
    let excluded = vec![glob::Pattern::new(&format!("{}/skip.json", dir.path().display())).expect("pattern")];
    let known = KnownFiles::new();

    let discovered = discover_new_paths(&trackables, &excluded, &known);
    assert!(discovered.is_empty());
}

#[test]
fn first_matching_trackable_wins_when_patterns_overlap() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("a.json"), "{}").expect("write");

    let trackables = vec![
        FullFileTrackable::new(format!("{}/*.json", dir.path().display())),
        FullFileTrackable::new(format!("{}/a.*", dir.path().display())),
    ];
    let known = KnownFiles::new();

    let discovered = discover_new_paths(&trackables, &[], &known);
    assert_eq!(discovered.len(), 1);
    assert_eq!(discovered[0].0, 0);
}
