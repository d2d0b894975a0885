//! File I/O tests: load validation, atomic save, backups.

mod common;

use std::fs;

use sil_edit::{load_layout, save_layout, write_backup};
use sil_model::LayoutError;

use crate::common::sample_layout;

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_layout(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, LayoutError::Io(_)));
}

#[test]
fn load_invalid_json_reports_syntax_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").expect("write");
    let err = load_layout(&path).unwrap_err();
    assert!(matches!(err, LayoutError::Json { .. }));
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn load_rejects_files_without_mappings_root() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("other.json");
    fs::write(&path, r#"{"version": "3"}"#).expect("write");
    let err = load_layout(&path).unwrap_err();
    assert!(matches!(err, LayoutError::MissingMappings(_)));
}

#[test]
fn save_then_load_round_trips_and_leaves_no_temp() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("layout.json");
    let doc = sample_layout();
    save_layout(&path, &doc).expect("save");
    assert!(!dir.path().join("layout.json.tmp").exists());

    let text = fs::read_to_string(&path).expect("read");
    // Valve-style tab indentation.
    assert!(text.contains("\n\t\"controller_mappings\""));

    let loaded = load_layout(&path).expect("load");
    assert_eq!(
        serde_json::to_string(&loaded).expect("serialize"),
        serde_json::to_string(&doc).expect("serialize")
    );
}

#[test]
fn backup_is_a_copy_of_the_original() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("layout.json");
    save_layout(&path, &sample_layout()).expect("save");
    let original = fs::read_to_string(&path).expect("read");

    let backup = write_backup(&path).expect("backup");
    assert_ne!(backup, path);
    let name = backup.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("layout_backup_") && name.ends_with(".json"));
    assert_eq!(fs::read_to_string(&backup).expect("read backup"), original);
}
