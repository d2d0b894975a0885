//! File-level tests for the command runners: backups, dry runs, and
//! write-elsewhere behavior.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

use sil_cli::cli::{ApplyMappingArgs, ConvertArgs, DeleteSetArgs, DuplicateLayerArgs, FileArgs};
use sil_cli::commands::{run_apply_mapping, run_delete_set, run_duplicate_layer, run_to_ids,
    run_to_titles};

fn write_sample(dir: &Path) -> PathBuf {
    let doc = json!({
        "version": "3",
        "controller_mappings": {
            "actions": {
                "Preset_1000001": {"title": "Base", "legacy_set": "0"},
                "Preset_1000002": {"title": "Gyro", "legacy_set": "0"}
            },
            "action_layers": {
                "Preset_1000003": {
                    "title": "Sprint", "legacy_set": "0", "set_layer": "1",
                    "parent_set_name": "Preset_1000001"
                }
            },
            "preset": [
                {"id": "0", "name": "Preset_1000001", "group_source_bindings": {"1": "switch active"}},
                {"id": "1", "name": "Preset_1000002", "group_source_bindings": {"2": "gyro active"}},
                {"id": "2", "name": "Preset_1000003", "group_source_bindings": {"3": "button_diamond active"}}
            ],
            "group": [
                {"id": "1", "mode": "switches", "inputs": {
                    "button_escape": {"activators": {"Full_Press": {"bindings": {
                        "binding": "controller_action add_layer 3 0 0, Sprint, "
                    }}}}
                }},
                {"id": "2", "mode": "gyro"},
                {"id": "3", "mode": "four_buttons"}
            ]
        }
    });
    let path = dir.join("layout.json");
    fs::write(&path, serde_json::to_string_pretty(&doc).expect("serialize")).expect("write");
    path
}

fn file_args(input: &Path) -> FileArgs {
    FileArgs {
        input: input.to_path_buf(),
        output: None,
        dry_run: false,
        no_backup: false,
    }
}

fn backups_in(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("layout_backup_"))
        })
        .collect()
}

#[test]
fn in_place_delete_writes_backup_of_the_original() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_sample(dir.path());
    let original = fs::read_to_string(&input).expect("read");

    run_delete_set(&DeleteSetArgs {
        file: file_args(&input),
        set_key: "Preset_1000002".to_string(),
    })
    .expect("delete");

    let backups = backups_in(dir.path());
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read_to_string(&backups[0]).expect("read backup"), original);

    let edited = fs::read_to_string(&input).expect("read edited");
    assert!(!edited.contains("Preset_1000002"));
    // Sprint shifted from 3 to 2 and the command followed it.
    assert!(edited.contains("controller_action add_layer 2 0 0, Sprint, "));
}

#[test]
fn dry_run_leaves_everything_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_sample(dir.path());
    let original = fs::read_to_string(&input).expect("read");

    let mut file = file_args(&input);
    file.dry_run = true;
    run_delete_set(&DeleteSetArgs {
        file,
        set_key: "Preset_1000002".to_string(),
    })
    .expect("dry run");

    assert_eq!(fs::read_to_string(&input).expect("read"), original);
    assert!(backups_in(dir.path()).is_empty());
}

#[test]
fn no_backup_suppresses_the_safety_copy() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_sample(dir.path());

    let mut file = file_args(&input);
    file.no_backup = true;
    run_duplicate_layer(&DuplicateLayerArgs {
        file,
        source_key: "Preset_1000003".to_string(),
        new_title: None,
        isolate_groups: false,
    })
    .expect("duplicate");

    assert!(backups_in(dir.path()).is_empty());
    let edited = fs::read_to_string(&input).expect("read");
    assert!(edited.contains("Sprint (Copy)"));
}

#[test]
fn output_flag_writes_elsewhere_without_backup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_sample(dir.path());
    let original = fs::read_to_string(&input).expect("read");
    let output = dir.path().join("copy.json");

    let mut file = file_args(&input);
    file.output = Some(output.clone());
    run_duplicate_layer(&DuplicateLayerArgs {
        file,
        source_key: "Preset_1000003".to_string(),
        new_title: Some("Sprint Alt".to_string()),
        isolate_groups: false,
    })
    .expect("duplicate");

    assert_eq!(fs::read_to_string(&input).expect("read"), original);
    assert!(backups_in(dir.path()).is_empty());
    assert!(fs::read_to_string(&output).expect("read output").contains("Sprint Alt"));
}

#[test]
fn title_conversion_round_trips_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_sample(dir.path());

    let mut file = file_args(&input);
    file.no_backup = true;
    run_to_titles(&ConvertArgs { file }).expect("to titles");
    let titled = fs::read_to_string(&input).expect("read");
    assert!(titled.contains("controller_action add_layer {{Base::Sprint}} 0 0, Sprint, "));

    let mut file = file_args(&input);
    file.no_backup = true;
    run_to_ids(&ConvertArgs { file }).expect("to ids");
    let numeric = fs::read_to_string(&input).expect("read");
    assert!(numeric.contains("controller_action add_layer 3 0 0, Sprint, "));
}

#[test]
fn apply_mapping_accepts_the_original_tool_format() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_sample(dir.path());
    let mapping = dir.path().join("old_to_new_ids.json");
    fs::write(
        &mapping,
        r#"{"Preset_1000003": {"old_id": 3, "new_id": 7}}"#,
    )
    .expect("write mapping");

    let mut file = file_args(&input);
    file.no_backup = true;
    run_apply_mapping(&ApplyMappingArgs { file, mapping }).expect("apply mapping");

    let edited = fs::read_to_string(&input).expect("read");
    assert!(edited.contains("controller_action add_layer 7 0 0, Sprint, "));
}

#[test]
fn unknown_key_is_an_error_and_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_sample(dir.path());
    let original = fs::read_to_string(&input).expect("read");

    let error = run_delete_set(&DeleteSetArgs {
        file: file_args(&input),
        set_key: "Preset_7777777".to_string(),
    })
    .unwrap_err();
    assert!(error.to_string().contains("Preset_7777777"));
    assert_eq!(fs::read_to_string(&input).expect("read"), original);
    assert!(backups_in(dir.path()).is_empty());
}
