//! Shared layout fixture for integration tests.

use serde_json::json;
use sil_model::LayoutDocument;

/// Two action sets (Base, Gyro), two layers under Base (Sprint, Crouch).
/// Runtime IDs: Base=1, Gyro=2, Sprint=3, Crouch=4. Group 1 is shared by
/// the Base and Gyro presets; group 3 belongs to Gyro alone.
pub fn sample_layout() -> LayoutDocument {
    serde_json::from_value(json!({
        "version": "3",
        "controller_mappings": {
            "title": "Test Layout",
            "actions": {
                "Preset_1000001": {"title": "Base", "legacy_set": "0"},
                "Preset_1000002": {"title": "Gyro", "legacy_set": "0"}
            },
            "action_layers": {
                "Preset_1000003": {
                    "title": "Sprint", "legacy_set": "0", "set_layer": "1",
                    "parent_set_name": "Preset_1000001"
                },
                "Preset_1000004": {
                    "title": "Crouch", "legacy_set": "0", "set_layer": "1",
                    "parent_set_name": "Preset_1000001"
                }
            },
            "preset": [
                {"id": "0", "name": "Preset_1000001",
                 "group_source_bindings": {"1": "switch active", "2": "button_diamond active"}},
                {"id": "1", "name": "Preset_1000002",
                 "group_source_bindings": {"1": "switch active", "3": "gyro active"}},
                {"id": "2", "name": "Preset_1000003",
                 "group_source_bindings": {"4": "button_diamond active"}},
                {"id": "3", "name": "Preset_1000004",
                 "group_source_bindings": {"5": "button_diamond active"}}
            ],
            "group": [
                {"id": "1", "mode": "switches", "inputs": {
                    "button_escape": {"activators": {"Full_Press": {"bindings": {
                        "binding": "controller_action CHANGE_PRESET 2 0 0, Gyro, "
                    }}}}
                }},
                {"id": "2", "mode": "four_buttons", "inputs": {
                    "button_a": {"activators": {"Full_Press": {"bindings": {
                        "binding": "controller_action add_layer 3 0 0, Sprint, "
                    }}}},
                    "button_b": {"activators": {"Full_Press": {"bindings": {
                        "binding": "controller_action add_layer 4 0 0, Crouch, "
                    }}}}
                }},
                {"id": "3", "mode": "gyro"},
                {"id": "4", "mode": "four_buttons", "inputs": {
                    "button_a": {"activators": {"Full_Press": {"bindings": {
                        "binding": "controller_action remove_layer 3 0 0, Sprint off, "
                    }}}}
                }},
                {"id": "5", "mode": "four_buttons", "inputs": {
                    "button_b": {"activators": {"Full_Press": {"bindings": {
                        "binding": "controller_action hold_layer 4 1 0, Crouch hold, "
                    }}}}
                }}
            ]
        }
    }))
    .expect("fixture parses")
}

/// Every string under the group table that looks like a command, in table
/// order, for whole-document assertions.
pub fn command_strings(doc: &LayoutDocument) -> Vec<String> {
    fn collect(value: &serde_json::Value, out: &mut Vec<String>) {
        match value {
            serde_json::Value::String(text) => {
                if text.starts_with("controller_action ") {
                    out.push(text.clone());
                }
            }
            serde_json::Value::Array(items) => items.iter().for_each(|item| collect(item, out)),
            serde_json::Value::Object(map) => map.values().for_each(|item| collect(item, out)),
            _ => {}
        }
    }
    let mut out = Vec::new();
    for group in &doc.controller_mappings.group {
        for value in group.extra.values() {
            collect(value, &mut out);
        }
    }
    out
}
