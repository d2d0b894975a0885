//! In-memory representation of a Steam Input layout file.
//!
//! The file is a JSON conversion of Valve's KeyValues format. Table order is
//! load-bearing: runtime IDs used by `controller_action` commands are derived
//! from the position of each action set and layer, so every map here is an
//! insertion-ordered [`IndexMap`] and unknown fields ride along in
//! order-preserving [`serde_json::Map`] extras.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered map of unknown/opaque JSON fields carried through a round trip.
pub type JsonMap = Map<String, Value>;

/// A parsed layout file. Owns the four linked tables plus any sibling keys
/// present in the source document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub controller_mappings: ControllerMappings,
    #[serde(flatten)]
    pub extra: JsonMap,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControllerMappings {
    /// Action sets, keyed by identity key (e.g. `Preset_1000001`).
    #[serde(default)]
    pub actions: IndexMap<String, ActionSet>,
    /// Action layers, keyed like action sets; ordered after all sets for
    /// runtime-ID purposes.
    #[serde(default)]
    pub action_layers: IndexMap<String, ActionLayer>,
    /// Binding snapshots, one per action set or layer.
    #[serde(default)]
    pub preset: Vec<Preset>,
    /// Shared input-binding bundles referenced by presets.
    #[serde(default)]
    pub group: Vec<Group>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// Top-level input context ("Base", "Gyro", ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionSet {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_set: Option<String>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// Overlay applied on top of its parent set's bindings while active.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionLayer {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_layer: Option<String>,
    /// Identity key of the owning action set.
    #[serde(default)]
    pub parent_set_name: String,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// Binding snapshot owned by exactly one action set or layer (`name` holds
/// the owner's identity key).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preset {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Group ID -> activation state (`active`, `inactive`, modeshift forms).
    #[serde(default)]
    pub group_source_bindings: IndexMap<String, String>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// Reusable bundle of physical-input bindings. The editor only interprets
/// `id` and `mode`; inputs and settings stay opaque in `extra` (command
/// strings inside them are patched by the rewriter via tree walks).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// Derived 1-based ordinal of an action set or layer: all sets in table
/// order, then all layers in table order. Never stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuntimeId(pub u32);

impl std::fmt::Display for RuntimeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ControllerMappings {
    /// True if `key` names an action set or an action layer.
    pub fn contains_identity(&self, key: &str) -> bool {
        self.actions.contains_key(key) || self.action_layers.contains_key(key)
    }

    /// Highest `N` across `Preset_N` identity keys in both tables.
    pub fn max_preset_number(&self) -> u64 {
        self.actions
            .keys()
            .chain(self.action_layers.keys())
            .filter_map(|key| key.strip_prefix("Preset_"))
            .filter_map(|digits| digits.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
    }

    /// Fresh identity key that collides with neither table.
    pub fn next_preset_key(&self) -> String {
        format!("Preset_{}", self.max_preset_number() + 1)
    }

    /// Highest numeric group ID in the group table.
    pub fn max_group_id(&self) -> u64 {
        self.group
            .iter()
            .filter_map(|group| group.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
    }

    /// Highest numeric `id` field across preset entries.
    pub fn max_preset_array_id(&self) -> u64 {
        self.preset
            .iter()
            .filter_map(|preset| preset.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
    }

    /// Preset entry owned by the given set/layer identity key.
    pub fn preset_named(&self, name: &str) -> Option<&Preset> {
        self.preset.iter().find(|preset| preset.name == name)
    }

    pub fn group_by_id(&self, id: &str) -> Option<&Group> {
        self.group.iter().find(|group| group.id == id)
    }
}
