//! Structural edits on the layout graph.
//!
//! Each operation keeps the four tables referentially consistent but does
//! not touch embedded command strings. Any edit here invalidates previously
//! computed runtime IDs; callers rebuild the [`RuntimeIndex`] and feed the
//! returned [`IdMapping`] to the rewriter.

use std::collections::HashSet;

use sil_model::{ControllerMappings, LayoutDocument, LayoutError, Preset, Result, RuntimeId};
use tracing::{debug, warn};

use crate::index::RuntimeIndex;
use crate::rewrite::IdMapping;

/// Group handling when duplicating a layer.
///
/// Shared is the default: the copy starts from the same mechanical bindings
/// as the source, and cloning group rows only inflates the file. Isolate
/// deep-copies every referenced group under fresh IDs for callers that want
/// an independently editable copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupCopy {
    #[default]
    Share,
    Isolate,
}

#[derive(Debug, Clone)]
pub struct DuplicateReport {
    pub source_key: String,
    pub source_title: String,
    pub source_id: RuntimeId,
    pub new_key: String,
    pub new_title: String,
    pub new_id: RuntimeId,
    /// Old group ID -> new group ID; empty when groups are shared.
    pub groups_copied: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct DeleteReport {
    pub target_key: String,
    pub target_title: String,
    /// (identity key, title) of every cascaded layer.
    pub layers_removed: Vec<(String, String)>,
    pub presets_removed: Vec<String>,
    pub groups_removed: Vec<String>,
    pub bindings_removed: usize,
    /// Old -> new runtime IDs for surviving entries whose position shifted.
    pub id_mapping: IdMapping,
}

/// Copy an action layer together with its preset entry.
///
/// The copy is appended at the end of the layer table so that every
/// pre-existing runtime ID is unchanged; only the new layer receives a new
/// ID (N+1). No command strings need rewriting after this operation.
pub fn duplicate_layer(
    doc: &mut LayoutDocument,
    source_key: &str,
    new_title: Option<&str>,
    group_copy: GroupCopy,
) -> Result<DuplicateReport> {
    let cm = &doc.controller_mappings;
    if !cm.action_layers.contains_key(source_key) {
        return Err(if cm.actions.contains_key(source_key) {
            LayoutError::NotAnActionLayer(source_key.to_string())
        } else {
            LayoutError::UnknownKey(source_key.to_string())
        });
    }
    let before = RuntimeIndex::build(doc);
    let source_id = before.require(source_key)?;

    let cm = &mut doc.controller_mappings;
    let new_key = cm.next_preset_key();
    let mut new_layer = cm.action_layers[source_key].clone();
    let source_title = new_layer.title.clone();
    let new_title = new_title
        .map(str::to_string)
        .unwrap_or_else(|| format!("{source_title} (Copy)"));
    new_layer.title = new_title.clone();

    let source_bindings = match cm.preset_named(source_key) {
        Some(preset) => preset.group_source_bindings.clone(),
        None => {
            warn!(key = source_key, "layer has no preset entry; copy gets empty bindings");
            Default::default()
        }
    };

    let mut groups_copied = Vec::new();
    let new_bindings = match group_copy {
        GroupCopy::Share => source_bindings,
        GroupCopy::Isolate => {
            let mut next_group_id = cm.max_group_id();
            let mut bindings = indexmap::IndexMap::new();
            for (old_id, state) in &source_bindings {
                let Some(group) = cm.group_by_id(old_id) else {
                    warn!(group = %old_id, "referenced group missing; binding kept as-is");
                    bindings.insert(old_id.clone(), state.clone());
                    continue;
                };
                next_group_id += 1;
                let mut copy = group.clone();
                copy.id = next_group_id.to_string();
                debug!(from = %old_id, to = %copy.id, mode = ?copy.mode, "copied group");
                bindings.insert(copy.id.clone(), state.clone());
                groups_copied.push((old_id.clone(), copy.id.clone()));
                cm.group.push(copy);
            }
            bindings
        }
    };

    let new_preset = Preset {
        id: (cm.max_preset_array_id() + 1).to_string(),
        name: new_key.clone(),
        group_source_bindings: new_bindings,
        extra: Default::default(),
    };
    cm.action_layers.insert(new_key.clone(), new_layer);
    cm.preset.push(new_preset);

    let after = RuntimeIndex::build(doc);
    let new_id = after.require(&new_key)?;
    Ok(DuplicateReport {
        source_key: source_key.to_string(),
        source_title,
        source_id,
        new_key,
        new_title,
        new_id,
        groups_copied,
    })
}

/// Remove an action set and everything that exists only because of it:
/// every layer parented to it, every preset owned by a removed entry, and
/// every group left without a referencing preset. Groups still referenced
/// by a surviving preset are retained.
pub fn delete_action_set(doc: &mut LayoutDocument, set_key: &str) -> Result<DeleteReport> {
    let cm = &doc.controller_mappings;
    if !cm.actions.contains_key(set_key) {
        return Err(if cm.action_layers.contains_key(set_key) {
            LayoutError::NotAnActionSet(set_key.to_string())
        } else {
            LayoutError::UnknownKey(set_key.to_string())
        });
    }
    let before = RuntimeIndex::build(doc);

    let cm = &mut doc.controller_mappings;
    let layers_removed: Vec<(String, String)> = cm
        .action_layers
        .iter()
        .filter(|(_, layer)| layer.parent_set_name == set_key)
        .map(|(key, layer)| (key.clone(), layer.title.clone()))
        .collect();
    let mut doomed: HashSet<String> = layers_removed.iter().map(|(key, _)| key.clone()).collect();
    doomed.insert(set_key.to_string());

    let target = cm
        .actions
        .shift_remove(set_key)
        .ok_or_else(|| LayoutError::UnknownKey(set_key.to_string()))?;
    for (key, _) in &layers_removed {
        cm.action_layers.shift_remove(key);
    }
    let (presets_removed, groups_removed, bindings_removed) = cascade_presets(cm, &doomed);

    let after = RuntimeIndex::build(doc);
    Ok(DeleteReport {
        target_key: set_key.to_string(),
        target_title: target.title,
        layers_removed,
        presets_removed,
        groups_removed,
        bindings_removed,
        id_mapping: IdMapping::between(&before, &after),
    })
}

/// Remove a single action layer and its preset; parent set untouched.
/// Layers never parent other layers, so the cascade stops at its groups.
pub fn delete_layer(doc: &mut LayoutDocument, layer_key: &str) -> Result<DeleteReport> {
    let cm = &doc.controller_mappings;
    if !cm.action_layers.contains_key(layer_key) {
        return Err(if cm.actions.contains_key(layer_key) {
            LayoutError::NotAnActionLayer(layer_key.to_string())
        } else {
            LayoutError::UnknownKey(layer_key.to_string())
        });
    }
    let before = RuntimeIndex::build(doc);

    let cm = &mut doc.controller_mappings;
    let target = cm
        .action_layers
        .shift_remove(layer_key)
        .ok_or_else(|| LayoutError::UnknownKey(layer_key.to_string()))?;
    let doomed = HashSet::from([layer_key.to_string()]);
    let (presets_removed, groups_removed, bindings_removed) = cascade_presets(cm, &doomed);

    let after = RuntimeIndex::build(doc);
    Ok(DeleteReport {
        target_key: layer_key.to_string(),
        target_title: target.title,
        layers_removed: Vec::new(),
        presets_removed,
        groups_removed,
        bindings_removed,
        id_mapping: IdMapping::between(&before, &after),
    })
}

/// Shared tail of both delete operations: drop presets owned by doomed
/// entries, collect orphaned groups, prune dangling bindings, and renumber
/// the preset array IDs back to a dense 0..n sequence.
fn cascade_presets(
    cm: &mut ControllerMappings,
    doomed: &HashSet<String>,
) -> (Vec<String>, Vec<String>, usize) {
    // Groups referenced by the presets about to be removed are deletion
    // candidates; they survive if any remaining preset still uses them.
    let mut candidates: HashSet<String> = HashSet::new();
    for preset in cm.preset.iter().filter(|preset| doomed.contains(&preset.name)) {
        candidates.extend(preset.group_source_bindings.keys().cloned());
    }

    let mut presets_removed = Vec::new();
    cm.preset.retain(|preset| {
        if doomed.contains(&preset.name) {
            presets_removed.push(preset.name.clone());
            false
        } else {
            true
        }
    });

    let still_referenced: HashSet<&String> = cm
        .preset
        .iter()
        .flat_map(|preset| preset.group_source_bindings.keys())
        .collect();
    let mut orphans: Vec<String> = candidates
        .into_iter()
        .filter(|id| !still_referenced.contains(id))
        .collect();
    orphans.sort_by_key(|id| id.parse::<u64>().unwrap_or(u64::MAX));
    let orphan_set: HashSet<&String> = orphans.iter().collect();
    cm.group.retain(|group| !orphan_set.contains(&group.id));
    for id in &orphans {
        warn!(group = %id, "group orphaned by cascade, removed");
    }

    // Any binding now pointing at a nonexistent group (orphan or already
    // dangling in the source file) is dropped.
    let remaining: HashSet<String> = cm.group.iter().map(|group| group.id.clone()).collect();
    let mut bindings_removed = 0;
    for preset in &mut cm.preset {
        let len_before = preset.group_source_bindings.len();
        preset
            .group_source_bindings
            .retain(|id, _| remaining.contains(id));
        bindings_removed += len_before - preset.group_source_bindings.len();
    }

    for (position, preset) in cm.preset.iter_mut().enumerate() {
        preset.id = position.to_string();
    }

    (presets_removed, orphans, bindings_removed)
}
