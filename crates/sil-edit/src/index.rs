//! Runtime-ID assignment.
//!
//! Runtime IDs are not stored anywhere in the file; Steam derives them from
//! table order at load time. [`RuntimeIndex::build`] is the single source of
//! truth for that derivation: action sets in table order get 1, 2, ...,
//! action layers continue the sequence. The index is recomputed fully after
//! every structural edit; nothing here caches across edits.

use std::collections::HashMap;

use sil_model::{LayoutDocument, LayoutError, Result, RuntimeId};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    ActionSet,
    ActionLayer,
}

/// One action set or layer, resolved to its runtime ID.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub key: String,
    pub id: RuntimeId,
    pub kind: EntryKind,
    pub title: String,
    /// Identity key of the parent set; layers only.
    pub parent_key: Option<String>,
    /// Resolved title of the parent set; layers only. Falls back to the
    /// parent key when the parent is missing from the actions table.
    pub parent_title: Option<String>,
}

impl IndexEntry {
    /// Title token used in human-readable command strings: `Title` for
    /// sets, `ParentTitle::Title` for layers. Parent qualification keeps
    /// same-named layers under different sets distinguishable.
    pub fn qualified_title(&self) -> String {
        match &self.parent_title {
            Some(parent) => format!("{parent}::{}", self.title),
            None => self.title.clone(),
        }
    }
}

/// Identity key -> runtime ID mapping over both tables.
#[derive(Debug, Clone, Default)]
pub struct RuntimeIndex {
    entries: Vec<IndexEntry>,
    by_key: HashMap<String, usize>,
}

impl RuntimeIndex {
    /// Derive runtime IDs from the document's current table order.
    pub fn build(doc: &LayoutDocument) -> Self {
        let cm = &doc.controller_mappings;
        let mut entries = Vec::with_capacity(cm.actions.len() + cm.action_layers.len());
        for (key, set) in &cm.actions {
            entries.push(IndexEntry {
                key: key.clone(),
                id: RuntimeId(entries.len() as u32 + 1),
                kind: EntryKind::ActionSet,
                title: set.title.clone(),
                parent_key: None,
                parent_title: None,
            });
        }
        for (key, layer) in &cm.action_layers {
            let parent_title = cm
                .actions
                .get(&layer.parent_set_name)
                .map(|set| set.title.clone())
                .unwrap_or_else(|| layer.parent_set_name.clone());
            entries.push(IndexEntry {
                key: key.clone(),
                id: RuntimeId(entries.len() as u32 + 1),
                kind: EntryKind::ActionLayer,
                title: layer.title.clone(),
                parent_key: Some(layer.parent_set_name.clone()),
                parent_title: Some(parent_title),
            });
        }
        let by_key = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.key.clone(), position))
            .collect();
        Self { entries, by_key }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn entry(&self, key: &str) -> Option<&IndexEntry> {
        self.by_key.get(key).map(|&position| &self.entries[position])
    }

    pub fn id_of(&self, key: &str) -> Option<RuntimeId> {
        self.entry(key).map(|entry| entry.id)
    }

    /// As [`id_of`](Self::id_of), but an unknown key is an error.
    pub fn require(&self, key: &str) -> Result<RuntimeId> {
        self.id_of(key)
            .ok_or_else(|| LayoutError::UnknownKey(key.to_string()))
    }

    pub fn entry_of_id(&self, id: RuntimeId) -> Option<&IndexEntry> {
        let position = id.0.checked_sub(1)? as usize;
        self.entries.get(position)
    }

    /// Qualified title -> runtime ID, for converting titles back to IDs.
    /// Colliding qualified titles are warned about; the first occurrence
    /// wins, matching Steam's own first-match resolution.
    pub fn title_lookup(&self) -> HashMap<String, RuntimeId> {
        let mut lookup = HashMap::with_capacity(self.entries.len());
        for entry in &self.entries {
            let title = entry.qualified_title();
            if let Some(existing) = lookup.get(&title) {
                warn!(
                    title = %title,
                    first = %existing,
                    duplicate = %entry.id,
                    "duplicate qualified title; title conversion keeps the first"
                );
                continue;
            }
            lookup.insert(title, entry.id);
        }
        lookup
    }
}
