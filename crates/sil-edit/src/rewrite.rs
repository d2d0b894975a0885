//! Rewriting of embedded `controller_action` command strings.
//!
//! Binding strings inside group inputs carry runtime IDs as literal text:
//! `controller_action <verb> <id> <beep> <notify>, <label>, `. After any
//! structural edit those literals go stale, so every recognized command is
//! parsed, its reference token remapped, and the string reformatted. All
//! string-level assumptions about the grammar live in [`Command`].
//!
//! ID remapping uses a two-pass protocol: pass 1 turns each matched literal
//! into a composite `old_new` token (driven purely off original literals),
//! pass 2 collapses composites to the bare new ID. Each original token is
//! rewritten at most once, regardless of pair ordering or collisions
//! between old and new ID spaces.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use sil_model::{LayoutDocument, RuntimeId};
use tracing::{debug, warn};

use crate::index::RuntimeIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    AddLayer,
    RemoveLayer,
    HoldLayer,
    ChangePreset,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddLayer => "add_layer",
            Self::RemoveLayer => "remove_layer",
            Self::HoldLayer => "hold_layer",
            Self::ChangePreset => "CHANGE_PRESET",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token {
            "add_layer" => Some(Self::AddLayer),
            "remove_layer" => Some(Self::RemoveLayer),
            "hold_layer" => Some(Self::HoldLayer),
            "CHANGE_PRESET" => Some(Self::ChangePreset),
            _ => None,
        }
    }

    /// Layer verbs reference action layers; `CHANGE_PRESET` references sets.
    pub fn is_layer_verb(self) -> bool {
        !matches!(self, Self::ChangePreset)
    }
}

/// The reference slot of a command: a bare runtime ID, the intermediate
/// `old_new` composite produced by pass 1, or a `{{Qualified Title}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefToken {
    Id(u32),
    Composite { old: u32, new: u32 },
    Title(String),
}

impl fmt::Display for RefToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Composite { old, new } => write!(f, "{old}_{new}"),
            Self::Title(title) => write!(f, "{{{{{title}}}}}"),
        }
    }
}

/// One parsed command string. `rest` keeps everything after the reference
/// token verbatim (flags, label, trailing separators), so reformatting a
/// command changes nothing but the reference slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: Verb,
    pub reference: RefToken,
    rest: String,
}

impl Command {
    /// Parse a binding string. Returns `None` for anything that is not a
    /// recognized command with a well-formed reference and flag suffix.
    pub fn parse(text: &str) -> Option<Self> {
        let tail = text.strip_prefix("controller_action ")?;
        let (verb_token, after) = tail.split_once(' ')?;
        let verb = Verb::parse(verb_token)?;
        let (reference, rest) = if let Some(titled) = after.strip_prefix("{{") {
            let (title, rest) = titled.split_once("}}")?;
            (RefToken::Title(title.to_string()), rest.to_string())
        } else {
            let end = after.find(' ').unwrap_or(after.len());
            let token = &after[..end];
            let reference = match token.split_once('_') {
                Some((old, new)) => RefToken::Composite {
                    old: old.parse().ok()?,
                    new: new.parse().ok()?,
                },
                None => RefToken::Id(token.parse().ok()?),
            };
            (reference, after[end..].to_string())
        };
        if !valid_suffix(&rest) {
            return None;
        }
        Some(Self { verb, reference, rest })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "controller_action {} {}{}",
            self.verb.as_str(),
            self.reference,
            self.rest
        )
    }
}

/// The reference must be followed by ` <beep> <notify>` and then either the
/// end of the string or the `, label` continuation.
fn valid_suffix(rest: &str) -> bool {
    let Some(tail) = rest.strip_prefix(' ') else {
        return false;
    };
    let Some((beep, tail)) = tail.split_once(' ') else {
        return false;
    };
    if beep.is_empty() || !beep.bytes().all(|byte| byte.is_ascii_digit()) {
        return false;
    }
    let notify_len = tail
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(tail.len());
    if notify_len == 0 {
        return false;
    }
    let after = &tail[notify_len..];
    after.is_empty() || after.starts_with(',') || after.starts_with(' ')
}

/// Old runtime ID -> new runtime ID pairs for a remap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdMapping {
    pairs: BTreeMap<u32, u32>,
}

impl IdMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs for every key present in both indices whose position shifted.
    pub fn between(before: &RuntimeIndex, after: &RuntimeIndex) -> Self {
        let mut mapping = Self::new();
        for entry in before.entries() {
            if let Some(new_id) = after.id_of(&entry.key)
                && new_id != entry.id
            {
                mapping.insert(entry.id, new_id);
            }
        }
        mapping
    }

    pub fn insert(&mut self, old: RuntimeId, new: RuntimeId) {
        self.pairs.insert(old.0, new.0);
    }

    pub fn get(&self, old: u32) -> Option<u32> {
        self.pairs.get(&old).copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.pairs.iter().map(|(&old, &new)| (old, new))
    }
}

/// Rewrite every command whose numeric reference has a mapping entry.
/// Returns the number of commands rewritten.
pub fn remap_ids(doc: &mut LayoutDocument, mapping: &IdMapping) -> usize {
    if mapping.is_empty() {
        return 0;
    }
    // Pass 1: original literal -> composite. Composites are not matched by
    // this pass, so its own output is never rewritten again.
    let pass1 = rewrite_commands(doc, |command| match command.reference {
        RefToken::Id(old) => mapping
            .get(old)
            .map(|new| RefToken::Composite { old, new }),
        _ => None,
    });
    // Pass 2: composite -> bare new ID.
    let pass2 = rewrite_commands(doc, |command| match command.reference {
        RefToken::Composite { new, .. } => Some(RefToken::Id(new)),
        _ => None,
    });
    if pass1 != pass2 {
        warn!(
            pass1,
            pass2, "replacement count mismatch; file contained stray composite tokens"
        );
    }
    debug!(rewrites = pass2, pairs = mapping.len(), "runtime IDs remapped");
    pass2
}

/// Replace numeric references with `{{Qualified Title}}` tokens.
/// IDs that resolve to no entry are warned about and left alone.
pub fn ids_to_titles(doc: &mut LayoutDocument, index: &RuntimeIndex) -> usize {
    rewrite_commands(doc, |command| match command.reference {
        RefToken::Id(id) => match index.entry_of_id(RuntimeId(id)) {
            Some(entry) => Some(RefToken::Title(entry.qualified_title())),
            None => {
                warn!(id, "command references runtime ID outside the tables");
                None
            }
        },
        _ => None,
    })
}

/// Replace `{{Qualified Title}}` tokens with numeric references. Unknown
/// titles are warned about and left in place.
pub fn titles_to_ids(doc: &mut LayoutDocument, index: &RuntimeIndex) -> usize {
    let lookup = index.title_lookup();
    rewrite_commands(doc, |command| match &command.reference {
        RefToken::Title(title) => match lookup.get(title) {
            Some(id) => Some(RefToken::Id(id.0)),
            None => {
                warn!(title = %title, "no runtime ID for title; token left unchanged");
                None
            }
        },
        _ => None,
    })
}

/// Add `delta` to the reference of every layer command (`add_layer`,
/// `remove_layer`, `hold_layer`), clamped at 1. `CHANGE_PRESET` is left
/// untouched.
pub fn shift_layer_ids(doc: &mut LayoutDocument, delta: i64) -> usize {
    rewrite_commands(doc, |command| {
        if !command.verb.is_layer_verb() {
            return None;
        }
        match command.reference {
            RefToken::Id(id) => {
                let shifted = (i64::from(id) + delta).max(1);
                Some(RefToken::Id(shifted as u32))
            }
            _ => None,
        }
    })
}

/// Walk every string in every group's opaque JSON, parse it as a command,
/// and apply `edit`. `edit` returns the replacement reference token, or
/// `None` to leave the string untouched.
fn rewrite_commands(
    doc: &mut LayoutDocument,
    mut edit: impl FnMut(&Command) -> Option<RefToken>,
) -> usize {
    let mut rewrites = 0;
    for group in &mut doc.controller_mappings.group {
        for value in group.extra.values_mut() {
            visit_strings(value, &mut |text| {
                let Some(mut command) = Command::parse(text) else {
                    return;
                };
                if let Some(reference) = edit(&command) {
                    command.reference = reference;
                    *text = command.to_string();
                    rewrites += 1;
                }
            });
        }
    }
    rewrites
}

fn visit_strings(value: &mut Value, visit: &mut impl FnMut(&mut String)) {
    match value {
        Value::String(text) => visit(text),
        Value::Array(items) => {
            for item in items {
                visit_strings(item, visit);
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                visit_strings(item, visit);
            }
        }
        _ => {}
    }
}
