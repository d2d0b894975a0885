//! One runner per subcommand. Every editing command is the same linear
//! pipeline: load, mutate, rebuild the runtime index, rewrite command
//! strings, then write (backup first for in-place edits).

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, info_span};

use sil_edit::{
    GroupCopy, IdMapping, RuntimeIndex, delete_action_set, delete_layer, duplicate_layer,
    ids_to_titles, load_layout, remap_ids, save_layout, shift_layer_ids, titles_to_ids,
    write_backup,
};
use sil_model::{LayoutDocument, RuntimeId};

use crate::cli::{
    ApplyMappingArgs, ConvertArgs, DeleteLayerArgs, DeleteSetArgs, DuplicateLayerArgs, FileArgs,
    ListArgs, ShiftArgs,
};
use crate::summary;

/// Where an edit ended up on disk.
#[derive(Debug)]
pub struct WriteOutcome {
    pub written: Option<PathBuf>,
    pub backup: Option<PathBuf>,
    pub dry_run: bool,
}

/// Write the edited document according to the shared file flags.
///
/// In-place edits get a timestamped backup before the original is touched
/// unless `--no-backup` is given; `-o` writes elsewhere and skips the
/// backup; `--dry-run` writes nothing.
fn write_result(doc: &LayoutDocument, file: &FileArgs) -> Result<WriteOutcome> {
    if file.dry_run {
        info!("dry run; no files written");
        return Ok(WriteOutcome {
            written: None,
            backup: None,
            dry_run: true,
        });
    }
    let in_place = file.output.is_none();
    let target = file.output.clone().unwrap_or_else(|| file.input.clone());
    let mut backup = None;
    if in_place && !file.no_backup {
        backup = Some(write_backup(&file.input).context("write backup")?);
    }
    save_layout(&target, doc).with_context(|| format!("save '{}'", target.display()))?;
    Ok(WriteOutcome {
        written: Some(target),
        backup,
        dry_run: false,
    })
}

pub fn run_duplicate_layer(args: &DuplicateLayerArgs) -> Result<()> {
    let span = info_span!("duplicate_layer", file = %args.file.input.display());
    let _guard = span.enter();
    let mut doc = load_layout(&args.file.input)?;
    let group_copy = if args.isolate_groups {
        GroupCopy::Isolate
    } else {
        GroupCopy::Share
    };
    let report = duplicate_layer(&mut doc, &args.source_key, args.new_title.as_deref(), group_copy)?;
    // Appending at the end leaves every existing runtime ID valid; no
    // command rewriting is needed here.
    let outcome = write_result(&doc, &args.file)?;
    summary::print_duplicate(&report, &outcome);
    Ok(())
}

pub fn run_delete_set(args: &DeleteSetArgs) -> Result<()> {
    let span = info_span!("delete_set", file = %args.file.input.display());
    let _guard = span.enter();
    let mut doc = load_layout(&args.file.input)?;
    let report = delete_action_set(&mut doc, &args.set_key)?;
    let rewrites = remap_ids(&mut doc, &report.id_mapping);
    let outcome = write_result(&doc, &args.file)?;
    summary::print_delete(&report, rewrites, &outcome);
    Ok(())
}

pub fn run_delete_layer(args: &DeleteLayerArgs) -> Result<()> {
    let span = info_span!("delete_layer", file = %args.file.input.display());
    let _guard = span.enter();
    let mut doc = load_layout(&args.file.input)?;
    let report = delete_layer(&mut doc, &args.layer_key)?;
    let rewrites = remap_ids(&mut doc, &report.id_mapping);
    let outcome = write_result(&doc, &args.file)?;
    summary::print_delete(&report, rewrites, &outcome);
    Ok(())
}

pub fn run_to_titles(args: &ConvertArgs) -> Result<()> {
    let mut doc = load_layout(&args.file.input)?;
    let index = RuntimeIndex::build(&doc);
    let count = ids_to_titles(&mut doc, &index);
    let outcome = write_result(&doc, &args.file)?;
    summary::print_rewrite("runtime IDs converted to titles", count, &outcome);
    Ok(())
}

pub fn run_to_ids(args: &ConvertArgs) -> Result<()> {
    let mut doc = load_layout(&args.file.input)?;
    let index = RuntimeIndex::build(&doc);
    let count = titles_to_ids(&mut doc, &index);
    let outcome = write_result(&doc, &args.file)?;
    summary::print_rewrite("titles converted to runtime IDs", count, &outcome);
    Ok(())
}

pub fn run_shift_layer_ids(args: &ShiftArgs) -> Result<()> {
    let mut doc = load_layout(&args.file.input)?;
    let count = shift_layer_ids(&mut doc, args.by);
    let outcome = write_result(&doc, &args.file)?;
    summary::print_rewrite("layer command IDs shifted", count, &outcome);
    Ok(())
}

/// Shape of the mapping file consumed by `apply-mapping`.
#[derive(Debug, Deserialize)]
struct MappingEntry {
    old_id: u32,
    new_id: u32,
}

pub fn run_apply_mapping(args: &ApplyMappingArgs) -> Result<()> {
    let text = fs::read_to_string(&args.mapping)
        .with_context(|| format!("read mapping file '{}'", args.mapping.display()))?;
    let entries: HashMap<String, MappingEntry> = serde_json::from_str(&text)
        .with_context(|| format!("parse mapping file '{}'", args.mapping.display()))?;
    let mut mapping = IdMapping::new();
    for entry in entries.values() {
        mapping.insert(RuntimeId(entry.old_id), RuntimeId(entry.new_id));
    }
    info!(pairs = mapping.len(), "loaded ID mapping");

    let mut doc = load_layout(&args.file.input)?;
    let count = remap_ids(&mut doc, &mapping);
    let outcome = write_result(&doc, &args.file)?;
    summary::print_rewrite("runtime IDs remapped", count, &outcome);
    Ok(())
}

pub fn run_list(args: &ListArgs) -> Result<()> {
    let doc = load_layout(&args.input)?;
    let index = RuntimeIndex::build(&doc);
    summary::print_list(&index);
    Ok(())
}
