//! Human-readable result output on stdout. Logs go to stderr; these are
//! the actual answers.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use sil_edit::{DeleteReport, DuplicateReport, EntryKind, RuntimeIndex};

use crate::commands::WriteOutcome;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

pub fn print_list(index: &RuntimeIndex) {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Kind", "Key", "Title", "Parent"]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for entry in index.entries() {
        let kind = match entry.kind {
            EntryKind::ActionSet => "set",
            EntryKind::ActionLayer => "layer",
        };
        table.add_row(vec![
            Cell::new(entry.id),
            Cell::new(kind),
            Cell::new(&entry.key),
            Cell::new(&entry.title),
            Cell::new(entry.parent_title.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");
}

pub fn print_duplicate(report: &DuplicateReport, outcome: &WriteOutcome) {
    println!(
        "Duplicated {} ('{}', runtime ID {})",
        report.source_key, report.source_title, report.source_id
    );
    println!(
        "  -> {} ('{}', runtime ID {})",
        report.new_key, report.new_title, report.new_id
    );
    if report.groups_copied.is_empty() {
        println!("  groups: shared with source");
    } else {
        println!("  groups copied:");
        for (old, new) in &report.groups_copied {
            println!("    {old} -> {new}");
        }
    }
    print_outcome(outcome);
}

pub fn print_delete(report: &DeleteReport, rewrites: usize, outcome: &WriteOutcome) {
    println!("Deleted {} ('{}')", report.target_key, report.target_title);
    for (key, title) in &report.layers_removed {
        println!("  cascaded layer: {key} ('{title}')");
    }
    println!(
        "  presets removed: {}, groups removed: {}, stale bindings dropped: {}",
        report.presets_removed.len(),
        report.groups_removed.len(),
        report.bindings_removed
    );
    if report.id_mapping.is_empty() {
        println!("  runtime IDs: unchanged");
    } else {
        let pairs: Vec<String> = report
            .id_mapping
            .iter()
            .map(|(old, new)| format!("{old}->{new}"))
            .collect();
        println!(
            "  runtime IDs remapped ({}), {} command strings rewritten",
            pairs.join(", "),
            rewrites
        );
    }
    print_outcome(outcome);
}

pub fn print_rewrite(label: &str, count: usize, outcome: &WriteOutcome) {
    println!("{count} {label}");
    print_outcome(outcome);
}

fn print_outcome(outcome: &WriteOutcome) {
    if outcome.dry_run {
        println!("Dry run: no files written");
        return;
    }
    if let Some(backup) = &outcome.backup {
        println!("Backup: {}", backup.display());
    }
    if let Some(written) = &outcome.written {
        println!("Saved: {}", written.display());
    }
}
