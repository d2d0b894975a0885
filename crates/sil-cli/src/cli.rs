//! CLI argument definitions for the layout editor.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sil",
    version,
    about = "Steam Input layout editor - Edit controller layout JSON files",
    long_about = "Edit Steam Input controller layout JSON files.\n\n\
                  Duplicates layers, deletes action sets with full cascade, and keeps the\n\
                  runtime IDs embedded in controller_action command strings consistent\n\
                  across every structural edit."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Duplicate an action layer, appending the copy after all layers.
    DuplicateLayer(DuplicateLayerArgs),

    /// Delete an action set and everything that exists only because of it.
    DeleteSet(DeleteSetArgs),

    /// Delete a single action layer and its preset.
    DeleteLayer(DeleteLayerArgs),

    /// Replace numeric runtime IDs in commands with readable titles.
    ToTitles(ConvertArgs),

    /// Replace readable titles in commands back with runtime IDs.
    ToIds(ConvertArgs),

    /// Add a delta to every layer command's runtime ID.
    ShiftLayerIds(ShiftArgs),

    /// Remap runtime IDs from an old-to-new mapping file.
    ApplyMapping(ApplyMappingArgs),

    /// List action sets and layers with their runtime IDs.
    List(ListArgs),
}

/// Arguments shared by every file-editing subcommand.
#[derive(Parser)]
pub struct FileArgs {
    /// Input layout JSON file.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Write to a different file instead of editing in place.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report what would change without writing anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Skip the timestamped backup written before in-place edits.
    #[arg(long = "no-backup")]
    pub no_backup: bool,
}

#[derive(Parser)]
pub struct DuplicateLayerArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// Identity key of the layer to duplicate (e.g. Preset_1000006).
    #[arg(value_name = "LAYER_KEY")]
    pub source_key: String,

    /// Title for the copy (default: "<source title> (Copy)").
    #[arg(value_name = "TITLE")]
    pub new_title: Option<String>,

    /// Deep-copy referenced groups under fresh IDs instead of sharing them.
    ///
    /// By default the copy references the same groups as the source, so it
    /// starts from identical bindings without inflating the file.
    #[arg(long = "isolate-groups")]
    pub isolate_groups: bool,
}

#[derive(Parser)]
pub struct DeleteSetArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// Identity key of the action set to delete.
    #[arg(value_name = "SET_KEY")]
    pub set_key: String,
}

#[derive(Parser)]
pub struct DeleteLayerArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// Identity key of the action layer to delete.
    #[arg(value_name = "LAYER_KEY")]
    pub layer_key: String,
}

#[derive(Parser)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub file: FileArgs,
}

#[derive(Parser)]
pub struct ShiftArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// Signed delta added to each layer command's ID (negative decrements).
    #[arg(long = "by", value_name = "DELTA", allow_hyphen_values = true)]
    pub by: i64,
}

#[derive(Parser)]
pub struct ApplyMappingArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// Mapping JSON: {"Preset_...": {"old_id": N, "new_id": M}, ...}.
    #[arg(short, long, value_name = "FILE")]
    pub mapping: PathBuf,
}

#[derive(Parser)]
pub struct ListArgs {
    /// Input layout JSON file.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
