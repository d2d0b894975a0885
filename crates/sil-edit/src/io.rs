//! Layout file I/O.
//!
//! Writes are never in place: output is fully serialized, written to a
//! sibling temp file, then renamed over the destination. In-place edits are
//! expected to call [`write_backup`] first; the backup must be on disk
//! before the original is touched.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use sil_model::{LayoutDocument, LayoutError, Result};
use tracing::{debug, info};

/// Load and parse a layout file, verifying the `controller_mappings` root.
pub fn load_layout(path: &Path) -> Result<LayoutDocument> {
    let text = fs::read_to_string(path)?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|source| json_error(path, source))?;
    if value.get("controller_mappings").is_none() {
        return Err(LayoutError::MissingMappings(path.display().to_string()));
    }
    let doc = serde_json::from_value(value).map_err(|source| json_error(path, source))?;
    debug!(path = %path.display(), bytes = text.len(), "loaded layout");
    Ok(doc)
}

/// Serialize tab-indented (matching Valve's exports) and atomically replace
/// `path`. The destination is never left partially written.
pub fn save_layout(path: &Path, doc: &LayoutDocument) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut serializer)
        .map_err(|source| json_error(path, source))?;
    let tmp = temp_path(path);
    fs::write(&tmp, &buf)?;
    fs::rename(&tmp, path)?;
    info!(path = %path.display(), bytes = buf.len(), "saved layout");
    Ok(())
}

/// Copy `path` to `<stem>_backup_<timestamp>.json` beside it.
pub fn write_backup(path: &Path) -> Result<PathBuf> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("layout");
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let backup = path.with_file_name(format!("{stem}_backup_{stamp}.json"));
    fs::copy(path, &backup)?;
    info!(backup = %backup.display(), "backup written");
    Ok(backup)
}

fn json_error(path: &Path, source: serde_json::Error) -> LayoutError {
    LayoutError::Json {
        path: path.display().to_string(),
        source,
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("layout.json");
    path.with_file_name(format!("{name}.tmp"))
}
