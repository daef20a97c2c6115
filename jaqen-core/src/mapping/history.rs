//! JSON side-store that keeps assignment history independent of `config.xml`.
//!
//! The game may rewrite or reset its own mapping file; the side-store lets a
//! later run recover every previous assignment.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::xml::{FormatVariant, RecordFlags};
use crate::error::MappingError;
use crate::util::write_atomic;

/// Suffix appended to the mapping file name to form the side-store name.
pub const HISTORY_SUFFIX: &str = ".jaqen.json";

/// On-disk layout of the side-store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFile {
    pub variant: FormatVariant,
    #[serde(default)]
    pub flags: RecordFlags,
    /// RFC 3339 timestamp of the last save.
    pub saved_at: String,
    /// Player id → image path.
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

/// Default side-store location for a mapping file: `config.xml` → `config.xml.jaqen.json`.
pub fn history_path_for(mapping_path: &Path) -> PathBuf {
    let mut name = mapping_path
        .file_name()
        .unwrap_or_default()
        .to_os_string();
    name.push(HISTORY_SUFFIX);
    mapping_path.with_file_name(name)
}

/// Load the side-store, or `None` if it does not exist yet.
pub fn load_history(path: &Path) -> Result<Option<HistoryFile>, MappingError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Persist the side-store atomically, stamping the save time.
pub fn save_history(
    path: &Path,
    variant: FormatVariant,
    flags: RecordFlags,
    entries: &BTreeMap<String, String>,
) -> Result<HistoryFile, MappingError> {
    let history = HistoryFile {
        variant,
        flags,
        saved_at: chrono::Utc::now().to_rfc3339(),
        entries: entries.clone(),
    };
    let json = serde_json::to_string_pretty(&history)?;
    write_atomic(path, json.as_bytes())?;
    Ok(history)
}
