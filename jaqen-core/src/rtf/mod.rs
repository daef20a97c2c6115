//! Player extraction from the game's rich-text report export.
//!
//! The export is a pipe-delimited table wrapped in RTF formatting:
//!
//! ```text
//! {\rtf1\ansi ... \pard\f0\fs20 | UID        | Nat | Name         |\par
//! | ---------------------------------------- |\par
//! | 2000304951 | ENG | Harry Smith  |\par
//! }
//! ```
//!
//! [`lexer`] tokenises the RTF, [`text`] rebuilds the visible lines, and this
//! module splits the lines into rows and resolves each row's nation.

pub mod lexer;
pub mod text;

use std::path::Path;

use crate::error::ExtractError;
use crate::ethnicity::{EthnicCategory, NationTable};

/// A well-formed data row, nation normalised but not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub id: String,
    pub nation: String,
}

/// A player ready for image allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: String,
    pub nation: String,
    pub ethnic: EthnicCategory,
}

const ID_HEADERS: &[&str] = &["uid", "unique id", "id"];
const NATION_HEADERS: &[&str] = &["nat", "nation", "nationality"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    id: usize,
    nation: usize,
}

impl Default for Columns {
    fn default() -> Self {
        Self { id: 0, nation: 1 }
    }
}

/// Rebuild the plain text lines of an export.
///
/// Input that does not start with `{\rtf` is treated as already-plain text.
pub fn export_lines(input: &str) -> Vec<String> {
    if input.trim_start().starts_with("{\\rtf") {
        text::plain_lines(lexer::Lexer::new(input))
    } else {
        input.lines().map(str::to_string).collect()
    }
}

/// Split a table line into trimmed fields.
///
/// Returns `None` for lines that are not part of a pipe table.
fn split_fields(line: &str) -> Option<Vec<String>> {
    let line = line.trim();
    if !line.contains('|') {
        return None;
    }
    let mut parts: Vec<&str> = line.split('|').collect();
    if line.starts_with('|') {
        parts.remove(0);
    }
    if line.ends_with('|') {
        parts.pop();
    }
    Some(parts.into_iter().map(|p| p.trim().to_string()).collect())
}

fn is_separator(fields: &[String]) -> bool {
    fields
        .iter()
        .all(|f| f.chars().all(|c| matches!(c, '-' | '=' | '+' | ' ')))
}

fn header_columns(fields: &[String]) -> Option<Columns> {
    let find = |names: &[&str]| {
        fields
            .iter()
            .position(|f| names.contains(&f.to_lowercase().as_str()))
    };
    Some(Columns {
        id: find(ID_HEADERS)?,
        nation: find(NATION_HEADERS)?,
    })
}

/// Parse the well-formed rows of an export, in source order.
///
/// Blank, separator and malformed rows are skipped without error.
pub fn parse_rows(input: &str, table: &NationTable) -> Vec<PlayerRow> {
    let mut columns = Columns::default();
    let mut rows = Vec::new();

    for line in export_lines(input) {
        let Some(fields) = split_fields(&line) else {
            continue;
        };
        if is_separator(&fields) {
            continue;
        }
        if let Some(found) = header_columns(&fields) {
            log::debug!("Export header: id column {}, nation column {}", found.id, found.nation);
            columns = found;
            continue;
        }

        let id = fields.get(columns.id).map(String::as_str).unwrap_or("");
        let nation = fields.get(columns.nation).map(String::as_str).unwrap_or("");
        if id.is_empty() || nation.is_empty() {
            continue;
        }
        let nation = table.normalize_nation(nation);
        if nation.is_empty() {
            continue;
        }
        rows.push(PlayerRow {
            id: id.to_string(),
            nation,
        });
    }

    rows
}

/// Resolve every row's nation, collecting all unknown codes before failing.
pub fn resolve_rows(rows: Vec<PlayerRow>, table: &NationTable) -> Result<Vec<Player>, ExtractError> {
    let mut players = Vec::with_capacity(rows.len());
    let mut unresolved: Vec<String> = Vec::new();

    for row in rows {
        match table.resolve(&row.nation) {
            Ok(ethnic) => players.push(Player {
                id: row.id,
                nation: row.nation,
                ethnic,
            }),
            Err(_) => {
                if !unresolved.contains(&row.nation) {
                    log::debug!("No ethnic category for nation {}", row.nation);
                    unresolved.push(row.nation);
                }
            }
        }
    }

    if unresolved.is_empty() {
        Ok(players)
    } else {
        Err(ExtractError::UnresolvedNations { codes: unresolved })
    }
}

/// Extract and resolve the players of an export held in memory.
pub fn extract_players(input: &str, table: &NationTable) -> Result<Vec<Player>, ExtractError> {
    resolve_rows(parse_rows(input, table), table)
}

/// Read an export file and extract its players.
pub fn read_players(path: &Path, table: &NationTable) -> Result<Vec<Player>, ExtractError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let input = String::from_utf8_lossy(&bytes);
    let players = extract_players(&input, table)?;
    log::info!("Read {} player(s) from {}", players.len(), path.display());
    Ok(players)
}
