//! Player id → face image mapping, persisted as the game's `config.xml`
//! plus a JSON side-store.

pub mod history;
pub mod xml;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use history::{HistoryFile, history_path_for};
pub use xml::{FormatVariant, RecordFlags};

use crate::error::MappingError;
use crate::util::write_atomic;

/// A single player → image association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub player_id: String,
    /// Image path relative to the mapping file's folder.
    pub image_path: String,
}

/// Unique-keyed set of mapping entries, ordered by player id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: BTreeMap<String, String>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exist(&self, player_id: &str) -> bool {
        self.entries.contains_key(player_id)
    }

    pub fn get(&self, player_id: &str) -> Option<&str> {
        self.entries.get(player_id).map(String::as_str)
    }

    /// Insert or overwrite the image for a player.
    pub fn map_to_image(&mut self, player_id: impl Into<String>, image_path: impl Into<String>) {
        self.entries.insert(player_id.into(), image_path.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Later entries overwrite earlier ones for the same player.
impl Extend<MappingEntry> for Mapping {
    fn extend<T: IntoIterator<Item = MappingEntry>>(&mut self, iter: T) {
        for entry in iter {
            self.map_to_image(entry.player_id, entry.image_path);
        }
    }
}

impl From<xml::XmlEntry> for MappingEntry {
    fn from(entry: xml::XmlEntry) -> Self {
        Self {
            player_id: entry.player_id,
            image_path: entry.image_path,
        }
    }
}

/// A mapping bound to its mapping file and side-store.
#[derive(Debug)]
pub struct MappingStore {
    history_path: PathBuf,
    variant: FormatVariant,
    flags: RecordFlags,
    mapping: Mapping,
}

impl MappingStore {
    /// Open the mapping at `path`, using the default side-store location.
    ///
    /// `variant` is the layout used when writing. Either layout is read, but
    /// `r-` is only treated as the id marker when `variant` is `Fm24`.
    /// A missing mapping file yields an empty mapping.
    pub fn open(path: &Path, variant: FormatVariant) -> Result<Self, MappingError> {
        Self::open_with_history(path, variant, &history_path_for(path))
    }

    /// Open the mapping at `path` with an explicit side-store location.
    ///
    /// Side-store entries are loaded first, then entries in the mapping file
    /// are laid over them.
    pub fn open_with_history(
        path: &Path,
        variant: FormatVariant,
        history_path: &Path,
    ) -> Result<Self, MappingError> {
        let mut store = Self {
            history_path: history_path.to_path_buf(),
            variant,
            flags: RecordFlags::default(),
            mapping: Mapping::new(),
        };

        if let Some(history) = history::load_history(history_path)? {
            log::debug!(
                "Loaded {} entr(ies) from side-store {} (saved {})",
                history.entries.len(),
                history_path.display(),
                history.saved_at
            );
            store.flags = history.flags;
            store.mapping.extend(
                history
                    .entries
                    .into_iter()
                    .map(|(player_id, image_path)| MappingEntry { player_id, image_path }),
            );
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(c) => Some(c),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No mapping file at {}, starting empty", path.display());
                None
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(contents) = contents.filter(|c| !c.trim().is_empty()) {
            let record = xml::parse_record(contents.as_bytes(), variant)?;
            if let Some(found) = record.dominant_variant() {
                if found != variant {
                    log::warn!(
                        "{} uses the {} layout; it will be rewritten as {}",
                        path.display(),
                        found,
                        variant
                    );
                }
            }
            store.flags = record.flags;
            store
                .mapping
                .extend(record.entries.into_iter().map(MappingEntry::from));
        }

        log::info!(
            "Opened mapping {} ({} existing entr(ies))",
            path.display(),
            store.mapping.len()
        );
        Ok(store)
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    pub fn variant(&self) -> FormatVariant {
        self.variant
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn exist(&self, player_id: &str) -> bool {
        self.mapping.exist(player_id)
    }

    pub fn get(&self, player_id: &str) -> Option<&str> {
        self.mapping.get(player_id)
    }

    /// Insert or overwrite. Any preserve check is the caller's job.
    pub fn map_to_image(&mut self, player_id: impl Into<String>, image_path: impl Into<String>) {
        self.mapping.map_to_image(player_id, image_path);
    }

    /// Commit the mapping to the side-store.
    pub fn save(&self) -> Result<(), MappingError> {
        history::save_history(
            &self.history_path,
            self.variant,
            self.flags,
            &self.mapping.entries,
        )?;
        log::debug!("Saved side-store {}", self.history_path.display());
        Ok(())
    }

    /// Replace the file at `path` with the full mapping in the game's format.
    pub fn write(&self, path: &Path) -> Result<(), MappingError> {
        let xml = xml::render_record(self.flags, self.variant, self.mapping.iter());
        write_atomic(path, xml.as_bytes())?;
        log::info!(
            "Wrote {} mapping(s) to {}",
            self.mapping.len(),
            path.display()
        );
        Ok(())
    }
}
