//! Shared settings file (`jaqen.toml`).
//!
//! Holds the three working paths, the two policy flags, the game version and
//! the user's nation overrides. The settings file lives in the user config
//! directory: `~/.config/jaqen/jaqen.toml` on Linux.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assign::{AssignJob, AssignPolicy};
use crate::error::{MappingError, SettingsError};
use crate::mapping::FormatVariant;
use crate::util::write_atomic;

pub const DEFAULT_XML_PATH: &str = "./config.xml";
pub const DEFAULT_RTF_PATH: &str = "./newgen.rtf";
pub const DEFAULT_IMAGES_PATH: &str = "./";
pub const DEFAULT_FM_VERSION: &str = "2024";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JaqenSettings {
    pub preserve: bool,
    pub allow_duplicates: bool,
    pub xml_path: PathBuf,
    pub rtf_path: PathBuf,
    pub img_path: PathBuf,
    pub fm_version: String,
    /// Nation code → ethnic category name.
    pub mapping_override: BTreeMap<String, String>,
}

impl Default for JaqenSettings {
    fn default() -> Self {
        Self {
            preserve: false,
            allow_duplicates: false,
            xml_path: PathBuf::from(DEFAULT_XML_PATH),
            rtf_path: PathBuf::from(DEFAULT_RTF_PATH),
            img_path: PathBuf::from(DEFAULT_IMAGES_PATH),
            fm_version: DEFAULT_FM_VERSION.to_string(),
            mapping_override: BTreeMap::new(),
        }
    }
}

impl JaqenSettings {
    pub fn policy(&self) -> AssignPolicy {
        AssignPolicy {
            preserve: self.preserve,
            allow_duplicates: self.allow_duplicates,
        }
    }

    /// Build a run description from these settings.
    pub fn to_job(&self, seed: Option<u64>) -> Result<AssignJob, MappingError> {
        Ok(AssignJob {
            mapping_file: self.xml_path.clone(),
            rtf_file: self.rtf_path.clone(),
            image_dir: self.img_path.clone(),
            variant: FormatVariant::from_fm_version(&self.fm_version)?,
            policy: self.policy(),
            overrides: self.mapping_override.clone(),
            seed,
        })
    }
}

/// Canonical path to the settings file, falling back to `./jaqen.toml`.
pub fn settings_path() -> PathBuf {
    match dirs::config_dir() {
        Some(config) => config.join("jaqen").join("jaqen.toml"),
        None => PathBuf::from("jaqen.toml"),
    }
}

/// Load settings, returning defaults if the file does not exist.
pub fn load_settings(path: &Path) -> Result<JaqenSettings, SettingsError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(JaqenSettings::default());
        }
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&contents).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Save settings to disk atomically (write to temp, then rename).
pub fn save_settings(path: &Path, settings: &JaqenSettings) -> Result<(), SettingsError> {
    let contents = toml::to_string_pretty(settings)?;
    write_atomic(path, contents.as_bytes())?;
    Ok(())
}
