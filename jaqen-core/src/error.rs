use std::path::PathBuf;

use crate::ethnicity::EthnicCategory;

/// A nation code that neither the override layer nor the base table knows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NationError {
    #[error("ethnic category not found for nation code \"{code}\"")]
    UnknownNation { code: String },
}

impl NationError {
    pub fn unknown(code: impl Into<String>) -> Self {
        Self::UnknownNation { code: code.into() }
    }
}

/// Errors raised while validating user-supplied nation overrides.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverrideError {
    #[error(
        "override for \"{code}\" names unknown ethnic category \"{value}\" (valid: {})",
        EthnicCategory::names().join(", ")
    )]
    InvalidCategory { code: String, value: String },

    #[error("override entry has an empty nation code")]
    EmptyCode,

    #[error("overrides \"{first}\" and \"{second}\" both name nation {code} with different categories")]
    ConflictingCodes {
        code: String,
        first: String,
        second: String,
    },
}

impl OverrideError {
    pub fn invalid_category(code: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidCategory {
            code: code.into(),
            value: value.into(),
        }
    }
}

/// Errors that can occur while reading players out of an RTF export.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every distinct unresolved nation code, in first-seen order.
    #[error("ethnic category not found for nation codes: {}", codes.join(", "))]
    UnresolvedNations { codes: Vec<String> },
}

/// Errors raised by the image pool.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("cannot read image directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no images left for ethnic category {category}")]
    CategoryExhausted { category: EthnicCategory },
}

impl PoolError {
    pub fn exhausted(category: EthnicCategory) -> Self {
        Self::CategoryExhausted { category }
    }
}

/// Errors that can occur while opening, saving or writing a mapping.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("history store error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid mapping file: {0}")]
    InvalidRecord(String),

    #[error("Unsupported game version: {0}")]
    UnsupportedVersion(String),
}

impl MappingError {
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    pub fn unsupported_version(msg: impl Into<String>) -> Self {
        Self::UnsupportedVersion(msg.into())
    }
}

/// Errors that can occur while loading or saving the settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors that abort an assignment run.
///
/// Per-player shortages are not represented here; they are collected in
/// [`crate::assign::AssignReport::skipped`].
#[derive(Debug, thiserror::Error)]
pub enum AssignError {
    #[error("error applying mapping overrides: {0}")]
    Overrides(#[from] OverrideError),

    #[error("error reading players: {0}")]
    Extract(#[from] ExtractError),

    #[error("error loading image pool: {0}")]
    Pool(#[from] PoolError),

    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),
}

impl AssignError {
    /// True for errors caused by configuration (unknown nations, bad overrides)
    /// rather than I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Overrides(_) | Self::Extract(ExtractError::UnresolvedNations { .. })
        )
    }
}
