//! Ethnic categories and the nation → category table.
//!
//! The base table is compiled in ([`crate::nations::BASE_NATIONS`]). User
//! overrides are validated up front and held as an immutable snapshot that
//! is swapped wholesale, so a [`NationTable`] can be cloned and handed to
//! the extractor without any shared mutable state.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{NationError, OverrideError};
use crate::nations::{BASE_NATIONS, NationInfo};

/// Visual classification bucket used to pick a face image.
///
/// The `Display`/`FromStr` form is the exact image sub-folder name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EthnicCategory {
    African,
    Asian,
    Caucasian,
    CentralEuropean,
    Eeca,
    Italmed,
    Mena,
    Mesa,
    SaMed,
    Scandinavian,
    Seasian,
    SouthAmerican,
    SpanMed,
    YugoGreek,
}

impl EthnicCategory {
    pub const ALL: [EthnicCategory; 14] = [
        EthnicCategory::African,
        EthnicCategory::Asian,
        EthnicCategory::Caucasian,
        EthnicCategory::CentralEuropean,
        EthnicCategory::Eeca,
        EthnicCategory::Italmed,
        EthnicCategory::Mena,
        EthnicCategory::Mesa,
        EthnicCategory::SaMed,
        EthnicCategory::Scandinavian,
        EthnicCategory::Seasian,
        EthnicCategory::SouthAmerican,
        EthnicCategory::SpanMed,
        EthnicCategory::YugoGreek,
    ];

    /// The folder name for this category.
    pub fn name(self) -> &'static str {
        match self {
            Self::African => "African",
            Self::Asian => "Asian",
            Self::Caucasian => "Caucasian",
            Self::CentralEuropean => "Central European",
            Self::Eeca => "EECA",
            Self::Italmed => "Italmed",
            Self::Mena => "MENA",
            Self::Mesa => "MESA",
            Self::SaMed => "SAMed",
            Self::Scandinavian => "Scandinavian",
            Self::Seasian => "Seasian",
            Self::SouthAmerican => "South American",
            Self::SpanMed => "SpanMed",
            Self::YugoGreek => "YugoGreek",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.name()).collect()
    }

    /// Exact (case-sensitive) match against a folder name.
    pub fn from_folder_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for EthnicCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string is not one of the category names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ethnic category \"{0}\"")]
pub struct ParseCategoryError(pub String);

impl FromStr for EthnicCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_folder_name(s.trim()).ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

impl TryFrom<String> for EthnicCategory {
    type Error = ParseCategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EthnicCategory> for String {
    fn from(value: EthnicCategory) -> Self {
        value.name().to_string()
    }
}

/// Nation code → ethnic category lookup with a replaceable override layer.
#[derive(Debug, Clone)]
pub struct NationTable {
    base: Arc<HashMap<&'static str, &'static NationInfo>>,
    names: Arc<HashMap<String, &'static str>>,
    overrides: Arc<HashMap<String, EthnicCategory>>,
}

impl Default for NationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NationTable {
    /// Build the table from the compiled-in base nations, with no overrides.
    pub fn new() -> Self {
        let base = BASE_NATIONS.iter().map(|n| (n.code, n)).collect();
        let names = BASE_NATIONS
            .iter()
            .map(|n| (n.name.to_lowercase(), n.code))
            .collect();
        Self {
            base: Arc::new(base),
            names: Arc::new(names),
            overrides: Arc::new(HashMap::new()),
        }
    }

    /// Look a nation up: override layer first, then the base table.
    ///
    /// The code is normalised first, so display names resolve as well.
    pub fn resolve(&self, code: &str) -> Result<EthnicCategory, NationError> {
        let code = self.normalize_nation(code);
        if let Some(cat) = self.overrides.get(&code) {
            return Ok(*cat);
        }
        self.base
            .get(code.as_str())
            .map(|info| info.category)
            .ok_or_else(|| NationError::unknown(code))
    }

    /// Validate and install a new override layer.
    ///
    /// Entries are checked in code order; the first invalid category aborts
    /// the whole call and the previous override layer is left untouched.
    /// Keys that normalise to the same nation (`"eng"` and `"England"`) must
    /// agree on the category.
    /// On success the previous layer is replaced, not merged.
    pub fn apply_overrides<I, K, V>(&mut self, entries: I) -> Result<(), OverrideError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut pending: Vec<(String, String)> = entries
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();
        pending.sort();

        let mut layer = HashMap::with_capacity(pending.len());
        let mut sources: HashMap<String, String> = HashMap::new();
        for (raw_code, value) in pending {
            let code = self.normalize_nation(&raw_code);
            if code.is_empty() {
                return Err(OverrideError::EmptyCode);
            }
            let category: EthnicCategory = value
                .parse()
                .map_err(|_| OverrideError::invalid_category(raw_code.trim(), value.clone()))?;
            match layer.insert(code.clone(), category) {
                Some(previous) if previous != category => {
                    return Err(OverrideError::ConflictingCodes {
                        first: sources.get(&code).cloned().unwrap_or_default(),
                        second: raw_code.trim().to_string(),
                        code,
                    });
                }
                Some(_) => log::debug!("Override \"{}\" repeats nation {}", raw_code.trim(), code),
                None => {
                    sources.insert(code, raw_code.trim().to_string());
                }
            }
        }

        log::debug!("Installed {} nation override(s)", layer.len());
        self.overrides = Arc::new(layer);
        Ok(())
    }

    /// Builder form of [`NationTable::apply_overrides`].
    pub fn with_overrides<I, K, V>(mut self, entries: I) -> Result<Self, OverrideError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.apply_overrides(entries)?;
        Ok(self)
    }

    pub fn overrides(&self) -> &HashMap<String, EthnicCategory> {
        &self.overrides
    }

    /// Base table entry for a code, ignoring overrides.
    pub fn base_entry(&self, code: &str) -> Option<&'static NationInfo> {
        self.base.get(self.normalize_nation(code).as_str()).copied()
    }

    /// Number of base nations per category.
    pub fn category_counts(&self) -> Vec<(EthnicCategory, usize)> {
        EthnicCategory::ALL
            .into_iter()
            .map(|cat| {
                let n = self.base.values().filter(|n| n.category == cat).count();
                (cat, n)
            })
            .collect()
    }

    /// Normalise a nation field to the upper-case code the table is keyed by.
    ///
    /// Accepts a code in any case or a display name. A trailing parenthesised
    /// part (`"ENG (WAL)"`) is dropped. Unknown free text comes back
    /// upper-cased so it can still be reported.
    pub fn normalize_nation(&self, raw: &str) -> String {
        let mut text = raw.trim();
        if let Some(idx) = text.find('(') {
            text = text[..idx].trim_end();
        }
        if text.is_empty() {
            return String::new();
        }

        let upper = text.to_uppercase();
        if self.base.contains_key(upper.as_str()) || self.overrides.contains_key(&upper) {
            return upper;
        }
        if let Some(code) = self.names.get(&text.to_lowercase()) {
            return (*code).to_string();
        }
        upper
    }
}
