//! Face assignment engine for procedurally generated ("newgen") players.
//!
//! Reads the game's rich-text player export, classifies each player's
//! nation into an [`EthnicCategory`], draws a face image for every player
//! from per-category folders and writes the game's `config.xml` mapping.

pub mod assign;
pub mod error;
pub mod ethnicity;
pub mod mapping;
pub mod nations;
pub mod pool;
pub mod progress;
pub mod rtf;
pub mod settings;
pub mod util;

pub use assign::{AssignJob, AssignPolicy, AssignReport, Assigner, SkippedPlayer};
pub use error::{
    AssignError, ExtractError, MappingError, NationError, OverrideError, PoolError, SettingsError,
};
pub use ethnicity::{EthnicCategory, NationTable};
pub use mapping::{FormatVariant, Mapping, MappingEntry, MappingStore};
pub use pool::{ImagePool, ImageRecord};
pub use progress::{AssignProgress, RunState};
pub use rtf::{Player, read_players};
pub use settings::JaqenSettings;
