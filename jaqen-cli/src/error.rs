use thiserror::Error;

use jaqen_core::{AssignError, MappingError, OverrideError, SettingsError};

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Settings file could not be read or written
    #[error("Config error: {0}")]
    Settings(#[from] SettingsError),

    /// The assignment run was aborted
    #[error("{0}")]
    Assign(#[from] AssignError),

    /// Bad mapping file options (e.g. unsupported game version)
    #[error("{0}")]
    Mapping(#[from] MappingError),

    /// Invalid nation override in the settings file
    #[error("{0}")]
    Override(#[from] OverrideError),

    /// Malformed command-line value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
