//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jaqen")]
#[command(about = "Assign face images to newgen players", long_about = None)]
pub(crate) struct Cli {
    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments of `jaqen assign`. Anything left unset falls back to the
/// settings file, then to built-in defaults.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct AssignArgs {
    /// Mapping file written for the game (config.xml)
    #[arg(long)]
    pub xml: Option<PathBuf>,

    /// Player export (.rtf) from the game's report view
    #[arg(long)]
    pub rtf: Option<PathBuf>,

    /// Root of the per-category face folders
    #[arg(long)]
    pub images: Option<PathBuf>,

    /// Game version the mapping is written for (e.g. 2024, 2023, legacy)
    #[arg(long)]
    pub fm_version: Option<String>,

    /// Keep players that already have a face
    #[arg(long, conflicts_with = "no_preserve")]
    pub preserve: bool,

    /// Reassign every player, even those already mapped
    #[arg(long)]
    pub no_preserve: bool,

    /// Allow the same image for several players
    #[arg(long, conflicts_with = "no_duplicates")]
    pub allow_duplicates: bool,

    /// Use each image at most once per run
    #[arg(long)]
    pub no_duplicates: bool,

    /// Map a nation code to a category for this run (e.g. KVX=YugoGreek)
    #[arg(long = "override", value_name = "CODE=CATEGORY")]
    pub overrides: Vec<String>,

    /// Seed for image selection (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Store the effective options back into the settings file
    #[arg(long)]
    pub save: bool,
}

impl AssignArgs {
    /// `Some(true|false)` when one of the paired flags was given.
    pub fn preserve(&self) -> Option<bool> {
        flag_pair(self.preserve, self.no_preserve)
    }

    pub fn allow_duplicates(&self) -> Option<bool> {
        flag_pair(self.allow_duplicates, self.no_duplicates)
    }
}

fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Assign faces to every player in the export and write the mapping
    Assign(AssignArgs),

    /// Show the ethnic category of nation codes or names
    Resolve {
        /// Nation codes or names (e.g. ENG, "Ivory Coast")
        #[arg(required = true)]
        nations: Vec<String>,
    },

    /// List ethnic categories and how many nations map to each
    Categories,

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective settings
    Show,

    /// Print the settings file path
    Path,

    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
