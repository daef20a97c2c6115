//! jaqen CLI
//!
//! Assigns face images to the newgen players of a game export and writes the
//! game's face mapping file.

mod cli_types;
mod commands;
mod error;
mod logging;

use clap::Parser;

use jaqen_core::settings;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Error: cannot open log file: {e}");
        std::process::exit(1);
    }

    let settings_path = cli.config.unwrap_or_else(settings::settings_path);

    let result = match cli.command {
        Commands::Assign(args) => commands::assign::run_assign(&settings_path, args, cli.quiet),
        Commands::Resolve { nations } => commands::resolve::run_resolve(&settings_path, &nations),
        Commands::Categories => {
            commands::categories::run_categories();
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&settings_path),
            ConfigAction::Path => {
                commands::config::run_config_path(&settings_path);
                Ok(())
            }
            ConfigAction::Init { force } => {
                commands::config::run_config_init(&settings_path, force)
            }
        },
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
