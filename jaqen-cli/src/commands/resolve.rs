use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use jaqen_core::NationTable;
use jaqen_core::settings;

use crate::CliError;

/// Resolve nation codes or names through the base table and the
/// overrides from the settings file.
pub(crate) fn run_resolve(settings_path: &Path, nations: &[String]) -> Result<(), CliError> {
    let settings = settings::load_settings(settings_path)?;
    let table = NationTable::new().with_overrides(&settings.mapping_override)?;

    let mut unknown = 0usize;
    for raw in nations {
        let code = table.normalize_nation(raw);
        let name = table.base_entry(&code).map(|n| n.name).unwrap_or("");
        match table.resolve(&code) {
            Ok(category) => {
                let source = if table.overrides().contains_key(&code) {
                    " (override)"
                } else {
                    ""
                };
                log::info!(
                    "  {:<5} {:<28} {}{}",
                    code.if_supports_color(Stdout, |t| t.bold()),
                    name,
                    category.if_supports_color(Stdout, |t| t.green()),
                    source.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            Err(e) => {
                unknown += 1;
                log::info!(
                    "  {:<5} {:<28} {}",
                    code.if_supports_color(Stdout, |t| t.bold()),
                    name,
                    "unknown".if_supports_color(Stdout, |t| t.red()),
                );
                log::debug!("{e}");
            }
        }
    }

    if unknown > 0 {
        return Err(CliError::other(format!(
            "{unknown} nation(s) have no ethnic category"
        )));
    }
    Ok(())
}
