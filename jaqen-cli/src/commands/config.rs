use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use jaqen_core::settings::{self, JaqenSettings};

use crate::CliError;

/// Show the effective settings and where they come from.
pub(crate) fn run_config_show(settings_path: &Path) -> Result<(), CliError> {
    let status = if settings_path.exists() {
        "(exists)".if_supports_color(Stdout, |t| t.green()).to_string()
    } else {
        "(not found, using defaults)"
            .if_supports_color(Stdout, |t| t.dimmed())
            .to_string()
    };
    log::info!(
        "  Config file: {} {}",
        settings_path.display().if_supports_color(Stdout, |t| t.cyan()),
        status
    );
    log::info!("");

    let s = settings::load_settings(settings_path)?;
    log::info!("  xml_path:         {}", s.xml_path.display());
    log::info!("  rtf_path:         {}", s.rtf_path.display());
    log::info!("  img_path:         {}", s.img_path.display());
    log::info!("  fm_version:       {}", s.fm_version);
    log::info!("  preserve:         {}", s.preserve);
    log::info!("  allow_duplicates: {}", s.allow_duplicates);
    if s.mapping_override.is_empty() {
        log::info!(
            "  mapping_override: {}",
            "(none)".if_supports_color(Stdout, |t| t.dimmed())
        );
    } else {
        log::info!("  mapping_override:");
        for (code, category) in &s.mapping_override {
            log::info!("    {code} = {category}");
        }
    }
    Ok(())
}

pub(crate) fn run_config_path(settings_path: &Path) {
    log::info!("{}", settings_path.display());
}

/// Write a settings file holding the defaults.
pub(crate) fn run_config_init(settings_path: &Path, force: bool) -> Result<(), CliError> {
    if settings_path.exists() && !force {
        return Err(CliError::other(format!(
            "{} already exists (use --force to overwrite)",
            settings_path.display()
        )));
    }
    settings::save_settings(settings_path, &JaqenSettings::default())?;
    log::info!(
        "Wrote default settings to {}",
        settings_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
