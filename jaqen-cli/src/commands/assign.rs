use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use jaqen_core::settings::{self, JaqenSettings};
use jaqen_core::{AssignProgress, AssignReport, Assigner, NationTable};

use crate::CliError;
use crate::cli_types::AssignArgs;

/// Split a `CODE=Category` argument.
pub(crate) fn parse_override(raw: &str) -> Result<(String, String), CliError> {
    let (code, category) = raw.split_once('=').ok_or_else(|| {
        CliError::invalid_argument(format!("override \"{raw}\" must look like CODE=Category"))
    })?;
    let code = code.trim();
    let category = category.trim();
    if code.is_empty() || category.is_empty() {
        return Err(CliError::invalid_argument(format!(
            "override \"{raw}\" must look like CODE=Category"
        )));
    }
    Ok((code.to_uppercase(), category.to_string()))
}

/// Layer command-line values over the loaded settings.
pub(crate) fn merge_args(settings: &mut JaqenSettings, args: &AssignArgs) -> Result<(), CliError> {
    if let Some(p) = &args.xml {
        settings.xml_path = p.clone();
    }
    if let Some(p) = &args.rtf {
        settings.rtf_path = p.clone();
    }
    if let Some(p) = &args.images {
        settings.img_path = p.clone();
    }
    if let Some(v) = &args.fm_version {
        settings.fm_version = v.clone();
    }
    if let Some(b) = args.preserve() {
        settings.preserve = b;
    }
    if let Some(b) = args.allow_duplicates() {
        settings.allow_duplicates = b;
    }
    for raw in &args.overrides {
        let (code, category) = parse_override(raw)?;
        settings.mapping_override.insert(code, category);
    }
    Ok(())
}

pub(crate) fn run_assign(
    settings_path: &Path,
    args: AssignArgs,
    quiet: bool,
) -> Result<(), CliError> {
    let mut settings = settings::load_settings(settings_path)?;
    merge_args(&mut settings, &args)?;
    let job = settings.to_job(args.seed)?;

    if args.save {
        settings::save_settings(settings_path, &settings)?;
        log::info!(
            "Saved settings to {}",
            settings_path.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    }

    log::info!(
        "Export:  {}",
        job.rtf_file.display().if_supports_color(Stdout, |t| t.cyan())
    );
    log::info!(
        "Images:  {}",
        job.image_dir.display().if_supports_color(Stdout, |t| t.cyan())
    );
    log::info!(
        "Mapping: {} ({})",
        job.mapping_file.display().if_supports_color(Stdout, |t| t.cyan()),
        job.variant
    );
    let mut modes = Vec::new();
    if job.policy.preserve {
        modes.push("preserving existing faces");
    }
    if job.policy.allow_duplicates {
        modes.push("duplicates allowed");
    }
    if !modes.is_empty() {
        log::info!("{}", modes.join(", ").if_supports_color(Stdout, |t| t.dimmed()));
    }
    log::info!("");

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::with_template("  {bar:40.cyan/blue} {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        pb
    };

    let progress_callback = |progress: AssignProgress| {
        if let Some(fraction) = progress.fraction() {
            pb.set_position((fraction * 100.0).round() as u64);
        }
        match progress {
            AssignProgress::Phase { message, .. } => pb.set_message(message),
            AssignProgress::Player {
                index,
                total,
                player_id,
                ..
            } => pb.set_message(format!("[{index}/{total}] {player_id}")),
            AssignProgress::Completed | AssignProgress::Failed { .. } => pb.finish_and_clear(),
        }
    };

    let mut assigner = Assigner::new(NationTable::new());
    let result = assigner.run(&job, &progress_callback);
    pb.finish_and_clear();

    match result {
        Ok(report) => {
            print_summary(&report, &job.mapping_file);
            Ok(())
        }
        Err(e) => {
            if e.is_configuration() {
                log::info!(
                    "{}",
                    "Fix the nation overrides (--override CODE=Category) and run again."
                        .if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            Err(e.into())
        }
    }
}

fn print_summary(report: &AssignReport, mapping_file: &Path) {
    let heading = if report.is_complete() {
        format!("{}", "Done".if_supports_color(Stdout, |t| t.green()))
    } else {
        format!("{}", "Done with skipped players".if_supports_color(Stdout, |t| t.yellow()))
    };
    log::info!("{heading}");
    log::info!(
        "  {} player(s) read, {} assigned, {} preserved",
        report.players,
        report.assigned.if_supports_color(Stdout, |t| t.green()),
        report.preserved
    );
    if report.duplicate_rows > 0 {
        log::info!("  {} repeated row(s) ignored", report.duplicate_rows);
    }
    log::info!(
        "  {} mapping(s) in {}",
        report.mapping_total,
        mapping_file.display().if_supports_color(Stdout, |t| t.cyan())
    );

    if report.is_complete() {
        return;
    }
    log::info!("");
    for (category, n) in report.skipped_by_category() {
        log::warn!("{n} player(s) without a face: no {category} images left");
    }
    for skipped in &report.skipped {
        log::info!(
            "  {} {}",
            skipped.player_id.if_supports_color(Stdout, |t| t.yellow()),
            format!("({})", skipped.category).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}
