//! One face-assignment run: read players, draw images, persist the mapping.
//!
//! ```text
//! Init → ResolvePlayers → AllocateImages → Persist → Done
//!   └──────────┴───────────────┴──────────────┴──→ Failed
//! ```
//!
//! Configuration problems (bad overrides, unknown nations) abort before any
//! image is drawn. An empty or exhausted category only skips the affected
//! player. Persistence failures abort the run; mappings already applied in
//! memory are not rolled back.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::{AssignError, PoolError};
use crate::ethnicity::{EthnicCategory, NationTable};
use crate::mapping::{FormatVariant, MappingStore};
use crate::pool::ImagePool;
use crate::progress::{AssignProgress, RunState};
use crate::rtf;
use crate::util::to_forward_slashes;

/// How existing mappings and repeated images are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssignPolicy {
    /// Keep players that already have a mapping.
    pub preserve: bool,
    /// Allow one image to be used by several players.
    pub allow_duplicates: bool,
}

/// Everything one run needs, supplied by the caller.
#[derive(Debug, Clone)]
pub struct AssignJob {
    pub mapping_file: PathBuf,
    pub rtf_file: PathBuf,
    pub image_dir: PathBuf,
    pub variant: FormatVariant,
    pub policy: AssignPolicy,
    /// Nation code → category name. When non-empty it replaces the table's
    /// override layer for this run.
    pub overrides: BTreeMap<String, String>,
    /// Fixed seed for the image pool; entropy when `None`.
    pub seed: Option<u64>,
}

/// A player left without an image.
#[derive(Debug)]
pub struct SkippedPlayer {
    pub player_id: String,
    pub category: EthnicCategory,
    pub error: PoolError,
}

/// Outcome of a run that reached `Done`.
#[derive(Debug, Default)]
pub struct AssignReport {
    /// Rows read from the export.
    pub players: usize,
    /// Players given a new image.
    pub assigned: usize,
    /// Players kept because they were already mapped.
    pub preserved: usize,
    /// Export rows repeating a player id already handled this run.
    pub duplicate_rows: usize,
    /// Players that could not get an image.
    pub skipped: Vec<SkippedPlayer>,
    /// Entries in the mapping after the run.
    pub mapping_total: usize,
}

impl AssignReport {
    /// True when no player was left without an image.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Skipped players per category.
    pub fn skipped_by_category(&self) -> BTreeMap<EthnicCategory, usize> {
        let mut counts = BTreeMap::new();
        for s in &self.skipped {
            *counts.entry(s.category).or_insert(0) += 1;
        }
        counts
    }
}

/// Runs assignment jobs against a base nation table.
///
/// Runs are sequential; the caller must not start a second run on the same
/// files while one is in progress.
#[derive(Debug)]
pub struct Assigner {
    table: NationTable,
    state: RunState,
}

impl Assigner {
    pub fn new(table: NationTable) -> Self {
        Self {
            table,
            state: RunState::Init,
        }
    }

    /// State reached by the last (or current) run.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute a full run.
    ///
    /// `Err` means the run was aborted. `Ok` with
    /// [`AssignReport::is_complete`] false means some players were skipped.
    pub fn run(
        &mut self,
        job: &AssignJob,
        progress: &dyn Fn(AssignProgress),
    ) -> Result<AssignReport, AssignError> {
        self.state = RunState::Init;
        match self.run_phases(job, progress) {
            Ok(report) => {
                self.enter(RunState::Done);
                progress(AssignProgress::Completed);
                Ok(report)
            }
            Err(e) => {
                log::debug!("Run failed during {}: {}", self.state, e);
                self.enter(RunState::Failed);
                progress(AssignProgress::failed(e.to_string()));
                Err(e)
            }
        }
    }

    fn enter(&mut self, state: RunState) {
        log::debug!("Run state: {} -> {}", self.state, state);
        self.state = state;
    }

    fn run_phases(
        &mut self,
        job: &AssignJob,
        progress: &dyn Fn(AssignProgress),
    ) -> Result<AssignReport, AssignError> {
        // -- Init --
        progress(AssignProgress::phase(RunState::Init, "Applying mapping overrides", 0.1));
        let mut table = self.table.clone();
        if !job.overrides.is_empty() {
            table.apply_overrides(&job.overrides)?;
        }

        progress(AssignProgress::phase(RunState::Init, "Opening mapping", 0.2));
        let mut store = MappingStore::open(&job.mapping_file, job.variant)?;
        log::debug!(
            "Writing {} layout, side-store at {}",
            store.variant(),
            store.history_path().display()
        );

        progress(AssignProgress::phase(RunState::Init, "Loading image pool", 0.3));
        let mut pool = match job.seed {
            Some(seed) => ImagePool::build_seeded(&job.image_dir, seed)?,
            None => ImagePool::build(&job.image_dir)?,
        };

        // -- ResolvePlayers --
        self.enter(RunState::ResolvePlayers);
        progress(AssignProgress::phase(RunState::ResolvePlayers, "Reading players", 0.4));
        let players = rtf::read_players(&job.rtf_file, &table)?;

        // -- AllocateImages --
        self.enter(RunState::AllocateImages);
        progress(AssignProgress::phase(RunState::AllocateImages, "Assigning faces", 0.5));
        let mapping_dir = mapping_dir(&job.mapping_file);
        let mut report = AssignReport {
            players: players.len(),
            ..Default::default()
        };
        let mut handled: HashSet<&str> = HashSet::new();
        let total = players.len();

        for (i, player) in players.iter().enumerate() {
            progress(AssignProgress::player(i + 1, total, &player.id));

            if !handled.insert(player.id.as_str()) {
                log::debug!("Player {} appears more than once in the export", player.id);
                report.duplicate_rows += 1;
                continue;
            }
            if job.policy.preserve && store.exist(&player.id) {
                log::debug!("Preserving existing mapping for player {}", player.id);
                report.preserved += 1;
                continue;
            }

            match pool.draw(player.ethnic, !job.policy.allow_duplicates) {
                Ok(image) => {
                    let rel = relative_image_path(&image, &mapping_dir);
                    log::debug!("Player {} ({}) -> {}", player.id, player.ethnic, rel);
                    store.map_to_image(player.id.clone(), rel);
                    report.assigned += 1;
                }
                Err(error) => {
                    log::warn!("Error getting image for player {}: {}", player.id, error);
                    report.skipped.push(SkippedPlayer {
                        player_id: player.id.clone(),
                        category: player.ethnic,
                        error,
                    });
                }
            }
        }

        // -- Persist --
        self.enter(RunState::Persist);
        progress(AssignProgress::phase(RunState::Persist, "Saving files", 0.9));
        store.save()?;
        store.write(&job.mapping_file)?;
        report.mapping_total = store.mapping().len();

        log::info!(
            "Assigned {} face(s), preserved {}, skipped {}",
            report.assigned,
            report.preserved,
            report.skipped.len()
        );
        Ok(report)
    }
}

/// Folder holding the mapping file, made absolute.
fn mapping_dir(mapping_file: &Path) -> PathBuf {
    let dir = match mapping_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    absolute_path(&dir)
}

fn absolute_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Path of `image` as the game expects it in the mapping file: relative to
/// `base`, `/`-separated, without extension.
pub fn relative_image_path(image: &Path, base: &Path) -> String {
    let image = absolute_path(image);
    let rel = pathdiff::diff_paths(&image, base).unwrap_or_else(|| {
        log::warn!(
            "Cannot express {} relative to {}",
            image.display(),
            base.display()
        );
        image.clone()
    });
    to_forward_slashes(&rel.with_extension(""))
}
