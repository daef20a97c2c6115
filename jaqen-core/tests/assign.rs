use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use jaqen_core::*;

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        fs::create_dir_all(fixture.faces()).unwrap();
        fixture
    }

    fn faces(&self) -> PathBuf {
        self.dir.path().join("faces")
    }

    fn xml(&self) -> PathBuf {
        self.faces().join("config.xml")
    }

    fn rtf(&self) -> PathBuf {
        self.dir.path().join("newgen.rtf")
    }

    fn add_image(&self, rel: &str) {
        let path = self.faces().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"img").unwrap();
    }

    fn write_export(&self, rows: &[(&str, &str)]) {
        let mut rtf = String::from(
            "{\\rtf1\\ansi\\ansicpg1252\\deff0{\\fonttbl{\\f0\\fnil Courier New;}}\n\\pard\\f0\\fs20 | UID | Nat | Name |\\par\n| ---------------------- |\\par\n",
        );
        for (id, nat) in rows {
            rtf.push_str(&format!("| {id} | {nat} | Someone |\\par\n"));
        }
        rtf.push_str("}\n");
        fs::write(self.rtf(), rtf).unwrap();
    }

    fn job(&self, policy: AssignPolicy) -> AssignJob {
        AssignJob {
            mapping_file: self.xml(),
            rtf_file: self.rtf(),
            image_dir: self.faces(),
            variant: FormatVariant::Fm24,
            policy,
            overrides: BTreeMap::new(),
            seed: Some(42),
        }
    }
}

fn run(job: &AssignJob) -> (Result<AssignReport, AssignError>, RunState) {
    let mut assigner = Assigner::new(NationTable::new());
    let result = assigner.run(job, &|_| {});
    (result, assigner.state())
}

fn reopen(path: &Path) -> MappingStore {
    MappingStore::open(path, FormatVariant::Fm24).unwrap()
}

#[test]
fn unknown_nation_aborts_before_allocation() {
    let fx = Fixture::new();
    fx.add_image("Caucasian/a.png");
    fx.write_export(&[("p1", "ENG"), ("p2", "ZZZ")]);

    let (result, state) = run(&fx.job(AssignPolicy::default()));
    match result {
        Err(AssignError::Extract(ExtractError::UnresolvedNations { codes })) => {
            assert_eq!(codes, vec!["ZZZ".to_string()]);
        }
        other => panic!("expected unresolved nations, got {other:?}"),
    }
    assert_eq!(state, RunState::Failed);
    assert!(!fx.xml().exists());
    assert!(!reopen(&fx.xml()).exist("p1"));
}

#[test]
fn invalid_override_aborts_before_allocation() {
    let fx = Fixture::new();
    fx.add_image("Caucasian/a.png");
    fx.write_export(&[("p1", "ENG")]);

    let mut job = fx.job(AssignPolicy::default());
    job.overrides.insert("ZZZ".into(), "Atlantean".into());
    let (result, state) = run(&job);
    assert!(matches!(
        result,
        Err(AssignError::Overrides(OverrideError::InvalidCategory { .. }))
    ));
    assert!(result.is_err_and(|e| e.is_configuration()));
    assert_eq!(state, RunState::Failed);
    assert!(!fx.xml().exists());
}

#[test]
fn override_resolves_otherwise_unknown_nation() {
    let fx = Fixture::new();
    fx.add_image("MENA/a.png");
    fx.write_export(&[("p1", "ZZZ")]);

    let mut job = fx.job(AssignPolicy::default());
    job.overrides.insert("ZZZ".into(), "MENA".into());
    let (result, state) = run(&job);
    let report = result.unwrap();
    assert_eq!(state, RunState::Done);
    assert_eq!(report.assigned, 1);
    assert_eq!(reopen(&fx.xml()).get("p1"), Some("MENA/a"));
}

#[test]
fn empty_category_skips_player_but_run_completes() {
    let fx = Fixture::new();
    fx.add_image("Caucasian/a.png");
    fx.write_export(&[("p1", "ENG"), ("p2", "JPN")]);

    // p2 already has a mapping from an earlier run.
    let mut store = reopen(&fx.xml());
    store.map_to_image("p2", "Asian/old");
    store.write(&fx.xml()).unwrap();

    let (result, state) = run(&fx.job(AssignPolicy::default()));
    let report = result.unwrap();
    assert_eq!(state, RunState::Done);
    assert!(!report.is_complete());
    assert_eq!(report.assigned, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].player_id, "p2");
    assert!(matches!(
        report.skipped[0].error,
        PoolError::CategoryExhausted {
            category: EthnicCategory::Asian
        }
    ));

    let store = reopen(&fx.xml());
    assert_eq!(store.get("p1"), Some("Caucasian/a"));
    assert_eq!(store.get("p2"), Some("Asian/old"));
}

#[test]
fn preserve_keeps_existing_and_assigns_new_players() {
    let fx = Fixture::new();
    for i in 0..10 {
        fx.add_image(&format!("Caucasian/{i}.png"));
    }
    let policy = AssignPolicy {
        preserve: true,
        allow_duplicates: false,
    };

    fx.write_export(&[("p1", "ENG"), ("p2", "SCO")]);
    let first = run(&fx.job(policy)).0.unwrap();
    assert_eq!(first.assigned, 2);
    let before = reopen(&fx.xml());

    fx.write_export(&[("p1", "ENG"), ("p2", "SCO"), ("p3", "WAL")]);
    let mut job = fx.job(policy);
    job.seed = Some(7);
    let second = run(&job).0.unwrap();
    assert_eq!(second.preserved, 2);
    assert_eq!(second.assigned, 1);

    let after = reopen(&fx.xml());
    assert_eq!(after.get("p1"), before.get("p1"));
    assert_eq!(after.get("p2"), before.get("p2"));
    assert!(after.exist("p3"));
}

#[test]
fn without_preserve_existing_players_are_reassigned() {
    let fx = Fixture::new();
    fx.add_image("Caucasian/new.png");
    fx.write_export(&[("p1", "ENG")]);
    let mut store = reopen(&fx.xml());
    store.map_to_image("p1", "Caucasian/old");
    store.write(&fx.xml()).unwrap();

    run(&fx.job(AssignPolicy::default())).0.unwrap();
    assert_eq!(reopen(&fx.xml()).get("p1"), Some("Caucasian/new"));
}

#[test]
fn duplicate_avoidance_spans_the_whole_run() {
    let fx = Fixture::new();
    fx.add_image("Caucasian/a.png");
    fx.add_image("Caucasian/b.png");
    fx.write_export(&[("p1", "ENG"), ("p2", "ENG"), ("p3", "ENG")]);

    let report = run(&fx.job(AssignPolicy::default())).0.unwrap();
    assert_eq!(report.assigned, 2);
    assert_eq!(report.skipped.len(), 1);

    let store = reopen(&fx.xml());
    let paths: HashSet<&str> = store.mapping().iter().map(|(_, p)| p).collect();
    assert_eq!(paths.len(), 2);
}

#[test]
fn allow_duplicates_reuses_single_image() {
    let fx = Fixture::new();
    fx.add_image("Caucasian/only.png");
    fx.write_export(&[("p1", "ENG"), ("p2", "ENG")]);

    let policy = AssignPolicy {
        preserve: false,
        allow_duplicates: true,
    };
    let report = run(&fx.job(policy)).0.unwrap();
    assert!(report.is_complete());
    let store = reopen(&fx.xml());
    assert_eq!(store.get("p1"), Some("Caucasian/only"));
    assert_eq!(store.get("p2"), Some("Caucasian/only"));
}

#[test]
fn repeated_player_rows_are_assigned_once() {
    let fx = Fixture::new();
    fx.add_image("Caucasian/a.png");
    fx.write_export(&[("p1", "ENG"), ("p1", "ENG")]);

    let report = run(&fx.job(AssignPolicy::default())).0.unwrap();
    assert_eq!(report.players, 2);
    assert_eq!(report.assigned, 1);
    assert_eq!(report.duplicate_rows, 1);
    assert!(report.is_complete());
}

#[test]
fn image_dir_outside_mapping_folder_is_relative() {
    let fx = Fixture::new();
    fx.write_export(&[("p1", "ESP")]);
    let pack = fx.dir.path().join("pack");
    fs::create_dir_all(pack.join("SpanMed")).unwrap();
    fs::write(pack.join("SpanMed/x.jpg"), b"img").unwrap();

    let mut job = fx.job(AssignPolicy::default());
    job.image_dir = pack;
    run(&job).0.unwrap();
    assert_eq!(reopen(&fx.xml()).get("p1"), Some("../pack/SpanMed/x"));
}

#[test]
fn missing_image_dir_aborts() {
    let fx = Fixture::new();
    fx.write_export(&[("p1", "ENG")]);
    let mut job = fx.job(AssignPolicy::default());
    job.image_dir = fx.dir.path().join("missing");
    let (result, state) = run(&job);
    assert!(matches!(result, Err(AssignError::Pool(PoolError::Io { .. }))));
    assert_eq!(state, RunState::Failed);
}

#[test]
fn missing_export_aborts() {
    let fx = Fixture::new();
    let (result, _) = run(&fx.job(AssignPolicy::default()));
    assert!(matches!(
        result,
        Err(AssignError::Extract(ExtractError::Io { .. }))
    ));
}

#[test]
fn empty_export_still_writes_valid_mapping() {
    let fx = Fixture::new();
    fx.write_export(&[]);
    let report = run(&fx.job(AssignPolicy::default())).0.unwrap();
    assert_eq!(report.players, 0);
    assert!(fx.xml().exists());
    assert!(reopen(&fx.xml()).mapping().is_empty());
}

#[test]
fn progress_is_monotonic_and_completes() {
    let fx = Fixture::new();
    fx.add_image("Caucasian/a.png");
    fx.write_export(&[("p1", "ENG"), ("p2", "ENG")]);

    let seen = RefCell::new(Vec::new());
    let mut assigner = Assigner::new(NationTable::new());
    let job = fx.job(AssignPolicy {
        preserve: false,
        allow_duplicates: true,
    });
    assigner
        .run(&job, &|p| seen.borrow_mut().push(p))
        .unwrap();

    let events = seen.into_inner();
    assert_eq!(events.last(), Some(&AssignProgress::Completed));
    let fractions: Vec<f32> = events.iter().filter_map(|p| p.fraction()).collect();
    assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(fractions.first(), Some(&0.1));
}

#[test]
fn side_store_is_written_alongside_mapping() {
    let fx = Fixture::new();
    fx.add_image("Caucasian/a.png");
    fx.write_export(&[("p1", "ENG")]);
    run(&fx.job(AssignPolicy::default())).0.unwrap();

    let history = mapping::history_path_for(&fx.xml());
    assert!(history.exists());

    // The game wipes config.xml; the next open still knows p1.
    fs::write(fx.xml(), "").unwrap();
    assert_eq!(reopen(&fx.xml()).get("p1"), Some("Caucasian/a"));
}
