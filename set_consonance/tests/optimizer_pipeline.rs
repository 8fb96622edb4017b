// End-to-end runs through `pipeline::run`: config in, report out.

use set_consonance::alias::HarmonicRole;
use set_consonance::config::RunConfig;
use set_consonance::pipeline::{self, RunError, RunReport};
use set_consonance::spacing::SpacingOptions;
use set_consonance_pcs::SetError;

fn config(template: &str) -> RunConfig {
    RunConfig {
        template: template.to_string(),
        ..Default::default()
    }
}

#[test]
fn augmented_template_runs_end_to_end() {
    let report = pipeline::run(&config("444")).unwrap();
    assert!(report.harmonizations_checked >= 70);
    assert_eq!(report.spacing.spacing, vec![0, 0, 0]);
    assert_eq!(report.spacing.accepted, 1);
    assert_eq!(report.progression.len(), 64);
    assert!(report.crawl.is_none());
    assert_eq!(report.labels.len(), 64);
    assert_eq!(report.labels[0].catalog_index, report.spacing.permutations[0].catalog_index);
    let tonics = report
        .progression
        .chords
        .iter()
        .filter(|c| c.role == Some(HarmonicRole::Tonic))
        .count() as u32;
    assert_eq!(tonics, report.spacing.score.tonic);
}

#[test]
fn parallel_run_matches_sequential() {
    let sequential = pipeline::run(&config("345")).unwrap();
    let parallel = pipeline::run(&RunConfig {
        parallel: true,
        ..config("345")
    })
    .unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn forced_selection_flows_into_progression() {
    let forced = RunConfig {
        spacing: SpacingOptions {
            forced_selection: Some(0),
            skip_duplicates: false,
        },
        ..config("0x2232")
    };
    let report = pipeline::run(&forced).unwrap();
    assert!(report.spacing.forced);
    assert_eq!(report.spacing.ordinal, 0);
    assert_eq!(report.progression.spacing, report.spacing.spacing);
    assert_eq!(report.progression.len(), 2 * 2 * 3 * 2);
}

#[test]
fn oversized_template_is_rejected() {
    match pipeline::run(&config("553")) {
        Err(RunError::Set(SetError::ConstraintUnsatisfiable { range_sum, octave })) => {
            assert_eq!((range_sum, octave), (13, 12));
        }
        other => panic!("expected constraint failure, got {other:?}"),
    }
}

#[test]
fn report_written_as_json() {
    let path = std::env::temp_dir().join(format!("consonance-report-{}.json", std::process::id()));
    let run = RunConfig {
        output: Some(path.clone()),
        crawl_common_tones: true,
        ..config("222")
    };
    let report = pipeline::run(&run).unwrap();
    let crawl = report.crawl.as_ref().unwrap();
    assert_eq!(crawl.count(), 8);

    let text = std::fs::read_to_string(&path).unwrap();
    let restored: RunReport = serde_json::from_str(&text).unwrap();
    assert_eq!(restored, report);
    let _ = std::fs::remove_file(&path);
}
