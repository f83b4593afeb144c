use std::fs;

use ms_cases::{CaseLayout, format_tag};
use ms_core::{CaseId, ParameterSet};
use ms_results::*;

fn params(td: f64) -> ParameterSet {
    ParameterSet::from_values([td, 1.2, 3.0, 3.5, 3.5, 0.15, 0.5, 10.0])
}

fn write_case(layout: &CaseLayout, index: usize, td: f64, torque: Option<&str>) {
    let id = CaseId::new(index);
    fs::create_dir_all(layout.case_dir(id)).unwrap();
    fs::write(layout.tag_path(id), format_tag(&params(td))).unwrap();
    if let Some(torque) = torque {
        fs::write(layout.torque_path(id), torque).unwrap();
    }
}

#[test]
fn harvest_mixes_results_and_sentinels() {
    let root = tempfile::tempdir().unwrap();
    let layout = CaseLayout::new(root.path());
    write_case(&layout, 0, 2.0, Some("time T_x T_y T_z\n0.5 0.1 0.2 3.0\n"));
    write_case(&layout, 1, 2.0, Some("time T_x T_y T_z\n0.5 0.1 garbage\n"));
    write_case(&layout, 2, 2.0, None);
    // mixer_3 has no directory at all

    let dataset = root.path().join(default_dataset_name(0, 3));
    let report = harvest(&layout, 0..=3, &dataset, HarvestMode::Append, None).unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 3);

    let text = fs::read_to_string(&dataset).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("mixer_0\tT/D\t2.000000\t"));
    assert!(lines[0].ends_with("Np\t603.185789"));
    assert!(lines[1].ends_with("\t!SIMULATION FAILED!"));
    assert!(lines[2].contains("T/D"));
    assert_eq!(lines[3], "mixer_3\t!SIMULATION FAILED!");

    let rows = read_dataset(&dataset).unwrap();
    let RowOutcome::PowerNumber(np) = rows[0].outcome else {
        panic!("expected a power number");
    };
    assert!((np - 603.19).abs() < 0.01);
    assert_eq!(feature_matrix(&rows).len(), 1);
}

#[test]
fn append_keeps_duplicates_reconcile_drops_them() {
    let root = tempfile::tempdir().unwrap();
    let layout = CaseLayout::new(root.path());
    write_case(&layout, 0, 2.0, None);
    write_case(&layout, 1, 2.0, Some("0 0 0 1.0\n"));
    let dataset = root.path().join("data.txt");

    harvest(&layout, 0..=1, &dataset, HarvestMode::Append, None).unwrap();
    fs::write(layout.torque_path(CaseId::new(0)), "0 0 0 2.0\n").unwrap();
    harvest(&layout, 0..=0, &dataset, HarvestMode::Append, None).unwrap();

    assert_eq!(read_rows(&dataset).unwrap().len(), 3);
    let rows = read_dataset(&dataset).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(!rows[0].is_failure());

    let mut calls = Vec::new();
    let mut progress = |done: usize, total: usize| calls.push((done, total));
    harvest(&layout, 0..=1, &dataset, HarvestMode::Reconcile, Some(&mut progress)).unwrap();
    assert_eq!(calls, vec![(1, 2), (2, 2)]);

    let text = fs::read_to_string(&dataset).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.starts_with("mixer_0\t"));
}

#[test]
fn reversed_range_is_rejected() {
    let root = tempfile::tempdir().unwrap();
    let layout = CaseLayout::new(root.path());
    #[allow(clippy::reversed_empty_ranges)]
    let err = harvest(&layout, 5..=2, &root.path().join("d.txt"), HarvestMode::Append, None)
        .unwrap_err();
    assert!(matches!(err, ResultsError::InvalidRange { first: 5, last: 2 }));
}

#[test]
fn reconcile_replaces_unreadable_lines_with_new_rows() {
    let root = tempfile::tempdir().unwrap();
    let layout = CaseLayout::new(root.path());
    write_case(&layout, 0, 2.0, Some("0 0 0 3.0\n"));
    let dataset = root.path().join("data.txt");
    fs::write(&dataset, "mixer_7\tT/D\t2.0000\n").unwrap();

    let report = harvest(&layout, 0..=0, &dataset, HarvestMode::Reconcile, None).unwrap();
    assert_eq!(report.dropped_lines, 1);
    assert_eq!(report.succeeded, 1);

    let text = fs::read_to_string(&dataset).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("mixer_0\t"));
    assert!(lines[0].ends_with("Np\t603.185789"));
}
