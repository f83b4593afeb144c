use std::fs;
use std::path::Path;

use ms_cases::{COMPLETION_BANNER, CaseLayout, CaseStatus, audit, clean_case_artifacts, infer_status};
use ms_core::CaseId;

fn case_dir(root: &Path, index: usize) -> std::path::PathBuf {
    let dir = root.join(format!("mixer_{index}"));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn finished_log() -> String {
    format!(
        "Tolerance reached\n{banner}\n| Total wallclock time elapsed  |     12.3s |\n{banner}\n",
        banner = COMPLETION_BANNER
    )
}

#[test]
fn banner_means_completed() {
    let root = tempfile::tempdir().unwrap();
    let dir = case_dir(root.path(), 0);
    fs::write(dir.join("mixer_0-1.out"), finished_log()).unwrap();

    assert_eq!(infer_status(&dir), CaseStatus::Completed);
}

#[test]
fn torque_without_banner_needs_resubmit() {
    let root = tempfile::tempdir().unwrap();
    let dir = case_dir(root.path(), 1);
    fs::write(dir.join("mixer_1-1.out"), "slurmstepd: error: DUE TO TIME LIMIT\n").unwrap();
    fs::write(dir.join("torque.00.dat"), "time T_x T_y T_z\n0.1 0 0 2.9\n").unwrap();

    assert_eq!(infer_status(&dir), CaseStatus::NeedsResubmit);
}

#[test]
fn nothing_means_failed() {
    let root = tempfile::tempdir().unwrap();
    let dir = case_dir(root.path(), 2);
    assert_eq!(infer_status(&dir), CaseStatus::Failed);

    fs::write(dir.join("mixer_2-1.out"), "Segmentation fault\n").unwrap();
    assert_eq!(infer_status(&dir), CaseStatus::Failed);
}

#[test]
fn only_the_latest_log_counts() {
    let root = tempfile::tempdir().unwrap();
    let dir = case_dir(root.path(), 3);
    fs::write(dir.join("mixer_3-2.out"), finished_log()).unwrap();
    fs::write(dir.join("mixer_3-11.out"), "CANCELLED\n").unwrap();
    fs::write(dir.join("torque.00.dat"), "0.1 0 0 2.9\n").unwrap();

    assert_eq!(infer_status(&dir), CaseStatus::NeedsResubmit);
    assert_eq!(audit(&CaseLayout::new(root.path()), CaseId::new(3)), CaseStatus::NeedsResubmit);
}

#[test]
fn restart_that_finishes_is_completed() {
    let root = tempfile::tempdir().unwrap();
    let dir = case_dir(root.path(), 4);
    fs::write(dir.join("mixer_4-1.out"), "DUE TO TIME LIMIT\n").unwrap();
    fs::write(dir.join("mixer_4-2.out"), finished_log()).unwrap();
    fs::write(dir.join("torque.00.dat"), "0.1 0 0 2.9\n").unwrap();

    assert_eq!(infer_status(&dir), CaseStatus::Completed);
}

#[test]
fn clean_removes_only_launch_artifacts_and_mesh() {
    let root = tempfile::tempdir().unwrap();
    let dir = case_dir(root.path(), 5);
    for f in ["launch_lethe.sh", "launch_lethe.py", "relaunch_lethe.sh", "mixer.msh", "mixer.geo", "torque.00.dat"] {
        fs::write(dir.join(f), "x").unwrap();
    }

    let layout = CaseLayout::new(root.path());
    let report = clean_case_artifacts(&layout, [CaseId::new(5), CaseId::new(6)]);

    assert_eq!(report.cases, 1);
    assert_eq!(report.files_removed, 4);
    assert_eq!(report.errors, 0);
    assert!(dir.join("mixer.geo").exists());
    assert!(dir.join("torque.00.dat").exists());
    assert!(!dir.join("mixer.msh").exists());
}
