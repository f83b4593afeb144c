use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use ms_cases::{CaseLayout, CaseStatus};
use ms_core::CaseId;
use ms_dispatch::*;

const TOTAL: usize = 200;

struct Campaign {
    root: tempfile::TempDir,
    artifacts: Vec<String>,
}

impl Campaign {
    fn new(cases: usize) -> Self {
        let root = tempfile::tempdir().unwrap();
        for i in 0..cases {
            fs::create_dir_all(root.path().join(format!("mixer_{i}"))).unwrap();
        }
        for f in ["launch_lethe.sh", "launch_lethe.py", "relaunch_lethe.sh"] {
            fs::write(root.path().join(f), "#!/bin/bash\n").unwrap();
        }
        Self {
            root,
            artifacts: vec!["launch_lethe.sh".to_string(), "launch_lethe.py".to_string()],
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }
}

fn plan<'a>(campaign: &'a Campaign, layout: &'a CaseLayout, max: usize) -> DispatchPlan<'a> {
    DispatchPlan {
        layout,
        launch: LaunchSpec {
            source_dir: campaign.path(),
            script: "launch_lethe.sh",
            artifacts: &campaign.artifacts,
        },
        total_cases: TOTAL,
        max_concurrent_jobs: max,
    }
}

fn indices(ids: &[CaseId]) -> Vec<usize> {
    ids.iter().map(|id| id.index()).collect()
}

#[test]
fn fills_remaining_quota_in_order() {
    let campaign = Campaign::new(TOTAL);
    let layout = CaseLayout::new(campaign.path());
    let scheduler = MockScheduler::with_queue_count(950);

    let outcome = dispatch_next_batch(&scheduler, &DispatchState::default(), &plan(&campaign, &layout, 1000)).unwrap();

    assert_eq!(outcome.budget, 50);
    assert_eq!(indices(&outcome.submitted), (0..50).collect::<Vec<_>>());
    assert_eq!(outcome.state.first, Some(0));
    assert_eq!(outcome.state.last, Some(49));
    assert!(outcome.failed.is_empty());

    let names = scheduler.submitted_names();
    assert_eq!(names[0], "mixer_0");
    assert_eq!(names[49], "mixer_49");

    let (script, _) = &scheduler.submissions()[0];
    assert_eq!(script, &campaign.path().join("mixer_0").join("launch_lethe.sh"));
    assert!(campaign.path().join("mixer_0").join("launch_lethe.py").exists());
}

#[test]
fn repeated_batches_are_disjoint_and_increasing() {
    let campaign = Campaign::new(TOTAL);
    let layout = CaseLayout::new(campaign.path());
    let scheduler = MockScheduler::with_queue_count(950);
    let plan = plan(&campaign, &layout, 1000);

    let first = dispatch_next_batch(&scheduler, &DispatchState::default(), &plan).unwrap();
    let second = dispatch_next_batch(&scheduler, &first.state, &plan).unwrap();

    let a = indices(&first.submitted);
    let b = indices(&second.submitted);
    assert_eq!(b, (50..100).collect::<Vec<_>>());
    assert!(a.last() < b.first());
    assert_eq!(second.state.first, Some(50));
    assert_eq!(second.state.last, Some(99));

    let all: BTreeSet<String> = scheduler.submitted_names().into_iter().collect();
    assert_eq!(all.len(), 100);
}

#[test]
fn full_queue_submits_nothing() {
    let campaign = Campaign::new(TOTAL);
    let layout = CaseLayout::new(campaign.path());
    let scheduler = MockScheduler::with_queue_count(1200);
    let state = DispatchState {
        first: Some(0),
        last: Some(9),
        retry: BTreeSet::new(),
    };

    let outcome = dispatch_next_batch(&scheduler, &state, &plan(&campaign, &layout, 1000)).unwrap();
    assert_eq!(outcome.budget, 0);
    assert!(outcome.submitted.is_empty());
    assert_eq!(outcome.state, state);
}

#[test]
fn unreachable_queue_abstains() {
    let campaign = Campaign::new(TOTAL);
    let layout = CaseLayout::new(campaign.path());
    let scheduler = MockScheduler::unreachable();

    let err = dispatch_next_batch(&scheduler, &DispatchState::default(), &plan(&campaign, &layout, 1000)).unwrap_err();
    assert!(matches!(err, DispatchError::QueueQuery(_)));
    assert!(scheduler.submissions().is_empty());
}

#[test]
fn failed_submission_is_retried_next_batch() {
    let campaign = Campaign::new(TOTAL);
    let layout = CaseLayout::new(campaign.path());
    let plan = plan(&campaign, &layout, 5);

    let flaky = MockScheduler::with_queue_count(0).rejecting("mixer_2");
    let first = dispatch_next_batch(&flaky, &DispatchState::default(), &plan).unwrap();
    assert_eq!(indices(&first.submitted), vec![0, 1, 3, 4]);
    assert_eq!(first.failed.len(), 1);
    assert!(matches!(first.failed[0].1, DispatchError::Submission { .. }));
    assert_eq!(first.state.last, Some(4));
    assert!(first.state.retry.contains(&2));
    assert!(!first.state.is_submitted(2));

    let healthy = MockScheduler::with_queue_count(0);
    let second = dispatch_next_batch(&healthy, &first.state, &plan).unwrap();
    assert_eq!(indices(&second.submitted), vec![2, 5, 6, 7, 8]);
    assert!(second.state.retry.is_empty());
    assert_eq!(second.state.first, Some(5));
    assert_eq!(second.state.last, Some(8));
}

#[test]
fn retry_entry_past_the_frontier_is_submitted_once() {
    let campaign = Campaign::new(TOTAL);
    let layout = CaseLayout::new(campaign.path());
    let scheduler = MockScheduler::with_queue_count(0);
    let state = DispatchState {
        first: Some(5),
        last: Some(9),
        retry: BTreeSet::from([12]),
    };

    let outcome = dispatch_next_batch(&scheduler, &state, &plan(&campaign, &layout, 5)).unwrap();
    assert_eq!(indices(&outcome.submitted), vec![10, 11, 12, 13, 14]);
    assert_eq!(outcome.state.first, Some(10));
    assert_eq!(outcome.state.last, Some(14));
    assert!(outcome.state.retry.is_empty());

    let names = scheduler.submitted_names();
    let unique: BTreeSet<&String> = names.iter().collect();
    assert_eq!(unique.len(), names.len());
}

#[test]
fn missing_case_directory_is_a_submission_error() {
    let campaign = Campaign::new(3);
    let layout = CaseLayout::new(campaign.path());
    let scheduler = MockScheduler::with_queue_count(0);

    let outcome = dispatch_next_batch(&scheduler, &DispatchState::default(), &plan(&campaign, &layout, 4)).unwrap();
    assert_eq!(indices(&outcome.submitted), vec![0, 1, 2]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].0, CaseId::new(3));
}

#[test]
fn frontier_stops_at_campaign_size() {
    let campaign = Campaign::new(TOTAL);
    let layout = CaseLayout::new(campaign.path());
    let scheduler = MockScheduler::with_queue_count(0);
    let state = DispatchState {
        first: Some(150),
        last: Some(195),
        retry: BTreeSet::new(),
    };

    let outcome = dispatch_next_batch(&scheduler, &state, &plan(&campaign, &layout, 1000)).unwrap();
    assert_eq!(indices(&outcome.submitted), vec![196, 197, 198, 199]);
    assert_eq!(outcome.state.last, Some(199));

    let again = dispatch_next_batch(&scheduler, &outcome.state, &plan(&campaign, &layout, 1000)).unwrap();
    assert!(again.submitted.is_empty());
}

#[test]
fn resubmit_skips_active_and_finished_cases() {
    let campaign = Campaign::new(4);
    let layout = CaseLayout::new(campaign.path());
    let scheduler = MockScheduler::with_queue_count(0).with_active("mixer_1");
    let relaunch_artifacts = vec!["relaunch_lethe.sh".to_string()];
    let relaunch = LaunchSpec {
        source_dir: campaign.path(),
        script: "relaunch_lethe.sh",
        artifacts: &relaunch_artifacts,
    };

    let cases = [
        (CaseId::new(0), CaseStatus::NeedsResubmit),
        (CaseId::new(1), CaseStatus::NeedsResubmit),
        (CaseId::new(2), CaseStatus::Completed),
        (CaseId::new(3), CaseStatus::Failed),
    ];
    let active = scheduler.active_job_names().unwrap();
    let outcome = resubmit(&scheduler, &layout, &cases, &relaunch, &active);

    assert_eq!(outcome.submitted, vec![CaseId::new(0)]);
    assert_eq!(outcome.skipped_active, vec![CaseId::new(1)]);
    assert!(outcome.failed.is_empty());

    let (script, name) = &scheduler.submissions()[0];
    assert!(script.ends_with("mixer_0/relaunch_lethe.sh"));
    assert_eq!(name, "mixer_0");
}
