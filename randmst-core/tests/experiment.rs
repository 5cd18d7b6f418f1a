//! End-to-end experiment scenarios.

use randmst_core::{
    Dimension, ExperimentBuilder, MAX_VERTEX_COUNT, RandMstError, RelaxationPolicy,
};
use rstest::rstest;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[rstest]
#[case(-1)]
#[case(5)]
fn invalid_dimension_aborts_before_any_trial(#[case] dimension: i64) {
    let err = ExperimentBuilder::new()
        .with_vertex_count(8)
        .with_trial_count(3)
        .with_dimension(dimension)
        .build()
        .expect_err("dimension is out of range");
    assert_eq!(err, RandMstError::InvalidDimension { got: dimension });
}

#[rstest]
#[case(0)]
#[case(MAX_VERTEX_COUNT + 1)]
fn invalid_vertex_count_is_rejected(#[case] vertex_count: usize) {
    let err = ExperimentBuilder::new()
        .with_vertex_count(vertex_count)
        .build()
        .expect_err("vertex count is out of range");
    assert!(matches!(err, RandMstError::InvalidVertexCount { got, .. } if got == vertex_count));
}

#[test]
fn zero_trials_are_rejected() {
    let err = ExperimentBuilder::new()
        .with_trial_count(0)
        .build()
        .expect_err("at least one trial is required");
    assert_eq!(err, RandMstError::InvalidTrialCount { got: 0 });
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(4)]
fn single_vertex_runs_weigh_nothing(#[case] dimension: i64) {
    let summary = ExperimentBuilder::new()
        .with_vertex_count(1)
        .with_trial_count(4)
        .with_dimension(dimension)
        .with_seed(Some(3))
        .build()
        .expect("configuration is valid")
        .run()
        .expect("run must succeed");
    assert_eq!(summary.total_weight, 0.0);
    assert_eq!(summary.average_weight(), 0.0);
}

#[rstest]
#[case(Dimension::RandomWeight, 0)]
#[case(Dimension::Two, 2)]
#[case(Dimension::Four, 4)]
fn fixed_seed_is_bit_reproducible(#[case] expected: Dimension, #[case] dimension: i64) {
    let experiment = ExperimentBuilder::new()
        .with_vertex_count(64)
        .with_trial_count(3)
        .with_dimension(dimension)
        .with_seed(Some(0xDEAD_BEEF))
        .build()
        .expect("configuration is valid");
    assert_eq!(experiment.dimension(), expected);

    let first = experiment.run().expect("run must succeed");
    let second = experiment.run().expect("run must succeed");
    assert_eq!(first.total_weight.to_bits(), second.total_weight.to_bits());
    assert_eq!(first.seed, 0xDEAD_BEEF);
}

#[test]
fn trials_share_one_stream() {
    init_tracing();
    let experiment = ExperimentBuilder::new()
        .with_vertex_count(16)
        .with_trial_count(2)
        .with_dimension(2)
        .with_seed(Some(11))
        .build()
        .expect("configuration is valid");

    let mut weights = Vec::new();
    let mut trials = Vec::new();
    let summary = experiment
        .run_with(|outcome| {
            trials.push(outcome.trial);
            weights.push(outcome.weight());
            assert!(outcome.tree.is_spanning_tree());
            assert_eq!(outcome.instance.vertex_count(), 16);
            Ok::<(), RandMstError>(())
        })
        .expect("run must succeed");

    assert_eq!(trials, vec![1, 2]);
    assert_ne!(weights[0].to_bits(), weights[1].to_bits());
    assert!((summary.total_weight - weights.iter().sum::<f64>()).abs() < 1e-12);
    assert!((summary.average_weight() - summary.total_weight / 2.0).abs() < 1e-12);
    assert!(summary.average_elapsed() <= summary.total_elapsed);
}

#[test]
fn random_weight_trials_stay_below_edge_count() {
    init_tracing();
    ExperimentBuilder::new()
        .with_vertex_count(5)
        .with_trial_count(25)
        .with_dimension(0)
        .with_seed(Some(5))
        .build()
        .expect("configuration is valid")
        .run_with(|outcome| {
            assert!((0.0..4.0).contains(&outcome.weight()));
            assert!(outcome.instance.points().is_empty());
            Ok::<(), RandMstError>(())
        })
        .expect("run must succeed");
}

#[rstest]
#[case(RelaxationPolicy::Rebuild)]
#[case(RelaxationPolicy::SiftUp)]
fn geometric_weights_respect_edge_bound(#[case] policy: RelaxationPolicy) {
    let vertex_count = 200;
    ExperimentBuilder::new()
        .with_vertex_count(vertex_count)
        .with_trial_count(2)
        .with_dimension(3)
        .with_seed(Some(21))
        .with_policy(policy)
        .build()
        .expect("configuration is valid")
        .run_with(|outcome| {
            assert!(outcome.weight() > 0.0);
            assert!(outcome.weight() <= 2.0 * (vertex_count - 1) as f64);
            assert_eq!(outcome.tree.edges().count(), vertex_count - 1);
            Ok::<(), RandMstError>(())
        })
        .expect("run must succeed");
}

#[test]
fn unseeded_runs_report_their_seed() {
    let experiment = ExperimentBuilder::new()
        .with_vertex_count(32)
        .with_dimension(1)
        .build()
        .expect("configuration is valid");
    assert_eq!(experiment.seed(), None);
    let summary = experiment.run().expect("run must succeed");

    let replay = ExperimentBuilder::new()
        .with_vertex_count(32)
        .with_dimension(1)
        .with_seed(Some(summary.seed))
        .build()
        .expect("configuration is valid")
        .run()
        .expect("run must succeed");
    assert_eq!(summary.total_weight.to_bits(), replay.total_weight.to_bits());
}

/// Failure raised by a trial callback, alongside core failures.
#[derive(Debug, PartialEq)]
enum ReportError {
    Core(RandMstError),
    Rejected { trial: usize },
}

impl From<RandMstError> for ReportError {
    fn from(error: RandMstError) -> Self {
        Self::Core(error)
    }
}

#[rstest]
#[case::first_trial(1)]
#[case::middle_trial(3)]
#[case::last_trial(6)]
fn failing_callback_stops_remaining_trials(#[case] failing_trial: usize) {
    let experiment = ExperimentBuilder::new()
        .with_vertex_count(64)
        .with_trial_count(6)
        .with_dimension(2)
        .with_seed(Some(17))
        .build()
        .expect("configuration is valid");

    let mut trials_run = Vec::new();
    let err = experiment
        .run_with(|outcome| {
            trials_run.push(outcome.trial);
            if outcome.trial == failing_trial {
                return Err(ReportError::Rejected {
                    trial: outcome.trial,
                });
            }
            Ok(())
        })
        .expect_err("callback failure must abort the run");

    assert_eq!(err, ReportError::Rejected { trial: failing_trial });
    assert_eq!(trials_run, (1..=failing_trial).collect::<Vec<_>>());
}
