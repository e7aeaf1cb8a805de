//! End-to-end tracking scenarios
//!
//! Objects move one bin per tick, so the sample sets shift the belief by
//! exactly one bin and the most likely bin must follow the true position
//! even while the object is hidden.

mod helpers;

use nalgebra::{Vector2, Vector3};

use belief_state_rs::{
    AnyTopology, BeliefConfig, BeliefTracker, BeliefUpdateEngine, DebugReporter, DriftPolicy,
    LineTopology, LoggingReporter, ParallelExecutor, SimpleRng, VelocityEstimator,
};
use helpers::assertions::{assert_normalized, assert_scalar_close};
use helpers::fixtures::{keyboard, square};

//=============================================================================
// Line: a car driving right
//=============================================================================

/// A car moving one bin per tick is tracked through hidden stretches
#[test]
fn test_car_on_line_is_tracked_while_hidden() {
    let mut rng = SimpleRng::new(42);
    let engine = BeliefUpdateEngine::new(LineTopology::new(-10.0, 10.0, 20).unwrap(), 0.9)
        .unwrap()
        .with_executor(ParallelExecutor::sequential());
    let estimator = VelocityEstimator::new(DriftPolicy::FollowCurrent, 0.01).unwrap();
    let mut tracker = BeliefTracker::new(engine, estimator, 0.1, 50, &-9.5)
        .unwrap()
        .with_reporter(DebugReporter::new());

    for tick in 1..=15 {
        let position = -9.5 + tick as f32;
        // in focus every fourth tick only
        let belief = tracker.step(&mut rng, &position, 1.0, tick % 4 == 0).unwrap();
        assert_normalized(belief.as_slice(), &format!("tick {}", tick));

        assert_eq!(tracker.belief_bin(), tick, "tick {}", tick);
        assert_scalar_close(tracker.belief_position() as f64, position as f64, 1e-5, "belief position");
    }

    let reporter = tracker.reporter();
    assert_eq!(reporter.sample_events().len(), 15);
    assert_eq!(reporter.prior_snapshots().len(), 15);
    assert_eq!(reporter.posteriors().len(), 15);
    assert!(reporter.degeneracies().is_empty());
    // the first prior is the one-hot start
    assert_eq!(reporter.prior_snapshots()[0][0], 1.0);
    assert_scalar_close(tracker.average_velocity().unwrap() as f64, 1.0, 0.1, "average velocity");
}

//=============================================================================
// Square: a ball rolling over the platform
//=============================================================================

/// A ball seen once keeps its estimated velocity while hidden
#[test]
fn test_ball_on_platform_with_decaying_mean() {
    let mut rng = SimpleRng::new(7);
    let engine = BeliefUpdateEngine::new(square(), 0.9).unwrap();
    let estimator = VelocityEstimator::new(DriftPolicy::DecayingMean, 0.01).unwrap();
    let start = Vector3::new(-4.0, 0.5, 0.0);
    let mut tracker = BeliefTracker::new(engine, estimator, 0.1, 40, &start).unwrap();
    assert_eq!(tracker.belief_bin(), 2);

    let velocity = Vector3::new(2.0, 0.0, 0.0);
    for tick in 1..=4 {
        let position = start + velocity * tick as f32;
        tracker.step(&mut rng, &position, velocity, tick == 1).unwrap();
        // bins are 2 wide, numbered x * 5 + z
        assert_eq!(tracker.belief_bin(), 2 + 5 * tick, "tick {}", tick);
    }

    let estimate = tracker.estimator().estimate();
    assert!((estimate.x - 2.0).abs() < 0.1, "estimate drifted to {:?}", estimate);
    assert!(tracker.estimator().current_sigma_mean() < 0.01);
}

//=============================================================================
// Grid: a finger moving over keys
//=============================================================================

/// A finger sliding along a row of keys
#[test]
fn test_finger_on_keyboard() {
    let mut rng = SimpleRng::new(3);
    let engine = BeliefUpdateEngine::new(keyboard(), 0.9).unwrap();
    let estimator = VelocityEstimator::new(DriftPolicy::FollowCurrent, 0.01).unwrap();
    let start = Vector2::new(0.5, 0.5);
    let mut tracker = BeliefTracker::new(engine, estimator, 0.05, 30, &start)
        .unwrap()
        .with_reporter(LoggingReporter::verbose());

    let velocity = Vector2::new(1.5, 0.0);
    for tick in 1..=3 {
        let position = start + velocity * tick as f32;
        tracker.step(&mut rng, &position, velocity, false).unwrap();
        assert_eq!(tracker.belief_bin(), tick);
    }

    // moving up one row, in focus on the key above
    let up = Vector2::new(0.0, 1.5);
    let above = Vector2::new(5.0, 2.0);
    tracker.step(&mut rng, &above, up, true).unwrap();
    assert_eq!(tracker.belief_bin(), 7);
}

//=============================================================================
// Configuration driven
//=============================================================================

const RECTANGLE_CONFIG: &str = r#"{
    "number_of_samples": 64,
    "sigma": 0.1,
    "sigma_mean": 0.01,
    "observation_probability": 0.95,
    "execution": { "mode": "parallel", "batch_size": 8 },
    "topology": { "kind": "rectangle", "width": 16.0, "height": 9.0, "number_of_bins": 144 }
}"#;

/// A tracker built from JSON follows an object across the rectangle
#[test]
fn test_rectangle_tracker_from_config() {
    let config = BeliefConfig::from_json_str(RECTANGLE_CONFIG).unwrap();
    let AnyTopology::Rectangle(topology) = config.build().unwrap() else {
        panic!("expected a rectangle topology");
    };
    let grid = *topology.grid();

    let start = Vector2::new(-7.5, 0.0);
    let mut tracker = config
        .tracker(topology, DriftPolicy::FollowCurrent, &start)
        .unwrap()
        .with_reporter(DebugReporter::new());
    let mut rng = SimpleRng::new(2024);

    let velocity = Vector2::new(1.0, 0.0);
    for tick in 1..=10 {
        let position = start + velocity * tick as f32;
        tracker.step(&mut rng, &position, velocity, tick % 3 == 0).unwrap();
        assert_eq!(tracker.belief_bin(), grid.bin_of(tick, 4), "tick {}", tick);
    }
    assert_eq!(tracker.reporter().posteriors().len(), 10);

    tracker.reset(&start).unwrap();
    assert_eq!(tracker.belief_bin(), grid.bin_of(0, 4));
    assert_eq!(tracker.max_probability(), 1.0);
}

/// A start position away from every key is rejected
#[test]
fn test_tracker_rejects_start_outside_grid() {
    let engine = BeliefUpdateEngine::new(keyboard(), 0.9).unwrap();
    let estimator = VelocityEstimator::new(DriftPolicy::FollowCurrent, 0.01).unwrap();
    assert!(BeliefTracker::new(engine, estimator, 0.1, 10, &Vector2::new(50.0, 50.0)).is_err());
}
