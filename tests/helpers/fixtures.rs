//! Topology and distribution fixtures

use nalgebra::Vector2;

use belief_state_rs::common::rng::SimpleRng;
use belief_state_rs::{
    BeliefUpdateEngine, ExecutionMode, GridTopology, LineTopology, ParallelExecutor, ProbabilityDistribution,
    RectangleTopology, ScreenRegion, SquareTopology,
};

/// Line over [-5, 5] with 10 bins of width 1
pub fn line() -> LineTopology {
    LineTopology::new(-5.0, 5.0, 10).unwrap()
}

/// 16:9 rectangle with a 16x9 grid
pub fn rectangle() -> RectangleTopology {
    RectangleTopology::new(16.0, 9.0, 144).unwrap()
}

/// 5x5 platform of radius 5
#[allow(deprecated)]
pub fn square() -> SquareTopology {
    SquareTopology::new(5.0, 25).unwrap()
}

/// A 4x3 keyboard of unit keys with a gap of 0.5 between keys
pub fn keyboard() -> GridTopology {
    let regions = (0..3)
        .flat_map(|row| {
            (0..4).map(move |column| {
                ScreenRegion::new(
                    Vector2::new(column as f32 * 1.5, row as f32 * 1.5),
                    Vector2::new(1.0, 1.0),
                )
            })
        })
        .collect();
    GridTopology::new(regions, 1.0).unwrap()
}

/// Sequential and parallel engines over the same topology
pub fn engine_pair<T: belief_state_rs::Topology + Clone>(
    topology: T,
    observation_probability: f64,
) -> (BeliefUpdateEngine<T>, BeliefUpdateEngine<T>) {
    let sequential = BeliefUpdateEngine::new(topology.clone(), observation_probability)
        .unwrap()
        .with_executor(ParallelExecutor::sequential());
    let parallel = BeliefUpdateEngine::new(topology, observation_probability)
        .unwrap()
        .with_executor(ParallelExecutor::new(ExecutionMode::Parallel, 4).unwrap());
    (sequential, parallel)
}

/// Random strictly positive distribution over `bins`
pub fn random_distribution(rng: &mut SimpleRng, bins: usize) -> ProbabilityDistribution {
    let weights = (0..bins).map(|_| rng.uniform() + 1e-3).collect();
    ProbabilityDistribution::normalized(weights).unwrap()
}
