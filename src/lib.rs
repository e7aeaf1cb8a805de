/*!
# belief-state-rs - Discrete belief state updates under partial observability

Rust implementation of the belief model of a simulated observer: a
probability distribution over the location of an object (a ball, a car, a
finger on a keyboard) that is updated every tick with a discrete Bayes
filter and corrected only while the object is in focus.

## Features

- Four spatial topologies: line, rectangle, square platform (deprecated) and
  grids of irregular screen regions
- Edge-bin redistribution so mass moving past the tracked range is kept
- Velocity sample sets from an explicit, seedable random source
- Sequential or rayon-parallel per-bin updates with identical results

## Modules

- [`geometry`] - Position to bin conversion, edge bins, crossed bins
- [`sampling`] - Normal sampling, velocity sample sets, velocity estimation
- [`belief`] - Topologies, distributions, the update engine and the tracker
- [`config`] - JSON configuration
- [`reporter`] - Per-tick observability hooks
- [`common`] - RNG and constants

## Example

```rust
use belief_state_rs::{
    sample_velocity_set, BeliefUpdateEngine, LineTopology, ProbabilityDistribution, SimpleRng,
};

let topology = LineTopology::new(-5.0, 5.0, 10).unwrap();
let engine = BeliefUpdateEngine::new(topology, 0.9).unwrap();

let mut rng = SimpleRng::new(42);
let prior = ProbabilityDistribution::one_hot(10, 5).unwrap();
let samples = sample_velocity_set(&mut rng, 0.5f32, 0.1, 100).unwrap();

// the car is on screen at x = 1.0
let observation = engine.observation_for(&1.0, true);
let posterior = engine.update(&prior, &samples, observation).unwrap();
assert!((posterior.sum() - 1.0).abs() < 1e-9);
```
*/

// ============================================================================
// Core modules
// ============================================================================

/// Belief distributions, topologies and the update engine
pub mod belief;

/// Conversion between continuous coordinates and bins
pub mod geometry;

/// Gaussian velocity sampling
pub mod sampling;

/// Configuration loading and validation
pub mod config;

/// Observability hooks for update ticks
pub mod reporter;

/// Error type
pub mod errors;

/// Low-level utilities (RNG, constants)
pub mod common;

// ============================================================================
// Re-exports for convenience
// ============================================================================

// Engine and topologies
pub use belief::{
    BeliefTracker, BeliefUpdateEngine, ExecutionMode, GridTopology, LineTopology, Observation,
    ObservationModel, ParallelExecutor, ProbabilityDistribution, RectangleTopology, SquareTopology,
    Topology,
};

// Geometry
pub use geometry::{
    bin_to_continuous, continuous_to_bin, continuous_to_bin_checked, crossed_bins, is_edge_bin, Rect,
    ScreenRegion, SpatialVector,
};

// Sampling
pub use sampling::{average_velocity, sample_velocity_set, DriftPolicy, NormalDistribution, VelocityEstimator};

// Configuration
pub use config::{AnyTopology, BeliefConfig, TopologyConfig};

// Reporters
pub use reporter::{DebugReporter, LoggingReporter, NoOpReporter, StepReporter};

// Errors
pub use errors::BeliefError;

pub use common::rng::SimpleRng;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
