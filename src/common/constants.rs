//! Numerical constants and defaults shared across the crate.

/// Floor applied to the observed bin of a grid topology when its transition
/// mass is exactly zero
pub const OBSERVED_BIN_FLOOR: f64 = 1e-4;

/// Tolerance used when checking that a distribution sums to one
pub const NORMALIZATION_TOLERANCE: f64 = 1e-9;

/// Tolerance accepted on the sum of a caller supplied distribution
pub const INPUT_SUM_TOLERANCE: f64 = 1e-6;

/// Velocities closer than this to the unclipped value are returned unchanged
pub const CLIP_EPSILON: f32 = 1e-5;

/// Default number of velocity samples drawn per tick
pub const DEFAULT_NUMBER_OF_SAMPLES: usize = 100;

/// Default standard deviation of the velocity samples
pub const DEFAULT_SIGMA: f64 = 0.1;

/// Default standard deviation added to the estimated velocity while unobserved
pub const DEFAULT_SIGMA_MEAN: f64 = 0.01;

/// Default probability mass assigned to the observed bin
pub const DEFAULT_OBSERVATION_PROBABILITY: f64 = 0.9;

/// Default number of bins per parallel work item
pub const DEFAULT_BATCH_SIZE: usize = 16;
