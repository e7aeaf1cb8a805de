//! JSON configuration of a belief tracker.
//!
//! ```json
//! {
//!   "number_of_samples": 100,
//!   "sigma": 0.1,
//!   "observation_probability": 0.9,
//!   "execution": { "mode": "parallel", "batch_size": 16 },
//!   "topology": { "kind": "line", "range_min": -5.0, "range_max": 5.0, "number_of_bins": 10 }
//! }
//! ```
//!
//! Every field except `topology` has a default. Validation happens in
//! [`BeliefConfig::validate`] and when the topology is built; all failures
//! are [`BeliefError::Configuration`].

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::belief::{
    BeliefTracker, BeliefUpdateEngine, ExecutionMode, GridTopology, LineTopology, ObservationModel,
    ParallelExecutor, RectangleTopology, SquareTopology, Topology,
};
use crate::common::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_NUMBER_OF_SAMPLES, DEFAULT_OBSERVATION_PROBABILITY, DEFAULT_SIGMA,
    DEFAULT_SIGMA_MEAN,
};
use crate::errors::BeliefError;
use crate::geometry::ScreenRegion;
use crate::sampling::{DriftPolicy, VelocityEstimator};

fn default_number_of_samples() -> usize {
    DEFAULT_NUMBER_OF_SAMPLES
}

fn default_sigma() -> f64 {
    DEFAULT_SIGMA
}

fn default_sigma_mean() -> f64 {
    DEFAULT_SIGMA_MEAN
}

fn default_observation_probability() -> f64 {
    DEFAULT_OBSERVATION_PROBABILITY
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_true() -> bool {
    true
}

/// Root of a configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefConfig {
    /// Velocity samples drawn per tick
    #[serde(default = "default_number_of_samples")]
    pub number_of_samples: usize,

    /// Standard deviation of the velocity samples around the estimate
    #[serde(default = "default_sigma")]
    pub sigma: f64,

    /// Uncertainty added to the velocity estimate while unobserved
    #[serde(default = "default_sigma_mean")]
    pub sigma_mean: f64,

    #[serde(default = "default_observation_probability")]
    pub observation_probability: f64,

    #[serde(default)]
    pub execution: ExecutionConfig,

    pub topology: TopologyConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub mode: ExecutionMode,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Screen region as `[x, y]` bottom-left corner and `[width, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub position: [f32; 2],
    pub size: [f32; 2],
}

impl From<&RegionConfig> for ScreenRegion {
    fn from(region: &RegionConfig) -> Self {
        ScreenRegion::new(
            Vector2::new(region.position[0], region.position[1]),
            Vector2::new(region.size[0], region.size[1]),
        )
    }
}

/// Spatial layout, tagged by `"kind"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologyConfig {
    Line {
        range_min: f32,
        range_max: f32,
        number_of_bins: usize,
    },
    Rectangle {
        width: f32,
        height: f32,
        number_of_bins: usize,
        #[serde(default = "default_true")]
        consider_edge_bins: bool,
    },
    /// Deprecated, prefer `rectangle`
    Square {
        platform_radius: f32,
        number_of_bins: usize,
    },
    Grid {
        regions: Vec<RegionConfig>,
        velocity_threshold: f32,
    },
}

impl TopologyConfig {
    /// Build and validate the topology
    pub fn build(&self) -> Result<AnyTopology, BeliefError> {
        Ok(match self {
            TopologyConfig::Line {
                range_min,
                range_max,
                number_of_bins,
            } => AnyTopology::Line(LineTopology::new(*range_min, *range_max, *number_of_bins)?),
            TopologyConfig::Rectangle {
                width,
                height,
                number_of_bins,
                consider_edge_bins,
            } => AnyTopology::Rectangle(
                RectangleTopology::new(*width, *height, *number_of_bins)?.with_edge_bins(*consider_edge_bins),
            ),
            TopologyConfig::Square {
                platform_radius,
                number_of_bins,
            } => {
                log::warn!("square topology is deprecated, use a rectangle");
                #[allow(deprecated)]
                let square = SquareTopology::new(*platform_radius, *number_of_bins)?;
                AnyTopology::Square(square)
            }
            TopologyConfig::Grid {
                regions,
                velocity_threshold,
            } => AnyTopology::Grid(GridTopology::new(
                regions.iter().map(ScreenRegion::from).collect(),
                *velocity_threshold,
            )?),
        })
    }
}

/// A built topology of any kind.
///
/// The variants have different coordinate types, so callers match on the
/// variant and hand the concrete topology to [`BeliefConfig::engine`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnyTopology {
    Line(LineTopology),
    Rectangle(RectangleTopology),
    Square(SquareTopology),
    Grid(GridTopology),
}

impl AnyTopology {
    pub fn name(&self) -> &'static str {
        match self {
            AnyTopology::Line(t) => t.name(),
            AnyTopology::Rectangle(t) => t.name(),
            AnyTopology::Square(t) => t.name(),
            AnyTopology::Grid(t) => t.name(),
        }
    }

    pub fn number_of_bins(&self) -> usize {
        match self {
            AnyTopology::Line(t) => t.number_of_bins(),
            AnyTopology::Rectangle(t) => t.number_of_bins(),
            AnyTopology::Square(t) => t.number_of_bins(),
            AnyTopology::Grid(t) => t.number_of_bins(),
        }
    }
}

impl BeliefConfig {
    /// Parse a JSON document. The result is not validated yet.
    pub fn from_json_str(json: &str) -> Result<Self, BeliefError> {
        serde_json::from_str(json)
            .map_err(|e| BeliefError::configuration(format!("invalid belief configuration: {}", e)))
    }

    pub fn to_json_string(&self) -> Result<String, BeliefError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BeliefError::configuration(format!("cannot serialise configuration: {}", e)))
    }

    /// Check the scalar parameters and the topology
    pub fn validate(&self) -> Result<(), BeliefError> {
        if self.number_of_samples == 0 {
            return Err(BeliefError::configuration("number_of_samples must be positive"));
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(BeliefError::configuration(format!(
                "sigma must be a non-negative number, got {}",
                self.sigma
            )));
        }
        if !self.sigma_mean.is_finite() || self.sigma_mean < 0.0 {
            return Err(BeliefError::configuration(format!(
                "sigma_mean must be a non-negative number, got {}",
                self.sigma_mean
            )));
        }
        ObservationModel::new(self.observation_probability)?;
        self.executor()?;
        self.topology.build().map(|_| ())
    }

    /// Validate and build the topology
    pub fn build(&self) -> Result<AnyTopology, BeliefError> {
        self.validate()?;
        self.topology.build()
    }

    pub fn executor(&self) -> Result<ParallelExecutor, BeliefError> {
        ParallelExecutor::new(self.execution.mode, self.execution.batch_size)
    }

    /// Engine over `topology` with this observation probability and executor
    pub fn engine<T: Topology>(&self, topology: T) -> Result<BeliefUpdateEngine<T>, BeliefError> {
        Ok(BeliefUpdateEngine::new(topology, self.observation_probability)?.with_executor(self.executor()?))
    }

    /// Tracker over `topology` starting at `start`
    pub fn tracker<T: Topology>(
        &self,
        topology: T,
        policy: DriftPolicy,
        start: &T::Point,
    ) -> Result<BeliefTracker<T>, BeliefError> {
        BeliefTracker::new(
            self.engine(topology)?,
            VelocityEstimator::new(policy, self.sigma_mean)?,
            self.sigma,
            self.number_of_samples,
            start,
        )
    }
}
