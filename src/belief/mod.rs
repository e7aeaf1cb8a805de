//! Discrete belief state over object locations.
//!
//! - [`topology`] - bin layouts: line, rectangle, square (deprecated), grid of screen regions
//! - [`distribution`] - the belief itself
//! - [`observation`] - observation model and per-tick observation
//! - [`executor`] - sequential or rayon fan-out over bins
//! - [`engine`] - one Bayes filter tick
//! - [`tracker`] - the per-episode loop around the engine

pub mod distribution;
pub mod engine;
pub mod executor;
pub mod observation;
pub mod topology;
pub mod tracker;

pub use distribution::ProbabilityDistribution;
pub use engine::BeliefUpdateEngine;
pub use executor::{ExecutionMode, ParallelExecutor};
pub use observation::{Observation, ObservationModel};
pub use topology::{GridTopology, LineTopology, RectangleTopology, SquareTopology, Topology};
pub use tracker::BeliefTracker;
