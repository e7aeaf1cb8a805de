//! Random sampling of velocities.
//!
//! All sampling takes the random source as an explicit `&mut impl rand::Rng`
//! argument; nothing in this crate owns a global or thread-local generator.

pub mod normal;
pub mod velocity;

pub use normal::NormalDistribution;
pub use velocity::{average_velocity, sample_velocity_set, DriftPolicy, VelocityEstimator};
