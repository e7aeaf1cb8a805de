//! Square platform grid addressed by its radius.
//!
//! The platform spans `[-radius, radius]` on the x and z axes. Bins are
//! numbered `x_index * per_direction + z_index`. Superseded by
//! [`RectGrid`](super::RectGrid) but kept for existing configurations.

use nalgebra::Vector3;

use super::{exact_sqrt, BinAxis, CrossedBins};
use crate::errors::BeliefError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareGrid {
    axis: BinAxis,
}

impl SquareGrid {
    /// # Errors
    /// [`BeliefError::Configuration`] if the radius is not positive or
    /// `number_of_bins` is not a perfect square of at least 4.
    pub fn new(platform_radius: f32, number_of_bins: usize) -> Result<Self, BeliefError> {
        if !(platform_radius > 0.0) || !platform_radius.is_finite() {
            return Err(BeliefError::configuration(format!(
                "platform radius must be positive, got {}",
                platform_radius
            )));
        }
        let per_direction = match exact_sqrt(number_of_bins) {
            Some(root) if root >= 2 => root,
            _ => {
                return Err(BeliefError::configuration(format!(
                    "square number of bins must be a perfect square of at least 4, got {}",
                    number_of_bins
                )))
            }
        };

        Ok(Self {
            axis: BinAxis::new(-platform_radius, platform_radius, per_direction)?,
        })
    }

    pub fn platform_radius(&self) -> f32 {
        self.axis.max()
    }

    pub fn bins_per_direction(&self) -> usize {
        self.axis.bins()
    }

    pub fn number_of_bins(&self) -> usize {
        self.axis.bins() * self.axis.bins()
    }

    /// Centre of `bin` at height `y`
    pub fn bin_to_coordinates(&self, bin: usize, y: f32) -> Vector3<f32> {
        let n = self.axis.bins();
        Vector3::new(self.axis.center(bin / n), y, self.axis.center(bin % n))
    }

    /// Bin under `point`, or `None` if it is off the platform
    pub fn coordinates_to_bin(&self, point: &Vector3<f32>) -> Option<usize> {
        let x = self.axis.checked_index(point.x)?;
        let z = self.axis.checked_index(point.z)?;
        Some(x * self.axis.bins() + z)
    }

    /// Outer ring of the platform
    pub fn is_edge_bin(&self, bin: usize) -> bool {
        let n = self.axis.bins();
        self.axis.is_edge(bin / n) || self.axis.is_edge(bin % n)
    }

    /// Bins whose centre, displaced by `velocity`, clamps onto `bin`
    pub fn crossed_bins(&self, bin: usize, velocity: &Vector3<f32>) -> CrossedBins {
        let n = self.axis.bins();
        let xs = self.axis.landing_sources(bin / n, velocity.x);
        let zs = self.axis.landing_sources(bin % n, velocity.z);

        xs.iter()
            .flat_map(|&x| zs.iter().map(move |&z| x * n + z))
            .collect()
    }
}
