//! Conversion between continuous coordinates and discrete bins.
//!
//! Every topology discretises space along one or two [`BinAxis`] values:
//!
//! - [`axis`] - a single axis and the 1D conversion functions
//! - [`rectangle`] - regular column/row grid over a centred rectangle
//! - [`square`] - square platform grid addressed by a radius (superseded by the rectangle)
//! - [`regions`] - irregular screen rectangles (e.g. keyboard buttons)
//!
//! Geometry is single precision; probabilities elsewhere are double precision.

use nalgebra::{Vector2, Vector3};
use smallvec::SmallVec;
use std::fmt::Debug;
use std::ops::{Add, Sub};

pub mod axis;
pub mod rectangle;
pub mod regions;
pub mod square;

pub use axis::{
    bin_to_continuous, continuous_to_bin, continuous_to_bin_checked, crossed_bins, is_edge_bin,
    BinAxis,
};
pub use rectangle::{bin_dimensions, Rect, RectGrid};
pub use regions::{locate_region, ScreenRegion};
pub use square::SquareGrid;

/// Source bins credited to an edge bin for one velocity sample.
///
/// Usually only a handful of bins, so they stay inline.
pub type CrossedBins = SmallVec<[usize; 8]>;

/// A position or velocity in the coordinate space of a topology.
///
/// Implemented for `f32` (line), `Vector2<f32>` (rectangle, grid) and
/// `Vector3<f32>` (square platform, where `y` is the height above the platform).
pub trait SpatialVector:
    Copy + Debug + PartialEq + Send + Sync + Add<Output = Self> + Sub<Output = Self>
{
    /// Number of components
    const DIM: usize;

    /// Components that carry a sampled velocity; the others are passed through
    const SAMPLED_AXES: &'static [usize];

    /// All components zero
    fn zero() -> Self;

    /// Component `axis`
    fn component(&self, axis: usize) -> f32;

    /// Copy with component `axis` replaced
    fn with_component(self, axis: usize, value: f32) -> Self;

    /// Euclidean length
    fn magnitude(&self) -> f32;

    /// Multiply every component by `factor`
    fn scaled(self, factor: f32) -> Self;
}

impl SpatialVector for f32 {
    const DIM: usize = 1;
    const SAMPLED_AXES: &'static [usize] = &[0];

    fn zero() -> Self {
        0.0
    }

    fn component(&self, _axis: usize) -> f32 {
        *self
    }

    fn with_component(self, _axis: usize, value: f32) -> Self {
        value
    }

    fn magnitude(&self) -> f32 {
        self.abs()
    }

    fn scaled(self, factor: f32) -> Self {
        self * factor
    }
}

impl SpatialVector for Vector2<f32> {
    const DIM: usize = 2;
    const SAMPLED_AXES: &'static [usize] = &[0, 1];

    fn zero() -> Self {
        Vector2::zeros()
    }

    fn component(&self, axis: usize) -> f32 {
        self[axis]
    }

    fn with_component(mut self, axis: usize, value: f32) -> Self {
        self[axis] = value;
        self
    }

    fn magnitude(&self) -> f32 {
        self.norm()
    }

    fn scaled(self, factor: f32) -> Self {
        self * factor
    }
}

impl SpatialVector for Vector3<f32> {
    const DIM: usize = 3;
    // the ball rolls on the x/z plane
    const SAMPLED_AXES: &'static [usize] = &[0, 2];

    fn zero() -> Self {
        Vector3::zeros()
    }

    fn component(&self, axis: usize) -> f32 {
        self[axis]
    }

    fn with_component(mut self, axis: usize, value: f32) -> Self {
        self[axis] = value;
        self
    }

    fn magnitude(&self) -> f32 {
        self.norm()
    }

    fn scaled(self, factor: f32) -> Self {
        self * factor
    }
}

/// Integer square root of `n` if `n` is a perfect square
pub(crate) fn exact_sqrt(n: usize) -> Option<usize> {
    let root = (n as f64).sqrt().round() as usize;
    (root * root == n).then_some(root)
}
