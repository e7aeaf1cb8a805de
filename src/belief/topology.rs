//! Spatial layouts the update engine can run on.
//!
//! A [`Topology`] answers the geometric questions of one update tick: where a
//! bin is, whether mass can fall off it, which bins feed it, and which bin a
//! continuous position belongs to. The engine itself never looks at
//! coordinates directly.

use nalgebra::{Vector2, Vector3};

use crate::common::constants::OBSERVED_BIN_FLOOR;
use crate::errors::BeliefError;
use crate::geometry::{locate_region, BinAxis, CrossedBins, RectGrid, ScreenRegion, SpatialVector, SquareGrid};

/// Bin layout and edge-crossing rules of one spatial variant.
///
/// Implementations are immutable after construction and shared read-only by
/// every bin computation of a tick, hence the `Sync` bound.
pub trait Topology: Send + Sync {
    /// Coordinate type of positions and velocities
    type Point: SpatialVector;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn number_of_bins(&self) -> usize;

    /// Continuous position representing `bin`
    fn position_of(&self, bin: usize) -> Self::Point;

    /// Whether mass can leave the tracked space through `bin`
    fn is_edge_bin(&self, bin: usize) -> bool;

    /// Source bins credited to edge bin `bin` for one velocity sample
    fn crossed_bins(&self, bin: usize, velocity: &Self::Point) -> CrossedBins;

    /// Bin a visitor position comes from, `None` if it lies outside the tracked space
    fn visitor_bin(&self, position: &Self::Point) -> Option<usize>;

    /// Bin holding the observed object, `None` if it cannot be placed
    fn locate(&self, position: &Self::Point) -> Option<usize>;

    /// Mass given to the observed bin when transitions leave it empty.
    ///
    /// `None` keeps the zero, which may end the tick in a degeneracy.
    fn observed_bin_floor(&self) -> Option<f64> {
        None
    }
}

fn require_two_bins(kind: &str, number_of_bins: usize) -> Result<(), BeliefError> {
    if number_of_bins < 2 {
        return Err(BeliefError::configuration(format!(
            "{} topology needs at least 2 bins, got {}",
            kind, number_of_bins
        )));
    }
    Ok(())
}

// ============================================================================
// Line
// ============================================================================

/// Interval `[range_min, range_max]` split into equal bins (driving task lane).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineTopology {
    axis: BinAxis,
}

impl LineTopology {
    pub fn new(range_min: f32, range_max: f32, number_of_bins: usize) -> Result<Self, BeliefError> {
        require_two_bins("line", number_of_bins)?;
        Ok(Self {
            axis: BinAxis::new(range_min, range_max, number_of_bins)?,
        })
    }

    pub fn axis(&self) -> &BinAxis {
        &self.axis
    }
}

impl Topology for LineTopology {
    type Point = f32;

    fn name(&self) -> &'static str {
        "line"
    }

    fn number_of_bins(&self) -> usize {
        self.axis.bins()
    }

    fn position_of(&self, bin: usize) -> f32 {
        self.axis.center(bin)
    }

    fn is_edge_bin(&self, bin: usize) -> bool {
        self.axis.is_edge(bin)
    }

    fn crossed_bins(&self, bin: usize, velocity: &f32) -> CrossedBins {
        self.axis.landing_sources(bin, *velocity)
    }

    fn visitor_bin(&self, position: &f32) -> Option<usize> {
        self.axis.checked_index(*position)
    }

    fn locate(&self, position: &f32) -> Option<usize> {
        Some(self.axis.index(*position))
    }
}

// ============================================================================
// Rectangle
// ============================================================================

/// Regular grid over a rectangle centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangleTopology {
    grid: RectGrid,
    consider_edge_bins: bool,
}

impl RectangleTopology {
    pub fn new(width: f32, height: f32, number_of_bins: usize) -> Result<Self, BeliefError> {
        Ok(Self {
            grid: RectGrid::new(width, height, number_of_bins)?,
            consider_edge_bins: true,
        })
    }

    /// With `false`, border bins are updated like interior bins and mass
    /// pushed past the border is dropped.
    pub fn with_edge_bins(mut self, consider_edge_bins: bool) -> Self {
        self.consider_edge_bins = consider_edge_bins;
        self
    }

    pub fn grid(&self) -> &RectGrid {
        &self.grid
    }

    pub fn considers_edge_bins(&self) -> bool {
        self.consider_edge_bins
    }
}

impl Topology for RectangleTopology {
    type Point = Vector2<f32>;

    fn name(&self) -> &'static str {
        "rectangle"
    }

    fn number_of_bins(&self) -> usize {
        self.grid.number_of_bins()
    }

    fn position_of(&self, bin: usize) -> Vector2<f32> {
        self.grid.bin_to_coordinates(bin)
    }

    fn is_edge_bin(&self, bin: usize) -> bool {
        self.consider_edge_bins && self.grid.is_edge_bin(bin)
    }

    fn crossed_bins(&self, bin: usize, velocity: &Vector2<f32>) -> CrossedBins {
        self.grid.crossed_bins(bin, velocity)
    }

    fn visitor_bin(&self, position: &Vector2<f32>) -> Option<usize> {
        self.grid.coordinates_to_bin_checked(position)
    }

    fn locate(&self, position: &Vector2<f32>) -> Option<usize> {
        Some(self.grid.coordinates_to_bin(position))
    }
}

// ============================================================================
// Square (deprecated)
// ============================================================================

/// Square ball platform addressed by radius.
///
/// Positions are `Vector3` with the platform on the x/z plane. Bin positions
/// are reported at height 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareTopology {
    grid: SquareGrid,
}

impl SquareTopology {
    #[deprecated(note = "use RectangleTopology")]
    pub fn new(platform_radius: f32, number_of_bins: usize) -> Result<Self, BeliefError> {
        Ok(Self {
            grid: SquareGrid::new(platform_radius, number_of_bins)?,
        })
    }

    pub fn grid(&self) -> &SquareGrid {
        &self.grid
    }
}

impl Topology for SquareTopology {
    type Point = Vector3<f32>;

    fn name(&self) -> &'static str {
        "square"
    }

    fn number_of_bins(&self) -> usize {
        self.grid.number_of_bins()
    }

    fn position_of(&self, bin: usize) -> Vector3<f32> {
        self.grid.bin_to_coordinates(bin, 0.0)
    }

    fn is_edge_bin(&self, bin: usize) -> bool {
        self.grid.is_edge_bin(bin)
    }

    fn crossed_bins(&self, bin: usize, velocity: &Vector3<f32>) -> CrossedBins {
        self.grid.crossed_bins(bin, velocity)
    }

    fn visitor_bin(&self, position: &Vector3<f32>) -> Option<usize> {
        self.grid.coordinates_to_bin(position)
    }

    // a ball that left the platform is not observed in any bin
    fn locate(&self, position: &Vector3<f32>) -> Option<usize> {
        self.grid.coordinates_to_bin(position)
    }
}

// ============================================================================
// Grid of screen regions
// ============================================================================

/// One bin per irregular screen region (keyboard buttons, UI elements).
///
/// Regions have no border through which mass can leave, so there are no
/// edge bins. Positions resolve to the containing region, or to the nearest
/// region centre closer than `velocity_threshold`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridTopology {
    regions: Vec<ScreenRegion>,
    velocity_threshold: f32,
}

impl GridTopology {
    pub fn new(regions: Vec<ScreenRegion>, velocity_threshold: f32) -> Result<Self, BeliefError> {
        require_two_bins("grid", regions.len())?;
        if !velocity_threshold.is_finite() || velocity_threshold < 0.0 {
            return Err(BeliefError::configuration(format!(
                "velocity threshold must be a non-negative number, got {}",
                velocity_threshold
            )));
        }
        if let Some(index) = regions
            .iter()
            .position(|r| !(r.size.x >= 0.0 && r.size.y >= 0.0) || !r.position.iter().all(|c| c.is_finite()))
        {
            return Err(BeliefError::configuration(format!(
                "region {} has an invalid position or a negative size",
                index
            )));
        }
        Ok(Self {
            regions,
            velocity_threshold,
        })
    }

    pub fn regions(&self) -> &[ScreenRegion] {
        &self.regions
    }

    pub fn velocity_threshold(&self) -> f32 {
        self.velocity_threshold
    }
}

impl Topology for GridTopology {
    type Point = Vector2<f32>;

    fn name(&self) -> &'static str {
        "grid"
    }

    fn number_of_bins(&self) -> usize {
        self.regions.len()
    }

    fn position_of(&self, bin: usize) -> Vector2<f32> {
        self.regions[bin].center()
    }

    fn is_edge_bin(&self, _bin: usize) -> bool {
        false
    }

    fn crossed_bins(&self, _bin: usize, _velocity: &Vector2<f32>) -> CrossedBins {
        CrossedBins::new()
    }

    fn visitor_bin(&self, position: &Vector2<f32>) -> Option<usize> {
        locate_region(&self.regions, position, self.velocity_threshold)
    }

    fn locate(&self, position: &Vector2<f32>) -> Option<usize> {
        locate_region(&self.regions, position, self.velocity_threshold)
    }

    fn observed_bin_floor(&self) -> Option<f64> {
        Some(OBSERVED_BIN_FLOOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_topology_needs_two_bins() {
        assert!(LineTopology::new(-5.0, 5.0, 1).is_err());
        assert!(RectangleTopology::new(1.0, 1.0, 1).is_err());
        #[allow(deprecated)]
        let square = SquareTopology::new(1.0, 1);
        assert!(square.is_err());
        let one = vec![ScreenRegion::new(Vector2::zeros(), Vector2::new(1.0, 1.0))];
        assert!(GridTopology::new(one, 1.0).is_err());
    }

    #[test]
    fn test_line_locate_clamps_but_visitor_does_not() {
        let line = LineTopology::new(-5.0, 5.0, 10).unwrap();
        assert_eq!(line.locate(&7.0), Some(9));
        assert_eq!(line.visitor_bin(&7.0), None);
    }

    #[test]
    fn test_rectangle_edge_flag() {
        let rect = RectangleTopology::new(4.0, 4.0, 16).unwrap();
        assert!(rect.is_edge_bin(0));
        let rect = rect.with_edge_bins(false);
        assert!(!rect.is_edge_bin(0));
        assert!(!rect.considers_edge_bins());
    }

    #[test]
    fn test_grid_has_floor_and_no_edges() {
        let regions = vec![
            ScreenRegion::new(Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0)),
            ScreenRegion::new(Vector2::new(2.0, 0.0), Vector2::new(1.0, 1.0)),
        ];
        let grid = GridTopology::new(regions, 0.5).unwrap();
        assert_eq!(grid.observed_bin_floor(), Some(OBSERVED_BIN_FLOOR));
        assert!(!grid.is_edge_bin(0));
        assert_eq!(grid.position_of(1), Vector2::new(2.5, 0.5));
        assert_eq!(grid.locate(&Vector2::new(2.2, 0.9)), Some(1));
    }

    #[test]
    fn test_grid_rejects_negative_threshold() {
        let regions = vec![
            ScreenRegion::new(Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0)),
            ScreenRegion::new(Vector2::new(2.0, 0.0), Vector2::new(1.0, 1.0)),
        ];
        assert!(GridTopology::new(regions, -1.0).is_err());
    }
}
