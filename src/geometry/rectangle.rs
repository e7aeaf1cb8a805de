//! Regular column/row grid over a rectangle centred on the origin.
//!
//! Bins are numbered column major: `bin = column * rows + row`, with column 0
//! on the left (`-width / 2`) and row 0 at the bottom (`-height / 2`).

use nalgebra::Vector2;

use super::{exact_sqrt, BinAxis, CrossedBins};
use crate::common::constants::CLIP_EPSILON;
use crate::errors::BeliefError;

/// Split `number_of_bins` into `(columns, rows)` following the aspect ratio.
///
/// Both the floor and the ceiling of `sqrt(n * width / height)` are tried as
/// the column count; the split whose product is closest to `n` wins, the
/// floor split on ties.
pub fn bin_dimensions(width: f32, height: f32, number_of_bins: usize) -> (usize, usize) {
    let aspect_ratio = width / height;
    let ideal = (number_of_bins as f32 * aspect_ratio).sqrt();

    let columns_floor = (ideal.floor() as usize).max(1);
    let columns_ceil = (ideal.ceil() as usize).max(1);
    let rows_floor = number_of_bins / columns_floor;
    let rows_ceil = number_of_bins.div_ceil(columns_ceil);

    let distance_floor = (columns_floor * rows_floor).abs_diff(number_of_bins);
    let distance_ceil = (columns_ceil * rows_ceil).abs_diff(number_of_bins);

    if distance_floor <= distance_ceil {
        (columns_floor, rows_floor)
    } else {
        (columns_ceil, rows_ceil)
    }
}

/// Rectangle of `width x height` centred on the origin, divided into
/// `columns x rows` equal cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectGrid {
    columns: BinAxis,
    rows: BinAxis,
}

impl RectGrid {
    /// Build the grid.
    ///
    /// # Errors
    /// [`BeliefError::Configuration`] if the dimensions are not positive,
    /// `number_of_bins` is not a perfect square of at least 4, or the aspect
    /// ratio split does not produce exactly `number_of_bins` cells.
    pub fn new(width: f32, height: f32, number_of_bins: usize) -> Result<Self, BeliefError> {
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(BeliefError::configuration(format!(
                "rectangle dimensions must be positive, got {} x {}",
                width, height
            )));
        }
        if number_of_bins < 4 || exact_sqrt(number_of_bins).is_none() {
            return Err(BeliefError::configuration(format!(
                "rectangle number of bins must be a perfect square of at least 4, got {}",
                number_of_bins
            )));
        }

        let (columns, rows) = bin_dimensions(width, height, number_of_bins);
        if columns * rows != number_of_bins {
            return Err(BeliefError::configuration(format!(
                "{} bins cannot be split into a {} x {} rectangle (closest grid is {} x {})",
                number_of_bins, width, height, columns, rows
            )));
        }

        Ok(Self {
            columns: BinAxis::new(-width / 2.0, width / 2.0, columns)?,
            rows: BinAxis::new(-height / 2.0, height / 2.0, rows)?,
        })
    }

    pub fn number_of_bins(&self) -> usize {
        self.columns.bins() * self.rows.bins()
    }

    pub fn columns(&self) -> usize {
        self.columns.bins()
    }

    pub fn rows(&self) -> usize {
        self.rows.bins()
    }

    pub fn width(&self) -> f32 {
        self.columns.max() - self.columns.min()
    }

    pub fn height(&self) -> f32 {
        self.rows.max() - self.rows.min()
    }

    /// Size of one cell
    pub fn bin_size(&self) -> Vector2<f32> {
        Vector2::new(self.columns.bin_size(), self.rows.bin_size())
    }

    #[inline]
    pub fn bin_of(&self, column: usize, row: usize) -> usize {
        column * self.rows.bins() + row
    }

    #[inline]
    pub fn column_row(&self, bin: usize) -> (usize, usize) {
        (bin / self.rows.bins(), bin % self.rows.bins())
    }

    /// Centre of `bin`
    pub fn bin_to_coordinates(&self, bin: usize) -> Vector2<f32> {
        let (column, row) = self.column_row(bin);
        Vector2::new(self.columns.center(column), self.rows.center(row))
    }

    /// Bin containing `point`, clamped onto the grid
    pub fn coordinates_to_bin(&self, point: &Vector2<f32>) -> usize {
        self.bin_of(self.columns.index(point.x), self.rows.index(point.y))
    }

    /// Bin containing `point`, or `None` if it is outside the rectangle
    pub fn coordinates_to_bin_checked(&self, point: &Vector2<f32>) -> Option<usize> {
        let column = self.columns.checked_index(point.x)?;
        let row = self.rows.checked_index(point.y)?;
        Some(self.bin_of(column, row))
    }

    /// First or last row or column
    pub fn is_edge_bin(&self, bin: usize) -> bool {
        let (column, row) = self.column_row(bin);
        self.columns.is_edge(column) || self.rows.is_edge(row)
    }

    /// Bins whose centre, displaced by `velocity`, clamps onto `bin`
    pub fn crossed_bins(&self, bin: usize, velocity: &Vector2<f32>) -> CrossedBins {
        let (column, row) = self.column_row(bin);
        let columns = self.columns.landing_sources(column, velocity.x);
        let rows = self.rows.landing_sources(row, velocity.y);

        let mut crossed = CrossedBins::with_capacity(columns.len() * rows.len());
        for &c in &columns {
            for &r in &rows {
                crossed.push(self.bin_of(c, r));
            }
        }
        crossed
    }

    /// Bins overlapped by the axis aligned rectangle `center +- size / 2`.
    ///
    /// The sign of `size` is ignored.
    pub fn bins_inside_rect(&self, center: &Vector2<f32>, size: &Vector2<f32>) -> Vec<usize> {
        let half = size.abs() / 2.0;
        let min_column = self.columns.index(center.x - half.x);
        let max_column = self.columns.index(center.x + half.x).max(min_column);
        let min_row = self.rows.index(center.y - half.y);
        let max_row = self.rows.index(center.y + half.y).max(min_row);

        let mut bins = Vec::with_capacity((max_column - min_column + 1) * (max_row - min_row + 1));
        for column in min_column..=max_column {
            for row in min_row..=max_row {
                bins.push(self.bin_of(column, row));
            }
        }
        bins
    }

    /// Transfer a bin space belief onto a set of rectangles.
    ///
    /// Each region receives the mass of the bins it overlaps. A bin shared by
    /// several regions is split evenly between them.
    ///
    /// # Errors
    /// - [`BeliefError::DimensionMismatch`] if `distribution` does not have one entry per bin
    /// - [`BeliefError::Configuration`] for a region whose centre or size is
    ///   not finite, or whose size is negative
    pub fn project_onto_regions(
        &self,
        distribution: &[f64],
        regions: &[(Vector2<f32>, Vector2<f32>)],
    ) -> Result<Vec<f64>, BeliefError> {
        if distribution.len() != self.number_of_bins() {
            return Err(BeliefError::DimensionMismatch {
                expected: self.number_of_bins(),
                actual: distribution.len(),
                context: "rectangle distribution".to_string(),
            });
        }
        for (index, (center, size)) in regions.iter().enumerate() {
            let finite = center.iter().chain(size.iter()).all(|v| v.is_finite());
            if !finite || size.x < 0.0 || size.y < 0.0 {
                return Err(BeliefError::configuration(format!(
                    "region {} needs a finite centre and a non-negative size, got centre ({}, {}) size ({}, {})",
                    index, center.x, center.y, size.x, size.y
                )));
            }
        }

        let bins_per_region: Vec<Vec<usize>> = regions
            .iter()
            .map(|(center, size)| self.bins_inside_rect(center, size))
            .collect();

        let mut overlap = vec![0usize; self.number_of_bins()];
        for bins in &bins_per_region {
            for &bin in bins {
                overlap[bin] += 1;
            }
        }

        Ok(bins_per_region
            .iter()
            .map(|bins| {
                bins.iter()
                    .map(|&bin| distribution[bin] / overlap[bin] as f64)
                    .sum()
            })
            .collect())
    }

    /// Centre of the bin containing `point`
    pub fn snap_to_bin_center(&self, point: &Vector2<f32>) -> Vector2<f32> {
        self.bin_to_coordinates(self.coordinates_to_bin(point))
    }
}

/// Axis aligned rectangle given by its bottom-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `size` centred on `center`
    pub fn from_center(center: Vector2<f32>, size: Vector2<f32>) -> Self {
        Self::new(
            center.x - size.x / 2.0,
            center.y - size.y / 2.0,
            size.x,
            size.y,
        )
    }

    pub fn min(&self) -> Vector2<f32> {
        Vector2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vector2<f32> {
        Vector2::new(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Vector2<f32> {
        Vector2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Closed containment test
    pub fn contains(&self, point: &Vector2<f32>) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Velocity that keeps `position + velocity` inside the rectangle shrunk
    /// by `margin` on every side.
    ///
    /// Each axis that would leave the shrunk rectangle is cut so the point
    /// stops at its border. A position outside the rectangle yields zero.
    pub fn clipped_velocity(
        &self,
        position: &Vector2<f32>,
        velocity: &Vector2<f32>,
        margin: f32,
    ) -> Vector2<f32> {
        if !self.contains(position) {
            log::debug!(
                "position ({}, {}) is outside the rectangle, velocity clipped to zero",
                position.x,
                position.y
            );
            return Vector2::zeros();
        }

        let inner_min = self.min().add_scalar(margin);
        let inner_max = self.max().add_scalar(-margin);
        let target = position + velocity;

        let mut clipped = *velocity;
        for axis in 0..2 {
            if target[axis] < inner_min[axis] {
                clipped[axis] = inner_min[axis] - position[axis];
            } else if target[axis] > inner_max[axis] {
                clipped[axis] = inner_max[axis] - position[axis];
            }
        }

        if (clipped - velocity).abs().max() > CLIP_EPSILON {
            clipped
        } else {
            *velocity
        }
    }

    /// Nearest point of the rectangle to `position`
    pub fn clamp_position(&self, position: &Vector2<f32>) -> Vector2<f32> {
        let (min, max) = (self.min(), self.max());
        Vector2::new(
            position.x.clamp(min.x, max.x),
            position.y.clamp(min.y, max.y),
        )
    }
}
