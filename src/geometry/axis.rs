//! One discretised axis and the 1D position conversions built on it.

use super::CrossedBins;
use crate::errors::BeliefError;

/// A closed continuous interval `[min, max]` split into `bins` equal cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinAxis {
    min: f32,
    max: f32,
    bins: usize,
}

impl BinAxis {
    /// Create a validated axis.
    ///
    /// # Errors
    /// Returns [`BeliefError::Configuration`] if the range is empty or not
    /// finite, or if `bins` is zero.
    pub fn new(min: f32, max: f32, bins: usize) -> Result<Self, BeliefError> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(BeliefError::configuration(format!(
                "invalid range [{}, {}]",
                min, max
            )));
        }
        if bins == 0 {
            return Err(BeliefError::configuration("an axis needs at least one bin"));
        }
        Ok(Self { min, max, bins })
    }

    /// Axis without validation, for the free conversion functions
    #[inline]
    pub(crate) fn raw(min: f32, max: f32, bins: usize) -> Self {
        Self { min, max, bins }
    }

    #[inline]
    pub fn min(&self) -> f32 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    #[inline]
    pub fn bin_size(&self) -> f32 {
        (self.max - self.min) / self.bins as f32
    }

    /// Centre of `bin`
    #[inline]
    pub fn center(&self, bin: usize) -> f32 {
        let size = self.bin_size();
        self.min + bin as f32 * size + size / 2.0
    }

    /// Unclamped cell index; negative or `>= bins` outside the range
    #[inline]
    fn raw_index(&self, value: f32) -> i64 {
        // float to int casts saturate, NaN maps to 0
        ((value - self.min) / (self.max - self.min) * self.bins as f32).floor() as i64
    }

    /// Cell index clamped to `[0, bins - 1]`
    #[inline]
    pub fn index(&self, value: f32) -> usize {
        self.raw_index(value).clamp(0, self.bins as i64 - 1) as usize
    }

    /// Cell index, or `None` if `value` lies outside `[min, max]`
    #[inline]
    pub fn checked_index(&self, value: f32) -> Option<usize> {
        if value.is_nan() || value < self.min || value > self.max {
            return None;
        }
        Some(self.index(value))
    }

    /// First or last cell
    #[inline]
    pub fn is_edge(&self, bin: usize) -> bool {
        bin == 0 || self.bins.checked_sub(1) == Some(bin)
    }

    /// Source cells whose centre, displaced by `velocity`, ends up in `bin`
    /// once clamped to the axis.
    ///
    /// For an edge cell this includes every source that would overshoot the
    /// range on that side. With zero velocity the result is `[bin]`.
    pub fn landing_sources(&self, bin: usize, velocity: f32) -> CrossedBins {
        (0..self.bins)
            .filter(|&source| self.index(self.center(source) + velocity) == bin)
            .collect()
    }
}

/// Linear quantisation of `value` into `[0, number_of_bins - 1]`, clamped.
///
/// A degenerate axis (`number_of_bins <= 1` or an empty range) maps everything to bin 0.
pub fn continuous_to_bin(value: f32, range_min: f32, range_max: f32, number_of_bins: usize) -> usize {
    if number_of_bins <= 1 || range_max <= range_min {
        return 0;
    }
    BinAxis::raw(range_min, range_max, number_of_bins).index(value)
}

/// Like [`continuous_to_bin`] but `None` when `value` is outside `[range_min, range_max]`.
pub fn continuous_to_bin_checked(
    value: f32,
    range_min: f32,
    range_max: f32,
    number_of_bins: usize,
) -> Option<usize> {
    if number_of_bins == 0 || range_max <= range_min {
        return None;
    }
    BinAxis::raw(range_min, range_max, number_of_bins).checked_index(value)
}

/// Centre of `bin`
pub fn bin_to_continuous(bin: usize, range_min: f32, range_max: f32, number_of_bins: usize) -> f32 {
    BinAxis::raw(range_min, range_max, number_of_bins.max(1)).center(bin)
}

/// First or last bin of a line
pub fn is_edge_bin(bin: usize, number_of_bins: usize) -> bool {
    BinAxis::raw(0.0, 1.0, number_of_bins).is_edge(bin)
}

/// Bins whose centre, offset by `velocity`, resolves to `bin` or beyond the
/// boundary on its side. Empty for a non-edge bin.
pub fn crossed_bins(
    velocity: f32,
    bin: usize,
    number_of_bins: usize,
    range_min: f32,
    range_max: f32,
) -> CrossedBins {
    if !is_edge_bin(bin, number_of_bins) || range_max <= range_min {
        return CrossedBins::new();
    }
    BinAxis::raw(range_min, range_max, number_of_bins).landing_sources(bin, velocity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuous_to_bin_quantises_and_clamps() {
        assert_eq!(continuous_to_bin(-5.0, -5.0, 5.0, 10), 0);
        assert_eq!(continuous_to_bin(-4.5, -5.0, 5.0, 10), 0);
        assert_eq!(continuous_to_bin(0.0, -5.0, 5.0, 10), 5);
        assert_eq!(continuous_to_bin(4.99, -5.0, 5.0, 10), 9);
        // upper bound belongs to the last bin
        assert_eq!(continuous_to_bin(5.0, -5.0, 5.0, 10), 9);
        assert_eq!(continuous_to_bin(100.0, -5.0, 5.0, 10), 9);
        assert_eq!(continuous_to_bin(-100.0, -5.0, 5.0, 10), 0);
    }

    #[test]
    fn test_continuous_to_bin_checked_signals_out_of_range() {
        assert_eq!(continuous_to_bin_checked(-5.1, -5.0, 5.0, 10), None);
        assert_eq!(continuous_to_bin_checked(5.1, -5.0, 5.0, 10), None);
        assert_eq!(continuous_to_bin_checked(5.0, -5.0, 5.0, 10), Some(9));
        assert_eq!(continuous_to_bin_checked(-5.0, -5.0, 5.0, 10), Some(0));
        assert_eq!(continuous_to_bin_checked(f32::NAN, -5.0, 5.0, 10), None);
    }

    #[test]
    fn test_bin_to_continuous_is_centre() {
        assert!((bin_to_continuous(0, -5.0, 5.0, 10) - -4.5).abs() < 1e-6);
        assert!((bin_to_continuous(9, -5.0, 5.0, 10) - 4.5).abs() < 1e-6);
        for bin in 0..10 {
            let centre = bin_to_continuous(bin, -5.0, 5.0, 10);
            assert_eq!(continuous_to_bin(centre, -5.0, 5.0, 10), bin);
        }
    }

    #[test]
    fn test_is_edge_bin() {
        assert!(is_edge_bin(0, 10));
        assert!(is_edge_bin(9, 10));
        assert!(!is_edge_bin(1, 10));
        assert!(!is_edge_bin(8, 10));
        assert!(!is_edge_bin(usize::MAX, 10));
        assert!(is_edge_bin(usize::MAX - 1, usize::MAX));
    }

    #[test]
    fn test_crossed_bins_zero_velocity_is_self() {
        assert_eq!(crossed_bins(0.0, 0, 10, -5.0, 5.0).as_slice(), &[0]);
        assert_eq!(crossed_bins(0.0, 9, 10, -5.0, 5.0).as_slice(), &[9]);
    }

    #[test]
    fn test_crossed_bins_overshoot() {
        // moving left by 2 units: bins 0, 1 and 2 all end at or below bin 0
        assert_eq!(crossed_bins(-2.0, 0, 10, -5.0, 5.0).as_slice(), &[0, 1, 2]);
        // nothing reaches the right edge when moving left
        assert!(crossed_bins(-2.0, 9, 10, -5.0, 5.0).is_empty());
        // bin 7 moves to 3.7 and stays inside bin 8
        assert_eq!(crossed_bins(1.2, 9, 10, -5.0, 5.0).as_slice(), &[8, 9]);
    }

    #[test]
    fn test_crossed_bins_non_edge_is_empty() {
        assert!(crossed_bins(-2.0, 4, 10, -5.0, 5.0).is_empty());
    }

    #[test]
    fn test_axis_rejects_invalid_range() {
        assert!(BinAxis::new(1.0, 1.0, 4).is_err());
        assert!(BinAxis::new(0.0, f32::INFINITY, 4).is_err());
        assert!(BinAxis::new(0.0, 1.0, 0).is_err());
    }
}
