//! Observation model O(s', a, o).

use crate::errors::BeliefError;

/// Probability mass given to the observed bin.
///
/// The remaining `1 - p` is spread evenly over the other bins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationModel {
    probability: f64,
}

impl ObservationModel {
    /// # Errors
    /// [`BeliefError::Configuration`] unless `0 < probability <= 1`.
    pub fn new(probability: f64) -> Result<Self, BeliefError> {
        if !(probability > 0.0 && probability <= 1.0) {
            return Err(BeliefError::configuration(format!(
                "observation probability must be in (0, 1], got {}",
                probability
            )));
        }
        Ok(Self { probability })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// O(bin | observed_bin) for a topology with `number_of_bins` bins
    #[inline]
    pub fn likelihood(&self, bin: usize, observed_bin: usize, number_of_bins: usize) -> f64 {
        if bin == observed_bin {
            self.probability
        } else {
            (1.0 - self.probability) / (number_of_bins - 1) as f64
        }
    }
}

/// What the observer saw this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Observation {
    /// Object out of focus: prediction only
    #[default]
    Hidden,
    /// Object in focus. `bin` is `None` when its position maps to no bin, in
    /// which case no correction is applied.
    Visible { bin: Option<usize> },
}

impl Observation {
    /// Object in focus at `bin`
    pub fn at_bin(bin: usize) -> Self {
        Observation::Visible { bin: Some(bin) }
    }

    /// Bin the correction step is applied for
    pub fn observed_bin(&self) -> Option<usize> {
        match self {
            Observation::Hidden => None,
            Observation::Visible { bin } => *bin,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Observation::Visible { .. })
    }
}
