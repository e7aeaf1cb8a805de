//! Probability distribution over the bins of a topology.

use std::ops::Index;

use crate::common::constants::{INPUT_SUM_TOLERANCE, NORMALIZATION_TOLERANCE};
use crate::errors::BeliefError;

/// Non-negative probabilities, one per bin, summing to one.
///
/// Updates never mutate a distribution in place: every tick produces a new
/// one from the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityDistribution {
    probabilities: Vec<f64>,
}

impl ProbabilityDistribution {
    /// All mass on `bin` (episode begin)
    pub fn one_hot(number_of_bins: usize, bin: usize) -> Result<Self, BeliefError> {
        if bin >= number_of_bins {
            return Err(BeliefError::BinOutOfRange {
                bin,
                number_of_bins,
            });
        }
        let mut probabilities = vec![0.0; number_of_bins];
        probabilities[bin] = 1.0;
        Ok(Self { probabilities })
    }

    pub fn uniform(number_of_bins: usize) -> Result<Self, BeliefError> {
        if number_of_bins == 0 {
            return Err(BeliefError::configuration("a distribution needs at least one bin"));
        }
        Ok(Self {
            probabilities: vec![1.0 / number_of_bins as f64; number_of_bins],
        })
    }

    /// Wrap caller supplied probabilities.
    ///
    /// # Errors
    /// [`BeliefError::Configuration`] if the vector is empty, holds a
    /// negative or non-finite entry, or does not sum to one.
    pub fn from_vec(probabilities: Vec<f64>) -> Result<Self, BeliefError> {
        if probabilities.is_empty() {
            return Err(BeliefError::configuration("a distribution needs at least one bin"));
        }
        if let Some(bin) = probabilities.iter().position(|p| !p.is_finite() || *p < 0.0) {
            return Err(BeliefError::configuration(format!(
                "probability of bin {} is {}",
                bin, probabilities[bin]
            )));
        }
        let sum: f64 = probabilities.iter().sum();
        if (sum - 1.0).abs() > INPUT_SUM_TOLERANCE {
            return Err(BeliefError::configuration(format!(
                "probabilities sum to {} instead of 1",
                sum
            )));
        }
        Ok(Self { probabilities })
    }

    /// Divide raw weights by their sum.
    ///
    /// # Errors
    /// [`BeliefError::NumericalDegeneracy`] if the sum is zero or not finite.
    pub fn normalized(mut weights: Vec<f64>) -> Result<Self, BeliefError> {
        let raw_sum: f64 = weights.iter().sum();
        if !raw_sum.is_finite() || raw_sum <= 0.0 {
            return Err(BeliefError::NumericalDegeneracy { raw_sum });
        }
        weights.iter_mut().for_each(|w| *w /= raw_sum);
        Ok(Self {
            probabilities: weights,
        })
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.probabilities
    }

    pub fn get(&self, bin: usize) -> Option<f64> {
        self.probabilities.get(bin).copied()
    }

    pub fn sum(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Sum within [`NORMALIZATION_TOLERANCE`] of one
    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() <= NORMALIZATION_TOLERANCE
    }

    /// Bin with the highest probability; the first one on ties
    pub fn most_likely_bin(&self) -> usize {
        self.probabilities
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (bin, &p)| if p > best.1 { (bin, p) } else { best })
            .0
    }

    pub fn max_probability(&self) -> f64 {
        self.probabilities.iter().copied().fold(0.0, f64::max)
    }
}

impl Index<usize> for ProbabilityDistribution {
    type Output = f64;

    fn index(&self, bin: usize) -> &f64 {
        &self.probabilities[bin]
    }
}

impl AsRef<[f64]> for ProbabilityDistribution {
    fn as_ref(&self) -> &[f64] {
        &self.probabilities
    }
}
