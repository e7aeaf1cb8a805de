//! Error types for belief updates and their configuration
//!
//! Configuration problems are reported when a topology, observation model or
//! sampler is constructed. Numerical problems are reported per update tick.

use std::fmt;

/// Errors that can occur while configuring or running a belief update
#[derive(Debug, Clone, PartialEq)]
pub enum BeliefError {
    /// Invalid topology, sampling or observation parameters
    Configuration {
        /// Description of the configuration issue
        description: String,
    },

    /// The unnormalised posterior has no usable mass
    NumericalDegeneracy {
        /// Raw sum of the posterior before normalisation
        raw_sum: f64,
    },

    /// Dimension mismatch between expected and actual
    DimensionMismatch {
        /// What was expected
        expected: usize,
        /// What was received
        actual: usize,
        /// Context (e.g. "prior distribution")
        context: String,
    },

    /// An update was requested without any velocity samples
    EmptySampleSet,

    /// A bin index outside `[0, number_of_bins)`
    BinOutOfRange {
        /// Offending bin
        bin: usize,
        /// Number of bins of the topology
        number_of_bins: usize,
    },
}

impl BeliefError {
    /// Shorthand for a [`BeliefError::Configuration`] error
    pub fn configuration(description: impl Into<String>) -> Self {
        BeliefError::Configuration {
            description: description.into(),
        }
    }
}

impl fmt::Display for BeliefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeliefError::Configuration { description } => {
                write!(f, "Configuration error: {}", description)
            }
            BeliefError::NumericalDegeneracy { raw_sum } => {
                write!(
                    f,
                    "Numerical degeneracy: posterior sum is {} and cannot be normalised \
                     (a velocity sample may be too large for the tracked range, try a smaller sigma)",
                    raw_sum
                )
            }
            BeliefError::DimensionMismatch {
                expected,
                actual,
                context,
            } => {
                write!(
                    f,
                    "Dimension mismatch for {}: expected {}, got {}",
                    context, expected, actual
                )
            }
            BeliefError::EmptySampleSet => write!(f, "Velocity sample set is empty"),
            BeliefError::BinOutOfRange {
                bin,
                number_of_bins,
            } => {
                write!(
                    f,
                    "Bin {} is out of range (number of bins: {})",
                    bin, number_of_bins
                )
            }
        }
    }
}

impl std::error::Error for BeliefError {}
