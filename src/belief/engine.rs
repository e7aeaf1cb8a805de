//! One discrete Bayes filter tick.
//!
//! ```text
//! b'(s') = O(s', a, o) * sum_s T(s, a, s') * b(s)    object observed
//! b'(s') =               sum_s T(s, a, s') * b(s)    otherwise
//! ```
//!
//! The transition `T` is the empirical distribution of the velocity sample
//! set. For an interior bin every sample contributes `b(visitor) / M`, where
//! `visitor` is the bin the object must have come from. For an edge bin every
//! sample spreads `b(c) / (M * |C|)` from each bin `c` of the crossed set `C`,
//! so mass that would leave the tracked space is credited to the border.

use crate::errors::BeliefError;
use crate::geometry::SpatialVector;
use crate::reporter::{NoOpReporter, StepReporter};
use crate::sampling::average_velocity;

use super::{Observation, ObservationModel, ParallelExecutor, ProbabilityDistribution, Topology};

/// Stateless update engine for one topology.
///
/// The distribution is owned by the caller and passed in every tick. The
/// prior is borrowed immutably for the whole tick and the posterior is
/// written to a fresh buffer, so no bin ever sees a partially updated prior.
#[derive(Debug, Clone)]
pub struct BeliefUpdateEngine<T: Topology> {
    topology: T,
    observation_model: ObservationModel,
    executor: ParallelExecutor,
}

impl<T: Topology> BeliefUpdateEngine<T> {
    /// Engine with the default (parallel) executor.
    ///
    /// # Errors
    /// [`BeliefError::Configuration`] unless `0 < observation_probability <= 1`.
    pub fn new(topology: T, observation_probability: f64) -> Result<Self, BeliefError> {
        Ok(Self {
            topology,
            observation_model: ObservationModel::new(observation_probability)?,
            executor: ParallelExecutor::default(),
        })
    }

    pub fn with_executor(mut self, executor: ParallelExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn topology(&self) -> &T {
        &self.topology
    }

    pub fn observation_model(&self) -> &ObservationModel {
        &self.observation_model
    }

    pub fn executor(&self) -> &ParallelExecutor {
        &self.executor
    }

    pub fn number_of_bins(&self) -> usize {
        self.topology.number_of_bins()
    }

    /// Observation for an object at `position`, in focus or not
    pub fn observation_for(&self, position: &T::Point, visible: bool) -> Observation {
        if visible {
            Observation::Visible {
                bin: self.topology.locate(position),
            }
        } else {
            Observation::Hidden
        }
    }

    /// Transition mass arriving in `bin`: `sum_s T(s, a, bin) * prior(s)`
    pub fn predict_bin(&self, bin: usize, prior: &[f64], samples: &[T::Point]) -> f64 {
        let m = samples.len() as f64;

        if self.topology.is_edge_bin(bin) {
            samples
                .iter()
                .map(|velocity| {
                    let crossed = self.topology.crossed_bins(bin, velocity);
                    if crossed.is_empty() {
                        return 0.0;
                    }
                    let share = 1.0 / (m * crossed.len() as f64);
                    crossed.iter().map(|&source| prior[source] * share).sum::<f64>()
                })
                .sum()
        } else {
            let position = self.topology.position_of(bin);
            samples
                .iter()
                .filter_map(|&velocity| self.topology.visitor_bin(&(position - velocity)))
                .map(|visitor| prior[visitor] / m)
                .sum()
        }
    }

    /// Apply O(bin, a, o) to the predicted mass of `bin`
    pub fn correct_bin(&self, bin: usize, predicted: f64, observation: Observation) -> f64 {
        let observed_bin = match observation.observed_bin() {
            Some(observed_bin) => observed_bin,
            None => return predicted,
        };

        let mut mass = predicted;
        if let Some(floor) = self.floor_for(bin, observed_bin, predicted) {
            log::warn!(
                "{} topology: observed bin {} has zero probability, using {}",
                self.topology.name(),
                bin,
                floor
            );
            mass = floor;
        }

        mass * self
            .observation_model
            .likelihood(bin, observed_bin, self.topology.number_of_bins())
    }

    /// Floor replacing the zero predicted mass of the observed bin
    fn floor_for(&self, bin: usize, observed_bin: usize, predicted: f64) -> Option<f64> {
        if bin == observed_bin && predicted == 0.0 {
            self.topology.observed_bin_floor()
        } else {
            None
        }
    }

    /// Posterior weights of every bin before normalisation
    pub fn unnormalized_posterior(
        &self,
        prior: &ProbabilityDistribution,
        samples: &[T::Point],
        observation: Observation,
    ) -> Result<Vec<f64>, BeliefError> {
        self.validate(prior, samples, observation)?;
        let prior = prior.as_slice();

        Ok(self.executor.map(self.topology.number_of_bins(), |bin| {
            let predicted = self.predict_bin(bin, prior, samples);
            self.correct_bin(bin, predicted, observation)
        }))
    }

    /// One full tick: predict, correct, normalise.
    ///
    /// # Errors
    /// - [`BeliefError::DimensionMismatch`] if `prior` does not have one entry per bin
    /// - [`BeliefError::EmptySampleSet`] if `samples` is empty
    /// - [`BeliefError::BinOutOfRange`] if the observation names an unknown bin
    /// - [`BeliefError::NumericalDegeneracy`] if no mass is left to normalise
    pub fn update(
        &self,
        prior: &ProbabilityDistribution,
        samples: &[T::Point],
        observation: Observation,
    ) -> Result<ProbabilityDistribution, BeliefError> {
        self.update_with_reporter(prior, samples, observation, &mut NoOpReporter)
    }

    /// [`update`](Self::update) with callbacks to `reporter`
    pub fn update_with_reporter<R: StepReporter + ?Sized>(
        &self,
        prior: &ProbabilityDistribution,
        samples: &[T::Point],
        observation: Observation,
        reporter: &mut R,
    ) -> Result<ProbabilityDistribution, BeliefError> {
        if let Ok(mean) = average_velocity(samples) {
            reporter.on_samples(samples.len(), mean.magnitude());
        }
        reporter.on_prior_snapshot(prior.as_slice());

        let raw = self.unnormalized_posterior(prior, samples, observation)?;

        // reporters are not Sync, so the floor is reported after the parallel pass
        if let Some(observed_bin) = observation.observed_bin() {
            let predicted = self.predict_bin(observed_bin, prior.as_slice(), samples);
            if let Some(floor) = self.floor_for(observed_bin, observed_bin, predicted) {
                reporter.on_observed_bin_floor(observed_bin, floor);
            }
        }

        match ProbabilityDistribution::normalized(raw) {
            Ok(posterior) => {
                reporter.on_update_complete(posterior.as_slice());
                Ok(posterior)
            }
            Err(err) => {
                if let BeliefError::NumericalDegeneracy { raw_sum } = err {
                    log::error!(
                        "{} topology: posterior sum is {}, update aborted",
                        self.topology.name(),
                        raw_sum
                    );
                    reporter.on_degeneracy(raw_sum);
                }
                Err(err)
            }
        }
    }

    fn validate(
        &self,
        prior: &ProbabilityDistribution,
        samples: &[T::Point],
        observation: Observation,
    ) -> Result<(), BeliefError> {
        let number_of_bins = self.topology.number_of_bins();
        if prior.len() != number_of_bins {
            return Err(BeliefError::DimensionMismatch {
                expected: number_of_bins,
                actual: prior.len(),
                context: format!("{} prior distribution", self.topology.name()),
            });
        }
        if samples.is_empty() {
            return Err(BeliefError::EmptySampleSet);
        }
        if let Some(bin) = observation.observed_bin() {
            if bin >= number_of_bins {
                return Err(BeliefError::BinOutOfRange { bin, number_of_bins });
            }
        }
        Ok(())
    }
}
