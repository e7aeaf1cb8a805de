//! Belief tracking for one object over an episode.

use rand::Rng;

use crate::errors::BeliefError;
use crate::reporter::{NoOpReporter, StepReporter};
use crate::sampling::{average_velocity, sample_velocity_set, VelocityEstimator};

use super::{BeliefUpdateEngine, ProbabilityDistribution, Topology};

/// Owns the belief of one task instance and runs the per-tick loop:
/// estimate the velocity, draw a sample set, update, replace the belief.
///
/// A tick that fails leaves the previous belief and velocity estimate in place.
#[derive(Debug, Clone)]
pub struct BeliefTracker<T: Topology, R: StepReporter = NoOpReporter> {
    engine: BeliefUpdateEngine<T>,
    estimator: VelocityEstimator<T::Point>,
    sigma: f64,
    number_of_samples: usize,
    distribution: ProbabilityDistribution,
    last_samples: Vec<T::Point>,
    reporter: R,
}

impl<T: Topology> BeliefTracker<T> {
    /// Tracker whose belief starts one-hot at the bin of `start`.
    ///
    /// # Errors
    /// [`BeliefError::Configuration`] for a negative `sigma`, zero samples or
    /// a start position that maps to no bin.
    pub fn new(
        engine: BeliefUpdateEngine<T>,
        estimator: VelocityEstimator<T::Point>,
        sigma: f64,
        number_of_samples: usize,
        start: &T::Point,
    ) -> Result<Self, BeliefError> {
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(BeliefError::configuration(format!(
                "sigma must be a non-negative number, got {}",
                sigma
            )));
        }
        if number_of_samples == 0 {
            return Err(BeliefError::configuration("number of velocity samples must be positive"));
        }

        let distribution = start_distribution(&engine, start)?;
        Ok(Self {
            engine,
            estimator,
            sigma,
            number_of_samples,
            distribution,
            last_samples: Vec::new(),
            reporter: NoOpReporter,
        })
    }
}

impl<T: Topology, R: StepReporter> BeliefTracker<T, R> {
    /// Replace the reporter
    pub fn with_reporter<R2: StepReporter>(self, reporter: R2) -> BeliefTracker<T, R2> {
        BeliefTracker {
            engine: self.engine,
            estimator: self.estimator,
            sigma: self.sigma,
            number_of_samples: self.number_of_samples,
            distribution: self.distribution,
            last_samples: self.last_samples,
            reporter,
        }
    }

    /// Start a new episode with the object at `start`
    pub fn reset(&mut self, start: &T::Point) -> Result<(), BeliefError> {
        self.distribution = start_distribution(&self.engine, start)?;
        self.estimator.reset();
        self.last_samples.clear();
        Ok(())
    }

    /// Advance one tick.
    ///
    /// `position` and `velocity` are the true state of the object; the
    /// velocity is per tick. Only a `visible` object is observed.
    ///
    /// On error the tracker is unchanged, apart from the draws taken from `rng`.
    pub fn step<G: Rng + ?Sized>(
        &mut self,
        rng: &mut G,
        position: &T::Point,
        velocity: T::Point,
        visible: bool,
    ) -> Result<&ProbabilityDistribution, BeliefError> {
        let previous_estimator = self.estimator.clone();
        match self.advance(rng, position, velocity, visible) {
            Ok(()) => Ok(&self.distribution),
            Err(err) => {
                self.estimator = previous_estimator;
                Err(err)
            }
        }
    }

    fn advance<G: Rng + ?Sized>(
        &mut self,
        rng: &mut G,
        position: &T::Point,
        velocity: T::Point,
        visible: bool,
    ) -> Result<(), BeliefError> {
        let estimate = self.estimator.observe(rng, velocity, visible)?;
        let samples = sample_velocity_set(rng, estimate, self.sigma, self.number_of_samples)?;
        let observation = self.engine.observation_for(position, visible);

        self.distribution =
            self.engine
                .update_with_reporter(&self.distribution, &samples, observation, &mut self.reporter)?;
        self.last_samples = samples;
        Ok(())
    }

    pub fn distribution(&self) -> &ProbabilityDistribution {
        &self.distribution
    }

    pub fn engine(&self) -> &BeliefUpdateEngine<T> {
        &self.engine
    }

    pub fn estimator(&self) -> &VelocityEstimator<T::Point> {
        &self.estimator
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }

    /// Most likely bin
    pub fn belief_bin(&self) -> usize {
        self.distribution.most_likely_bin()
    }

    /// Position of the most likely bin
    pub fn belief_position(&self) -> T::Point {
        self.engine.topology().position_of(self.belief_bin())
    }

    pub fn max_probability(&self) -> f64 {
        self.distribution.max_probability()
    }

    /// Samples drawn in the last successful tick
    pub fn last_samples(&self) -> &[T::Point] {
        &self.last_samples
    }

    /// Mean of the last sample set
    pub fn average_velocity(&self) -> Result<T::Point, BeliefError> {
        average_velocity(&self.last_samples)
    }
}

fn start_distribution<T: Topology>(
    engine: &BeliefUpdateEngine<T>,
    start: &T::Point,
) -> Result<ProbabilityDistribution, BeliefError> {
    let bin = engine.topology().locate(start).ok_or_else(|| {
        BeliefError::configuration(format!(
            "start position {:?} is outside the {} topology",
            start,
            engine.topology().name()
        ))
    })?;
    ProbabilityDistribution::one_hot(engine.number_of_bins(), bin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belief::{LineTopology, ParallelExecutor};
    use crate::common::rng::SimpleRng;
    use crate::reporter::DebugReporter;
    use crate::sampling::DriftPolicy;

    fn tracker() -> BeliefTracker<LineTopology> {
        let engine = BeliefUpdateEngine::new(LineTopology::new(-5.0, 5.0, 10).unwrap(), 0.9)
            .unwrap()
            .with_executor(ParallelExecutor::sequential());
        let estimator = VelocityEstimator::new(DriftPolicy::FollowCurrent, 0.01).unwrap();
        BeliefTracker::new(engine, estimator, 0.1, 50, &0.2).unwrap()
    }

    #[test]
    fn test_starts_one_hot_at_start_bin() {
        let tracker = tracker();
        assert_eq!(tracker.belief_bin(), 5);
        assert_eq!(tracker.max_probability(), 1.0);
        assert!((tracker.belief_position() - 0.5).abs() < 1e-6);
        assert_eq!(tracker.average_velocity(), Err(BeliefError::EmptySampleSet));
    }

    #[test]
    fn test_step_keeps_a_normalised_belief() {
        let mut tracker = tracker();
        let mut rng = SimpleRng::new(1);
        for tick in 0..20 {
            let visible = tick % 4 == 0;
            let belief = tracker.step(&mut rng, &0.2, 0.0, visible).unwrap();
            assert!((belief.sum() - 1.0).abs() < 1e-9);
        }
        assert_eq!(tracker.last_samples().len(), 50);
        assert!(tracker.average_velocity().unwrap().abs() < 0.1);
    }

    #[test]
    fn test_reset_restores_one_hot() {
        let mut tracker = tracker();
        let mut rng = SimpleRng::new(2);
        tracker.step(&mut rng, &0.2, 1.0, false).unwrap();
        tracker.reset(&-4.9).unwrap();
        assert_eq!(tracker.belief_bin(), 0);
        assert_eq!(tracker.max_probability(), 1.0);
        assert!(tracker.last_samples().is_empty());
    }

    #[test]
    fn test_failed_tick_keeps_previous_state() {
        let engine = BeliefUpdateEngine::new(LineTopology::new(-5.0, 5.0, 10).unwrap(), 1.0).unwrap();
        let estimator = VelocityEstimator::new(DriftPolicy::DecayingMean, 0.01).unwrap();
        let mut tracker = BeliefTracker::new(engine, estimator, 0.0, 10, &0.5)
            .unwrap()
            .with_reporter(DebugReporter::new());
        let mut rng = SimpleRng::new(3);

        let before = tracker.distribution().clone();
        // belief sits at bin 5, a perfect observation at bin 0 leaves no mass
        let result = tracker.step(&mut rng, &-4.5, 0.3, true);
        assert!(matches!(result, Err(BeliefError::NumericalDegeneracy { .. })));
        assert_eq!(tracker.distribution(), &before);
        assert_eq!(tracker.reporter().degeneracies().len(), 1);

        // the estimate taken from the visible velocity is rolled back too
        assert_eq!(tracker.estimator().estimate(), 0.0);
        assert_eq!(tracker.estimator().current_sigma_mean(), 0.0);
        assert!(tracker.last_samples().is_empty());
    }
}
