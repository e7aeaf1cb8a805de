//! Velocity sample sets and the velocity estimate used while an object is unobserved.

use rand::Rng;

use super::NormalDistribution;
use crate::errors::BeliefError;
use crate::geometry::SpatialVector;

/// Draw `n` velocities around `mean`.
///
/// Every sampled axis gets its own `N(mean[axis], sigma)`; all of them share
/// `rng`. Axes that are not sampled (the height of the square platform) keep
/// the value of `mean`.
///
/// # Errors
/// [`BeliefError::Configuration`] if `n` is zero or `sigma` is negative.
pub fn sample_velocity_set<V, R>(rng: &mut R, mean: V, sigma: f64, n: usize) -> Result<Vec<V>, BeliefError>
where
    V: SpatialVector,
    R: Rng + ?Sized,
{
    if n == 0 {
        return Err(BeliefError::configuration("number of velocity samples must be positive"));
    }

    let mut axes = V::SAMPLED_AXES
        .iter()
        .map(|&axis| -> Result<_, BeliefError> {
            Ok((axis, NormalDistribution::new(mean.component(axis) as f64, sigma)?))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((0..n)
        .map(|_| {
            axes.iter_mut().fold(mean, |velocity, (axis, normal)| {
                velocity.with_component(*axis, normal.sample(rng) as f32)
            })
        })
        .collect())
}

/// Component-wise mean of a sample set
pub fn average_velocity<V: SpatialVector>(samples: &[V]) -> Result<V, BeliefError> {
    if samples.is_empty() {
        return Err(BeliefError::EmptySampleSet);
    }
    let sum = samples.iter().fold(V::zero(), |acc, &v| acc + v);
    Ok(sum.scaled(1.0 / samples.len() as f32))
}

/// How the velocity estimate evolves while the object is not observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriftPolicy {
    /// Jitter around the current true velocity. The observer steers the
    /// object and so perceives the velocity it introduces (driving task).
    #[default]
    FollowCurrent,
    /// Jitter around the previous estimate with a halving uncertainty, scaled
    /// to the current speed (ball task).
    DecayingMean,
}

/// Per-tick velocity estimate under partial observability.
#[derive(Debug, Clone)]
pub struct VelocityEstimator<V> {
    policy: DriftPolicy,
    sigma_mean: f64,
    current_sigma_mean: f64,
    estimate: V,
}

impl<V: SpatialVector> VelocityEstimator<V> {
    pub fn new(policy: DriftPolicy, sigma_mean: f64) -> Result<Self, BeliefError> {
        if !sigma_mean.is_finite() || sigma_mean < 0.0 {
            return Err(BeliefError::configuration(format!(
                "sigma_mean must be a non-negative number, got {}",
                sigma_mean
            )));
        }
        Ok(Self {
            policy,
            sigma_mean,
            current_sigma_mean: 0.0,
            estimate: V::zero(),
        })
    }

    pub fn policy(&self) -> DriftPolicy {
        self.policy
    }

    pub fn estimate(&self) -> V {
        self.estimate
    }

    pub fn current_sigma_mean(&self) -> f64 {
        self.current_sigma_mean
    }

    /// Forget the estimate (episode begin)
    pub fn reset(&mut self) {
        self.estimate = V::zero();
        self.current_sigma_mean = 0.0;
    }

    /// Update the estimate with the true per-tick velocity `current`.
    ///
    /// A visible object is estimated exactly and restores the configured
    /// uncertainty. A hidden one drifts according to the [`DriftPolicy`].
    pub fn observe<R: Rng + ?Sized>(&mut self, rng: &mut R, current: V, visible: bool) -> Result<V, BeliefError> {
        if visible {
            self.estimate = current;
            self.current_sigma_mean = self.sigma_mean;
            return Ok(self.estimate);
        }

        let centre = match self.policy {
            DriftPolicy::FollowCurrent => current,
            DriftPolicy::DecayingMean => self.estimate,
        };

        let mut drifted = current;
        for &axis in V::SAMPLED_AXES {
            let mut normal = NormalDistribution::new(centre.component(axis) as f64, self.current_sigma_mean)?;
            drifted = drifted.with_component(axis, normal.sample(rng) as f32);
        }

        if self.policy == DriftPolicy::DecayingMean {
            let previous = self.estimate.magnitude();
            let ratio = if previous == 0.0 { 0.0 } else { current.magnitude() / previous };
            drifted = drifted.scaled(ratio);
            self.current_sigma_mean /= 2.0;
        }

        self.estimate = drifted;
        Ok(self.estimate)
    }
}
