//! Gaussian sampling with an explicit random source.

use rand::Rng;

use crate::errors::BeliefError;

/// Normal distribution `N(mean, sigma)` sampled with the polar Box-Muller method.
///
/// Each rejection round yields two independent deviates; the second one is
/// cached and returned by the next call, so consecutive samples are still
/// independent. The random source is passed to every call, which makes a run
/// reproducible from the seed of that source.
#[derive(Debug, Clone)]
pub struct NormalDistribution {
    mean: f64,
    sigma: f64,
    spare: Option<f64>,
}

impl NormalDistribution {
    /// # Errors
    /// [`BeliefError::Configuration`] if `sigma` is negative or either
    /// parameter is not finite.
    pub fn new(mean: f64, sigma: f64) -> Result<Self, BeliefError> {
        if !mean.is_finite() || !sigma.is_finite() {
            return Err(BeliefError::configuration(format!(
                "normal distribution parameters must be finite (mean {}, sigma {})",
                mean, sigma
            )));
        }
        if sigma < 0.0 {
            return Err(BeliefError::configuration(format!(
                "sigma must not be negative, got {}",
                sigma
            )));
        }
        Ok(Self {
            mean,
            sigma,
            spare: None,
        })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn variance(&self) -> f64 {
        self.sigma * self.sigma
    }

    /// Draw one value.
    ///
    /// With `sigma == 0` the mean is returned and the random source is left untouched.
    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        if self.sigma == 0.0 {
            return self.mean;
        }

        if let Some(spare) = self.spare.take() {
            return self.mean + spare * self.sigma;
        }

        let (x1, x2, w) = loop {
            let x1 = 2.0 * rng.gen::<f64>() - 1.0;
            let x2 = 2.0 * rng.gen::<f64>() - 1.0;
            let w = x1 * x1 + x2 * x2;
            // w == 0 would divide by zero below
            if w < 1.0 && w > 0.0 {
                break (x1, x2, w);
            }
        };

        let factor = (-2.0 * w.ln() / w).sqrt();
        self.spare = Some(x2 * factor);
        self.mean + x1 * factor * self.sigma
    }

    /// Draw `n` values
    pub fn sample_n<R: Rng + ?Sized>(&mut self, rng: &mut R, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}
