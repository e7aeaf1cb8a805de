//! Observability for belief update ticks.
//!
//! This module provides the [`StepReporter`] trait for debugging and research
//! instrumentation. Reporters receive callbacks at key points of an update
//! tick without polluting the filtering code.
//!
//! The default [`NoOpReporter`] has empty callbacks that compile away.
//!
//! # Example
//!
//! ```
//! use belief_state_rs::reporter::{DebugReporter, StepReporter};
//!
//! let mut reporter = DebugReporter::new();
//! reporter.on_prior_snapshot(&[0.5, 0.5]);
//! reporter.on_update_complete(&[0.25, 0.75]);
//!
//! assert_eq!(reporter.prior_snapshots().len(), 1);
//! assert_eq!(reporter.posteriors()[0], vec![0.25, 0.75]);
//! ```

// ============================================================================
// StepReporter Trait
// ============================================================================

/// Callbacks during one update tick.
///
/// All methods have empty default implementations; override the events you
/// care about. Callbacks take `&mut self` and run on the calling thread, after
/// or before the parallel pass, so reporters need not be `Send` or `Sync`.
pub trait StepReporter {
    /// Called once the velocity sample set of the tick is known.
    fn on_samples(&mut self, _sample_count: usize, _mean_speed: f32) {}

    /// Called with the prior every bin of the tick reads from.
    fn on_prior_snapshot(&mut self, _prior: &[f64]) {}

    /// Called with the normalised posterior.
    fn on_update_complete(&mut self, _posterior: &[f64]) {}

    /// Called when the observed bin had no predicted mass and was floored.
    fn on_observed_bin_floor(&mut self, _bin: usize, _floor: f64) {}

    /// Called when the raw posterior cannot be normalised.
    fn on_degeneracy(&mut self, _raw_sum: f64) {}
}

impl<R: StepReporter + ?Sized> StepReporter for &mut R {
    fn on_samples(&mut self, sample_count: usize, mean_speed: f32) {
        (**self).on_samples(sample_count, mean_speed)
    }

    fn on_prior_snapshot(&mut self, prior: &[f64]) {
        (**self).on_prior_snapshot(prior)
    }

    fn on_update_complete(&mut self, posterior: &[f64]) {
        (**self).on_update_complete(posterior)
    }

    fn on_observed_bin_floor(&mut self, bin: usize, floor: f64) {
        (**self).on_observed_bin_floor(bin, floor)
    }

    fn on_degeneracy(&mut self, raw_sum: f64) {
        (**self).on_degeneracy(raw_sum)
    }
}

// ============================================================================
// NoOpReporter
// ============================================================================

/// Reporter that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

impl NoOpReporter {
    pub fn new() -> Self {
        Self
    }
}

impl StepReporter for NoOpReporter {}

// ============================================================================
// DebugReporter
// ============================================================================

/// Reporter that keeps a copy of every event.
///
/// Stores one prior and one posterior per tick, which adds up for long
/// episodes with many bins.
#[derive(Debug, Clone, Default)]
pub struct DebugReporter {
    /// (sample count, mean speed) per tick
    samples: Vec<(usize, f32)>,

    prior_snapshots: Vec<Vec<f64>>,

    posteriors: Vec<Vec<f64>>,

    /// (observed bin, floor) per floored tick
    observed_bin_floors: Vec<(usize, f64)>,

    /// Raw sums of failed ticks
    degeneracies: Vec<f64>,
}

impl DebugReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all captured events.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.prior_snapshots.clear();
        self.posteriors.clear();
        self.observed_bin_floors.clear();
        self.degeneracies.clear();
    }

    pub fn sample_events(&self) -> &[(usize, f32)] {
        &self.samples
    }

    pub fn prior_snapshots(&self) -> &[Vec<f64>] {
        &self.prior_snapshots
    }

    pub fn posteriors(&self) -> &[Vec<f64>] {
        &self.posteriors
    }

    pub fn observed_bin_floors(&self) -> &[(usize, f64)] {
        &self.observed_bin_floors
    }

    pub fn degeneracies(&self) -> &[f64] {
        &self.degeneracies
    }

    /// Total number of captured events across all types.
    pub fn total_events(&self) -> usize {
        self.samples.len()
            + self.prior_snapshots.len()
            + self.posteriors.len()
            + self.observed_bin_floors.len()
            + self.degeneracies.len()
    }
}

impl StepReporter for DebugReporter {
    fn on_samples(&mut self, sample_count: usize, mean_speed: f32) {
        self.samples.push((sample_count, mean_speed));
    }

    fn on_prior_snapshot(&mut self, prior: &[f64]) {
        self.prior_snapshots.push(prior.to_vec());
    }

    fn on_update_complete(&mut self, posterior: &[f64]) {
        self.posteriors.push(posterior.to_vec());
    }

    fn on_observed_bin_floor(&mut self, bin: usize, floor: f64) {
        self.observed_bin_floors.push((bin, floor));
    }

    fn on_degeneracy(&mut self, raw_sum: f64) {
        self.degeneracies.push(raw_sum);
    }
}

// ============================================================================
// LoggingReporter
// ============================================================================

/// Reporter that emits events through the `log` facade.
///
/// Sample sets and completed updates are logged at DEBUG, prior snapshots at
/// TRACE, floored observations at INFO, degeneracies at WARN. The verbose variant adds the most likely bin.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingReporter {
    verbose: bool,
}

impl LoggingReporter {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

fn peak(distribution: &[f64]) -> (usize, f64) {
    distribution
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (bin, &p)| if p > best.1 { (bin, p) } else { best })
}

impl StepReporter for LoggingReporter {
    fn on_samples(&mut self, sample_count: usize, mean_speed: f32) {
        log::debug!("Sampled {} velocities, mean speed {:.5}", sample_count, mean_speed);
    }

    fn on_prior_snapshot(&mut self, prior: &[f64]) {
        log::trace!("Prior snapshot over {} bins", prior.len());
    }

    fn on_update_complete(&mut self, posterior: &[f64]) {
        if self.verbose {
            let (bin, probability) = peak(posterior);
            log::debug!(
                "Update complete: {} bins, most likely bin {} ({:.4})",
                posterior.len(),
                bin,
                probability
            );
        } else {
            log::debug!("Update complete: {} bins", posterior.len());
        }
    }

    fn on_observed_bin_floor(&mut self, bin: usize, floor: f64) {
        log::info!("Observed bin {} had no predicted mass, floored to {}", bin, floor);
    }

    fn on_degeneracy(&mut self, raw_sum: f64) {
        log::warn!("Update aborted, raw posterior sum is {}", raw_sum);
    }
}
