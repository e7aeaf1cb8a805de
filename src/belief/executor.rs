//! Per-bin fan-out of one update tick.
//!
//! Every bin of the posterior depends only on the shared read-only prior and
//! sample set, and writes only its own slot. The output buffer is split into
//! disjoint slots, so the pass needs no locking beyond rayon's join at the end.
//! Sequential and parallel execution produce bit-identical results.

use serde::{Deserialize, Serialize};

use crate::common::constants::DEFAULT_BATCH_SIZE;
use crate::errors::BeliefError;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// How bins of one tick are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Sequential,
    /// Worker pool fan-out. Falls back to sequential without the `rayon` feature.
    #[default]
    Parallel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelExecutor {
    mode: ExecutionMode,
    batch_size: usize,
}

impl Default for ParallelExecutor {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Parallel,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ParallelExecutor {
    /// `batch_size` is the minimum number of bins handed to one worker.
    pub fn new(mode: ExecutionMode, batch_size: usize) -> Result<Self, BeliefError> {
        if batch_size == 0 {
            return Err(BeliefError::configuration("batch size must be positive"));
        }
        Ok(Self { mode, batch_size })
    }

    pub fn sequential() -> Self {
        Self {
            mode: ExecutionMode::Sequential,
            ..Self::default()
        }
    }

    pub fn parallel() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Write `compute(bin)` into `output[bin]` for every bin.
    pub fn fill<F>(&self, output: &mut [f64], compute: F)
    where
        F: Fn(usize) -> f64 + Sync,
    {
        #[cfg(feature = "rayon")]
        {
            if self.mode == ExecutionMode::Parallel {
                output
                    .par_iter_mut()
                    .enumerate()
                    .with_min_len(self.batch_size)
                    .for_each(|(bin, slot)| *slot = compute(bin));
                return;
            }
        }

        for (bin, slot) in output.iter_mut().enumerate() {
            *slot = compute(bin);
        }
    }

    /// Fresh buffer of `len` slots filled by `compute`
    pub fn map<F>(&self, len: usize, compute: F) -> Vec<f64>
    where
        F: Fn(usize) -> f64 + Sync,
    {
        let mut output = vec![0.0; len];
        self.fill(&mut output, compute);
        output
    }
}
