//! The synthetic kernel: both kernel shapes over the same sampler.

use crate::config::SyntheticKernelConfig;
use crate::trajectory::TrajectorySampler;
use rayon::prelude::*;
use std::sync::Arc;
use strandsim_config::ConfigurationObject;
use strandsim_kernel::{KernelError, OutcomeSink, PullKernel, PushKernel};
use strandsim_results::RawOutcome;
use tracing::{debug, trace};

/// A deterministic stand-in for the native kernel.
///
/// Push-style runs fan trajectories out over rayon and deliver them in
/// completion order; pull-style runs produce them lazily in index order.
/// Either way trajectory `i` of a given experiment is always the same.
#[derive(Clone, Debug, Default)]
pub struct SyntheticKernel {
    config: SyntheticKernelConfig,
}

impl SyntheticKernel {
    pub fn new(config: SyntheticKernelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyntheticKernelConfig {
        &self.config
    }

    /// The outcome of one trajectory.
    pub fn trajectory(&self, config: &ConfigurationObject, index: u64) -> RawOutcome {
        TrajectorySampler::new(&self.config, config).sample(index)
    }

    fn check(&self) -> Result<(), KernelError> {
        match self.config.problem() {
            Some(problem) => {
                debug!(%problem, "synthetic kernel refused to start");
                Err(KernelError::Rejected(problem))
            }
            None => Ok(()),
        }
    }
}

impl PushKernel for SyntheticKernel {
    fn run(
        &self,
        config: &Arc<ConfigurationObject>,
        sink: &dyn OutcomeSink,
    ) -> Result<(), KernelError> {
        self.check()?;
        let trajectories = config.num_simulations();
        debug!(trajectories, threads = self.config.threads, "synthetic push run");

        let work = || {
            (0..trajectories).into_par_iter().for_each(|index| {
                let outcome = self.trajectory(config, index);
                trace!(trajectory = index, "trajectory finished");
                sink.deliver(outcome);
            })
        };

        if self.config.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .build()
                .map_err(|e| KernelError::Rejected(e.to_string()))?;
            pool.install(work);
        } else {
            work();
        }
        Ok(())
    }
}

/// Lazily sampled outcomes, in trajectory-index order.
pub struct Trajectories {
    kernel: SyntheticKernelConfig,
    config: Arc<ConfigurationObject>,
    next: u64,
}

impl Iterator for Trajectories {
    type Item = RawOutcome;

    fn next(&mut self) -> Option<RawOutcome> {
        if self.next >= self.config.num_simulations() {
            return None;
        }
        let outcome = TrajectorySampler::new(&self.kernel, &self.config).sample(self.next);
        self.next += 1;
        Some(outcome)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.config.num_simulations().saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl PullKernel for SyntheticKernel {
    type Outcomes = Trajectories;

    fn start(&self, config: &Arc<ConfigurationObject>) -> Result<Trajectories, KernelError> {
        self.check()?;
        debug!(trajectories = config.num_simulations(), "synthetic pull run");
        Ok(Trajectories {
            kernel: self.config.clone(),
            config: Arc::clone(config),
            next: 0,
        })
    }
}
