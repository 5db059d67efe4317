//! Configuration for the synthetic kernel.

/// Shape of the synthetic trajectory distribution.
///
/// These knobs belong to the stand-in kernel, not to an experiment: the
/// experiment itself is a validated
/// [`ConfigurationObject`](strandsim_config::ConfigurationObject).
#[derive(Clone, Debug)]
pub struct SyntheticKernelConfig {
    /// Mean of the exponential first-passage time, in simulated seconds.
    pub mean_completion_time: f64,

    /// Probability that a completing trajectory ends in the first declared
    /// stop condition. The remainder is split evenly over the others.
    pub success_probability: f64,

    /// Attempted moves per simulated second.
    pub moves_per_second: f64,

    /// Fraction of attempted moves that are rejected.
    pub rejection_ratio: f64,

    /// Seed used when the experiment sets no `initial_seed`.
    pub seed: u64,

    /// Worker threads for push-style runs. Zero uses the global pool.
    pub threads: usize,
}

impl SyntheticKernelConfig {
    /// Create a kernel configuration with the given mean completion time.
    pub fn new(mean_completion_time: f64) -> Self {
        Self {
            mean_completion_time,
            success_probability: 0.8,
            moves_per_second: 1.0e6,
            rejection_ratio: 0.25,
            seed: 12345,
            threads: 0,
        }
    }

    /// Set the probability of ending in the first stop condition.
    pub fn with_success_probability(mut self, probability: f64) -> Self {
        self.success_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Set the move rate.
    pub fn with_moves_per_second(mut self, rate: f64) -> Self {
        self.moves_per_second = rate;
        self
    }

    /// Set the rejected-move fraction.
    pub fn with_rejection_ratio(mut self, ratio: f64) -> Self {
        self.rejection_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Set the fallback random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Why this configuration cannot drive a run, if it cannot.
    pub fn problem(&self) -> Option<String> {
        if !(self.mean_completion_time.is_finite() && self.mean_completion_time > 0.0) {
            return Some(format!(
                "mean completion time must be positive, got {}",
                self.mean_completion_time
            ));
        }
        if !(self.moves_per_second.is_finite() && self.moves_per_second > 0.0) {
            return Some(format!(
                "move rate must be positive, got {}",
                self.moves_per_second
            ));
        }
        None
    }
}

impl Default for SyntheticKernelConfig {
    fn default() -> Self {
        Self::new(0.1)
    }
}
