//! The two ways a kernel can hand back trajectory outcomes.

use crate::KernelError;
use std::sync::Arc;
use strandsim_config::ConfigurationObject;
use strandsim_results::{RawOutcome, ResultCollection};

/// Receives outcomes from a [`PushKernel`].
///
/// `deliver` may be called from many kernel threads at once, in any
/// trajectory order.
pub trait OutcomeSink: Sync {
    fn deliver(&self, outcome: RawOutcome);
}

/// A kernel that calls back once per finished trajectory.
pub trait PushKernel {
    /// Run every trajectory the configuration requests, delivering each
    /// outcome to `sink` as it finishes. Returns once all workers are done.
    fn run(
        &self,
        config: &Arc<ConfigurationObject>,
        sink: &dyn OutcomeSink,
    ) -> Result<(), KernelError>;
}

/// A kernel that is iterated for outcomes.
pub trait PullKernel {
    type Outcomes: Iterator<Item = RawOutcome>;

    /// Start a run. Outcomes are produced lazily as the iterator advances.
    fn start(&self, config: &Arc<ConfigurationObject>) -> Result<Self::Outcomes, KernelError>;
}

impl OutcomeSink for ResultCollection {
    fn deliver(&self, outcome: RawOutcome) {
        // Rejections are kept in the collection's error list.
        let _ = self.ingest(&outcome);
    }
}
