//! Kernel-side failures.

use thiserror::Error;

/// A failure of the kernel itself, as opposed to one malformed outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// The kernel refused the configuration before running anything.
    #[error("kernel rejected configuration: {0}")]
    Rejected(String),

    /// The kernel stopped partway through the run.
    #[error("kernel failed after {completed} trajectories: {message}")]
    Failed { completed: u64, message: String },

    /// The run was cancelled from outside.
    #[error("kernel run interrupted")]
    Interrupted,
}
