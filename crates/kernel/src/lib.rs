//! Kernel boundary for strandsim.
//!
//! The stochastic kernel is native code outside this workspace. This crate
//! fixes the two shapes it may take and adapts both into the result layer:
//!
//! - [`PushKernel`]: kernel calls an [`OutcomeSink`] per trajectory,
//!   possibly from many threads
//! - [`PullKernel`]: kernel is an iterator of outcomes
//!
//! [`Session`] owns the shared configuration and turns either into a
//! [`RunReport`].

mod error;
mod session;
mod traits;

pub use error::KernelError;
pub use session::{RunReport, Session};
pub use traits::{OutcomeSink, PullKernel, PushKernel};
