//! strandsim Simulator
//!
//! A deterministic synthetic kernel for exercising the configuration and
//! result layers without the native kernel.
//!
//! # Example
//!
//! ```ignore
//! use strandsim_kernel::Session;
//! use strandsim_simulator::{SyntheticKernel, SyntheticKernelConfig};
//!
//! let session = Session::from_raw(&raw_fields)?;
//! let kernel = SyntheticKernel::new(SyntheticKernelConfig::new(0.05).with_threads(8));
//! let report = session.run_push(&kernel);
//!
//! println!("MFPT: {:?}", report.results().mean_completion_time());
//! ```

pub mod config;
pub mod kernel;
pub mod trajectory;

pub use config::SyntheticKernelConfig;
pub use kernel::{SyntheticKernel, Trajectories};
pub use trajectory::TrajectorySampler;
