//! Result layer for strandsim.
//!
//! Receives raw trajectory outcomes from the kernel, checks them against
//! the configuration they were run with, and accumulates them in a
//! thread-safe [`ResultCollection`].
//!
//! # Flow
//!
//! - Kernel reports a [`RawOutcome`] per finished trajectory
//! - [`record_outcome`] interprets it into a [`ResultRecord`]
//! - [`ResultCollection::add`] appends it (safe from many threads)
//! - Readers take a [`ResultSet`] snapshot and query statistics on it
//!
//! A malformed outcome never invalidates the records already collected.

mod collection;
mod error;
mod outcome;
mod record;
mod summary;

pub use collection::ResultCollection;
pub use error::{MalformedKernelOutcome, MalformedReason};
pub use outcome::{fields, RawOutcome};
pub use record::{record_outcome, ComplexState, DiagnosticCounters, ResultRecord, Snapshot};
pub use summary::ResultSet;
