//! Core types for strandsim.
//!
//! Leaf crate shared by the validator, the result layer and the kernel
//! boundary:
//!
//! - **Literal registry**: closed enumerations with names and kernel codes
//! - **Raw values**: the loosely-typed input and outcome representation
//! - **Structures**: dot-paren secondary structure notation
//! - **Fingerprints**: Blake3 digests of canonical content

mod hash;
mod identifiers;
pub mod literals;
mod structure;
mod value;

pub use hash::Fingerprint;
pub use identifiers::TrajectoryIndex;
pub use literals::{
    is_member, literals_of, BoltzmannSampling, DangleMode, Literal, LiteralCategory, RateMethod,
    SimulationMode, StopConditionKind, SubstrateType, TerminationReason,
};
pub use structure::{Structure, StructureError};
pub use value::{RawFields, RawValue, ValueKind};
