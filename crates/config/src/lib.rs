//! Configuration layer for strandsim.
//!
//! Turns loosely-typed field assignments into an immutable, validated
//! [`ConfigurationObject`] that trajectory workers share read-only.
//!
//! # Flow
//!
//! - Caller assembles a [`RawFields`](strandsim_types::RawFields) map
//! - [`validate`] checks every field, collecting all violations
//! - Success yields a [`ConfigurationObject`]; failure a [`ValidationReport`]
//!
//! Nothing here mutates after construction. A changed experiment is a new
//! raw map and a new validation.

mod coerce;
mod config;
mod error;
mod field;
mod molecular;
mod rate;
mod stop;
mod validator;

pub use config::{ConfigurationObject, ExecutionParameters, KineticParameters};
pub use error::{Bound, Expected, ValidationError, ValidationErrorKind, ValidationReport};
pub use field::Field;
pub use molecular::{Complex, MolecularSetup, Strand};
pub use rate::{ArrheniusTerm, LocalContext, RateModel};
pub use stop::{Predicate, StopCondition, StrandSelector};
pub use validator::{
    validate, DEFAULT_EXPERIMENT_TAG, DEFAULT_JOIN_CONCENTRATION, DEFAULT_MAGNESIUM,
    DEFAULT_NUM_SIMULATIONS, DEFAULT_SIMULATION_TIME, DEFAULT_SODIUM, DEFAULT_TEMPERATURE,
};
