//! Shared fixtures for strandsim tests.
//!
//! - [`fixtures`]: raw field sets and their validated configurations
//! - [`outcome`]: raw kernel outcomes, built as plain field maps

pub mod fixtures;
pub mod outcome;
