//! Raw kernel outcome builders.
//!
//! Outcomes are returned as [`RawFields`] so tests can add, replace or
//! remove fields before handing them to the result layer.

use crate::fixtures::DUPLEX;
use strandsim_types::{RawFields, RawValue, TerminationReason};

/// A trajectory that hit stop condition `tag` after `elapsed` seconds.
pub fn completed(index: i64, elapsed: f64, tag: &str) -> RawFields {
    RawFields::new()
        .with("trajectory_index", index)
        .with("termination_code", TerminationReason::StopCondition as i64)
        .with("elapsed_time", elapsed)
        .with("stop_tag", tag)
}

/// A trajectory that ran out of simulated time.
pub fn timed_out(index: i64, elapsed: f64) -> RawFields {
    RawFields::new()
        .with("trajectory_index", index)
        .with("termination_code", TerminationReason::TimeLimit as i64)
        .with("elapsed_time", elapsed)
}

/// Snapshots of the intact duplex at the given times.
pub fn snapshots(times: &[f64]) -> RawValue {
    RawValue::list(times.iter().map(|&time| {
        RawValue::map([
            ("time", RawValue::from(time)),
            (
                "complexes",
                RawValue::list([RawValue::map([
                    ("strands", RawValue::list(["top", "bottom"])),
                    ("structure", RawValue::from(DUPLEX)),
                ])]),
            ),
        ])
    }))
}
