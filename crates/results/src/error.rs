//! Errors raised while interpreting kernel output.

use serde::Serialize;
use strandsim_types::{Fingerprint, ValueKind};
use thiserror::Error;

/// What was wrong with an outcome field.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum MalformedReason {
    #[error("field is not part of the documented outcome")]
    UndocumentedField,

    #[error("required field is missing")]
    Missing,

    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: ValueKind,
    },

    #[error("{value} is out of range (must be {bound})")]
    OutOfRange { value: String, bound: String },

    #[error("unknown termination code {0:#x}")]
    UnknownTerminationCode(i64),

    #[error("no stop condition is tagged {0:?}")]
    UnknownStopTag(String),

    #[error("no strand is named {0:?}")]
    UnknownStrand(String),

    #[error("bad structure: {0}")]
    BadStructure(String),

    #[error("{0}")]
    Inconsistent(String),

    #[error("trajectory index already recorded")]
    DuplicateIndex,

    #[error("collection already holds all {0} requested trajectories")]
    CollectionFull(u64),

    #[error("record belongs to configuration {0}")]
    ForeignConfiguration(Fingerprint),
}

/// A kernel outcome that could not be turned into a record.
///
/// Never fatal to the run: records already collected stay queryable, and
/// the error is kept alongside them.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("malformed kernel outcome ({}) at {field}: {reason}", describe_index(.trajectory_index))]
pub struct MalformedKernelOutcome {
    /// The trajectory the outcome claimed to be, if that much was readable.
    pub trajectory_index: Option<u64>,
    pub field: String,
    pub reason: MalformedReason,
}

fn describe_index(index: &Option<u64>) -> String {
    match index {
        Some(index) => format!("trajectory {}", index),
        None => "unknown trajectory".to_string(),
    }
}

impl MalformedKernelOutcome {
    pub fn new(
        trajectory_index: Option<u64>,
        field: impl Into<String>,
        reason: MalformedReason,
    ) -> Self {
        Self {
            trajectory_index,
            field: field.into(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_trajectory_and_field() {
        let err = MalformedKernelOutcome::new(
            Some(4),
            "termination_code",
            MalformedReason::UnknownTerminationCode(0x99),
        );
        assert_eq!(
            err.to_string(),
            "malformed kernel outcome (trajectory 4) at termination_code: unknown termination code 0x99"
        );

        let err = MalformedKernelOutcome::new(None, "bogus", MalformedReason::UndocumentedField);
        assert!(err.to_string().contains("unknown trajectory"));
    }
}
