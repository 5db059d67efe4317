//! Raw trajectory outcomes as delivered by the kernel.

use serde::{Deserialize, Serialize};
use strandsim_types::{RawFields, RawValue};

/// Documented outcome field names.
pub mod fields {
    pub const TRAJECTORY_INDEX: &str = "trajectory_index";
    pub const TERMINATION_CODE: &str = "termination_code";
    pub const ELAPSED_TIME: &str = "elapsed_time";
    pub const STOP_TAG: &str = "stop_tag";
    pub const SNAPSHOTS: &str = "snapshots";
    pub const MOVE_ATTEMPTS: &str = "move_attempts";
    pub const REJECTED_MOVES: &str = "rejected_moves";
    pub const SEED: &str = "seed";
    pub const COLLISION_RATE: &str = "collision_rate";

    /// Every name a kernel may report.
    pub const ALL: &[&str] = &[
        TRAJECTORY_INDEX,
        TERMINATION_CODE,
        ELAPSED_TIME,
        STOP_TAG,
        SNAPSHOTS,
        MOVE_ATTEMPTS,
        REJECTED_MOVES,
        SEED,
        COLLISION_RATE,
    ];

    /// Keys of one snapshot entry.
    pub const SNAPSHOT_TIME: &str = "time";
    pub const SNAPSHOT_COMPLEXES: &str = "complexes";
    /// Keys of one complex inside a snapshot.
    pub const COMPLEX_STRANDS: &str = "strands";
    pub const COMPLEX_STRUCTURE: &str = "structure";
}

/// One trajectory's outcome, unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawOutcome(RawFields);

impl RawOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a field, returning the updated outcome.
    pub fn with(self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        Self(self.0.with(name, value))
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.names()
    }
}

impl From<RawFields> for RawOutcome {
    fn from(fields: RawFields) -> Self {
        Self(fields)
    }
}
