//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of one independent trajectory within a run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TrajectoryIndex(pub u64);

impl TrajectoryIndex {
    /// Get the raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TrajectoryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trajectory({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trajectory_index_display() {
        assert_eq!(TrajectoryIndex(7).get(), 7);
        assert_eq!(TrajectoryIndex(7).to_string(), "Trajectory(7)");
    }
}
