//! Read-only result sets and the statistics computed over them.

use crate::error::MalformedKernelOutcome;
use crate::record::ResultRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use strandsim_config::ConfigurationObject;
use strandsim_types::{Fingerprint, SimulationMode, TerminationReason, TrajectoryIndex};

/// A point-in-time copy of a result collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    config: Fingerprint,
    experiment_tag: String,
    mode: SimulationMode,
    requested: u64,
    /// Arrival order.
    records: Vec<ResultRecord>,
    errors: Vec<MalformedKernelOutcome>,
}

impl ResultSet {
    pub(crate) fn new(
        config: &ConfigurationObject,
        records: Vec<ResultRecord>,
        errors: Vec<MalformedKernelOutcome>,
    ) -> Self {
        Self {
            config: config.fingerprint(),
            experiment_tag: config.experiment_tag().to_string(),
            mode: config.mode(),
            requested: config.num_simulations(),
            records,
            errors,
        }
    }

    pub fn config(&self) -> Fingerprint {
        self.config
    }

    pub fn experiment_tag(&self) -> &str {
        &self.experiment_tag
    }

    pub fn mode(&self) -> SimulationMode {
        self.mode
    }

    /// Number of trajectories the configuration requested.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Records in arrival order.
    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    /// Outcomes the kernel delivered that could not be recorded.
    pub fn errors(&self) -> &[MalformedKernelOutcome] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.records.len() as u64 == self.requested
    }

    /// Records ordered by trajectory index.
    pub fn sorted_by_index(&self) -> Vec<&ResultRecord> {
        let mut sorted: Vec<&ResultRecord> = self.records.iter().collect();
        sorted.sort_by_key(|r| r.trajectory_index);
        sorted
    }

    pub fn by_index(&self, index: TrajectoryIndex) -> Option<&ResultRecord> {
        self.records.iter().find(|r| r.trajectory_index == index)
    }

    /// Number of requested trajectories with no record yet.
    pub fn missing_count(&self) -> u64 {
        self.requested.saturating_sub(self.records.len() as u64)
    }

    /// Requested trajectory indices with no record yet, ascending.
    ///
    /// Walks the gaps between recorded indices, so the cost follows the
    /// record count rather than the requested count.
    pub fn missing_indices(&self) -> impl Iterator<Item = TrajectoryIndex> {
        let requested = self.requested;
        let mut recorded: Vec<u64> = self
            .records
            .iter()
            .map(|r| r.trajectory_index.get())
            .filter(|&i| i < requested)
            .collect();
        recorded.sort_unstable();
        recorded.dedup();
        recorded.push(requested);

        let mut next = 0u64;
        recorded
            .into_iter()
            .flat_map(move |upto| {
                let gap = next..upto;
                next = upto.saturating_add(1);
                gap
            })
            .map(TrajectoryIndex)
    }

    /// Mean elapsed time over trajectories that reached a stop condition,
    /// or `None` if none did.
    pub fn mean_completion_time(&self) -> Option<f64> {
        mean(self.completed().map(|r| r.elapsed_time))
    }

    /// Record count per termination reason. Reasons with no records are
    /// absent.
    pub fn completion_reason_histogram(&self) -> BTreeMap<TerminationReason, usize> {
        let mut histogram = BTreeMap::new();
        for record in &self.records {
            *histogram.entry(record.termination).or_insert(0) += 1;
        }
        histogram
    }

    /// Completed-trajectory count per stop tag.
    pub fn stop_tag_histogram(&self) -> BTreeMap<String, usize> {
        let mut histogram = BTreeMap::new();
        for tag in self.records.iter().filter_map(|r| r.stop_tag.as_ref()) {
            *histogram.entry(tag.clone()).or_insert(0) += 1;
        }
        histogram
    }

    /// Mean first passage time into the stop condition `tag`.
    pub fn mean_first_passage_time(&self, tag: &str) -> Option<f64> {
        mean(
            self.completed()
                .filter(|r| r.stop_tag.as_deref() == Some(tag))
                .map(|r| r.elapsed_time),
        )
    }

    /// Bimolecular rate estimate for reaching `tag` from a collision: the
    /// summed collision rates of trajectories ending in `tag`, over all
    /// recorded trajectories. `None` outside FirstStep mode or when empty.
    pub fn first_step_rate(&self, tag: &str) -> Option<f64> {
        if self.mode != SimulationMode::FirstStep || self.records.is_empty() {
            return None;
        }
        let total: f64 = self
            .completed()
            .filter(|r| r.stop_tag.as_deref() == Some(tag))
            .filter_map(|r| r.collision_rate)
            .sum();
        Some(total / self.records.len() as f64)
    }

    /// Fraction of recorded trajectories that reached a stop condition.
    pub fn completion_fraction(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        Some(self.completed().count() as f64 / self.records.len() as f64)
    }

    fn completed(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter().filter(|r| r.completed())
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), x| (sum + x, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use crate::{RawOutcome, ResultCollection};
    use std::sync::Arc;
    use strandsim_test_helpers::{fixtures, outcome};
    use strandsim_types::{TerminationReason, TrajectoryIndex};

    #[test]
    fn test_empty_set_has_no_statistics() {
        let results = ResultCollection::new(Arc::new(fixtures::duplex_config()));
        let set = results.snapshot();

        assert!(set.is_empty());
        assert_eq!(set.mean_completion_time(), None);
        assert_eq!(set.completion_fraction(), None);
        assert!(set.completion_reason_histogram().is_empty());
        assert_eq!(set.missing_indices().count() as u64, set.requested());
        assert_eq!(set.missing_count(), set.requested());
    }

    #[test]
    fn test_per_tag_statistics() {
        let config = Arc::new(fixtures::association_config());
        let results = ResultCollection::new(config);
        let outcomes = [
            outcome::completed(0, 1e-3, "bound").with("collision_rate", 4.0e6),
            outcome::completed(1, 3e-3, "bound").with("collision_rate", 2.0e6),
            outcome::completed(2, 5e-4, "failed").with("collision_rate", 6.0e6),
            outcome::timed_out(3, 1.0).with("collision_rate", 1.0e6),
        ];
        for fields in outcomes {
            results.ingest(&RawOutcome::from(fields)).unwrap();
        }
        let set = results.snapshot();

        let tags = set.stop_tag_histogram();
        assert_eq!(tags["bound"], 2);
        assert_eq!(tags["failed"], 1);

        let mfpt = set.mean_first_passage_time("bound").unwrap();
        assert!((mfpt - 2e-3).abs() < 1e-15);
        assert_eq!(set.mean_first_passage_time("nowhere"), None);

        // (4e6 + 2e6) / 4 trajectories
        assert_eq!(set.first_step_rate("bound"), Some(1.5e6));
        assert_eq!(set.completion_fraction(), Some(0.75));
        assert_eq!(
            set.completion_reason_histogram()[&TerminationReason::TimeLimit],
            1
        );
        assert!(set.is_complete());
        assert_eq!(set.missing_indices().next(), None);
        assert_eq!(set.missing_count(), 0);
    }

    #[test]
    fn test_lookup_by_index() {
        let results = ResultCollection::new(Arc::new(fixtures::duplex_config()));
        results
            .ingest(&RawOutcome::from(outcome::timed_out(2, 1.0)))
            .unwrap();
        let set = results.snapshot();

        assert!(set.by_index(TrajectoryIndex(2)).is_some());
        assert!(set.by_index(TrajectoryIndex(0)).is_none());
        assert_eq!(
            set.missing_indices().collect::<Vec<_>>(),
            vec![TrajectoryIndex(0), TrajectoryIndex(1), TrajectoryIndex(3)]
        );
    }

    #[test]
    fn test_missing_indices_with_huge_request() {
        let config =
            fixtures::validated(fixtures::duplex_fields().with("num_simulations", 1i64 << 62));
        let results = ResultCollection::new(Arc::new(config));
        for index in [1, 3] {
            results
                .ingest(&RawOutcome::from(outcome::timed_out(index, 1.0)))
                .unwrap();
        }
        let set = results.snapshot();

        assert_eq!(set.missing_count(), (1u64 << 62) - 2);
        let first: Vec<TrajectoryIndex> = set.missing_indices().take(4).collect();
        assert_eq!(
            first,
            vec![
                TrajectoryIndex(0),
                TrajectoryIndex(2),
                TrajectoryIndex(4),
                TrajectoryIndex(5)
            ]
        );
    }

    #[test]
    fn test_result_set_serializes() {
        let results = ResultCollection::new(Arc::new(fixtures::duplex_config()));
        results
            .ingest(&RawOutcome::from(outcome::completed(0, 0.5, "melted")))
            .unwrap();
        let json = serde_json::to_value(results.snapshot()).unwrap();

        assert_eq!(json["records"][0]["stop_tag"], "melted");
        assert_eq!(json["records"][0]["termination"], "StopCondition");
        assert_eq!(json["mode"], "FirstPassageTime");
    }
}
