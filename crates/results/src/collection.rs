//! Thread-safe accumulation of result records.

use crate::error::{MalformedKernelOutcome, MalformedReason};
use crate::outcome::RawOutcome;
use crate::record::{record_outcome, ResultRecord};
use crate::summary::ResultSet;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use strandsim_config::ConfigurationObject;
use strandsim_types::{TerminationReason, TrajectoryIndex};
use tracing::{debug, warn};

#[derive(Default)]
struct Inner {
    /// Arrival order.
    records: Vec<ResultRecord>,
    indices: HashSet<TrajectoryIndex>,
    errors: Vec<MalformedKernelOutcome>,
}

/// Records for one configuration, appended as trajectories finish.
///
/// `add` may be called from any number of threads at once; each call is
/// atomic and arrival order is preserved. Readers take a [`ResultSet`]
/// snapshot, which is a copy and never changes under them.
pub struct ResultCollection {
    config: Arc<ConfigurationObject>,
    inner: Mutex<Inner>,
}

impl ResultCollection {
    pub fn new(config: Arc<ConfigurationObject>) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn config(&self) -> &Arc<ConfigurationObject> {
        &self.config
    }

    /// Number of trajectories the configuration requested.
    pub fn capacity(&self) -> u64 {
        self.config.num_simulations()
    }

    /// Append a record.
    ///
    /// Rejects records of another configuration, a trajectory index seen
    /// before, and anything past the requested trajectory count. A rejected
    /// record leaves the collection unchanged.
    pub fn add(&self, record: ResultRecord) -> Result<(), MalformedKernelOutcome> {
        let index = record.trajectory_index;
        let reject =
            |field: &str, reason| MalformedKernelOutcome::new(Some(index.get()), field, reason);

        if record.config != self.config.fingerprint() {
            return Err(reject(
                "config",
                MalformedReason::ForeignConfiguration(record.config),
            ));
        }

        let mut inner = self.inner.lock();
        if inner.records.len() as u64 >= self.capacity() {
            return Err(reject(
                "trajectory_index",
                MalformedReason::CollectionFull(self.capacity()),
            ));
        }
        if !inner.indices.insert(index) {
            return Err(reject("trajectory_index", MalformedReason::DuplicateIndex));
        }
        inner.records.push(record);

        debug!(
            trajectory = index.get(),
            collected = inner.records.len(),
            requested = self.capacity(),
            "record added"
        );
        Ok(())
    }

    /// Interpret a raw outcome and append it. Failures are kept alongside
    /// the records as well as returned.
    pub fn ingest(&self, raw: &RawOutcome) -> Result<(), MalformedKernelOutcome> {
        let result = record_outcome(&self.config, raw).and_then(|record| self.add(record));
        if let Err(error) = &result {
            self.report_error(error.clone());
        }
        result
    }

    /// Keep an error next to the records without failing the run.
    pub fn report_error(&self, error: MalformedKernelOutcome) {
        warn!(%error, "kernel outcome rejected");
        self.inner.lock().errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every requested trajectory has a record.
    pub fn is_complete(&self) -> bool {
        self.len() as u64 == self.capacity()
    }

    /// A consistent copy of everything collected so far.
    pub fn snapshot(&self) -> ResultSet {
        let inner = self.inner.lock();
        ResultSet::new(&self.config, inner.records.clone(), inner.errors.clone())
    }

    /// The final result set, without copying.
    pub fn into_result_set(self) -> ResultSet {
        let inner = self.inner.into_inner();
        ResultSet::new(&self.config, inner.records, inner.errors)
    }

    /// Records ordered by trajectory index.
    pub fn sorted_by_index(&self) -> Vec<ResultRecord> {
        self.snapshot().sorted_by_index().into_iter().cloned().collect()
    }

    /// Mean elapsed time of trajectories that reached a stop condition.
    pub fn mean_completion_time(&self) -> Option<f64> {
        self.snapshot().mean_completion_time()
    }

    /// Record count per termination reason.
    pub fn completion_reason_histogram(&self) -> BTreeMap<TerminationReason, usize> {
        self.snapshot().completion_reason_histogram()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;
    use strandsim_test_helpers::{fixtures, outcome};

    fn collection() -> ResultCollection {
        ResultCollection::new(Arc::new(fixtures::duplex_config()))
    }

    fn raw(fields: strandsim_types::RawFields) -> RawOutcome {
        RawOutcome::from(fields)
    }

    #[test]
    fn test_arrival_order_kept_and_sorted_view() {
        let results = collection();
        results.ingest(&raw(outcome::timed_out(3, 1.0))).unwrap();
        results.ingest(&raw(outcome::completed(1, 0.2, "melted"))).unwrap();
        results.ingest(&raw(outcome::completed(2, 0.4, "melted"))).unwrap();

        let set = results.snapshot();
        let arrival: Vec<u64> = set.records().iter().map(|r| r.trajectory_index.get()).collect();
        assert_eq!(arrival, vec![3, 1, 2]);

        let sorted: Vec<u64> = results
            .sorted_by_index()
            .iter()
            .map(|r| r.trajectory_index.get())
            .collect();
        assert_eq!(sorted, vec![1, 2, 3]);
    }

    #[test]
    fn test_histogram_and_mean() {
        let results = collection();
        results.ingest(&raw(outcome::timed_out(0, 1.0))).unwrap();
        results.ingest(&raw(outcome::completed(1, 0.2, "melted"))).unwrap();
        results.ingest(&raw(outcome::completed(2, 0.4, "melted"))).unwrap();

        let histogram = results.completion_reason_histogram();
        assert_eq!(histogram.get(&TerminationReason::StopCondition), Some(&2));
        assert_eq!(histogram.get(&TerminationReason::TimeLimit), Some(&1));
        assert_eq!(histogram.len(), 2);

        let mean = results.mean_completion_time().unwrap();
        assert!((mean - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_malformed_outcome_leaves_records_queryable() {
        let results = collection();
        results.ingest(&raw(outcome::completed(0, 0.2, "melted"))).unwrap();
        results.ingest(&raw(outcome::timed_out(1, 1.0))).unwrap();

        let bad = raw(outcome::timed_out(2, 1.0).with("termination_code", 0x77));
        assert!(results.ingest(&bad).is_err());

        let set = results.snapshot();
        assert_eq!(set.len(), 2);
        assert_eq!(set.errors().len(), 1);
        assert_eq!(set.errors()[0].trajectory_index, Some(2));
        assert_eq!(set.mean_completion_time(), Some(0.2));
    }

    #[test]
    fn test_duplicate_and_overflow_rejected() {
        let results = collection();
        results.ingest(&raw(outcome::timed_out(0, 1.0))).unwrap();

        let err = results.ingest(&raw(outcome::timed_out(0, 1.0))).unwrap_err();
        assert_eq!(err.reason, MalformedReason::DuplicateIndex);
        assert_eq!(results.len(), 1);

        for i in 1..results.capacity() as i64 {
            results.ingest(&raw(outcome::timed_out(i, 1.0))).unwrap();
        }
        assert!(results.is_complete());
    }

    #[test]
    fn test_foreign_record_rejected() {
        let results = collection();
        let other = fixtures::trajectory_config();
        let record = record_outcome(&other, &raw(outcome::timed_out(0, 1.0))).unwrap();

        let err = results.add(record).unwrap_err();
        assert!(matches!(err.reason, MalformedReason::ForeignConfiguration(_)));
        assert!(results.is_empty());
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_adds() {
        let results = collection();
        results.ingest(&raw(outcome::timed_out(0, 1.0))).unwrap();
        let before = results.snapshot();
        results.ingest(&raw(outcome::timed_out(1, 1.0))).unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(results.snapshot().len(), 2);
    }

    #[test]
    fn test_concurrent_adds() {
        let config = Arc::new(fixtures::validated(
            fixtures::duplex_fields().with("num_simulations", 500),
        ));
        let results = ResultCollection::new(config);

        (0..500i64).into_par_iter().for_each(|i| {
            let fields = if i % 4 == 0 {
                outcome::timed_out(i, 1.0)
            } else {
                outcome::completed(i, 0.001 * i as f64, "melted")
            };
            results.ingest(&raw(fields)).unwrap();
        });

        let set = results.into_result_set();
        assert_eq!(set.len(), 500);
        assert!(set.errors().is_empty());
        let sorted: Vec<u64> = set
            .sorted_by_index()
            .iter()
            .map(|r| r.trajectory_index.get())
            .collect();
        assert_eq!(sorted, (0..500).collect::<Vec<u64>>());
        assert_eq!(
            set.completion_reason_histogram()[&TerminationReason::TimeLimit],
            125
        );
    }
}
