//! Drives a kernel run into a result collection.

use crate::{KernelError, PullKernel, PushKernel};
use std::sync::Arc;
use std::time::{Duration, Instant};
use strandsim_config::{validate, ConfigurationObject, ValidationReport};
use strandsim_results::{MalformedKernelOutcome, MalformedReason, ResultCollection, ResultSet};
use strandsim_types::RawFields;
use tracing::{debug, info, warn};

/// The end state of one kernel run.
#[derive(Debug, Clone)]
pub struct RunReport {
    results: ResultSet,
    kernel_error: Option<KernelError>,
    elapsed: Duration,
}

impl RunReport {
    /// Every record collected, plus malformed-outcome errors.
    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn into_results(self) -> ResultSet {
        self.results
    }

    pub fn malformed(&self) -> &[MalformedKernelOutcome] {
        self.results.errors()
    }

    pub fn kernel_error(&self) -> Option<&KernelError> {
        self.kernel_error.as_ref()
    }

    /// Wall-clock duration of the run.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// All requested trajectories recorded, nothing malformed, no kernel
    /// failure.
    pub fn is_clean(&self) -> bool {
        self.kernel_error.is_none() && self.malformed().is_empty() && self.results.is_complete()
    }
}

/// One validated configuration, ready to be run by any kernel.
///
/// The configuration is shared read-only with the kernel's workers. Each
/// run gets a fresh [`ResultCollection`]; callers wanting partial reads
/// while a run is in flight pass their own collection to
/// [`Session::run_push_into`].
#[derive(Debug, Clone)]
pub struct Session {
    config: Arc<ConfigurationObject>,
}

impl Session {
    pub fn new(config: ConfigurationObject) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Validate raw fields and open a session on the result.
    pub fn from_raw(raw: &RawFields) -> Result<Self, ValidationReport> {
        validate(raw).map(Self::new)
    }

    pub fn config(&self) -> &Arc<ConfigurationObject> {
        &self.config
    }

    /// An empty collection for this session's configuration.
    pub fn collection(&self) -> ResultCollection {
        ResultCollection::new(Arc::clone(&self.config))
    }

    /// Run a callback-style kernel to completion.
    pub fn run_push<K: PushKernel + ?Sized>(&self, kernel: &K) -> RunReport {
        let collection = self.collection();
        let started = self.log_start("push");
        let kernel_error = self.run_push_into(kernel, &collection).err();
        self.finish(collection, kernel_error, started)
    }

    /// Run a callback-style kernel into an existing collection, which other
    /// threads may snapshot meanwhile.
    pub fn run_push_into<K: PushKernel + ?Sized>(
        &self,
        kernel: &K,
        collection: &ResultCollection,
    ) -> Result<(), KernelError> {
        kernel.run(&self.config, collection)
    }

    /// Run an iterator-style kernel to completion.
    ///
    /// Pulls until the kernel is exhausted or every requested trajectory
    /// is recorded. One outcome beyond that is reported as malformed.
    ///
    /// Detecting the surplus costs one extra `next()` once the collection
    /// is full. For a lazy kernel that means computing one more trajectory.
    pub fn run_pull<K: PullKernel + ?Sized>(&self, kernel: &K) -> RunReport {
        let collection = self.collection();
        let started = self.log_start("pull");

        let kernel_error = match kernel.start(&self.config) {
            Ok(mut outcomes) => {
                for outcome in outcomes.by_ref() {
                    // Rejections are kept in the collection.
                    let _ = collection.ingest(&outcome);
                    if collection.is_complete() {
                        break;
                    }
                }
                if collection.is_complete() && outcomes.next().is_some() {
                    collection.report_error(MalformedKernelOutcome::new(
                        None,
                        "trajectory_index",
                        MalformedReason::CollectionFull(collection.capacity()),
                    ));
                }
                None
            }
            Err(error) => Some(error),
        };

        self.finish(collection, kernel_error, started)
    }

    fn log_start(&self, style: &str) -> Instant {
        info!(
            tag = self.config.experiment_tag(),
            fingerprint = %self.config.fingerprint().short(),
            mode = %self.config.mode(),
            trajectories = self.config.num_simulations(),
            style,
            "starting kernel run"
        );
        Instant::now()
    }

    fn finish(
        &self,
        collection: ResultCollection,
        kernel_error: Option<KernelError>,
        started: Instant,
    ) -> RunReport {
        let elapsed = started.elapsed();
        let results = collection.into_result_set();

        if let Some(error) = &kernel_error {
            warn!(%error, collected = results.len(), "kernel run failed");
        }
        if !results.is_complete() {
            debug!(missing = results.missing_count(), "trajectories without a record");
        }
        info!(
            collected = results.len(),
            requested = results.requested(),
            malformed = results.errors().len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "kernel run finished"
        );

        RunReport {
            results,
            kernel_error,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutcomeSink;
    use rayon::prelude::*;
    use strandsim_results::RawOutcome;
    use strandsim_test_helpers::{fixtures, outcome};
    use strandsim_types::TerminationReason;
    use tracing_test::traced_test;

    /// Replays a fixed list of outcomes in either style.
    struct Scripted {
        outcomes: Vec<RawOutcome>,
        fail_with: Option<KernelError>,
    }

    impl Scripted {
        fn new(outcomes: Vec<RawFields>) -> Self {
            Self {
                outcomes: outcomes.into_iter().map(RawOutcome::from).collect(),
                fail_with: None,
            }
        }
    }

    impl PushKernel for Scripted {
        fn run(
            &self,
            _config: &Arc<ConfigurationObject>,
            sink: &dyn OutcomeSink,
        ) -> Result<(), KernelError> {
            self.outcomes
                .par_iter()
                .for_each(|outcome| sink.deliver(outcome.clone()));
            match &self.fail_with {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        }
    }

    impl PullKernel for Scripted {
        type Outcomes = std::vec::IntoIter<RawOutcome>;

        fn start(&self, _config: &Arc<ConfigurationObject>) -> Result<Self::Outcomes, KernelError> {
            match &self.fail_with {
                Some(error) => Err(error.clone()),
                None => Ok(self.outcomes.clone().into_iter()),
            }
        }
    }

    fn four_outcomes() -> Vec<RawFields> {
        vec![
            outcome::completed(2, 0.3, "melted"),
            outcome::timed_out(0, 1.0),
            outcome::completed(3, 0.1, "melted"),
            outcome::completed(1, 0.2, "melted"),
        ]
    }

    #[test]
    fn test_push_run_collects_everything() {
        let session = Session::new(fixtures::duplex_config());
        let report = session.run_push(&Scripted::new(four_outcomes()));

        assert!(report.is_clean());
        let results = report.results();
        assert_eq!(results.len(), 4);
        assert_eq!(
            results.completion_reason_histogram()[&TerminationReason::StopCondition],
            3
        );
        let mean = results.mean_completion_time().unwrap();
        assert!((mean - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_pull_run_keeps_arrival_order() {
        let session = Session::new(fixtures::duplex_config());
        let report = session.run_pull(&Scripted::new(four_outcomes()));

        let arrival: Vec<u64> = report
            .results()
            .records()
            .iter()
            .map(|r| r.trajectory_index.get())
            .collect();
        assert_eq!(arrival, vec![2, 0, 3, 1]);
        assert!(report.is_clean());
    }

    #[test]
    fn test_pull_run_reports_surplus_outcome() {
        let session = Session::new(fixtures::duplex_config());
        let mut outcomes = four_outcomes();
        outcomes.push(outcome::timed_out(0, 1.0));
        let report = session.run_pull(&Scripted::new(outcomes));

        assert_eq!(report.results().len(), 4);
        assert_eq!(report.malformed().len(), 1);
        assert!(!report.is_clean());
    }

    #[traced_test]
    #[test]
    fn test_kernel_failure_keeps_partial_results() {
        let session = Session::new(fixtures::duplex_config());
        let mut kernel = Scripted::new(four_outcomes().into_iter().take(2).collect());
        kernel.fail_with = Some(KernelError::Failed {
            completed: 2,
            message: "energy model error".into(),
        });
        let report = session.run_push(&kernel);

        assert_eq!(report.results().len(), 2);
        assert!(matches!(report.kernel_error(), Some(KernelError::Failed { .. })));
        assert!(!report.is_clean());
        assert!(logs_contain("kernel run failed"));
    }

    #[traced_test]
    #[test]
    fn test_incomplete_run_with_huge_request() {
        let config =
            fixtures::validated(fixtures::duplex_fields().with("num_simulations", 1i64 << 62));
        let report = Session::new(config).run_push(&Scripted::new(four_outcomes()));

        assert_eq!(report.results().len(), 4);
        assert_eq!(report.results().missing_count(), (1u64 << 62) - 4);
        assert!(!report.is_clean());
        assert!(logs_contain("trajectories without a record"));
    }

    #[test]
    fn test_malformed_outcome_does_not_stop_run() {
        let session = Session::new(fixtures::duplex_config());
        let mut outcomes = four_outcomes();
        outcomes[1] = outcomes[1].clone().with("free_energy", -11.2);
        let report = session.run_push(&Scripted::new(outcomes));

        assert_eq!(report.results().len(), 3);
        assert_eq!(report.malformed().len(), 1);
        assert_eq!(report.malformed()[0].field, "free_energy");
        assert_eq!(report.kernel_error(), None);
    }

    #[test]
    fn test_partial_reads_during_run() {
        let session = Session::new(fixtures::duplex_config());
        let collection = session.collection();
        let kernel = Scripted::new(four_outcomes());

        rayon::scope(|scope| {
            scope.spawn(|_| {
                session.run_push_into(&kernel, &collection).unwrap();
            });
            scope.spawn(|_| {
                let partial = collection.snapshot();
                assert!(partial.len() <= 4);
            });
        });

        assert_eq!(collection.snapshot().len(), 4);
    }

    #[test]
    fn test_from_raw_validates() {
        let session = Session::from_raw(&fixtures::duplex_fields()).unwrap();
        assert_eq!(session.config().num_simulations(), 4);

        let report =
            Session::from_raw(&fixtures::duplex_fields().with("temperature", 0)).unwrap_err();
        assert_eq!(report.len(), 1);
    }
}
