//! Result records and their construction from raw kernel outcomes.

use crate::error::{MalformedKernelOutcome, MalformedReason};
use crate::outcome::{fields, RawOutcome};
use serde::Serialize;
use strandsim_config::ConfigurationObject;
use strandsim_types::{
    Fingerprint, Literal, RawValue, SimulationMode, Structure, TerminationReason, TrajectoryIndex,
};
use tracing::trace;

/// One complex observed in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexState {
    /// Strand names in circular order.
    pub strands: Vec<String>,
    pub structure: Structure,
}

/// System state at a point in simulated time. Trajectory mode only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Simulated seconds since the trajectory started.
    pub time: f64,
    pub complexes: Vec<ComplexState>,
}

/// Move counters reported by the kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticCounters {
    pub move_attempts: u64,
    pub rejected_moves: u64,
}

impl DiagnosticCounters {
    /// Fraction of attempted moves that were accepted.
    pub fn acceptance_ratio(&self) -> Option<f64> {
        if self.move_attempts == 0 {
            return None;
        }
        Some((self.move_attempts - self.rejected_moves) as f64 / self.move_attempts as f64)
    }
}

/// The validated outcome of one trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub trajectory_index: TrajectoryIndex,
    /// Fingerprint of the owning configuration.
    pub config: Fingerprint,
    pub termination: TerminationReason,
    /// Simulated seconds at termination.
    pub elapsed_time: f64,
    /// The stop condition that fired. Set iff `termination` is
    /// [`TerminationReason::StopCondition`].
    pub stop_tag: Option<String>,
    pub snapshots: Vec<Snapshot>,
    pub counters: DiagnosticCounters,
    pub seed: Option<u64>,
    /// Bimolecular collision rate. FirstStep mode only.
    pub collision_rate: Option<f64>,
}

impl ResultRecord {
    pub fn completed(&self) -> bool {
        self.termination.is_completion()
    }
}

/// Interpret a kernel outcome against the configuration it was run with.
///
/// Fails on the first undocumented field, missing field, type or range
/// violation, or a value that contradicts the configuration.
pub fn record_outcome(
    config: &ConfigurationObject,
    raw: &RawOutcome,
) -> Result<ResultRecord, MalformedKernelOutcome> {
    let reader = Reader::new(raw);

    if let Some(name) = raw.names().find(|name| !fields::ALL.contains(name)) {
        return Err(reader.error(name, MalformedReason::UndocumentedField));
    }

    let trajectory_index = reader.required(fields::TRAJECTORY_INDEX, Reader::count)?;
    if trajectory_index >= config.num_simulations() {
        return Err(reader.error(
            fields::TRAJECTORY_INDEX,
            MalformedReason::OutOfRange {
                value: trajectory_index.to_string(),
                bound: format!("< {}", config.num_simulations()),
            },
        ));
    }

    let termination = reader.required(fields::TERMINATION_CODE, Reader::termination)?;
    let elapsed_time = reader.required(fields::ELAPSED_TIME, Reader::non_negative)?;
    let stop_tag = reader.stop_tag(config, termination)?;

    let move_attempts = reader.count(fields::MOVE_ATTEMPTS)?.unwrap_or(0);
    let rejected_moves = reader.count(fields::REJECTED_MOVES)?.unwrap_or(0);
    if rejected_moves > move_attempts {
        return Err(reader.error(
            fields::REJECTED_MOVES,
            MalformedReason::OutOfRange {
                value: rejected_moves.to_string(),
                bound: format!("<= move_attempts ({})", move_attempts),
            },
        ));
    }

    let seed = reader.count(fields::SEED)?;
    let collision_rate = reader.collision_rate(config.mode())?;
    let snapshots = reader.snapshots(config, elapsed_time)?;

    Ok(ResultRecord {
        trajectory_index: TrajectoryIndex(trajectory_index),
        config: config.fingerprint(),
        termination,
        elapsed_time,
        stop_tag,
        snapshots,
        counters: DiagnosticCounters {
            move_attempts,
            rejected_moves,
        },
        seed,
        collision_rate,
    })
}

/// Typed field access that reports failures against the outcome's index.
struct Reader<'a> {
    raw: &'a RawOutcome,
    index: Option<u64>,
}

impl<'a> Reader<'a> {
    fn new(raw: &'a RawOutcome) -> Self {
        let index = match raw.get(fields::TRAJECTORY_INDEX) {
            Some(RawValue::Int(i)) if *i >= 0 => Some(*i as u64),
            _ => None,
        };
        Self { raw, index }
    }

    fn error(&self, field: &str, reason: MalformedReason) -> MalformedKernelOutcome {
        MalformedKernelOutcome::new(self.index, field, reason)
    }

    fn wrong_type(
        &self,
        field: &str,
        expected: &'static str,
        found: &RawValue,
    ) -> MalformedKernelOutcome {
        self.error(
            field,
            MalformedReason::WrongType {
                expected,
                found: found.kind(),
            },
        )
    }

    fn required<T>(
        &self,
        field: &str,
        read: impl FnOnce(&Self, &str) -> Result<Option<T>, MalformedKernelOutcome>,
    ) -> Result<T, MalformedKernelOutcome> {
        read(self, field)?.ok_or_else(|| self.error(field, MalformedReason::Missing))
    }

    /// A non-negative integer.
    fn count(&self, field: &str) -> Result<Option<u64>, MalformedKernelOutcome> {
        match self.raw.get(field) {
            None => Ok(None),
            Some(value) => count_value(value)
                .map(Some)
                .map_err(|reason| self.error(field, reason)),
        }
    }

    /// A finite, non-negative float.
    fn non_negative(&self, field: &str) -> Result<Option<f64>, MalformedKernelOutcome> {
        match self.raw.get(field) {
            None => Ok(None),
            Some(value) => non_negative_value(value)
                .map(Some)
                .map_err(|reason| self.error(field, reason)),
        }
    }

    fn termination(
        &self,
        field: &str,
    ) -> Result<Option<TerminationReason>, MalformedKernelOutcome> {
        let code = match self.raw.get(field) {
            None => return Ok(None),
            Some(RawValue::Int(code)) => *code,
            Some(other) => return Err(self.wrong_type(field, "termination code", other)),
        };
        TerminationReason::from_code(code)
            .map(Some)
            .ok_or_else(|| self.error(field, MalformedReason::UnknownTerminationCode(code)))
    }

    fn stop_tag(
        &self,
        config: &ConfigurationObject,
        termination: TerminationReason,
    ) -> Result<Option<String>, MalformedKernelOutcome> {
        let field = fields::STOP_TAG;
        let tag = match self.raw.get(field) {
            None => None,
            Some(RawValue::Str(tag)) => Some(tag),
            Some(other) => return Err(self.wrong_type(field, "string", other)),
        };

        match (tag, termination.is_completion()) {
            (Some(tag), true) => {
                if config.stop_condition(tag).is_none() {
                    return Err(self.error(field, MalformedReason::UnknownStopTag(tag.clone())));
                }
                Ok(Some(tag.clone()))
            }
            (None, true) => Err(self.error(field, MalformedReason::Missing)),
            (Some(_), false) => Err(self.error(
                field,
                MalformedReason::Inconsistent(format!(
                    "stop tag given for a trajectory that ended by {}",
                    termination
                )),
            )),
            (None, false) => Ok(None),
        }
    }

    fn collision_rate(&self, mode: SimulationMode) -> Result<Option<f64>, MalformedKernelOutcome> {
        let field = fields::COLLISION_RATE;
        let rate = self.non_negative(field)?;
        match (rate, mode) {
            (None, SimulationMode::FirstStep) => Err(self.error(field, MalformedReason::Missing)),
            (Some(_), mode) if mode != SimulationMode::FirstStep => Err(self.error(
                field,
                MalformedReason::Inconsistent(format!("collision rate reported in {} mode", mode)),
            )),
            (rate, _) => Ok(rate),
        }
    }

    fn snapshots(
        &self,
        config: &ConfigurationObject,
        elapsed_time: f64,
    ) -> Result<Vec<Snapshot>, MalformedKernelOutcome> {
        let field = fields::SNAPSHOTS;
        let Some(value) = self.raw.get(field) else {
            return Ok(Vec::new());
        };
        if !config.mode().records_snapshots() {
            trace!(
                trajectory = ?self.index,
                mode = %config.mode(),
                "discarding snapshots outside trajectory mode"
            );
            return Ok(Vec::new());
        }
        let items = value
            .as_list()
            .ok_or_else(|| self.wrong_type(field, "list", value))?;

        let mut snapshots: Vec<Snapshot> = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let at = format!("{}[{}]", field, i);
            let snapshot = self.snapshot(config, &at, item)?;

            let previous = snapshots.last().map(|s| s.time).unwrap_or(0.0);
            if snapshot.time < previous || snapshot.time > elapsed_time {
                return Err(self.error(
                    &format!("{}.{}", at, fields::SNAPSHOT_TIME),
                    MalformedReason::OutOfRange {
                        value: snapshot.time.to_string(),
                        bound: format!("within [{}, {}]", previous, elapsed_time),
                    },
                ));
            }
            snapshots.push(snapshot);
        }
        Ok(snapshots)
    }

    fn snapshot(
        &self,
        config: &ConfigurationObject,
        at: &str,
        value: &RawValue,
    ) -> Result<Snapshot, MalformedKernelOutcome> {
        let entry = value
            .as_map()
            .ok_or_else(|| self.wrong_type(at, "map", value))?;
        if let Some(key) = entry
            .keys()
            .find(|k| *k != fields::SNAPSHOT_TIME && *k != fields::SNAPSHOT_COMPLEXES)
        {
            return Err(self.error(&format!("{}.{}", at, key), MalformedReason::UndocumentedField));
        }

        let time_field = format!("{}.{}", at, fields::SNAPSHOT_TIME);
        let time = entry
            .get(fields::SNAPSHOT_TIME)
            .ok_or_else(|| self.error(&time_field, MalformedReason::Missing))
            .and_then(|v| non_negative_value(v).map_err(|r| self.error(&time_field, r)))?;

        let complexes_field = format!("{}.{}", at, fields::SNAPSHOT_COMPLEXES);
        let complexes = entry
            .get(fields::SNAPSHOT_COMPLEXES)
            .ok_or_else(|| self.error(&complexes_field, MalformedReason::Missing))?;
        let complexes = complexes
            .as_list()
            .ok_or_else(|| self.wrong_type(&complexes_field, "list", complexes))?
            .iter()
            .enumerate()
            .map(|(i, c)| self.complex_state(config, &format!("{}[{}]", complexes_field, i), c))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Snapshot { time, complexes })
    }

    fn complex_state(
        &self,
        config: &ConfigurationObject,
        at: &str,
        value: &RawValue,
    ) -> Result<ComplexState, MalformedKernelOutcome> {
        let entry = value
            .as_map()
            .ok_or_else(|| self.wrong_type(at, "map", value))?;
        if let Some(key) = entry
            .keys()
            .find(|k| *k != fields::COMPLEX_STRANDS && *k != fields::COMPLEX_STRUCTURE)
        {
            return Err(self.error(&format!("{}.{}", at, key), MalformedReason::UndocumentedField));
        }

        let strands_field = format!("{}.{}", at, fields::COMPLEX_STRANDS);
        let names = entry
            .get(fields::COMPLEX_STRANDS)
            .ok_or_else(|| self.error(&strands_field, MalformedReason::Missing))?;
        let names = names
            .as_list()
            .ok_or_else(|| self.wrong_type(&strands_field, "list of strings", names))?;

        let mut strands = Vec::with_capacity(names.len());
        let mut lengths = Vec::with_capacity(names.len());
        for name in names {
            let name = name
                .as_str()
                .ok_or_else(|| self.wrong_type(&strands_field, "list of strings", name))?;
            let strand = config
                .molecular()
                .strand(name)
                .ok_or_else(|| {
                    self.error(&strands_field, MalformedReason::UnknownStrand(name.to_string()))
                })?;
            strands.push(name.to_string());
            lengths.push(strand.len());
        }

        let structure_field = format!("{}.{}", at, fields::COMPLEX_STRUCTURE);
        let notation = entry
            .get(fields::COMPLEX_STRUCTURE)
            .ok_or_else(|| self.error(&structure_field, MalformedReason::Missing))?;
        let notation = notation
            .as_str()
            .ok_or_else(|| self.wrong_type(&structure_field, "string", notation))?;
        let structure = Structure::parse(notation, false).map_err(|e| {
            self.error(&structure_field, MalformedReason::BadStructure(e.to_string()))
        })?;
        if structure.strand_lengths() != lengths.as_slice() {
            return Err(self.error(
                &structure_field,
                MalformedReason::Inconsistent(format!(
                    "structure strand lengths {:?} do not match strands {:?}",
                    structure.strand_lengths(),
                    lengths
                )),
            ));
        }

        Ok(ComplexState { strands, structure })
    }
}

fn count_value(value: &RawValue) -> Result<u64, MalformedReason> {
    match value {
        RawValue::Int(i) if *i >= 0 => Ok(*i as u64),
        RawValue::Int(i) => Err(MalformedReason::OutOfRange {
            value: i.to_string(),
            bound: ">= 0".to_string(),
        }),
        other => Err(MalformedReason::WrongType {
            expected: "integer",
            found: other.kind(),
        }),
    }
}

fn non_negative_value(value: &RawValue) -> Result<f64, MalformedReason> {
    let x = match value {
        RawValue::Float(x) => *x,
        RawValue::Int(i) => *i as f64,
        other => {
            return Err(MalformedReason::WrongType {
                expected: "number",
                found: other.kind(),
            })
        }
    };
    if !x.is_finite() || x < 0.0 {
        return Err(MalformedReason::OutOfRange {
            value: x.to_string(),
            bound: "finite and >= 0".to_string(),
        });
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strandsim_test_helpers::{fixtures, outcome};
    use strandsim_types::ValueKind;
    use tracing_test::traced_test;

    #[test]
    fn test_completed_outcome() {
        let config = fixtures::duplex_config();
        let raw = RawOutcome::from(
            outcome::completed(2, 0.25, "melted")
                .with("move_attempts", 400)
                .with("rejected_moves", 100)
                .with("seed", 7),
        );
        let record = record_outcome(&config, &raw).unwrap();

        assert_eq!(record.trajectory_index, TrajectoryIndex(2));
        assert_eq!(record.config, config.fingerprint());
        assert_eq!(record.termination, TerminationReason::StopCondition);
        assert_eq!(record.stop_tag.as_deref(), Some("melted"));
        assert_eq!(record.counters.acceptance_ratio(), Some(0.75));
        assert_eq!(record.seed, Some(7));
        assert!(record.completed());
    }

    #[test]
    fn test_undocumented_field_is_malformed() {
        let config = fixtures::duplex_config();
        let raw = RawOutcome::from(outcome::timed_out(0, 1.0).with("energy", -12.5));
        let err = record_outcome(&config, &raw).unwrap_err();

        assert_eq!(err.trajectory_index, Some(0));
        assert_eq!(err.field, "energy");
        assert_eq!(err.reason, MalformedReason::UndocumentedField);
    }

    #[test]
    fn test_unknown_termination_code() {
        let config = fixtures::duplex_config();
        let raw = RawOutcome::from(outcome::timed_out(1, 1.0).with("termination_code", 0x99));
        let err = record_outcome(&config, &raw).unwrap_err();

        assert_eq!(err.reason, MalformedReason::UnknownTerminationCode(0x99));
    }

    #[test]
    fn test_index_must_be_within_requested_count() {
        let config = fixtures::duplex_config();
        let n = config.num_simulations() as i64;
        let err =
            record_outcome(&config, &RawOutcome::from(outcome::timed_out(n, 1.0))).unwrap_err();

        assert_eq!(err.field, "trajectory_index");
        assert!(matches!(err.reason, MalformedReason::OutOfRange { .. }));
    }

    #[test]
    fn test_stop_tag_must_match_termination() {
        let config = fixtures::duplex_config();

        let raw = RawOutcome::from(outcome::timed_out(0, 1.0).with("stop_tag", "melted"));
        let err = record_outcome(&config, &raw).unwrap_err();
        assert!(matches!(err.reason, MalformedReason::Inconsistent(_)));

        let raw = RawOutcome::from(outcome::completed(0, 0.5, "frozen"));
        let err = record_outcome(&config, &raw).unwrap_err();
        assert_eq!(err.reason, MalformedReason::UnknownStopTag("frozen".into()));

        let raw = RawOutcome::from(outcome::timed_out(0, 1.0).with("termination_code", 0x11));
        let err = record_outcome(&config, &raw).unwrap_err();
        assert_eq!(err.reason, MalformedReason::Missing);
    }

    #[test]
    fn test_rejected_cannot_exceed_attempts() {
        let config = fixtures::duplex_config();
        let raw = RawOutcome::from(
            outcome::timed_out(0, 1.0)
                .with("move_attempts", 10)
                .with("rejected_moves", 11),
        );
        let err = record_outcome(&config, &raw).unwrap_err();
        assert_eq!(err.field, "rejected_moves");
    }

    #[test]
    fn test_wrong_type_reports_kind() {
        let config = fixtures::duplex_config();
        let raw = RawOutcome::from(outcome::timed_out(0, 1.0).with("elapsed_time", "long"));
        let err = record_outcome(&config, &raw).unwrap_err();

        assert_eq!(
            err.reason,
            MalformedReason::WrongType {
                expected: "number",
                found: ValueKind::String,
            }
        );
    }

    #[test]
    fn test_collision_rate_only_in_first_step_mode() {
        let config = fixtures::duplex_config();
        let raw = RawOutcome::from(outcome::timed_out(0, 1.0).with("collision_rate", 1e6));
        assert!(record_outcome(&config, &raw).is_err());

        let config = fixtures::association_config();
        let raw = RawOutcome::from(
            outcome::completed(0, 1e-3, "bound").with("collision_rate", 2.0e6),
        );
        let record = record_outcome(&config, &raw).unwrap();
        assert_eq!(record.collision_rate, Some(2.0e6));

        let raw = RawOutcome::from(outcome::completed(1, 1e-3, "bound"));
        let err = record_outcome(&config, &raw).unwrap_err();
        assert_eq!(err.field, "collision_rate");
    }

    #[test]
    fn test_snapshots_kept_in_trajectory_mode() {
        let config = fixtures::trajectory_config();
        let raw = RawOutcome::from(
            outcome::timed_out(0, 1.0).with("snapshots", outcome::snapshots(&[0.0, 0.5])),
        );
        let record = record_outcome(&config, &raw).unwrap();

        assert_eq!(record.snapshots.len(), 2);
        assert_eq!(record.snapshots[1].time, 0.5);
        assert_eq!(record.snapshots[0].complexes[0].strands, vec!["top", "bottom"]);
    }

    #[test]
    fn test_snapshot_times_must_be_ordered() {
        let config = fixtures::trajectory_config();
        let raw = RawOutcome::from(
            outcome::timed_out(0, 1.0).with("snapshots", outcome::snapshots(&[0.5, 0.1])),
        );
        let err = record_outcome(&config, &raw).unwrap_err();
        assert_eq!(err.field, "snapshots[1].time");
    }

    #[traced_test]
    #[test]
    fn test_snapshots_discarded_outside_trajectory_mode() {
        let config = fixtures::duplex_config();
        let raw = RawOutcome::from(
            outcome::timed_out(0, 1.0).with("snapshots", outcome::snapshots(&[0.0])),
        );
        let record = record_outcome(&config, &raw).unwrap();

        assert!(record.snapshots.is_empty());
        assert!(logs_contain("discarding snapshots"));
    }
}
