//! Sampling of single synthetic trajectories.

use crate::config::SyntheticKernelConfig;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use strandsim_config::{ConfigurationObject, Predicate, StopCondition};
use strandsim_results::{fields, RawOutcome};
use strandsim_types::{Literal, RawValue, SimulationMode, TerminationReason};

/// Snapshots per trajectory are capped at this many.
const MAX_SNAPSHOTS: usize = 10_000;

/// How a sampled trajectory ends.
#[derive(Debug, Clone, PartialEq)]
enum Ending {
    Stop(String),
    StepLimit,
    TimeLimit,
}

impl Ending {
    fn reason(&self) -> TerminationReason {
        match self {
            Ending::Stop(_) => TerminationReason::StopCondition,
            Ending::StepLimit => TerminationReason::StepLimit,
            Ending::TimeLimit => TerminationReason::TimeLimit,
        }
    }
}

/// Draws the outcome of trajectory `i` of one experiment.
///
/// Each trajectory has its own `ChaCha8Rng` seeded from the experiment
/// seed plus its index, so outcomes do not depend on scheduling order.
pub struct TrajectorySampler<'a> {
    kernel: &'a SyntheticKernelConfig,
    config: &'a ConfigurationObject,
}

impl<'a> TrajectorySampler<'a> {
    pub fn new(kernel: &'a SyntheticKernelConfig, config: &'a ConfigurationObject) -> Self {
        Self { kernel, config }
    }

    /// Seed of trajectory `index`, kept within the non-negative integer
    /// range outcomes can carry.
    pub fn seed_for(&self, index: u64) -> u64 {
        let base = self
            .config
            .execution()
            .initial_seed
            .unwrap_or(self.kernel.seed);
        base.wrapping_add(index) & i64::MAX as u64
    }

    pub fn sample(&self, index: u64) -> RawOutcome {
        let seed = self.seed_for(index);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        // Inverse-CDF draw; 1 - u is in (0, 1].
        let u: f64 = rng.gen();
        let passage = -self.kernel.mean_completion_time * (1.0 - u).ln();
        let (elapsed, ending) = self.ending(passage, &mut rng);

        let execution = self.config.execution();
        let move_attempts = match (&ending, execution.max_steps) {
            (Ending::StepLimit, Some(max_steps)) => max_steps,
            _ => (elapsed * self.kernel.moves_per_second).round() as u64,
        };
        let rejected_moves = (move_attempts as f64 * self.kernel.rejection_ratio).floor() as u64;

        let mut outcome = RawOutcome::new()
            .with(fields::TRAJECTORY_INDEX, index as i64)
            .with(fields::TERMINATION_CODE, ending.reason().code())
            .with(fields::ELAPSED_TIME, elapsed)
            .with(fields::MOVE_ATTEMPTS, move_attempts as i64)
            .with(fields::REJECTED_MOVES, rejected_moves.min(move_attempts) as i64)
            .with(fields::SEED, seed as i64);

        if let Ending::Stop(tag) = &ending {
            outcome = outcome.with(fields::STOP_TAG, tag.as_str());
        }
        if self.config.mode() == SimulationMode::FirstStep {
            let kinetics = self.config.kinetics();
            let rate = kinetics.rate_model.bimolecular_scaling()
                * kinetics.join_concentration
                * rng.gen_range(0.5..1.5);
            outcome = outcome.with(fields::COLLISION_RATE, rate);
        }
        if self.config.mode().records_snapshots() {
            outcome = outcome.with(fields::SNAPSHOTS, self.snapshots(elapsed));
        }

        outcome
    }

    /// The earliest of: a structural stop condition at `passage`, the
    /// earliest time condition, the step ceiling, the time ceiling. Stop
    /// conditions win ties.
    fn ending(&self, passage: f64, rng: &mut impl Rng) -> (f64, Ending) {
        let execution = self.config.execution();
        let mut end = (execution.simulation_time, Ending::TimeLimit);

        if let Some(max_steps) = execution.max_steps {
            let t = max_steps as f64 / self.kernel.moves_per_second;
            if t < end.0 {
                end = (t, Ending::StepLimit);
            }
        }

        let timer = self
            .config
            .stop_conditions()
            .iter()
            .filter_map(|c| match c.predicate {
                Predicate::Time { threshold } => Some((threshold, &c.tag)),
                _ => None,
            })
            .min_by(|a, b| a.0.total_cmp(&b.0));
        if let Some((t, tag)) = timer {
            if t <= end.0 {
                end = (t, Ending::Stop(tag.clone()));
            }
        }

        let structural: Vec<&StopCondition> = self
            .config
            .stop_conditions()
            .iter()
            .filter(|c| !matches!(c.predicate, Predicate::Time { .. }))
            .collect();
        if !structural.is_empty() && passage <= end.0 {
            end = (passage, Ending::Stop(self.pick(&structural, rng)));
        }

        end
    }

    fn pick(&self, conditions: &[&StopCondition], rng: &mut impl Rng) -> String {
        let first = conditions.len() == 1 || rng.gen::<f64>() < self.kernel.success_probability;
        let chosen = if first {
            conditions[0]
        } else {
            conditions[1 + rng.gen_range(0..conditions.len() - 1)]
        };
        chosen.tag.clone()
    }

    /// Starting complexes at regular intervals up to `elapsed`.
    fn snapshots(&self, elapsed: f64) -> RawValue {
        let execution = self.config.execution();
        let interval = execution
            .output_time
            .or_else(|| {
                execution
                    .output_interval
                    .map(|steps| steps as f64 / self.kernel.moves_per_second)
            })
            .unwrap_or(elapsed);

        let complexes = RawValue::list(self.config.molecular().complexes().iter().map(|c| {
            RawValue::map([
                ("strands", RawValue::list(c.strands.iter().cloned())),
                ("structure", RawValue::from(c.structure.notation())),
            ])
        }));

        let mut times = vec![0.0];
        if interval > 0.0 {
            let mut k = 1u64;
            while times.len() < MAX_SNAPSHOTS {
                let t = k as f64 * interval;
                if t > elapsed {
                    break;
                }
                times.push(t);
                k += 1;
            }
        }

        RawValue::list(times.into_iter().map(|time| {
            RawValue::map([
                (fields::SNAPSHOT_TIME, RawValue::from(time)),
                (fields::SNAPSHOT_COMPLEXES, complexes.clone()),
            ])
        }))
    }
}
