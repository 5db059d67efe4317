//! The immutable configuration object.

use crate::{Field, MolecularSetup, RateModel, StopCondition};
use serde::Serialize;
use std::hash::{Hash, Hasher};
use strandsim_types::{
    BoltzmannSampling, DangleMode, Fingerprint, RawFields, RawValue, SimulationMode,
    SubstrateType,
};

/// Thermodynamic and kinetic model parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KineticParameters {
    pub substrate_type: SubstrateType,
    /// Kelvin.
    pub temperature: f64,
    /// Molar.
    pub sodium: f64,
    /// Molar.
    pub magnesium: f64,
    pub dangles: DangleMode,
    /// Molar concentration used for bimolecular join rates.
    pub join_concentration: f64,
    pub rate_model: RateModel,
}

/// How many trajectories to run and when each one stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionParameters {
    pub mode: SimulationMode,
    pub num_simulations: u64,
    /// Simulated-time ceiling per trajectory, seconds.
    pub simulation_time: f64,
    /// Step ceiling per trajectory.
    pub max_steps: Option<u64>,
    /// Real-time ceiling per trajectory, seconds.
    pub max_wall_time: Option<f64>,
    /// Trajectory mode: snapshot every N steps.
    pub output_interval: Option<u64>,
    /// Trajectory mode: snapshot every T simulated seconds.
    pub output_time: Option<f64>,
    pub boltzmann_sampling: BoltzmannSampling,
    pub initial_seed: Option<u64>,
}

/// One validated experiment.
///
/// Only [`validate`](crate::validate) constructs these. Every field is
/// read-only, so a single object can be shared (behind an `Arc`) by any
/// number of concurrent trajectory workers without locking. Equality and
/// hashing cover the full content, making the object usable as a cache key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigurationObject {
    experiment_tag: String,
    molecular: MolecularSetup,
    kinetics: KineticParameters,
    execution: ExecutionParameters,
    stop_conditions: Vec<StopCondition>,
    #[serde(skip)]
    fingerprint: Fingerprint,
}

// Validated floats are finite and never negative zero, so numeric equality
// coincides with bitwise equality.
impl Eq for ConfigurationObject {}

impl Hash for ConfigurationObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint.hash(state);
    }
}

impl ConfigurationObject {
    pub(crate) fn freeze(
        experiment_tag: String,
        molecular: MolecularSetup,
        kinetics: KineticParameters,
        execution: ExecutionParameters,
        stop_conditions: Vec<StopCondition>,
    ) -> Self {
        let mut config = Self {
            experiment_tag,
            molecular,
            kinetics,
            execution,
            stop_conditions,
            fingerprint: Fingerprint::ZERO,
        };
        config.fingerprint = Fingerprint::from_bytes(&config.to_raw_fields().canonical_bytes());
        config
    }

    pub fn experiment_tag(&self) -> &str {
        &self.experiment_tag
    }

    /// Content digest; also the identifier stored in result records.
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn molecular(&self) -> &MolecularSetup {
        &self.molecular
    }

    pub fn kinetics(&self) -> &KineticParameters {
        &self.kinetics
    }

    pub fn execution(&self) -> &ExecutionParameters {
        &self.execution
    }

    pub fn mode(&self) -> SimulationMode {
        self.execution.mode
    }

    pub fn num_simulations(&self) -> u64 {
        self.execution.num_simulations
    }

    pub fn stop_conditions(&self) -> &[StopCondition] {
        &self.stop_conditions
    }

    pub fn stop_condition(&self, tag: &str) -> Option<&StopCondition> {
        self.stop_conditions.iter().find(|c| c.tag == tag)
    }

    /// Value of a documented field, or `None` if the field does not apply
    /// (an optional ceiling left unset, or a constant of another rate
    /// method).
    pub fn get(&self, field: Field) -> Option<RawValue> {
        let kinetics = &self.kinetics;
        let execution = &self.execution;
        let value = match field {
            Field::ExperimentTag => self.experiment_tag.clone().into(),
            Field::SubstrateType => kinetics.substrate_type.to_string().into(),
            Field::Temperature => kinetics.temperature.into(),
            Field::Sodium => kinetics.sodium.into(),
            Field::Magnesium => kinetics.magnesium.into(),
            Field::Dangles => kinetics.dangles.to_string().into(),
            Field::JoinConcentration => kinetics.join_concentration.into(),
            Field::RateMethod => kinetics.rate_model.method().to_string().into(),
            field if field.is_rate_constant() => kinetics.rate_model.constant(field)?.into(),
            Field::NumSimulations => RawValue::Int(execution.num_simulations as i64),
            Field::SimulationTime => execution.simulation_time.into(),
            Field::MaxSteps => RawValue::Int(execution.max_steps? as i64),
            Field::MaxWallTime => execution.max_wall_time?.into(),
            Field::OutputInterval => RawValue::Int(execution.output_interval? as i64),
            Field::OutputTime => execution.output_time?.into(),
            Field::SimulationMode => execution.mode.to_string().into(),
            Field::BoltzmannSampling => execution.boltzmann_sampling.to_string().into(),
            Field::InitialSeed => RawValue::Int(execution.initial_seed? as i64),
            Field::Strands => RawValue::map(
                self.molecular
                    .strands()
                    .iter()
                    .map(|s| (s.name.clone(), RawValue::from(s.sequence.clone()))),
            ),
            Field::Complexes => RawValue::map(self.molecular.complexes().iter().map(|c| {
                (
                    c.name.clone(),
                    RawValue::map([
                        ("strands", RawValue::list(c.strands.iter().cloned())),
                        ("structure", c.structure.notation().into()),
                    ]),
                )
            })),
            Field::StopConditions => RawValue::map(
                self.stop_conditions
                    .iter()
                    .map(|c| (c.tag.clone(), c.to_raw())),
            ),
            _ => return None,
        };
        Some(value)
    }

    /// Every applicable field, in documentation order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, RawValue)> + '_ {
        Field::all().filter_map(move |field| self.get(field).map(|value| (field, value)))
    }

    /// The complete, explicit raw form of this configuration. Validating it
    /// again yields an equal object.
    pub fn to_raw_fields(&self) -> RawFields {
        self.fields()
            .map(|(field, value)| (field.name().to_string(), value))
            .collect()
    }
}
