//! Parameter validation.
//!
//! [`validate`] turns raw field assignments into a [`ConfigurationObject`]
//! or a [`ValidationReport`]. Validation is eager: every field is checked
//! and every violation is collected before returning, so a caller preparing
//! a long run sees the whole list at once. Construction is all-or-nothing;
//! no object exists unless the report would have been empty.
//!
//! # Order of checks
//!
//! 1. Unrecognized top-level names
//! 2. Scalar kinetic parameters
//! 3. Rate method and its exact constant set
//! 4. Execution parameters
//! 5. Strands, then complexes (structures checked against sequences)
//! 6. Stop conditions (shape, references, structures)
//! 7. Simulation mode against stop conditions, complexes and output options

use crate::coerce;
use crate::config::{ExecutionParameters, KineticParameters};
use crate::error::{Bound, ValidationError, ValidationReport};
use crate::molecular::{Complex, MolecularSetup, Strand};
use crate::stop::{Predicate, StopCondition, StrandSelector};
use crate::{ConfigurationObject, Field, RateModel};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use strandsim_types::{
    BoltzmannSampling, DangleMode, Literal, RateMethod, RawFields, RawValue, SimulationMode,
    StopConditionKind, Structure, SubstrateType,
};
use tracing::{debug, warn};

/// Experiment tag used when none is given.
pub const DEFAULT_EXPERIMENT_TAG: &str = "experiment";
/// 37 °C.
pub const DEFAULT_TEMPERATURE: f64 = 310.15;
pub const DEFAULT_SODIUM: f64 = 1.0;
pub const DEFAULT_MAGNESIUM: f64 = 0.0;
pub const DEFAULT_JOIN_CONCENTRATION: f64 = 1.0;
pub const DEFAULT_NUM_SIMULATIONS: u64 = 1;
pub const DEFAULT_SIMULATION_TIME: f64 = 10.0;

/// Keys a complex entry may carry.
const COMPLEX_KEYS: &[&str] = &["strands", "structure"];

/// Keys a stop-condition entry may carry.
const STOP_CONDITION_KEYS: &[&str] = &[
    "kind",
    "strands",
    "complex",
    "structure",
    "count",
    "distance",
    "time",
];

/// Validate raw field assignments into an immutable configuration.
pub fn validate(raw: &RawFields) -> Result<ConfigurationObject, ValidationReport> {
    Validator::new(raw).run()
}

/// Names declared under `strands`, with lengths of those that validated.
#[derive(Default)]
struct DeclaredStrands {
    names: Vec<String>,
    lengths: HashMap<String, usize>,
}

impl DeclaredStrands {
    fn lengths_of(&self, names: &[String]) -> Option<Vec<usize>> {
        names.iter().map(|n| self.lengths.get(n).copied()).collect()
    }
}

/// Names declared under `complexes`, with the strand lists of those that
/// validated.
#[derive(Default)]
struct DeclaredComplexes {
    names: Vec<String>,
    strands: HashMap<String, Vec<String>>,
}

struct Validator<'a> {
    raw: &'a RawFields,
    errors: Vec<ValidationError>,
}

impl<'a> Validator<'a> {
    fn new(raw: &'a RawFields) -> Self {
        Self {
            raw,
            errors: Vec::new(),
        }
    }

    fn report(&mut self, error: ValidationError) {
        debug!(%error, "configuration violation");
        self.errors.push(error);
    }

    /// Record the error, if any, and yield the value otherwise.
    fn check<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.report(error);
                None
            }
        }
    }

    fn field(&self, field: Field) -> Option<&'a RawValue> {
        self.raw.get(field.name())
    }

    /// A field that falls back to `default` when absent. `None` means the
    /// given value was invalid.
    fn with_default<T>(
        &mut self,
        field: Field,
        default: T,
        parse: impl FnOnce(&str, &RawValue) -> Result<T, ValidationError>,
    ) -> Option<T> {
        match self.field(field) {
            None => Some(default),
            Some(value) => self.check(parse(field.name(), value)),
        }
    }

    /// A field that may be absent. The outer `None` means the given value
    /// was invalid.
    fn optional<T>(
        &mut self,
        field: Field,
        parse: impl FnOnce(&str, &RawValue) -> Result<T, ValidationError>,
    ) -> Option<Option<T>> {
        match self.field(field) {
            None => Some(None),
            Some(value) => self.check(parse(field.name(), value)).map(Some),
        }
    }

    fn run(mut self) -> Result<ConfigurationObject, ValidationReport> {
        self.check_field_names();

        let experiment_tag = self.with_default(
            Field::ExperimentTag,
            DEFAULT_EXPERIMENT_TAG.to_string(),
            |f, v| coerce::non_empty_string(f, v).map(|s| s.trim().to_string()),
        );

        // Kinetics
        let substrate_type = self.with_default(
            Field::SubstrateType,
            SubstrateType::Dna,
            coerce::literal::<SubstrateType>,
        );
        let temperature =
            self.with_default(Field::Temperature, DEFAULT_TEMPERATURE, coerce::positive_float);
        let sodium = self.with_default(Field::Sodium, DEFAULT_SODIUM, coerce::non_negative_float);
        let magnesium =
            self.with_default(Field::Magnesium, DEFAULT_MAGNESIUM, coerce::non_negative_float);
        let dangles = self.with_default(
            Field::Dangles,
            DangleMode::Partial,
            coerce::literal::<DangleMode>,
        );
        let join_concentration = self.with_default(
            Field::JoinConcentration,
            DEFAULT_JOIN_CONCENTRATION,
            coerce::positive_float,
        );
        let rate_model = self.rate_model();

        // Execution
        let mode = self.with_default(
            Field::SimulationMode,
            SimulationMode::FirstPassageTime,
            coerce::literal::<SimulationMode>,
        );
        let num_simulations = self.with_default(
            Field::NumSimulations,
            DEFAULT_NUM_SIMULATIONS,
            |f, v| coerce::integer_at_least(f, v, 1),
        );
        let simulation_time = self.with_default(
            Field::SimulationTime,
            DEFAULT_SIMULATION_TIME,
            coerce::positive_float,
        );
        let max_steps = self.optional(Field::MaxSteps, |f, v| coerce::integer_at_least(f, v, 1));
        let max_wall_time = self.optional(Field::MaxWallTime, coerce::positive_float);
        let output_interval =
            self.optional(Field::OutputInterval, |f, v| coerce::integer_at_least(f, v, 1));
        let output_time = self.optional(Field::OutputTime, coerce::positive_float);
        let boltzmann_sampling = self.with_default(
            Field::BoltzmannSampling,
            BoltzmannSampling::Disabled,
            coerce::literal::<BoltzmannSampling>,
        );
        let initial_seed =
            self.optional(Field::InitialSeed, |f, v| coerce::integer_at_least(f, v, 0));

        // Molecular setup
        let (declared_strands, strands) = self.strands(substrate_type);
        let (declared_complexes, complexes) = self.complexes(&declared_strands);
        let (stop_condition_count, stop_conditions) =
            self.stop_conditions(&declared_strands, &declared_complexes, simulation_time);

        if let Some(mode) = mode {
            self.check_mode(mode, stop_condition_count, declared_complexes.names.len());
        }

        let (
            Some(experiment_tag),
            Some(substrate_type),
            Some(temperature),
            Some(sodium),
            Some(magnesium),
            Some(dangles),
            Some(join_concentration),
            Some(rate_model),
            Some(mode),
            Some(num_simulations),
            Some(simulation_time),
            Some(max_steps),
            Some(max_wall_time),
            Some(output_interval),
            Some(output_time),
            Some(boltzmann_sampling),
            Some(initial_seed),
            Some(strands),
            Some(complexes),
            Some(stop_conditions),
        ) = (
            experiment_tag,
            substrate_type,
            temperature,
            sodium,
            magnesium,
            dangles,
            join_concentration,
            rate_model,
            mode,
            num_simulations,
            simulation_time,
            max_steps,
            max_wall_time,
            output_interval,
            output_time,
            boltzmann_sampling,
            initial_seed,
            strands,
            complexes,
            stop_conditions,
        )
        else {
            debug!(errors = self.errors.len(), "configuration rejected");
            return Err(ValidationReport::new(self.errors));
        };

        if !self.errors.is_empty() {
            debug!(errors = self.errors.len(), "configuration rejected");
            return Err(ValidationReport::new(self.errors));
        }

        let config = ConfigurationObject::freeze(
            experiment_tag,
            MolecularSetup::new(strands, complexes),
            KineticParameters {
                substrate_type,
                temperature,
                sodium,
                magnesium,
                dangles,
                join_concentration,
                rate_model,
            },
            ExecutionParameters {
                mode,
                num_simulations,
                simulation_time,
                max_steps,
                max_wall_time,
                output_interval,
                output_time,
                boltzmann_sampling,
                initial_seed,
            },
            stop_conditions,
        );

        debug!(
            tag = config.experiment_tag(),
            fingerprint = %config.fingerprint().short(),
            mode = %config.mode(),
            trajectories = config.num_simulations(),
            "configuration validated"
        );

        Ok(config)
    }

    fn check_field_names(&mut self) {
        let unknown: Vec<String> = self
            .raw
            .names()
            .filter(|name| Field::parse(name).is_none())
            .map(str::to_string)
            .collect();
        for name in unknown {
            self.report(ValidationError::unknown("config", &name));
        }
    }

    fn rate_model(&mut self) -> Option<RateModel> {
        let method = self.with_default(
            Field::RateMethod,
            RateMethod::Metropolis,
            coerce::literal::<RateMethod>,
        );
        let required = method.map(RateModel::required_constants);
        let method_name = method.map(|m| m.name()).unwrap_or_default();

        let mut constants = BTreeMap::new();
        let mut complete = true;

        for field in Field::rate_constants() {
            let is_required = required.as_ref().map(|r| r.contains(&field));
            match (is_required, self.field(field)) {
                (Some(false), Some(_)) => {
                    self.report(ValidationError::inconsistent(
                        &[Field::RateMethod.name(), field.name()],
                        format!("{} is not a {} constant", field, method_name),
                    ));
                    complete = false;
                }
                (Some(true), None) => {
                    self.report(ValidationError::inconsistent(
                        &[Field::RateMethod.name(), field.name()],
                        format!("{} requires {}", method_name, field),
                    ));
                    complete = false;
                }
                (_, Some(value)) => {
                    let parsed = if RateModel::requires_positive(field) {
                        coerce::positive_float(field.name(), value)
                    } else {
                        coerce::float(field.name(), value)
                    };
                    match self.check(parsed) {
                        Some(x) => {
                            constants.insert(field, x);
                        }
                        None => complete = false,
                    }
                }
                (_, None) => {}
            }
        }

        if !complete {
            return None;
        }
        RateModel::from_constants(method?, &constants)
    }

    /// A required, non-empty map field.
    fn required_map(&mut self, field: Field) -> Option<&'a IndexMap<String, RawValue>> {
        let Some(value) = self.field(field) else {
            self.report(ValidationError::out_of_range(
                field.name(),
                Bound::NonEmpty,
                "missing",
            ));
            return None;
        };
        let entries = self.check(coerce::map(field.name(), value))?;
        if entries.is_empty() {
            self.report(ValidationError::out_of_range(
                field.name(),
                Bound::NonEmpty,
                "{}",
            ));
            return None;
        }
        Some(entries)
    }

    fn strands(
        &mut self,
        substrate: Option<SubstrateType>,
    ) -> (DeclaredStrands, Option<Vec<Strand>>) {
        let mut declared = DeclaredStrands::default();
        let Some(entries) = self.required_map(Field::Strands) else {
            return (declared, None);
        };

        let mut strands = Vec::with_capacity(entries.len());
        let mut complete = true;

        for (name, value) in entries {
            declared.names.push(name.clone());
            let field = format!("strands.{}", name);
            if name.trim().is_empty() {
                self.report(ValidationError::out_of_range(
                    Field::Strands.name(),
                    Bound::NonEmpty,
                    "\"\" (strand name)",
                ));
                complete = false;
                continue;
            }
            match self.sequence(&field, value, substrate) {
                Some(sequence) => {
                    declared.lengths.insert(name.clone(), sequence.len());
                    strands.push(Strand {
                        name: name.clone(),
                        sequence,
                    });
                }
                None => complete = false,
            }
        }

        (declared, complete.then_some(strands))
    }

    fn sequence(
        &mut self,
        field: &str,
        value: &RawValue,
        substrate: Option<SubstrateType>,
    ) -> Option<String> {
        let sequence = self
            .check(coerce::non_empty_string(field, value))?
            .trim()
            .to_ascii_uppercase();

        if let Some(substrate) = substrate {
            if let Some(base) = sequence
                .bytes()
                .find(|b| !substrate.alphabet().contains(b))
            {
                let error = if base == substrate.foreign_base() {
                    ValidationError::inconsistent(
                        &[field, Field::SubstrateType.name()],
                        format!("base '{}' is not valid in {}", base as char, substrate),
                    )
                } else {
                    ValidationError::out_of_range(field, Bound::Alphabet(substrate), &sequence)
                };
                self.report(error);
                return None;
            }
        }

        Some(sequence)
    }

    fn complexes(
        &mut self,
        strands: &DeclaredStrands,
    ) -> (DeclaredComplexes, Option<Vec<Complex>>) {
        let mut declared = DeclaredComplexes::default();
        let Some(entries) = self.required_map(Field::Complexes) else {
            return (declared, None);
        };

        let mut complexes = Vec::with_capacity(entries.len());
        let mut complete = true;

        for (name, value) in entries {
            declared.names.push(name.clone());
            match self.complex(name, value, strands) {
                Some(complex) => {
                    declared
                        .strands
                        .insert(name.clone(), complex.strands.clone());
                    complexes.push(complex);
                }
                None => complete = false,
            }
        }

        (declared, complete.then_some(complexes))
    }

    fn complex(
        &mut self,
        name: &str,
        value: &RawValue,
        strands: &DeclaredStrands,
    ) -> Option<Complex> {
        let base = format!("complexes.{}", name);
        let entry = self.check(coerce::map(&base, value))?;
        let mut complete = self.check_keys(&base, entry, COMPLEX_KEYS);

        let strands_field = format!("{}.strands", base);
        let names = self.strand_list(&strands_field, entry.get("strands"), strands);

        let structure_field = format!("{}.structure", base);
        let structure = match entry.get("structure") {
            Some(value) => self.structure(&structure_field, value, false),
            None => Some(None),
        };

        let (Some(names), Some(structure)) = (names, structure) else {
            return None;
        };
        let lengths = strands.lengths_of(&names)?;

        let structure = match structure {
            Some(structure) => {
                complete &= self.check_structure_fits(
                    &structure,
                    &lengths,
                    &structure_field,
                    &strands_field,
                );
                structure
            }
            None => Structure::unpaired(&lengths),
        };

        if !structure.is_connected() {
            warn!(
                complex = name,
                structure = structure.notation(),
                "starting complex has strands not joined by any base pair"
            );
        }

        complete.then(|| Complex {
            name: name.to_string(),
            strands: names,
            structure,
        })
    }

    /// Report keys outside `allowed`. Returns false if any were found.
    fn check_keys(
        &mut self,
        base: &str,
        entry: &IndexMap<String, RawValue>,
        allowed: &[&str],
    ) -> bool {
        let mut clean = true;
        for key in entry.keys() {
            if !allowed.contains(&key.as_str()) {
                self.report(ValidationError::unknown(base, key));
                clean = false;
            }
        }
        clean
    }

    /// A required, non-empty list of declared strand names.
    fn strand_list(
        &mut self,
        field: &str,
        value: Option<&RawValue>,
        strands: &DeclaredStrands,
    ) -> Option<Vec<String>> {
        let Some(value) = value else {
            self.report(ValidationError::out_of_range(field, Bound::NonEmpty, "missing"));
            return None;
        };
        let names = self.check(coerce::string_list(field, value))?;
        if names.is_empty() {
            self.report(ValidationError::out_of_range(field, Bound::NonEmpty, "[]"));
            return None;
        }

        let mut known = true;
        for name in &names {
            if !strands.names.contains(name) {
                self.report(ValidationError::unknown(field, name));
                known = false;
            }
        }
        known.then_some(names)
    }

    /// Parse a structure. The outer `None` means the value was invalid.
    fn structure(
        &mut self,
        field: &str,
        value: &RawValue,
        allow_wildcard: bool,
    ) -> Option<Option<Structure>> {
        let notation = self.check(coerce::string(field, value))?;
        match Structure::parse(notation, allow_wildcard) {
            Ok(structure) => Some(Some(structure)),
            Err(error) => {
                self.report(ValidationError::out_of_range(
                    field,
                    Bound::DotParen,
                    format!("{:?} ({})", notation, error),
                ));
                None
            }
        }
    }

    /// Check strand count and per-strand lengths of a structure against
    /// the sequences it is written for.
    fn check_structure_fits(
        &mut self,
        structure: &Structure,
        lengths: &[usize],
        structure_field: &str,
        strands_field: &str,
    ) -> bool {
        if structure.strand_count() != lengths.len() {
            self.report(ValidationError::inconsistent(
                &[structure_field, strands_field],
                format!(
                    "structure has {} strand(s) but {} are listed",
                    structure.strand_count(),
                    lengths.len()
                ),
            ));
            return false;
        }
        if structure.strand_lengths() != lengths {
            self.report(ValidationError::inconsistent(
                &[structure_field, strands_field],
                format!(
                    "structure strand lengths {:?} do not match sequence lengths {:?}",
                    structure.strand_lengths(),
                    lengths
                ),
            ));
            return false;
        }
        true
    }

    /// Returns the number of declared conditions (valid or not, `None` if
    /// the field itself is malformed) and the validated list.
    fn stop_conditions(
        &mut self,
        strands: &DeclaredStrands,
        complexes: &DeclaredComplexes,
        simulation_time: Option<f64>,
    ) -> (Option<usize>, Option<Vec<StopCondition>>) {
        let Some(value) = self.field(Field::StopConditions) else {
            return (Some(0), Some(Vec::new()));
        };
        let Some(entries) = self.check(coerce::map(Field::StopConditions.name(), value)) else {
            return (None, None);
        };

        let mut conditions = Vec::with_capacity(entries.len());
        let mut complete = true;
        for (tag, value) in entries {
            match self.stop_condition(tag, value, strands, complexes, simulation_time) {
                Some(condition) => conditions.push(condition),
                None => complete = false,
            }
        }

        (Some(entries.len()), complete.then_some(conditions))
    }

    fn stop_condition(
        &mut self,
        tag: &str,
        value: &RawValue,
        strands: &DeclaredStrands,
        complexes: &DeclaredComplexes,
        simulation_time: Option<f64>,
    ) -> Option<StopCondition> {
        let base = format!("stop_conditions.{}", tag);
        let entry = self.check(coerce::map(&base, value))?;
        let mut complete = self.check_keys(&base, entry, STOP_CONDITION_KEYS);
        let at = |key: &str| format!("{}.{}", base, key);

        let kind_field = at("kind");
        let kind = match entry.get("kind") {
            Some(kind_value) => {
                self.check(coerce::literal::<StopConditionKind>(&kind_field, kind_value))
            }
            None => {
                self.report(ValidationError::out_of_range(
                    &kind_field,
                    Bound::NonEmpty,
                    "missing",
                ));
                None
            }
        };
        let Some(kind) = kind else {
            self.check_without_kind(&base, entry, strands, complexes);
            return None;
        };

        // Keys this kind must not carry.
        let mut forbidden: Vec<&str> = Vec::new();
        if !kind.references_strands() {
            forbidden.extend(["strands", "complex"]);
        }
        if !kind.requires_structure() {
            forbidden.push("structure");
        }
        if kind != StopConditionKind::Count {
            forbidden.push("count");
        }
        if kind != StopConditionKind::Loose {
            forbidden.push("distance");
        }
        if kind != StopConditionKind::Time {
            forbidden.push("time");
        }
        for key in forbidden {
            if entry.contains_key(key) {
                self.report(ValidationError::inconsistent(
                    &[kind_field.as_str(), at(key).as_str()],
                    format!("{} conditions do not take '{}'", kind, key),
                ));
                complete = false;
            }
        }

        // Strand selector and the strand names it resolves to.
        let (selector, selector_field, resolved) = if kind.references_strands() {
            match self.selector(&base, entry, strands, complexes) {
                Some((selector, field, resolved)) => (Some(selector), field, resolved),
                None => {
                    complete = false;
                    (None, String::new(), None)
                }
            }
        } else {
            (None, String::new(), None)
        };

        let structure_field = at("structure");
        let structure = if kind.requires_structure() {
            match entry.get("structure") {
                Some(value) => {
                    let allow_wildcard = kind == StopConditionKind::Loose;
                    self.structure(&structure_field, value, allow_wildcard)
                        .flatten()
                }
                None => {
                    self.report(ValidationError::inconsistent(
                        &[kind_field.as_str(), structure_field.as_str()],
                        format!("{} conditions need a target structure", kind),
                    ));
                    None
                }
            }
        } else {
            None
        };

        if let (Some(structure), Some(names)) = (&structure, &resolved) {
            if let Some(lengths) = strands.lengths_of(names) {
                complete &= self.check_structure_fits(
                    structure,
                    &lengths,
                    &structure_field,
                    &selector_field,
                );
            }
        }

        let predicate = match kind {
            StopConditionKind::Exact => Predicate::Exact {
                selector: selector?,
                structure: structure?,
            },
            StopConditionKind::Bound => Predicate::Bound {
                selector: selector?,
            },
            StopConditionKind::Dissociation => Predicate::Dissociation {
                selector: selector?,
            },
            StopConditionKind::Loose => {
                let distance = self.required_count(&kind_field, &base, "distance", entry, 0);
                Predicate::Loose {
                    selector: selector?,
                    structure: structure?,
                    distance: distance?,
                }
            }
            StopConditionKind::Count => {
                let count = self.required_count(&kind_field, &base, "count", entry, 1);
                Predicate::Count {
                    selector: selector?,
                    count: count?,
                }
            }
            StopConditionKind::Time => {
                let threshold =
                    self.time_threshold(&kind_field, &at("time"), entry, simulation_time);
                Predicate::Time {
                    threshold: threshold?,
                }
            }
        };

        complete.then(|| StopCondition {
            tag: tag.to_string(),
            predicate,
        })
    }

    /// Exactly one of `strands` / `complex`, resolved against the
    /// declarations. Returns the selector, the field it came from and the
    /// resolved strand names (when resolvable).
    fn selector(
        &mut self,
        base: &str,
        entry: &IndexMap<String, RawValue>,
        strands: &DeclaredStrands,
        complexes: &DeclaredComplexes,
    ) -> Option<(StrandSelector, String, Option<Vec<String>>)> {
        let strands_field = format!("{}.strands", base);
        let complex_field = format!("{}.complex", base);

        match (entry.get("strands"), entry.get("complex")) {
            (Some(_), Some(_)) => {
                self.report(ValidationError::inconsistent(
                    &[strands_field.as_str(), complex_field.as_str()],
                    "give either strands or complex, not both",
                ));
                None
            }
            (None, None) => {
                self.report(ValidationError::inconsistent(
                    &[format!("{}.kind", base).as_str(), strands_field.as_str()],
                    "condition needs strands or a complex",
                ));
                None
            }
            (Some(value), None) => {
                let names = self.strand_list(&strands_field, Some(value), strands)?;
                Some((
                    StrandSelector::Strands(names.clone()),
                    strands_field,
                    Some(names),
                ))
            }
            (None, Some(value)) => {
                let name = self.check(coerce::string(&complex_field, value))?;
                if !complexes.names.iter().any(|n| n == name) {
                    self.report(ValidationError::unknown(&complex_field, name));
                    return None;
                }
                let resolved = complexes.strands.get(name).cloned();
                Some((
                    StrandSelector::Complex(name.to_string()),
                    complex_field,
                    resolved,
                ))
            }
        }
    }

    /// The checks of a stop condition that hold whatever its kind, for
    /// entries whose kind could not be read.
    fn check_without_kind(
        &mut self,
        base: &str,
        entry: &IndexMap<String, RawValue>,
        strands: &DeclaredStrands,
        complexes: &DeclaredComplexes,
    ) {
        let at = |key: &str| format!("{}.{}", base, key);

        if let Some(value) = entry.get("strands") {
            self.strand_list(&at("strands"), Some(value), strands);
        }
        if let Some(value) = entry.get("complex") {
            let field = at("complex");
            if let Some(name) = self.check(coerce::string(&field, value)) {
                if !complexes.names.iter().any(|n| n == name) {
                    self.report(ValidationError::unknown(&field, name));
                }
            }
        }
        if let Some(value) = entry.get("structure") {
            self.structure(&at("structure"), value, true);
        }
        if let Some(value) = entry.get("count") {
            self.check(coerce::integer_at_least(&at("count"), value, 1));
        }
        if let Some(value) = entry.get("distance") {
            self.check(coerce::integer_at_least(&at("distance"), value, 0));
        }
        if let Some(value) = entry.get("time") {
            self.check(coerce::positive_float(&at("time"), value));
        }
    }

    /// A required integer key of a stop condition, at least `min`.
    fn required_count(
        &mut self,
        kind_field: &str,
        base: &str,
        key: &str,
        entry: &IndexMap<String, RawValue>,
        min: i64,
    ) -> Option<u64> {
        let field = format!("{}.{}", base, key);
        match entry.get(key) {
            Some(value) => self.check(coerce::integer_at_least(&field, value, min)),
            None => {
                self.report(ValidationError::inconsistent(
                    &[kind_field, field.as_str()],
                    format!("condition needs '{}'", key),
                ));
                None
            }
        }
    }

    fn time_threshold(
        &mut self,
        kind_field: &str,
        field: &str,
        entry: &IndexMap<String, RawValue>,
        simulation_time: Option<f64>,
    ) -> Option<f64> {
        let Some(value) = entry.get("time") else {
            self.report(ValidationError::inconsistent(
                &[kind_field, field],
                "Time conditions need a threshold",
            ));
            return None;
        };
        let threshold = self.check(coerce::positive_float(field, value))?;
        if let Some(ceiling) = simulation_time {
            if threshold > ceiling {
                self.report(ValidationError::inconsistent(
                    &[field, Field::SimulationTime.name()],
                    format!(
                        "threshold {} s is beyond the simulation time ceiling {} s",
                        threshold, ceiling
                    ),
                ));
                return None;
            }
        }
        Some(threshold)
    }

    fn check_mode(
        &mut self,
        mode: SimulationMode,
        stop_conditions: Option<usize>,
        complexes: usize,
    ) {
        let mode_field = Field::SimulationMode.name();

        if let Some(stop_conditions) =
            stop_conditions.filter(|&n| n < mode.min_stop_conditions())
        {
            self.report(ValidationError::inconsistent(
                &[mode_field, Field::StopConditions.name()],
                format!(
                    "{} mode needs at least {} stop condition(s), {} given",
                    mode,
                    mode.min_stop_conditions(),
                    stop_conditions
                ),
            ));
        }

        if mode == SimulationMode::FirstStep && complexes != 2 {
            self.report(ValidationError::inconsistent(
                &[mode_field, Field::Complexes.name()],
                format!(
                    "FirstStep mode starts from exactly 2 complexes, {} given",
                    complexes
                ),
            ));
        }

        if !mode.records_snapshots() {
            for field in [Field::OutputInterval, Field::OutputTime] {
                if self.field(field).is_some() {
                    self.report(ValidationError::inconsistent(
                        &[mode_field, field.name()],
                        format!("{} only applies in Trajectory mode", field),
                    ));
                }
            }
        }
    }
}
