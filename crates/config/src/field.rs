//! Documented top-level field names.
//!
//! This is the stable, serialization-agnostic enumeration of everything a
//! configuration carries. Callers assign raw values under these names; the
//! kernel pulls the fields it understands with
//! [`ConfigurationObject::get`](crate::ConfigurationObject::get).

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

/// A documented configuration field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, IntoStaticStr, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ExperimentTag,
    SubstrateType,
    Temperature,
    Sodium,
    Magnesium,
    Dangles,
    JoinConcentration,
    RateMethod,
    UnimolecularScaling,
    BimolecularScaling,
    ArrheniusAlpha,
    #[strum(serialize = "ln_a_stack")]
    #[serde(rename = "ln_a_stack")]
    LnAStack,
    #[strum(serialize = "e_stack")]
    #[serde(rename = "e_stack")]
    EStack,
    #[strum(serialize = "ln_a_loop")]
    #[serde(rename = "ln_a_loop")]
    LnALoop,
    #[strum(serialize = "e_loop")]
    #[serde(rename = "e_loop")]
    ELoop,
    #[strum(serialize = "ln_a_end")]
    #[serde(rename = "ln_a_end")]
    LnAEnd,
    #[strum(serialize = "e_end")]
    #[serde(rename = "e_end")]
    EEnd,
    #[strum(serialize = "ln_a_stack_loop")]
    #[serde(rename = "ln_a_stack_loop")]
    LnAStackLoop,
    #[strum(serialize = "e_stack_loop")]
    #[serde(rename = "e_stack_loop")]
    EStackLoop,
    #[strum(serialize = "ln_a_stack_end")]
    #[serde(rename = "ln_a_stack_end")]
    LnAStackEnd,
    #[strum(serialize = "e_stack_end")]
    #[serde(rename = "e_stack_end")]
    EStackEnd,
    #[strum(serialize = "ln_a_loop_end")]
    #[serde(rename = "ln_a_loop_end")]
    LnALoopEnd,
    #[strum(serialize = "e_loop_end")]
    #[serde(rename = "e_loop_end")]
    ELoopEnd,
    #[strum(serialize = "ln_a_stack_stack")]
    #[serde(rename = "ln_a_stack_stack")]
    LnAStackStack,
    #[strum(serialize = "e_stack_stack")]
    #[serde(rename = "e_stack_stack")]
    EStackStack,
    NumSimulations,
    SimulationTime,
    MaxSteps,
    MaxWallTime,
    OutputInterval,
    OutputTime,
    SimulationMode,
    BoltzmannSampling,
    InitialSeed,
    Strands,
    Complexes,
    StopConditions,
}

impl Field {
    /// The documented field name.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Look up a field by its documented name (exact match).
    pub fn parse(name: &str) -> Option<Self> {
        Self::iter().find(|field| field.name() == name)
    }

    /// All fields in documentation order.
    pub fn all() -> impl Iterator<Item = Field> {
        Self::iter()
    }

    /// Whether this field is a rate-model constant whose presence is
    /// governed by the rate method.
    pub fn is_rate_constant(self) -> bool {
        matches!(
            self,
            Field::UnimolecularScaling
                | Field::BimolecularScaling
                | Field::ArrheniusAlpha
                | Field::LnAStack
                | Field::EStack
                | Field::LnALoop
                | Field::ELoop
                | Field::LnAEnd
                | Field::EEnd
                | Field::LnAStackLoop
                | Field::EStackLoop
                | Field::LnAStackEnd
                | Field::EStackEnd
                | Field::LnALoopEnd
                | Field::ELoopEnd
                | Field::LnAStackStack
                | Field::EStackStack
        )
    }

    /// Every rate-model constant field.
    pub fn rate_constants() -> impl Iterator<Item = Field> {
        Self::iter().filter(|field| field.is_rate_constant())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_snake_case() {
        assert_eq!(Field::NumSimulations.name(), "num_simulations");
        assert_eq!(Field::LnAStackLoop.name(), "ln_a_stack_loop");
        assert_eq!(Field::EEnd.name(), "e_end");
        assert_eq!(Field::parse("stop_conditions"), Some(Field::StopConditions));
        assert_eq!(Field::parse("StopConditions"), None);
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<_> = Field::all().map(Field::name).collect();
        let len = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), len);
    }

    #[test]
    fn test_rate_constants() {
        assert_eq!(Field::rate_constants().count(), 17);
        assert!(!Field::Temperature.is_rate_constant());
    }
}
