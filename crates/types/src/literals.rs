//! Literal registry: the closed vocabularies of a simulation configuration.
//!
//! Every enumerated setting (substrate, rate method, dangle treatment, stop
//! condition kind, Boltzmann sampling, simulation mode, termination reason)
//! is a Rust enum implementing [`Literal`]. Each member has a canonical name,
//! matched case-insensitively on input, and a stable numeric code that the
//! native kernel speaks.
//!
//! The registry is fixed at compile time. Adding a category means adding an
//! enum and a [`LiteralCategory`] variant; nothing is registered at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

/// A member of a closed, named value set.
pub trait Literal:
    Copy + Eq + fmt::Debug + IntoEnumIterator + Into<&'static str> + 'static
{
    /// The category this literal belongs to.
    const CATEGORY: LiteralCategory;

    /// Numeric code exchanged with the kernel.
    fn code(self) -> i64;

    /// Canonical name.
    fn name(self) -> &'static str {
        self.into()
    }

    /// Look up a member by numeric code.
    fn from_code(code: i64) -> Option<Self> {
        Self::iter().find(|literal| literal.code() == code)
    }

    /// Look up a member by name (ASCII case-insensitive, surrounding
    /// whitespace ignored).
    fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::iter().find(|literal| literal.name().eq_ignore_ascii_case(name))
    }

    /// Canonical names of every member, in declaration order.
    fn names() -> Vec<&'static str> {
        Self::iter().map(Literal::name).collect()
    }
}

macro_rules! literal_impls {
    ($ty:ty, $category:expr) => {
        impl Literal for $ty {
            const CATEGORY: LiteralCategory = $category;

            fn code(self) -> i64 {
                self as i64
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.name())
            }
        }
    };
}

/// Nucleic acid the strands are made of.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, IntoStaticStr, Serialize,
    Deserialize,
)]
#[repr(i64)]
pub enum SubstrateType {
    #[strum(serialize = "RNA")]
    #[serde(rename = "RNA")]
    Rna = 1,
    #[strum(serialize = "DNA")]
    #[serde(rename = "DNA")]
    Dna = 2,
}

impl SubstrateType {
    /// Bases allowed in a strand sequence.
    pub fn alphabet(self) -> &'static [u8] {
        match self {
            SubstrateType::Rna => b"ACGU",
            SubstrateType::Dna => b"ACGT",
        }
    }

    /// The base that belongs to the other substrate (`U` in DNA, `T` in RNA).
    pub fn foreign_base(self) -> u8 {
        match self {
            SubstrateType::Rna => b'T',
            SubstrateType::Dna => b'U',
        }
    }
}

literal_impls!(SubstrateType, LiteralCategory::SubstrateType);

/// Kinetic rate method used to turn energy differences into move rates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, IntoStaticStr, Serialize,
    Deserialize,
)]
#[repr(i64)]
pub enum RateMethod {
    Metropolis = 1,
    Kawasaki = 2,
    Arrhenius = 3,
}

literal_impls!(RateMethod, LiteralCategory::RateMethod);

/// How dangling-end energies are treated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, IntoStaticStr, Serialize,
    Deserialize,
)]
#[repr(i64)]
pub enum DangleMode {
    /// No dangle contributions.
    #[strum(serialize = "None")]
    #[serde(rename = "None")]
    Off = 0,
    /// Dangles on unpaired neighbors only.
    #[strum(serialize = "Some")]
    #[serde(rename = "Some")]
    Partial = 1,
    /// Dangles on every helix end.
    #[strum(serialize = "All")]
    #[serde(rename = "All")]
    Full = 2,
}

literal_impls!(DangleMode, LiteralCategory::DangleMode);

/// Predicate shape of a stop condition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, IntoStaticStr, Serialize,
    Deserialize,
)]
#[repr(i64)]
pub enum StopConditionKind {
    /// A complex with exactly these strands and this structure exists.
    Exact = 0,
    /// The listed strands are all in one complex.
    Bound = 1,
    /// A complex consisting of exactly the listed strands exists.
    Dissociation = 2,
    /// A structure within `distance` base pairs of the target exists.
    Loose = 3,
    /// At least `count` complexes with the listed strands exist.
    Count = 4,
    /// Simulated time reached a threshold.
    Time = 5,
}

impl StopConditionKind {
    /// Whether this kind matches against a target structure.
    pub fn requires_structure(self) -> bool {
        matches!(self, StopConditionKind::Exact | StopConditionKind::Loose)
    }

    /// Whether this kind references strands (directly or via a complex).
    pub fn references_strands(self) -> bool {
        !matches!(self, StopConditionKind::Time)
    }
}

literal_impls!(StopConditionKind, LiteralCategory::StopConditionKind);

/// Whether initial structures are Boltzmann-sampled by the kernel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, IntoStaticStr, Serialize,
    Deserialize,
)]
#[repr(i64)]
pub enum BoltzmannSampling {
    Disabled = 0,
    Enabled = 1,
}

literal_impls!(BoltzmannSampling, LiteralCategory::BoltzmannSampling);

/// What the kernel records while simulating.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, IntoStaticStr, Serialize,
    Deserialize,
)]
#[repr(i64)]
pub enum SimulationMode {
    /// Run until a stop condition (or ceiling); report only the end.
    FirstPassageTime = 0x0010,
    /// First passage from a forced bimolecular collision.
    FirstStep = 0x0030,
    /// Record intermediate states along the way.
    Trajectory = 0x0080,
    /// Record transitions between stop-condition states.
    Transition = 0x0100,
}

impl SimulationMode {
    /// Whether results keep intermediate state snapshots.
    pub fn records_snapshots(self) -> bool {
        matches!(self, SimulationMode::Trajectory)
    }

    /// Minimum number of stop conditions the mode needs to be meaningful.
    pub fn min_stop_conditions(self) -> usize {
        match self {
            SimulationMode::FirstPassageTime | SimulationMode::FirstStep => 1,
            SimulationMode::Transition => 2,
            SimulationMode::Trajectory => 0,
        }
    }
}

literal_impls!(SimulationMode, LiteralCategory::SimulationMode);

/// Why a trajectory ended.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, IntoStaticStr, Serialize,
    Deserialize,
)]
#[repr(i64)]
pub enum TerminationReason {
    StopCondition = 0x11,
    TimeLimit = 0x12,
    StepLimit = 0x13,
    KernelFailure = 0x14,
}

impl TerminationReason {
    /// True if the trajectory reached a stop condition.
    pub fn is_completion(self) -> bool {
        matches!(self, TerminationReason::StopCondition)
    }
}

literal_impls!(TerminationReason, LiteralCategory::TerminationReason);

/// The fixed set of literal categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, IntoStaticStr, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LiteralCategory {
    SubstrateType,
    RateMethod,
    DangleMode,
    StopConditionKind,
    BoltzmannSampling,
    SimulationMode,
    TerminationReason,
}

impl LiteralCategory {
    /// Canonical names of every member of this category.
    pub fn literals(self) -> Vec<&'static str> {
        match self {
            LiteralCategory::SubstrateType => SubstrateType::names(),
            LiteralCategory::RateMethod => RateMethod::names(),
            LiteralCategory::DangleMode => DangleMode::names(),
            LiteralCategory::StopConditionKind => StopConditionKind::names(),
            LiteralCategory::BoltzmannSampling => BoltzmannSampling::names(),
            LiteralCategory::SimulationMode => SimulationMode::names(),
            LiteralCategory::TerminationReason => TerminationReason::names(),
        }
    }

    /// Whether `value` names a member of this category.
    pub fn is_member(self, value: &str) -> bool {
        match self {
            LiteralCategory::SubstrateType => SubstrateType::parse(value).is_some(),
            LiteralCategory::RateMethod => RateMethod::parse(value).is_some(),
            LiteralCategory::DangleMode => DangleMode::parse(value).is_some(),
            LiteralCategory::StopConditionKind => StopConditionKind::parse(value).is_some(),
            LiteralCategory::BoltzmannSampling => BoltzmannSampling::parse(value).is_some(),
            LiteralCategory::SimulationMode => SimulationMode::parse(value).is_some(),
            LiteralCategory::TerminationReason => TerminationReason::parse(value).is_some(),
        }
    }

    /// Whether `code` is the numeric code of a member of this category.
    pub fn is_member_code(self, code: i64) -> bool {
        match self {
            LiteralCategory::SubstrateType => SubstrateType::from_code(code).is_some(),
            LiteralCategory::RateMethod => RateMethod::from_code(code).is_some(),
            LiteralCategory::DangleMode => DangleMode::from_code(code).is_some(),
            LiteralCategory::StopConditionKind => StopConditionKind::from_code(code).is_some(),
            LiteralCategory::BoltzmannSampling => BoltzmannSampling::from_code(code).is_some(),
            LiteralCategory::SimulationMode => SimulationMode::from_code(code).is_some(),
            LiteralCategory::TerminationReason => TerminationReason::from_code(code).is_some(),
        }
    }
}

impl fmt::Display for LiteralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &'static str = (*self).into();
        f.write_str(name)
    }
}

/// Every literal name in `category`.
pub fn literals_of(category: LiteralCategory) -> Vec<&'static str> {
    category.literals()
}

/// Whether `value` is a member of `category`.
pub fn is_member(category: LiteralCategory, value: &str) -> bool {
    category.is_member(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals_of_rate_method() {
        assert_eq!(
            literals_of(LiteralCategory::RateMethod),
            vec!["Metropolis", "Kawasaki", "Arrhenius"]
        );
        assert_eq!(literals_of(LiteralCategory::DangleMode), vec!["None", "Some", "All"]);
    }

    #[test]
    fn test_membership_is_case_insensitive() {
        assert!(is_member(LiteralCategory::SubstrateType, "dna"));
        assert!(is_member(LiteralCategory::SubstrateType, " RNA "));
        assert!(!is_member(LiteralCategory::SubstrateType, "PNA"));
        assert!(!is_member(LiteralCategory::RateMethod, "metro"));
    }

    #[test]
    fn test_codes_match_kernel_constants() {
        assert_eq!(SimulationMode::Trajectory.code(), 0x80);
        assert_eq!(SimulationMode::from_code(0x30), Some(SimulationMode::FirstStep));
        assert_eq!(TerminationReason::from_code(0x12), Some(TerminationReason::TimeLimit));
        assert_eq!(TerminationReason::from_code(0x99), None);
        assert!(LiteralCategory::SubstrateType.is_member_code(2));
        assert!(!LiteralCategory::SubstrateType.is_member_code(0));
    }

    #[test]
    fn test_codes_unique_within_category() {
        fn assert_unique<L: Literal>() {
            let mut codes: Vec<i64> = L::iter().map(Literal::code).collect();
            let len = codes.len();
            codes.sort_unstable();
            codes.dedup();
            assert_eq!(codes.len(), len, "duplicate code in {}", L::CATEGORY);
        }

        assert_unique::<SubstrateType>();
        assert_unique::<RateMethod>();
        assert_unique::<DangleMode>();
        assert_unique::<StopConditionKind>();
        assert_unique::<BoltzmannSampling>();
        assert_unique::<SimulationMode>();
        assert_unique::<TerminationReason>();
    }

    #[test]
    fn test_every_category_has_members() {
        for category in LiteralCategory::iter() {
            let names = category.literals();
            assert!(!names.is_empty(), "{} is empty", category);
            for name in names {
                assert!(category.is_member(name));
            }
        }
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&DangleMode::Partial).unwrap();
        assert_eq!(json, "\"Some\"");
        let parsed: SubstrateType = serde_json::from_str("\"DNA\"").unwrap();
        assert_eq!(parsed, SubstrateType::Dna);
        assert_eq!(LiteralCategory::StopConditionKind.to_string(), "stop_condition_kind");
    }
}
