//! Stop conditions: named predicates over the simulated system state.

use serde::{Deserialize, Serialize};
use strandsim_types::{RawValue, StopConditionKind, Structure};

/// Which strands a predicate is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrandSelector {
    /// An explicit, ordered list of strand names.
    Strands(Vec<String>),
    /// The strands of a declared starting complex.
    Complex(String),
}

/// The predicate a stop condition tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    Exact {
        selector: StrandSelector,
        structure: Structure,
    },
    Bound {
        selector: StrandSelector,
    },
    Dissociation {
        selector: StrandSelector,
    },
    Loose {
        selector: StrandSelector,
        structure: Structure,
        distance: u64,
    },
    Count {
        selector: StrandSelector,
        count: u64,
    },
    Time {
        threshold: f64,
    },
}

impl Predicate {
    pub fn kind(&self) -> StopConditionKind {
        match self {
            Predicate::Exact { .. } => StopConditionKind::Exact,
            Predicate::Bound { .. } => StopConditionKind::Bound,
            Predicate::Dissociation { .. } => StopConditionKind::Dissociation,
            Predicate::Loose { .. } => StopConditionKind::Loose,
            Predicate::Count { .. } => StopConditionKind::Count,
            Predicate::Time { .. } => StopConditionKind::Time,
        }
    }

    pub fn selector(&self) -> Option<&StrandSelector> {
        match self {
            Predicate::Exact { selector, .. }
            | Predicate::Bound { selector }
            | Predicate::Dissociation { selector }
            | Predicate::Loose { selector, .. }
            | Predicate::Count { selector, .. } => Some(selector),
            Predicate::Time { .. } => None,
        }
    }

    pub fn structure(&self) -> Option<&Structure> {
        match self {
            Predicate::Exact { structure, .. } | Predicate::Loose { structure, .. } => {
                Some(structure)
            }
            _ => None,
        }
    }
}

/// A tagged stop condition. The tag is what results report when the
/// condition fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopCondition {
    pub tag: String,
    pub predicate: Predicate,
}

impl StopCondition {
    pub fn kind(&self) -> StopConditionKind {
        self.predicate.kind()
    }

    /// The raw map this condition was validated from, in canonical form.
    pub fn to_raw(&self) -> RawValue {
        let mut entries: Vec<(&str, RawValue)> = vec![("kind", self.kind().to_string().into())];

        match self.predicate.selector() {
            Some(StrandSelector::Strands(names)) => {
                entries.push(("strands", RawValue::list(names.iter().cloned())));
            }
            Some(StrandSelector::Complex(name)) => {
                entries.push(("complex", name.clone().into()));
            }
            None => {}
        }
        if let Some(structure) = self.predicate.structure() {
            entries.push(("structure", structure.notation().into()));
        }
        match &self.predicate {
            Predicate::Loose { distance, .. } => {
                entries.push(("distance", RawValue::Int(*distance as i64)));
            }
            Predicate::Count { count, .. } => {
                entries.push(("count", RawValue::Int(*count as i64)));
            }
            Predicate::Time { threshold } => {
                entries.push(("time", RawValue::Float(*threshold)));
            }
            _ => {}
        }

        RawValue::map(entries)
    }
}
