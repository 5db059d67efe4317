//! Kinetic rate models and the constants each one needs.
//!
//! Each rate method defines an exact set of constants. A configuration
//! carries precisely that set: extra constants from another method are as
//! much an error as missing ones.

use crate::Field;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strandsim_types::RateMethod;
use strum::{EnumIter, IntoEnumIterator};

/// Local nearest-neighbor context of an Arrhenius move.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LocalContext {
    Stack,
    Loop,
    End,
    StackLoop,
    StackEnd,
    LoopEnd,
    StackStack,
}

impl LocalContext {
    /// Field holding the log pre-exponential factor for this context.
    pub fn ln_a_field(self) -> Field {
        match self {
            LocalContext::Stack => Field::LnAStack,
            LocalContext::Loop => Field::LnALoop,
            LocalContext::End => Field::LnAEnd,
            LocalContext::StackLoop => Field::LnAStackLoop,
            LocalContext::StackEnd => Field::LnAStackEnd,
            LocalContext::LoopEnd => Field::LnALoopEnd,
            LocalContext::StackStack => Field::LnAStackStack,
        }
    }

    /// Field holding the activation energy for this context.
    pub fn e_field(self) -> Field {
        match self {
            LocalContext::Stack => Field::EStack,
            LocalContext::Loop => Field::ELoop,
            LocalContext::End => Field::EEnd,
            LocalContext::StackLoop => Field::EStackLoop,
            LocalContext::StackEnd => Field::EStackEnd,
            LocalContext::LoopEnd => Field::ELoopEnd,
            LocalContext::StackStack => Field::EStackStack,
        }
    }
}

/// Arrhenius parameters for one local context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrheniusTerm {
    /// Natural log of the pre-exponential factor.
    pub ln_a: f64,
    /// Activation energy (kcal/mol).
    pub e: f64,
}

/// A validated rate model with exactly the constants its method defines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RateModel {
    Metropolis {
        unimolecular_scaling: f64,
        bimolecular_scaling: f64,
    },
    Kawasaki {
        unimolecular_scaling: f64,
        bimolecular_scaling: f64,
    },
    Arrhenius {
        bimolecular_scaling: f64,
        alpha: f64,
        terms: BTreeMap<LocalContext, ArrheniusTerm>,
    },
}

impl RateModel {
    /// Constants the given method requires, in documentation order.
    pub fn required_constants(method: RateMethod) -> Vec<Field> {
        match method {
            RateMethod::Metropolis | RateMethod::Kawasaki => {
                vec![Field::UnimolecularScaling, Field::BimolecularScaling]
            }
            RateMethod::Arrhenius => {
                let mut fields = vec![Field::BimolecularScaling, Field::ArrheniusAlpha];
                for context in LocalContext::iter() {
                    fields.push(context.ln_a_field());
                    fields.push(context.e_field());
                }
                fields
            }
        }
    }

    /// Whether `field` must be strictly positive (scaling factors) rather
    /// than merely finite (Arrhenius terms).
    pub fn requires_positive(field: Field) -> bool {
        matches!(
            field,
            Field::UnimolecularScaling | Field::BimolecularScaling | Field::ArrheniusAlpha
        )
    }

    /// Assemble a model from already-validated constants.
    ///
    /// Returns `None` if any required constant is missing.
    pub fn from_constants(method: RateMethod, constants: &BTreeMap<Field, f64>) -> Option<Self> {
        let get = |field: Field| constants.get(&field).copied();
        match method {
            RateMethod::Metropolis => Some(RateModel::Metropolis {
                unimolecular_scaling: get(Field::UnimolecularScaling)?,
                bimolecular_scaling: get(Field::BimolecularScaling)?,
            }),
            RateMethod::Kawasaki => Some(RateModel::Kawasaki {
                unimolecular_scaling: get(Field::UnimolecularScaling)?,
                bimolecular_scaling: get(Field::BimolecularScaling)?,
            }),
            RateMethod::Arrhenius => {
                let mut terms = BTreeMap::new();
                for context in LocalContext::iter() {
                    terms.insert(
                        context,
                        ArrheniusTerm {
                            ln_a: get(context.ln_a_field())?,
                            e: get(context.e_field())?,
                        },
                    );
                }
                Some(RateModel::Arrhenius {
                    bimolecular_scaling: get(Field::BimolecularScaling)?,
                    alpha: get(Field::ArrheniusAlpha)?,
                    terms,
                })
            }
        }
    }

    pub fn method(&self) -> RateMethod {
        match self {
            RateModel::Metropolis { .. } => RateMethod::Metropolis,
            RateModel::Kawasaki { .. } => RateMethod::Kawasaki,
            RateModel::Arrhenius { .. } => RateMethod::Arrhenius,
        }
    }

    pub fn bimolecular_scaling(&self) -> f64 {
        match self {
            RateModel::Metropolis {
                bimolecular_scaling,
                ..
            }
            | RateModel::Kawasaki {
                bimolecular_scaling,
                ..
            }
            | RateModel::Arrhenius {
                bimolecular_scaling,
                ..
            } => *bimolecular_scaling,
        }
    }

    /// Unimolecular scaling, for the methods that have one.
    pub fn unimolecular_scaling(&self) -> Option<f64> {
        match self {
            RateModel::Metropolis {
                unimolecular_scaling,
                ..
            }
            | RateModel::Kawasaki {
                unimolecular_scaling,
                ..
            } => Some(*unimolecular_scaling),
            RateModel::Arrhenius { .. } => None,
        }
    }

    /// Value of a constant field, if this model defines it.
    pub fn constant(&self, field: Field) -> Option<f64> {
        match (self, field) {
            (_, Field::BimolecularScaling) => Some(self.bimolecular_scaling()),
            (_, Field::UnimolecularScaling) => self.unimolecular_scaling(),
            (RateModel::Arrhenius { alpha, .. }, Field::ArrheniusAlpha) => Some(*alpha),
            (RateModel::Arrhenius { terms, .. }, field) => terms.iter().find_map(|(ctx, term)| {
                if ctx.ln_a_field() == field {
                    Some(term.ln_a)
                } else if ctx.e_field() == field {
                    Some(term.e)
                } else {
                    None
                }
            }),
            _ => None,
        }
    }

    /// Every constant with its value, in documentation order.
    pub fn constants(&self) -> Vec<(Field, f64)> {
        Self::required_constants(self.method())
            .into_iter()
            .filter_map(|field| self.constant(field).map(|value| (field, value)))
            .collect()
    }
}
