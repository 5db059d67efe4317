//! Molecular setup: named strands and the complexes they start in.

use serde::{Deserialize, Serialize};
use strandsim_types::Structure;

/// A named strand sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Strand {
    pub name: String,
    /// Upper-case bases.
    pub sequence: String,
}

impl Strand {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// A starting complex: an ordered list of strands and their structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Complex {
    pub name: String,
    /// Strand names in circular order.
    pub strands: Vec<String>,
    pub structure: Structure,
}

/// Strands and initial complexes, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MolecularSetup {
    strands: Vec<Strand>,
    complexes: Vec<Complex>,
}

impl MolecularSetup {
    pub(crate) fn new(strands: Vec<Strand>, complexes: Vec<Complex>) -> Self {
        Self { strands, complexes }
    }

    pub fn strands(&self) -> &[Strand] {
        &self.strands
    }

    pub fn complexes(&self) -> &[Complex] {
        &self.complexes
    }

    pub fn strand(&self, name: &str) -> Option<&Strand> {
        self.strands.iter().find(|s| s.name == name)
    }

    pub fn complex(&self, name: &str) -> Option<&Complex> {
        self.complexes.iter().find(|c| c.name == name)
    }
}
