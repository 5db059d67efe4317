//! Dot-paren secondary structure notation.
//!
//! A complex's structure is written one character per base: `.` unpaired,
//! `(` / `)` paired, with `+` separating consecutive strands. Target
//! structures for loose stop conditions may also use `*` for "don't care".
//!
//! ```text
//!   ((((+....))))     two strands, four base pairs across the break
//!   ....+....         two strands, no base pairs (disconnected)
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors in dot-paren notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("Invalid character {found:?} at position {position}")]
    InvalidCharacter { position: usize, found: char },

    #[error("Unmatched '(' at position {position}")]
    UnmatchedOpen { position: usize },

    #[error("Unmatched ')' at position {position}")]
    UnmatchedClose { position: usize },

    #[error("Strand {strand} has no bases")]
    EmptyStrand { strand: usize },
}

/// A parsed, well-formed structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Structure {
    /// The notation exactly as given.
    notation: String,
    /// Number of bases in each strand, in order.
    strand_lengths: Vec<usize>,
    /// Base pairs as (opening, closing) base indices, ignoring `+`.
    pairs: Vec<(usize, usize)>,
}

impl Structure {
    /// Parse dot-paren notation. `*` is accepted only when
    /// `allow_wildcard` is set.
    pub fn parse(notation: &str, allow_wildcard: bool) -> Result<Self, StructureError> {
        let mut strand_lengths = Vec::new();
        let mut current = 0usize;
        let mut base = 0usize;
        // (base index, character position) of unclosed '('
        let mut open: Vec<(usize, usize)> = Vec::new();
        let mut pairs = Vec::new();

        for (position, c) in notation.chars().enumerate() {
            match c {
                '.' => {}
                '*' if allow_wildcard => {}
                '(' => open.push((base, position)),
                ')' => {
                    let (opening, _) = open
                        .pop()
                        .ok_or(StructureError::UnmatchedClose { position })?;
                    pairs.push((opening, base));
                }
                '+' => {
                    if current == 0 {
                        return Err(StructureError::EmptyStrand {
                            strand: strand_lengths.len(),
                        });
                    }
                    strand_lengths.push(current);
                    current = 0;
                    continue;
                }
                found => return Err(StructureError::InvalidCharacter { position, found }),
            }
            current += 1;
            base += 1;
        }

        if let Some(&(_, position)) = open.first() {
            return Err(StructureError::UnmatchedOpen { position });
        }
        if current == 0 {
            return Err(StructureError::EmptyStrand {
                strand: strand_lengths.len(),
            });
        }
        strand_lengths.push(current);
        pairs.sort_unstable();

        Ok(Self {
            notation: notation.to_string(),
            strand_lengths,
            pairs,
        })
    }

    /// The all-unpaired structure for strands of the given lengths.
    pub fn unpaired(strand_lengths: &[usize]) -> Self {
        let notation = strand_lengths
            .iter()
            .map(|&len| ".".repeat(len))
            .collect::<Vec<_>>()
            .join("+");
        Self {
            notation,
            strand_lengths: strand_lengths.to_vec(),
            pairs: Vec::new(),
        }
    }

    pub fn notation(&self) -> &str {
        &self.notation
    }

    pub fn strand_count(&self) -> usize {
        self.strand_lengths.len()
    }

    pub fn strand_lengths(&self) -> &[usize] {
        &self.strand_lengths
    }

    /// Total number of bases across all strands.
    pub fn len(&self) -> usize {
        self.strand_lengths.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Whether every strand is joined to the others through base pairs.
    ///
    /// A single strand is always connected.
    pub fn is_connected(&self) -> bool {
        let n = self.strand_count();
        if n <= 1 {
            return true;
        }

        let strand_of = self.strand_index_table();
        let mut parent: Vec<usize> = (0..n).collect();

        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }

        for &(i, j) in &self.pairs {
            let a = find(&mut parent, strand_of[i]);
            let b = find(&mut parent, strand_of[j]);
            if a != b {
                parent[a] = b;
            }
        }

        let root = find(&mut parent, 0);
        (1..n).all(|s| find(&mut parent, s) == root)
    }

    /// Strand index for every base index.
    fn strand_index_table(&self) -> Vec<usize> {
        self.strand_lengths
            .iter()
            .enumerate()
            .flat_map(|(strand, &len)| std::iter::repeat(strand).take(len))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duplex() {
        let s = Structure::parse("((((+))))", false).unwrap();
        assert_eq!(s.strand_lengths(), &[4, 4]);
        assert_eq!(s.pairs().len(), 4);
        assert_eq!(s.pairs()[0], (0, 7));
        assert!(s.is_connected());
    }

    #[test]
    fn test_unbalanced() {
        assert_eq!(
            Structure::parse("((.)", false),
            Err(StructureError::UnmatchedOpen { position: 0 })
        );
        assert_eq!(
            Structure::parse("(.))", false),
            Err(StructureError::UnmatchedClose { position: 3 })
        );
    }

    #[test]
    fn test_empty_strands_rejected() {
        assert_eq!(
            Structure::parse("..++..", false),
            Err(StructureError::EmptyStrand { strand: 1 })
        );
        assert_eq!(
            Structure::parse("", false),
            Err(StructureError::EmptyStrand { strand: 0 })
        );
        assert_eq!(
            Structure::parse("..+", false),
            Err(StructureError::EmptyStrand { strand: 1 })
        );
    }

    #[test]
    fn test_wildcard_only_when_allowed() {
        assert_eq!(
            Structure::parse("(**)", false),
            Err(StructureError::InvalidCharacter {
                position: 1,
                found: '*'
            })
        );
        assert!(Structure::parse("(**)", true).is_ok());
    }

    #[test]
    fn test_disconnected_complexes() {
        // Strand 2 sits inside the 1-3 helix without pairing.
        let s = Structure::parse("(+...+)", false).unwrap();
        assert!(!s.is_connected());

        let s = Structure::parse("....+....", false).unwrap();
        assert!(!s.is_connected());

        let s = Structure::parse("((+))+((+))", false).unwrap();
        assert!(!s.is_connected());

        let s = Structure::parse("((+)(+))", false).unwrap();
        assert!(s.is_connected());
    }

    #[test]
    fn test_unpaired() {
        let s = Structure::unpaired(&[3, 2]);
        assert_eq!(s.notation(), "...+..");
        assert_eq!(s, Structure::parse("...+..", false).unwrap());
    }
}
