//! Configuration-time error types.

use std::fmt;
use strandsim_types::{LiteralCategory, SubstrateType, ValueKind};
use thiserror::Error;

/// The type a field expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Integer,
    Float,
    String,
    StringList,
    Map,
    Literal(LiteralCategory),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Integer => f.write_str("integer"),
            Expected::Float => f.write_str("number"),
            Expected::String => f.write_str("string"),
            Expected::StringList => f.write_str("list of strings"),
            Expected::Map => f.write_str("map"),
            Expected::Literal(category) => {
                write!(f, "{} ({})", category, category.literals().join(" | "))
            }
        }
    }
}

/// The bound a value violated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Strictly greater than zero.
    Positive,
    /// Zero or greater.
    NonNegative,
    /// Integer at least this large.
    AtLeast(i64),
    /// No NaN or infinity.
    Finite,
    /// At least one element / character.
    NonEmpty,
    /// Only bases of this substrate.
    Alphabet(SubstrateType),
    /// Well-formed dot-paren structure.
    DotParen,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Positive => f.write_str("> 0"),
            Bound::NonNegative => f.write_str(">= 0"),
            Bound::AtLeast(n) => write!(f, ">= {}", n),
            Bound::Finite => f.write_str("finite"),
            Bound::NonEmpty => f.write_str("non-empty"),
            Bound::Alphabet(substrate) => write!(
                f,
                "bases in {{{}}}",
                String::from_utf8_lossy(substrate.alphabet())
            ),
            Bound::DotParen => f.write_str("dot-paren notation"),
        }
    }
}

fn describe_mismatch(expected: &Expected, found: &ValueKind) -> String {
    match (expected, found) {
        (Expected::Literal(category), ValueKind::String) => format!(
            "name is not a {} member (one of {})",
            category,
            category.literals().join(" | ")
        ),
        (Expected::Literal(category), ValueKind::Integer) => format!(
            "code is not a {} member (one of {})",
            category,
            category.literals().join(" | ")
        ),
        _ => format!("expected {}, found {}", expected, found),
    }
}

/// Discriminant of [`ValidationError`], for grouping and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValidationErrorKind {
    TypeMismatch,
    OutOfRange,
    InconsistentConfiguration,
    UnknownReference,
}

/// One violation found while validating raw fields.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A value had the wrong shape and no recognized coercion applies.
    #[error("{field}: {}", describe_mismatch(.expected, .found))]
    TypeMismatch {
        field: String,
        expected: Expected,
        found: ValueKind,
    },

    /// A value was of the right type but outside its allowed range.
    #[error("{field}: {value} is out of range (must be {bound})")]
    OutOfRange {
        field: String,
        bound: Bound,
        value: String,
    },

    /// Two or more fields contradict each other.
    #[error("inconsistent configuration [{}]: {reason}", fields.join(", "))]
    InconsistentConfiguration { fields: Vec<String>, reason: String },

    /// A name refers to something that was never declared.
    #[error("{field}: unknown reference {name:?}")]
    UnknownReference { field: String, name: String },
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            ValidationError::TypeMismatch { .. } => ValidationErrorKind::TypeMismatch,
            ValidationError::OutOfRange { .. } => ValidationErrorKind::OutOfRange,
            ValidationError::InconsistentConfiguration { .. } => {
                ValidationErrorKind::InconsistentConfiguration
            }
            ValidationError::UnknownReference { .. } => ValidationErrorKind::UnknownReference,
        }
    }

    /// The field the error is reported against. For inconsistencies this is
    /// the first of the conflicting fields.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::TypeMismatch { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::UnknownReference { field, .. } => field,
            ValidationError::InconsistentConfiguration { fields, .. } => {
                fields.first().map(String::as_str).unwrap_or_default()
            }
        }
    }

    /// Whether the error mentions `field` anywhere.
    pub fn involves(&self, field: &str) -> bool {
        match self {
            ValidationError::InconsistentConfiguration { fields, .. } => {
                fields.iter().any(|f| f == field)
            }
            _ => self.field() == field,
        }
    }

    pub(crate) fn inconsistent(fields: &[&str], reason: impl Into<String>) -> Self {
        ValidationError::InconsistentConfiguration {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(field: &str, bound: Bound, value: impl fmt::Display) -> Self {
        ValidationError::OutOfRange {
            field: field.to_string(),
            bound,
            value: value.to_string(),
        }
    }

    pub(crate) fn unknown(field: &str, name: &str) -> Self {
        ValidationError::UnknownReference {
            field: field.to_string(),
            name: name.to_string(),
        }
    }
}

/// Every violation found in one validation pass, in discovery order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Number of errors of the given kind.
    pub fn count(&self, kind: ValidationErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind() == kind).count()
    }

    /// Errors reported against (or involving) `field`.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| e.involves(field))
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} configuration error(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

impl IntoIterator for ValidationReport {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_field_and_bound() {
        let err = ValidationError::out_of_range("temperature", Bound::Positive, -5.0);
        assert_eq!(err.to_string(), "temperature: -5 is out of range (must be > 0)");
        assert_eq!(err.kind(), ValidationErrorKind::OutOfRange);

        let err = ValidationError::inconsistent(&["rate_method", "arrhenius_alpha"], "not used");
        assert_eq!(err.field(), "rate_method");
        assert!(err.involves("arrhenius_alpha"));
    }

    #[test]
    fn test_expected_literal_lists_members() {
        let expected = Expected::Literal(LiteralCategory::SubstrateType);
        assert_eq!(expected.to_string(), "substrate_type (RNA | DNA)");
        assert_eq!(Bound::Alphabet(SubstrateType::Dna).to_string(), "bases in {ACGT}");
    }

    #[test]
    fn test_unknown_literal_name_reads_as_non_member() {
        let err = ValidationError::TypeMismatch {
            field: "substrate_type".into(),
            expected: Expected::Literal(LiteralCategory::SubstrateType),
            found: ValueKind::String,
        };
        assert_eq!(
            err.to_string(),
            "substrate_type: name is not a substrate_type member (one of RNA | DNA)"
        );

        let err = ValidationError::TypeMismatch {
            field: "substrate_type".into(),
            expected: Expected::Literal(LiteralCategory::SubstrateType),
            found: ValueKind::List,
        };
        assert_eq!(
            err.to_string(),
            "substrate_type: expected substrate_type (RNA | DNA), found list"
        );
    }

    #[test]
    fn test_report_counts() {
        let report = ValidationReport::new(vec![
            ValidationError::unknown("stop_conditions.done.strands", "ghost"),
            ValidationError::out_of_range("sodium", Bound::NonNegative, -1),
            ValidationError::unknown("config", "tempreature"),
        ]);

        assert_eq!(report.len(), 3);
        assert_eq!(report.count(ValidationErrorKind::UnknownReference), 2);
        assert_eq!(report.for_field("sodium").count(), 1);
        assert!(report.to_string().starts_with("3 configuration error(s)"));
    }
}
