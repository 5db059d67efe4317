//! Recognized coercions from raw values to typed values.
//!
//! Only these conversions are performed:
//!
//! - integer → float
//! - integral float → integer
//! - literal name (string) or literal code (integer) → literal
//!
//! Anything else is a type mismatch. Range checks are separate.

use crate::error::{Bound, Expected, ValidationError};
use indexmap::IndexMap;
use strandsim_types::{Literal, RawValue};

fn mismatch(field: &str, expected: Expected, found: &RawValue) -> ValidationError {
    ValidationError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: found.kind(),
    }
}

/// Collapse negative zero so bitwise equality matches numeric equality.
pub(crate) fn normalize(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x
    }
}

/// A finite float.
pub(crate) fn float(field: &str, value: &RawValue) -> Result<f64, ValidationError> {
    let x = match value {
        RawValue::Float(x) => *x,
        RawValue::Int(i) => *i as f64,
        other => return Err(mismatch(field, Expected::Float, other)),
    };
    if !x.is_finite() {
        return Err(ValidationError::out_of_range(field, Bound::Finite, x));
    }
    Ok(normalize(x))
}

/// A float strictly greater than zero.
pub(crate) fn positive_float(field: &str, value: &RawValue) -> Result<f64, ValidationError> {
    let x = float(field, value)?;
    if x <= 0.0 {
        return Err(ValidationError::out_of_range(field, Bound::Positive, x));
    }
    Ok(x)
}

/// A float greater than or equal to zero.
pub(crate) fn non_negative_float(field: &str, value: &RawValue) -> Result<f64, ValidationError> {
    let x = float(field, value)?;
    if x < 0.0 {
        return Err(ValidationError::out_of_range(field, Bound::NonNegative, x));
    }
    Ok(x)
}

/// An integer. Floats are accepted only when integral and in range.
pub(crate) fn integer(field: &str, value: &RawValue) -> Result<i64, ValidationError> {
    match value {
        RawValue::Int(i) => Ok(*i),
        RawValue::Float(x)
            if x.is_finite() && x.fract() == 0.0 && x.abs() < i64::MAX as f64 =>
        {
            Ok(*x as i64)
        }
        other => Err(mismatch(field, Expected::Integer, other)),
    }
}

/// An integer no smaller than `min`, returned unsigned.
pub(crate) fn integer_at_least(
    field: &str,
    value: &RawValue,
    min: i64,
) -> Result<u64, ValidationError> {
    let i = integer(field, value)?;
    if i < min {
        let bound = if min == 0 {
            Bound::NonNegative
        } else {
            Bound::AtLeast(min)
        };
        return Err(ValidationError::out_of_range(field, bound, i));
    }
    Ok(i as u64)
}

/// A string.
pub(crate) fn string<'a>(field: &str, value: &'a RawValue) -> Result<&'a str, ValidationError> {
    value
        .as_str()
        .ok_or_else(|| mismatch(field, Expected::String, value))
}

/// A non-empty (after trimming) string.
pub(crate) fn non_empty_string<'a>(
    field: &str,
    value: &'a RawValue,
) -> Result<&'a str, ValidationError> {
    let s = string(field, value)?;
    if s.trim().is_empty() {
        return Err(ValidationError::out_of_range(field, Bound::NonEmpty, "\"\""));
    }
    Ok(s)
}

/// A literal, by name or by numeric code.
pub(crate) fn literal<L: Literal>(field: &str, value: &RawValue) -> Result<L, ValidationError> {
    let parsed = match value {
        RawValue::Str(name) => L::parse(name),
        RawValue::Int(code) => L::from_code(*code),
        _ => None,
    };
    parsed.ok_or_else(|| mismatch(field, Expected::Literal(L::CATEGORY), value))
}

/// A map.
pub(crate) fn map<'a>(
    field: &str,
    value: &'a RawValue,
) -> Result<&'a IndexMap<String, RawValue>, ValidationError> {
    value
        .as_map()
        .ok_or_else(|| mismatch(field, Expected::Map, value))
}

/// A list whose every element is a string.
pub(crate) fn string_list(field: &str, value: &RawValue) -> Result<Vec<String>, ValidationError> {
    let items = value
        .as_list()
        .ok_or_else(|| mismatch(field, Expected::StringList, value))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| mismatch(field, Expected::StringList, item))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrorKind;
    use strandsim_types::{RateMethod, SimulationMode, ValueKind};

    #[test]
    fn test_int_widens_to_float() {
        assert_eq!(float("temperature", &RawValue::Int(300)), Ok(300.0));
        assert_eq!(normalize(-0.0).to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn test_integral_float_narrows_to_int() {
        assert_eq!(integer("num_simulations", &RawValue::Float(12.0)), Ok(12));
        let err = integer("num_simulations", &RawValue::Float(12.5)).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::TypeMismatch);
    }

    #[test]
    fn test_string_is_not_a_number() {
        let err = float("sodium", &RawValue::from("0.5")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                field: "sodium".into(),
                expected: Expected::Float,
                found: ValueKind::String,
            }
        );
    }

    #[test]
    fn test_literal_by_name_or_code() {
        assert_eq!(
            literal::<RateMethod>("rate_method", &RawValue::from("kawasaki")),
            Ok(RateMethod::Kawasaki)
        );
        assert_eq!(
            literal::<SimulationMode>("simulation_mode", &RawValue::Int(0x80)),
            Ok(SimulationMode::Trajectory)
        );
        assert!(literal::<RateMethod>("rate_method", &RawValue::from("glauber")).is_err());
        assert!(literal::<RateMethod>("rate_method", &RawValue::Float(1.0)).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = float("temperature", &RawValue::Float(f64::NAN)).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::OutOfRange);
    }

    #[test]
    fn test_string_list_rejects_mixed() {
        let value = RawValue::List(vec!["a".into(), RawValue::Int(1)]);
        assert!(string_list("complexes.c.strands", &value).is_err());
        let value = RawValue::list(["a", "b"]);
        assert_eq!(
            string_list("complexes.c.strands", &value),
            Ok(vec!["a".to_string(), "b".to_string()])
        );
    }
}
