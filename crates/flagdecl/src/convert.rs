//! Built-in convertors.
//!
//! The plain variants return `None` when the flag is absent; the `strict_`
//! variants fall back to a fixed value instead.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::ConversionError;
use crate::parse::RawValue;

pub type ConvertResult<V> = Result<V, ConversionError>;

pub fn string(raw: Option<&RawValue>) -> ConvertResult<Option<String>> {
    Ok(raw.map(RawValue::to_string))
}

/// Absent becomes `""`.
pub fn strict_string(raw: Option<&RawValue>) -> ConvertResult<String> {
    string(raw).map(Option::unwrap_or_default)
}

/// Accepts `true`/`1` and `false`/`0` (case-insensitive); anything else is absent.
pub fn boolean(raw: Option<&RawValue>) -> ConvertResult<Option<bool>> {
    Ok(match raw {
        None => None,
        Some(RawValue::Bool(b)) => Some(*b),
        Some(RawValue::Text(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
    })
}

/// Absent or unrecognized becomes `false`.
pub fn strict_boolean(raw: Option<&RawValue>) -> ConvertResult<bool> {
    boolean(raw).map(|b| b.unwrap_or(false))
}

pub fn number(raw: Option<&RawValue>) -> ConvertResult<Option<f64>> {
    raw.map(parse_raw::<f64>).transpose()
}

/// Absent becomes `NaN`.
pub fn strict_number(raw: Option<&RawValue>) -> ConvertResult<f64> {
    number(raw).map(|n| n.unwrap_or(f64::NAN))
}

/// Convertor for any [`FromStr`] type.
///
/// ```
/// use flagdecl::convert::parsed;
/// use flagdecl::parse::RawValue;
///
/// let port = parsed::<u16>();
/// assert_eq!(port(Some(&RawValue::from("8080"))).unwrap(), Some(8080));
/// assert_eq!(port(None).unwrap(), None);
/// assert!(port(Some(&RawValue::from("http"))).is_err());
/// ```
pub fn parsed<T>() -> impl Fn(Option<&RawValue>) -> ConvertResult<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    |raw: Option<&RawValue>| raw.map(parse_raw::<T>).transpose()
}

/// Like [`parsed`], with `T::default()` when absent.
pub fn strict_parsed<T>() -> impl Fn(Option<&RawValue>) -> ConvertResult<T>
where
    T: FromStr + Default,
    T::Err: Display,
{
    |raw: Option<&RawValue>| {
        raw.map(parse_raw::<T>)
            .transpose()
            .map(Option::unwrap_or_default)
    }
}

fn parse_raw<T>(raw: &RawValue) -> ConvertResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        RawValue::Text(s) => s
            .trim()
            .parse::<T>()
            .map_err(|e| ConversionError::invalid(s.as_str(), e)),
        // A flag given without any value.
        RawValue::Bool(_) => Err(ConversionError::invalid(raw.to_string(), "a value is required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawValue {
        RawValue::from(s)
    }

    #[test]
    fn string_keeps_absence_and_stringifies_booleans() {
        assert_eq!(string(None).unwrap(), None);
        assert_eq!(string(Some(&text("x"))).unwrap().as_deref(), Some("x"));
        assert_eq!(string(Some(&RawValue::Bool(true))).unwrap().as_deref(), Some("true"));
        assert_eq!(strict_string(None).unwrap(), "");
    }

    #[test]
    fn boolean_recognizes_common_spellings() {
        assert_eq!(boolean(Some(&RawValue::Bool(true))).unwrap(), Some(true));
        assert_eq!(boolean(Some(&text(" TRUE "))).unwrap(), Some(true));
        assert_eq!(boolean(Some(&text("1"))).unwrap(), Some(true));
        assert_eq!(boolean(Some(&text("False"))).unwrap(), Some(false));
        assert_eq!(boolean(Some(&text("0"))).unwrap(), Some(false));
        assert_eq!(boolean(Some(&text("yes"))).unwrap(), None);
        assert_eq!(boolean(None).unwrap(), None);

        assert!(!strict_boolean(None).unwrap());
        assert!(!strict_boolean(Some(&text("maybe"))).unwrap());
    }

    #[test]
    fn number_rejects_garbage() {
        assert_eq!(number(Some(&text("2.5"))).unwrap(), Some(2.5));
        assert_eq!(number(None).unwrap(), None);
        assert!(strict_number(None).unwrap().is_nan());

        let err = number(Some(&text("abc"))).unwrap_err();
        assert!(matches!(err, ConversionError::Invalid { ref value, .. } if value == "abc"));
    }

    #[test]
    fn value_is_required_for_parsed_types() {
        let err = parsed::<i64>()(Some(&RawValue::Bool(true))).unwrap_err();
        assert_eq!(
            err,
            ConversionError::invalid("true", "a value is required")
        );
    }

    #[test]
    fn strict_parsed_defaults_when_absent() {
        let count = strict_parsed::<i64>();
        assert_eq!(count(None).unwrap(), 0);
        assert_eq!(count(Some(&text(" 42"))).unwrap(), 42);
        assert!(count(Some(&text("4x"))).is_err());
    }
}
