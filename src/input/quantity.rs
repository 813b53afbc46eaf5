use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A quantity as it arrives from outside: a number, some text, or a flag.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawQuantity {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl From<f64> for RawQuantity {
    fn from(value: f64) -> Self {
        RawQuantity::Number(value)
    }
}

impl From<&str> for RawQuantity {
    fn from(value: &str) -> Self {
        RawQuantity::Text(value.to_string())
    }
}

/// Why a raw quantity was replaced by 0.0
#[derive(Debug, Clone, PartialEq)]
pub enum CoercionReason {
    Missing,
    Blank,
    NotNumeric(String),
    NotFinite,
    Negative(f64),
}

impl fmt::Display for CoercionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionReason::Missing => write!(f, "no value"),
            CoercionReason::Blank => write!(f, "blank value"),
            CoercionReason::NotNumeric(s) => write!(f, "'{}' is not a number", s),
            CoercionReason::NotFinite => write!(f, "value is not finite"),
            CoercionReason::Negative(v) => write!(f, "{} is negative", v),
        }
    }
}

/// Coerce a raw quantity to a non-negative finite number.
///
/// Never fails: anything unusable becomes 0.0 and the reason is returned
/// alongside so the caller can report it.
pub fn coerce_quantity(raw: Option<&RawQuantity>) -> (f64, Option<CoercionReason>) {
    let value = match raw {
        None => return (0.0, Some(CoercionReason::Missing)),
        Some(RawQuantity::Number(n)) => *n,
        Some(RawQuantity::Flag(b)) => {
            return (0.0, Some(CoercionReason::NotNumeric(b.to_string())));
        }
        Some(RawQuantity::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return (0.0, Some(CoercionReason::Blank));
            }
            match trimmed.parse::<f64>() {
                Ok(n) => n,
                Err(_) => return (0.0, Some(CoercionReason::NotNumeric(trimmed.to_string()))),
            }
        }
    };

    if !value.is_finite() {
        (0.0, Some(CoercionReason::NotFinite))
    } else if value < 0.0 {
        (0.0, Some(CoercionReason::Negative(value)))
    } else {
        (value, None)
    }
}

/// Strictly numeric item -> quantity mapping consumed by the aggregator.
/// Absent items read as 0.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quantities {
    values: HashMap<String, f64>,
}

impl Quantities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, item: &str) -> f64 {
        self.values.get(item).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, item: impl Into<String>, quantity: f64) {
        self.values.insert(item.into(), quantity);
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Quantities {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_quantity(Some(&RawQuantity::Number(2.5))), (2.5, None));
        assert_eq!(coerce_quantity(Some(&RawQuantity::Number(0.0))), (0.0, None));
    }

    #[test]
    fn test_coerce_numeric_text() {
        assert_eq!(coerce_quantity(Some(&" 1.5 ".into())), (1.5, None));
    }

    #[test]
    fn test_coerce_missing_and_blank() {
        assert_eq!(coerce_quantity(None), (0.0, Some(CoercionReason::Missing)));
        assert_eq!(
            coerce_quantity(Some(&"   ".into())),
            (0.0, Some(CoercionReason::Blank))
        );
    }

    #[test]
    fn test_coerce_non_numeric() {
        let (value, reason) = coerce_quantity(Some(&"two".into()));
        assert_eq!(value, 0.0);
        assert_eq!(reason, Some(CoercionReason::NotNumeric("two".to_string())));

        let (value, _) = coerce_quantity(Some(&RawQuantity::Flag(true)));
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_coerce_negative_and_non_finite() {
        assert_eq!(
            coerce_quantity(Some(&RawQuantity::Number(-3.0))),
            (0.0, Some(CoercionReason::Negative(-3.0)))
        );
        assert_eq!(
            coerce_quantity(Some(&"NaN".into())),
            (0.0, Some(CoercionReason::NotFinite))
        );
        assert_eq!(
            coerce_quantity(Some(&"inf".into())),
            (0.0, Some(CoercionReason::NotFinite))
        );
    }

    #[test]
    fn test_quantities_default_zero() {
        let mut q = Quantities::new();
        assert_eq!(q.get("牛肉"), 0.0);
        q.set("牛肉", 1.0);
        assert_eq!(q.get("牛肉"), 1.0);
    }

    #[test]
    fn test_raw_quantity_untagged_parse() {
        let parsed: Vec<RawQuantity> = serde_saphyr::from_str("[1, 2.5, \"3\", abc]").unwrap();
        assert_eq!(parsed[0], RawQuantity::Number(1.0));
        assert_eq!(parsed[1], RawQuantity::Number(2.5));
        assert_eq!(parsed[2], RawQuantity::Text("3".to_string()));
        assert_eq!(parsed[3], RawQuantity::Text("abc".to_string()));
    }
}
