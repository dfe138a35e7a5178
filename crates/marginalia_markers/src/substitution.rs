//! Caller-supplied literal substitutions.

use serde::{Deserialize, Serialize};

/// A literal value substituted for `{{name}}` before marker resolution.
///
/// # Examples
///
/// ```
/// use marginalia_markers::SubstitutionValue;
///
/// assert_eq!(SubstitutionValue::from(42).to_string(), "42");
/// assert_eq!(SubstitutionValue::from(2.5).to_string(), "2.5");
/// assert_eq!(SubstitutionValue::from("Ada").to_string(), "Ada");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubstitutionValue {
    /// Literal text
    Text(String),
    /// Numeric value; integral values print without a fractional part
    Number(f64),
}

impl std::fmt::Display for SubstitutionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for SubstitutionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SubstitutionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SubstitutionValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for SubstitutionValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<f64> for SubstitutionValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Replace every `{{name}}` with its value, once per entry, in list order.
///
/// Each entry runs over the output of the previous one, so a value that
/// contains `{{later}}` is filled by a later `later` entry but never by an
/// earlier one.
pub fn apply_substitutions(document: &str, substitutions: &[(&str, SubstitutionValue)]) -> String {
    substitutions
        .iter()
        .fold(document.to_string(), |doc, (name, value)| {
            doc.replace(&format!("{{{{{}}}}}", name), &value.to_string())
        })
}
