//! Cell values and the hashable key used to compare them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell.
///
/// Non-finite floats never appear inside a [`super::Column`]: they are
/// normalized to [`Value::Null`] on construction, the same way a missing
/// value is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Numeric view of the value. Booleans and text are not numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Short type label used in descriptions ("Non string types: int, null").
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "str",
        }
    }

    pub(crate) fn normalized(self) -> Self {
        match self {
            Self::Float(v) if !v.is_finite() => Self::Null,
            other => other,
        }
    }

    /// Equality key: integral floats compare equal to the matching integer,
    /// and nulls compare equal to each other.
    pub(crate) fn key(&self) -> ValueKey {
        match self {
            Self::Null => ValueKey::Null,
            Self::Bool(b) => ValueKey::Bool(*b),
            Self::Int(v) => ValueKey::Int(*v),
            Self::Float(v) => {
                if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 {
                    ValueKey::Int(*v as i64)
                } else {
                    ValueKey::Float(v.to_bits())
                }
            }
            Self::Text(s) => ValueKey::Text(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum ValueKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(String),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_float_matches_int() {
        assert_eq!(Value::Float(1.0).key(), Value::Int(1).key());
        assert_ne!(Value::Float(1.5).key(), Value::Int(1).key());
        assert_eq!(Value::Null.key(), Value::Null.key());
    }

    #[test]
    fn test_non_finite_normalizes_to_null() {
        assert!(Value::Float(f64::NAN).normalized().is_null());
        assert!(Value::Float(f64::INFINITY).normalized().is_null());
        assert_eq!(Value::Float(2.5).normalized(), Value::Float(2.5));
    }

    #[test]
    fn test_json_shape_is_untagged() -> anyhow::Result<()> {
        let values = vec![
            Value::Null,
            Value::Bool(true),
            Value::Int(3),
            Value::Float(1.5),
            Value::Text("west".to_owned()),
        ];
        let json = serde_json::to_string(&values)?;
        assert_eq!(json, r#"[null,true,3,1.5,"west"]"#);
        let back: Vec<Value> = serde_json::from_str(&json)?;
        assert_eq!(back, values);
        Ok(())
    }
}
