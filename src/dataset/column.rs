//! Named, single-typed column of values.

use super::value::{Value, ValueKey};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Column type, inferred from the non-null values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Float,
    Boolean,
    Text,
    /// Heterogeneous or all-null column.
    Object,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Object => "object",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Infer the type of a column from its values.
    ///
    /// Integers mixed with floats widen to `Float`; any other mix is `Object`.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut inferred: Option<Self> = None;
        for value in values {
            let this = match value {
                Value::Null => continue,
                Value::Bool(_) => Self::Boolean,
                Value::Int(_) => Self::Integer,
                Value::Float(_) => Self::Float,
                Value::Text(_) => Self::Text,
            };
            inferred = Some(match (inferred, this) {
                (None, t) => t,
                (Some(prev), t) if prev == t => prev,
                (Some(Self::Integer | Self::Float), Self::Integer | Self::Float) => Self::Float,
                _ => return Self::Object,
            });
        }
        inferred.unwrap_or(Self::Object)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    dtype: DataType,
    values: Vec<Value>,
}

impl Column {
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values
            .into_iter()
            .map(|v| v.into().normalized())
            .collect();
        let dtype = DataType::infer(&values);
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_numeric(&self) -> bool {
        self.dtype.is_numeric()
    }

    /// True when every value (nulls included) is a string.
    pub fn is_text(&self) -> bool {
        self.values.iter().all(Value::is_text)
    }

    /// Distinct non-text type labels, in order of first appearance.
    pub fn non_text_types(&self) -> Vec<&'static str> {
        let mut seen = Vec::new();
        for value in self.values.iter().filter(|v| !v.is_text()) {
            let name = value.type_name();
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        seen
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Number of rows whose value already appeared in an earlier row.
    pub fn duplicate_count(&self) -> usize {
        let mut seen = HashSet::with_capacity(self.values.len());
        self.values.iter().filter(|v| !seen.insert(v.key())).count()
    }

    /// Share of rows that repeat an earlier value, `0.0` for an empty column.
    pub fn duplicate_rate(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.duplicate_count() as f64 / self.values.len() as f64
        }
    }

    pub fn null_rate(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.null_count() as f64 / self.values.len() as f64
        }
    }

    /// Distinct non-null values in order of first appearance.
    pub fn distinct_values(&self) -> Vec<&Value> {
        let mut seen = HashSet::new();
        self.values
            .iter()
            .filter(|v| !v.is_null() && seen.insert(v.key()))
            .collect()
    }

    /// Non-null value frequencies, most frequent first. Ties keep first-appearance order.
    pub fn value_counts(&self) -> Vec<(Value, usize)> {
        let mut index: HashMap<ValueKey, usize> = HashMap::new();
        let mut counts: Vec<(Value, usize)> = Vec::new();
        for value in self.values.iter().filter(|v| !v.is_null()) {
            match index.get(&value.key()) {
                Some(&pos) => {
                    if let Some(entry) = counts.get_mut(pos) {
                        entry.1 += 1;
                    }
                }
                None => {
                    index.insert(value.key(), counts.len());
                    counts.push((value.clone(), 1));
                }
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Non-null numeric values.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(Value::as_f64).collect()
    }

    pub fn min(&self) -> Option<f64> {
        self.numeric_values().into_iter().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.numeric_values().into_iter().reduce(f64::max)
    }
}
