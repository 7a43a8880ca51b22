//! Parameter values stored in presets

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Flat map of parameter name to stored value.
pub type PresetData = BTreeMap<String, ParValue>;

/// Scalar or tuple value as held by a host parameter.
///
/// Serialized untagged so stored presets read as plain JSON
/// (`{"Tx": 0.5, "Color": [1, 0, 0], "Mode": "add"}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ParValue>),
}

/// Numeric shape of a value, as used by interpolation.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Scalar(f64),
    Tuple(Vec<f64>),
}

impl ParValue {
    /// Value as a single number. Booleans are not numbers.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParValue::Int(i) => Some(*i as f64),
            ParValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Components of a non-empty, all-numeric list.
    #[must_use]
    pub fn as_numbers(&self) -> Option<Vec<f64>> {
        match self {
            ParValue::List(items) if !items.is_empty() => {
                items.iter().map(ParValue::as_number).collect()
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, ParValue::Int(_) | ParValue::Float(_))
    }

    /// Numeric shape, `None` for text, booleans and mixed lists.
    #[must_use]
    pub fn sample(&self) -> Option<Sample> {
        if let Some(n) = self.as_number() {
            return Some(Sample::Scalar(n));
        }
        self.as_numbers().map(Sample::Tuple)
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            ParValue::Bool(_) => "bool",
            ParValue::Int(_) => "int",
            ParValue::Float(_) => "float",
            ParValue::Str(_) => "str",
            ParValue::List(_) => "list",
        }
    }
}

impl Sample {
    /// True when both samples can be interpolated against each other.
    #[must_use]
    pub fn same_shape(&self, other: &Sample) -> bool {
        match (self, other) {
            (Sample::Scalar(_), Sample::Scalar(_)) => true,
            (Sample::Tuple(a), Sample::Tuple(b)) => a.len() == b.len(),
            _ => false,
        }
    }

    /// Component-wise `self + (target - self) * t`.
    ///
    /// Returns `None` on a shape mismatch.
    #[must_use]
    pub fn lerp(&self, target: &Sample, t: f64) -> Option<Sample> {
        match (self, target) {
            (Sample::Scalar(a), Sample::Scalar(b)) => Some(Sample::Scalar(a + (b - a) * t)),
            (Sample::Tuple(a), Sample::Tuple(b)) if a.len() == b.len() => Some(Sample::Tuple(
                a.iter().zip(b).map(|(a, b)| a + (b - a) * t).collect(),
            )),
            _ => None,
        }
    }
}

impl From<Sample> for ParValue {
    fn from(sample: Sample) -> Self {
        match sample {
            Sample::Scalar(v) => ParValue::Float(v),
            Sample::Tuple(vs) => ParValue::List(vs.into_iter().map(ParValue::Float).collect()),
        }
    }
}

impl From<f64> for ParValue {
    fn from(v: f64) -> Self {
        ParValue::Float(v)
    }
}

impl From<i64> for ParValue {
    fn from(v: i64) -> Self {
        ParValue::Int(v)
    }
}

impl From<bool> for ParValue {
    fn from(v: bool) -> Self {
        ParValue::Bool(v)
    }
}

impl From<&str> for ParValue {
    fn from(v: &str) -> Self {
        ParValue::Str(v.to_string())
    }
}

impl From<String> for ParValue {
    fn from(v: String) -> Self {
        ParValue::Str(v)
    }
}

impl From<Vec<f64>> for ParValue {
    fn from(vs: Vec<f64>) -> Self {
        ParValue::List(vs.into_iter().map(ParValue::Float).collect())
    }
}

/// Renders values the way the host's text fields and tables show them,
/// so a stored preset written back to a table parses to the same value.
impl fmt::Display for ParValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParValue::Bool(true) => f.write_str("True"),
            ParValue::Bool(false) => f.write_str("False"),
            ParValue::Int(i) => write!(f, "{i}"),
            ParValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            ParValue::Float(v) => write!(f, "{v}"),
            ParValue::Str(s) => f.write_str(s),
            ParValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match item {
                        ParValue::Str(s) => write!(f, "'{}'", s.replace('\'', "\\'"))?,
                        other => write!(f, "{other}")?,
                    }
                }
                f.write_str("]")
            }
        }
    }
}
