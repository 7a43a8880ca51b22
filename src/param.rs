//! Host parameter seam
//!
//! The host graph owns its parameters. The crate only sees them through
//! [`Parameter`] handles resolved by name from a [`ParameterContainer`], and
//! never creates or destroys them.

use crate::error::ParError;
use crate::value::ParValue;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Declared style tag of a host parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParStyle {
    Float,
    Int,
    Str,
    Rgb,
    Rgba,
    Xy,
    Uv,
    Xyz,
    Xyzw,
    Menu,
    Toggle,
    Pulse,
    Other(String),
}

impl ParStyle {
    /// Parse a host style tag, case-insensitively.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "float" => Self::Float,
            "int" => Self::Int,
            "str" => Self::Str,
            "rgb" => Self::Rgb,
            "rgba" => Self::Rgba,
            "xy" => Self::Xy,
            "uv" => Self::Uv,
            "xyz" => Self::Xyz,
            "xyzw" => Self::Xyzw,
            "menu" | "strmenu" => Self::Menu,
            "toggle" => Self::Toggle,
            "pulse" | "momentary" => Self::Pulse,
            other => Self::Other(other.to_string()),
        }
    }

    /// Styles that interpolate without inspecting the value.
    #[must_use]
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Float
                | Self::Int
                | Self::Rgb
                | Self::Rgba
                | Self::Xy
                | Self::Uv
                | Self::Xyz
                | Self::Xyzw
        )
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::Str => "str",
            Self::Rgb => "rgb",
            Self::Rgba => "rgba",
            Self::Xy => "xy",
            Self::Uv => "uv",
            Self::Xyz => "xyz",
            Self::Xyzw => "xyzw",
            Self::Menu => "menu",
            Self::Toggle => "toggle",
            Self::Pulse => "pulse",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for ParStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A live parameter on the target.
pub trait Parameter {
    fn name(&self) -> &str;

    fn style(&self) -> ParStyle;

    /// Current evaluated value.
    fn value(&self) -> Result<ParValue, ParError>;

    /// Assign a value. The host decides what it accepts.
    fn set_value(&mut self, value: ParValue) -> Result<(), ParError>;

    /// Normalized slider range (`normMin`, `normMax`), if any.
    fn bounds(&self) -> Option<(f64, f64)> {
        None
    }
}

/// The target operator whose parameters presets are applied to.
pub trait ParameterContainer {
    /// Whether the operator still exists. A deleted one reports `false`.
    fn is_alive(&self) -> bool {
        true
    }

    fn par(&self, name: &str) -> Option<&dyn Parameter>;

    fn par_mut(&mut self, name: &str) -> Option<&mut dyn Parameter>;
}

/// Shared handle to a target, as held by the host adapter.
pub type TargetRef = Rc<RefCell<dyn ParameterContainer>>;

/// Handle that does not keep a target alive.
pub type WeakTarget = Weak<RefCell<dyn ParameterContainer>>;

/// Decide whether a parameter can be interpolated.
///
/// Group members (e.g. one axis of an XYZW group) may report the group's
/// style, so a non-numeric style falls back to the shape of the current value.
#[must_use]
pub fn is_numeric(par: &dyn Parameter) -> bool {
    if par.style().is_numeric() {
        return true;
    }
    match par.value() {
        Ok(value) => value.is_number() || value.as_numbers().is_some(),
        Err(_) => false,
    }
}

/// Convert a stored value to what a parameter of `style` expects.
pub fn coerce(value: &ParValue, style: &ParStyle) -> Result<ParValue, ParError> {
    let fail = || ParError::Coercion {
        value: value.to_string(),
        kind: value.type_name(),
        style: style.to_string(),
    };

    match style {
        ParStyle::Int => match value {
            ParValue::Int(i) => Ok(ParValue::Int(*i)),
            ParValue::Float(f) if f.is_finite() => Ok(ParValue::Int(f.round() as i64)),
            ParValue::Bool(b) => Ok(ParValue::Int(i64::from(*b))),
            ParValue::Str(s) => {
                let s = s.trim();
                match s.parse::<f64>() {
                    Ok(f) if f.is_finite() => Ok(ParValue::Int(f.round() as i64)),
                    _ => s.parse::<i64>().map(ParValue::Int).map_err(|_| fail()),
                }
            }
            _ => Err(fail()),
        },
        ParStyle::Float => match value {
            ParValue::Int(i) => Ok(ParValue::Float(*i as f64)),
            ParValue::Float(f) => Ok(ParValue::Float(*f)),
            ParValue::Bool(b) => Ok(ParValue::Float(if *b { 1.0 } else { 0.0 })),
            ParValue::Str(s) => s
                .trim()
                .parse::<f64>()
                .map(ParValue::Float)
                .map_err(|_| fail()),
            ParValue::List(_) => Err(fail()),
        },
        ParStyle::Str => Ok(ParValue::Str(value.to_string())),
        _ => Ok(value.clone()),
    }
}

/// Write a stored value with type coercion, falling back to a raw write.
pub fn apply_value(par: &mut dyn Parameter, value: &ParValue) -> Result<(), ParError> {
    let style = par.style();
    let coerced = match coerce(value, &style) {
        Ok(coerced) => par.set_value(coerced),
        Err(err) => Err(err),
    };
    match coerced {
        Ok(()) => Ok(()),
        Err(first) => {
            debug!("{}: {}, writing raw value", par.name(), first);
            par.set_value(value.clone()).map_err(|_| first)
        }
    }
}

/// Tally of a best-effort batch write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub applied: Vec<String>,
    pub errors: Vec<(String, ParError)>,
}

impl BatchResult {
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.applied.len()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn any_applied(&self) -> bool {
        !self.applied.is_empty()
    }

    pub fn ok(&mut self, name: impl Into<String>) {
        self.applied.push(name.into());
    }

    pub fn fail(&mut self, name: impl Into<String>, err: ParError) {
        self.errors.push((name.into(), err));
    }

    pub fn record(&mut self, name: &str, result: Result<(), ParError>) {
        match result {
            Ok(()) => self.ok(name),
            Err(err) => self.fail(name, err),
        }
    }
}

/// Apply every `(name, value)` pair to `target`, skipping failures.
pub fn apply_batch<'a>(
    target: &mut dyn ParameterContainer,
    values: impl IntoIterator<Item = (&'a String, &'a ParValue)>,
) -> BatchResult {
    let mut result = BatchResult::default();
    for (name, value) in values {
        match target.par_mut(name) {
            Some(par) => result.record(name, apply_value(par, value)),
            None => result.fail(name.as_str(), ParError::NotFound(name.clone())),
        }
    }
    result
}
