//! In-memory host adapters
//!
//! Stand-ins for the host graph and UI, useful for tests, demos and for
//! driving a [`Presetter`](crate::Presetter) headless.

use crate::error::ParError;
use crate::lerp::PollTrigger;
use crate::param::{ParStyle, Parameter, ParameterContainer, TargetRef};
use crate::presetter::UiSurface;
use crate::value::ParValue;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// A parameter backed by a plain value.
#[derive(Debug, Clone)]
pub struct MemoryParameter {
    name: String,
    style: ParStyle,
    value: ParValue,
    bounds: Option<(f64, f64)>,
    fail_reads: bool,
    strict: bool,
}

impl MemoryParameter {
    pub fn new(name: impl Into<String>, style: ParStyle, value: impl Into<ParValue>) -> Self {
        Self {
            name: name.into(),
            style,
            value: value.into(),
            bounds: None,
            fail_reads: false,
            strict: false,
        }
    }

    /// Set the normalized range used by randomize
    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.bounds = Some((min, max));
        self
    }

    /// Make every read fail
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Reject writes whose type does not match the style
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    fn accepts(&self, value: &ParValue) -> bool {
        if !self.strict {
            return true;
        }
        match self.style {
            ParStyle::Int => matches!(value, ParValue::Int(_)),
            ParStyle::Float => matches!(value, ParValue::Float(_)),
            ParStyle::Str | ParStyle::Menu => matches!(value, ParValue::Str(_)),
            ParStyle::Toggle => matches!(value, ParValue::Bool(_)),
            ParStyle::Rgb | ParStyle::Rgba | ParStyle::Xy | ParStyle::Uv | ParStyle::Xyz
            | ParStyle::Xyzw => value.as_numbers().is_some() || value.is_number(),
            _ => true,
        }
    }
}

impl Parameter for MemoryParameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn style(&self) -> ParStyle {
        self.style.clone()
    }

    fn value(&self) -> Result<ParValue, ParError> {
        if self.fail_reads {
            return Err(ParError::Read {
                name: self.name.clone(),
                reason: "evaluation failed".to_string(),
            });
        }
        Ok(self.value.clone())
    }

    fn set_value(&mut self, value: ParValue) -> Result<(), ParError> {
        if !self.accepts(&value) {
            return Err(ParError::Write {
                name: self.name.clone(),
                reason: format!("{} parameter rejects {}", self.style, value.type_name()),
            });
        }
        self.value = value;
        Ok(())
    }

    fn bounds(&self) -> Option<(f64, f64)> {
        self.bounds
    }
}

/// An operator with a fixed set of parameters.
#[derive(Debug, Clone)]
pub struct MemoryContainer {
    pars: BTreeMap<String, MemoryParameter>,
    alive: bool,
}

impl Default for MemoryContainer {
    fn default() -> Self {
        Self {
            pars: BTreeMap::new(),
            alive: true,
        }
    }
}

impl MemoryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, par: MemoryParameter) -> Self {
        self.insert(par);
        self
    }

    pub fn insert(&mut self, par: MemoryParameter) {
        self.pars.insert(par.name.clone(), par);
    }

    /// Simulate a parameter being removed from the operator
    pub fn remove(&mut self, name: &str) -> Option<MemoryParameter> {
        self.pars.remove(name)
    }

    /// Current value of a parameter, `None` if absent
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ParValue> {
        self.pars.get(name).map(|p| p.value.clone())
    }

    /// Write a value directly, bypassing coercion
    pub fn set(&mut self, name: &str, value: impl Into<ParValue>) {
        if let Some(par) = self.pars.get_mut(name) {
            par.value = value.into();
        }
    }

    /// Simulate the operator being deleted in the host
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Wrap in the shared handle the presetter expects
    pub fn into_shared(self) -> (Rc<RefCell<MemoryContainer>>, TargetRef) {
        let shared = Rc::new(RefCell::new(self));
        let target: TargetRef = shared.clone();
        (shared, target)
    }
}

impl ParameterContainer for MemoryContainer {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn par(&self, name: &str) -> Option<&dyn Parameter> {
        self.pars.get(name).map(|p| p as &dyn Parameter)
    }

    fn par_mut(&mut self, name: &str) -> Option<&mut dyn Parameter> {
        self.pars.get_mut(name).map(|p| p as &mut dyn Parameter)
    }
}

#[derive(Debug, Default)]
struct UiState {
    status: String,
    menu: Option<String>,
    items: Vec<String>,
    menu_writes: usize,
}

/// Status field and preset menu, cloneable so tests can observe writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryUi {
    state: Rc<RefCell<UiState>>,
}

impl MemoryUi {
    /// UI with a preset menu showing `None`
    pub fn new() -> Self {
        let ui = Self::default();
        ui.state.borrow_mut().menu = Some("None".to_string());
        ui
    }

    /// UI without a preset menu parameter
    pub fn without_menu() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> String {
        self.state.borrow().status.clone()
    }

    #[must_use]
    pub fn menu(&self) -> Option<String> {
        self.state.borrow().menu.clone()
    }

    #[must_use]
    pub fn items(&self) -> Vec<String> {
        self.state.borrow().items.clone()
    }

    #[must_use]
    pub fn menu_writes(&self) -> usize {
        self.state.borrow().menu_writes
    }

    /// Simulate the user picking a menu entry
    pub fn select(&self, value: &str) {
        self.state.borrow_mut().menu = Some(value.to_string());
    }
}

impl UiSurface for MemoryUi {
    fn set_status(&mut self, text: &str) {
        self.state.borrow_mut().status = text.to_string();
    }

    fn menu_value(&self) -> Option<String> {
        self.state.borrow().menu.clone()
    }

    fn set_menu_value(&mut self, value: &str) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if let Some(menu) = state.menu.as_mut() {
            *menu = value.to_string();
            state.menu_writes += 1;
        }
    }

    fn set_menu_items(&mut self, items: &[String]) {
        self.state.borrow_mut().items = items.to_vec();
    }
}

/// Poll trigger that records whether the host would call `update()`.
#[derive(Debug, Clone, Default)]
pub struct MemoryTrigger {
    active: Rc<Cell<bool>>,
    switches: Rc<Cell<usize>>,
}

impl MemoryTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Number of enable/disable calls
    #[must_use]
    pub fn switches(&self) -> usize {
        self.switches.get()
    }
}

impl PollTrigger for MemoryTrigger {
    fn set_active(&mut self, active: bool) {
        self.active.set(active);
        self.switches.set(self.switches.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_lookup() {
        let mut target = MemoryContainer::new()
            .with(MemoryParameter::new("Tx", ParStyle::Float, 0.0))
            .with(MemoryParameter::new("Mode", ParStyle::Menu, "add"));

        assert!(target.par("Tx").is_some());
        assert!(target.par("Ty").is_none());

        target
            .par_mut("Tx")
            .unwrap()
            .set_value(ParValue::Float(2.0))
            .unwrap();
        assert_eq!(target.get("Tx"), Some(ParValue::Float(2.0)));
    }

    #[test]
    fn test_strict_parameter_rejects_wrong_type() {
        let mut par = MemoryParameter::new("Count", ParStyle::Int, 1_i64).strict();
        assert!(par.set_value(ParValue::Float(1.5)).is_err());
        assert!(par.set_value(ParValue::Int(2)).is_ok());
    }

    #[test]
    fn test_kill() {
        let mut target = MemoryContainer::new();
        assert!(target.is_alive());
        target.kill();
        assert!(!target.is_alive());
    }

    #[test]
    fn test_ui_without_menu_ignores_menu_writes() {
        let mut ui = MemoryUi::without_menu();
        ui.set_menu_value("preset_001");
        assert_eq!(ui.menu(), None);
        assert_eq!(ui.menu_writes(), 0);
    }
}
