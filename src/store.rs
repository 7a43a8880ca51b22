//! Preset storage
//!
//! [`PresetStore`] owns every preset, the active preset name and the dirty
//! flag. The presets, the active name and the sorted name list are written
//! through a [`StatePort`] after every mutation so the host can restore them.

use crate::error::StateError;
use crate::value::PresetData;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, warn};

const AUTO_PREFIX: &str = "preset_";

/// The persisted fields, named as the host declares them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredState {
    #[serde(rename = "Presets")]
    pub presets: BTreeMap<String, PresetData>,
    #[serde(rename = "CurrentPresetName")]
    pub current_preset_name: Option<String>,
    #[serde(rename = "PresetNames")]
    pub preset_names: Vec<String>,
}

/// Host persistence facility.
pub trait StatePort {
    /// Previously saved state, `None` on first creation.
    fn load_state(&mut self) -> Result<Option<StoredState>, StateError>;

    fn save_state(&mut self, state: &StoredState) -> Result<(), StateError>;
}

/// Keeps state in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    slot: Rc<RefCell<Option<StoredState>>>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn saved(&self) -> Option<StoredState> {
        self.slot.borrow().clone()
    }
}

impl StatePort for MemoryState {
    fn load_state(&mut self) -> Result<Option<StoredState>, StateError> {
        Ok(self.slot.borrow().clone())
    }

    fn save_state(&mut self, state: &StoredState) -> Result<(), StateError> {
        *self.slot.borrow_mut() = Some(state.clone());
        Ok(())
    }
}

/// Keeps state as pretty-printed JSON on disk.
#[derive(Debug, Clone)]
pub struct JsonFileState {
    path: PathBuf,
}

impl JsonFileState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatePort for JsonFileState {
    fn load_state(&mut self) -> Result<Option<StoredState>, StateError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save_state(&mut self, state: &StoredState) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(state)?)?;
        Ok(())
    }
}

/// Presets plus the active preset and its dirty flag.
pub struct PresetStore {
    presets: BTreeMap<String, PresetData>,
    current_preset_name: Option<String>,
    has_changed: bool,
    preset_names: Vec<String>,
    port: Box<dyn StatePort>,
}

impl std::fmt::Debug for PresetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetStore")
            .field("presets", &self.preset_names)
            .field("current_preset_name", &self.current_preset_name)
            .field("has_changed", &self.has_changed)
            .finish_non_exhaustive()
    }
}

impl PresetStore {
    /// Restore from `port`, or start empty if nothing was saved or the
    /// saved state cannot be read.
    pub fn open(mut port: impl StatePort + 'static) -> Self {
        let state = match port.load_state() {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                warn!("Could not restore presets, starting empty: {}", e);
                StoredState::default()
            }
        };

        let mut store = Self {
            presets: state.presets,
            current_preset_name: None,
            has_changed: false,
            preset_names: Vec::new(),
            port: Box::new(port),
        };
        store.current_preset_name = state
            .current_preset_name
            .filter(|name| store.presets.contains_key(name));
        store.update_preset_names();
        debug!("Opened preset store with {} presets", store.len());
        store
    }

    /// Empty store that is never persisted
    pub fn in_memory() -> Self {
        Self::open(MemoryState::new())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PresetData> {
        self.presets.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Sorted preset names, recomputed after every mutation
    #[must_use]
    pub fn preset_names(&self) -> &[String] {
        &self.preset_names
    }

    #[must_use]
    pub fn current_preset_name(&self) -> Option<&str> {
        self.current_preset_name.as_deref()
    }

    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.has_changed
    }

    pub fn set_has_changed(&mut self, changed: bool) {
        self.has_changed = changed;
    }

    /// Next `preset_NNN` after the highest existing number.
    ///
    /// Numbers with no successor in `i64` are ignored.
    #[must_use]
    pub fn next_preset_name(&self) -> String {
        let next = self
            .presets
            .keys()
            .filter(|name| name.starts_with(AUTO_PREFIX))
            .filter_map(|name| name.split('_').nth(1)?.parse::<i64>().ok())
            .filter_map(|n| n.checked_add(1))
            .max()
            .unwrap_or(1);

        let name = format!("{AUTO_PREFIX}{next:03}");
        if self.contains(&name) {
            self.next_available_name(&name)
        } else {
            name
        }
    }

    /// `base` if free, else the first free `base_NNN`.
    #[must_use]
    pub fn next_available_name(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        (1_u32..)
            .map(|n| format!("{base}_{n:03}"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Store `data` under `name`, or an auto-generated name when `None`.
    ///
    /// An existing name is replaced when `overwrite` is set and suffixed
    /// otherwise. The stored name becomes active and clean.
    pub fn insert(&mut self, name: Option<&str>, data: PresetData, overwrite: bool) -> String {
        let name = match name {
            None => self.next_preset_name(),
            Some(name) if self.contains(name) && overwrite => {
                debug!("Overwriting existing preset '{}'", name);
                name.to_string()
            }
            Some(name) => {
                let available = self.next_available_name(name);
                if available != name {
                    debug!("Preset name '{}' already exists, using: {}", name, available);
                }
                available
            }
        };

        self.presets.insert(name.clone(), data);
        self.current_preset_name = Some(name.clone());
        self.has_changed = false;
        self.commit();
        name
    }

    /// Remove a preset, clearing the active name if it pointed there.
    pub fn remove(&mut self, name: &str) -> Option<PresetData> {
        let removed = self.presets.remove(name)?;
        if self.current_preset_name.as_deref() == Some(name) {
            self.current_preset_name = None;
        }
        self.commit();
        Some(removed)
    }

    /// Remove every preset, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.presets.len();
        self.presets.clear();
        self.current_preset_name = None;
        self.has_changed = false;
        self.commit();
        count
    }

    /// Point the active name at `name` if it exists, else clear it.
    pub fn set_active(&mut self, name: Option<&str>) {
        self.current_preset_name = name
            .filter(|name| self.presets.contains_key(*name))
            .map(str::to_string);
        self.persist();
    }

    /// Display text for the status field
    #[must_use]
    pub fn status_text(&self) -> String {
        match (&self.current_preset_name, self.has_changed) {
            (None, _) => "No preset loaded".to_string(),
            (Some(name), false) => name.clone(),
            (Some(name), true) => format!("{name} (changed)"),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> StoredState {
        StoredState {
            presets: self.presets.clone(),
            current_preset_name: self.current_preset_name.clone(),
            preset_names: self.preset_names.clone(),
        }
    }

    fn update_preset_names(&mut self) {
        self.preset_names = self.presets.keys().cloned().collect();
    }

    fn commit(&mut self) {
        self.update_preset_names();
        self.persist();
    }

    fn persist(&mut self) {
        let state = self.snapshot();
        if let Err(e) = self.port.save_state(&state) {
            warn!("Could not persist presets: {}", e);
        }
    }
}
