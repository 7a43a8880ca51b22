//! Preset operations and UI callbacks
//!
//! [`Presetter`] is the add-on instance: it owns the preset store, the lerp
//! engine and the deferred action queue, and talks to the host through the
//! parameter, table, file and UI seams. The host calls [`Presetter::update`]
//! once per tick and forwards button and menu events to the `on_*` callbacks.

use crate::clock::{Clock, SystemClock};
use crate::config::PresetterSettings;
use crate::error::{FileError, ParError, PresetError, Result};
use crate::file::{preset_name_from_path, PresetFile};
use crate::lerp::{LerpEngine, LerpPlan, PollTrigger, TickOutcome, MIN_LERP_SECONDS};
use crate::param::{apply_batch, apply_value, BatchResult, TargetRef};
use crate::scheduler::Scheduler;
use crate::store::PresetStore;
use crate::table::TableSource;
use crate::value::ParValue;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

/// Menu entry meaning "no preset selected".
pub const MENU_NONE: &str = "None";

/// Status field and preset menu of the add-on.
pub trait UiSurface {
    fn set_status(&mut self, text: &str);

    /// Current menu selection, `None` if there is no menu
    fn menu_value(&self) -> Option<String>;

    /// Write the selection without firing the menu callback
    fn set_menu_value(&mut self, value: &str);

    fn set_menu_items(&mut self, _items: &[String]) {}
}

/// UI for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUi;

impl UiSurface for NoUi {
    fn set_status(&mut self, _text: &str) {}

    fn menu_value(&self) -> Option<String> {
        None
    }

    fn set_menu_value(&mut self, _value: &str) {}
}

/// How a recall was carried out.
#[derive(Debug, Clone, PartialEq)]
pub enum Recall {
    Instant(BatchResult),
    Lerp(LerpPlan),
}

#[derive(Debug, Clone, PartialEq)]
enum Deferred {
    ClearChanged,
    SyncMenu(String),
    ImportFile,
}

pub struct Presetter {
    store: PresetStore,
    settings: PresetterSettings,
    lerp: LerpEngine,
    scheduler: Scheduler<Deferred>,
    clock: Box<dyn Clock>,
    target: Option<TargetRef>,
    par_table: Option<Box<dyn TableSource>>,
    ui: Box<dyn UiSurface>,
    file: Option<Box<dyn PresetFile>>,
    rng: StdRng,
}

impl std::fmt::Debug for Presetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presetter")
            .field("store", &self.store)
            .field("settings", &self.settings)
            .field("lerp", &self.lerp)
            .field("pending_actions", &self.scheduler.len())
            .finish_non_exhaustive()
    }
}

impl Presetter {
    pub fn new(store: PresetStore) -> Self {
        let mut presetter = Self {
            store,
            settings: PresetterSettings::default(),
            lerp: LerpEngine::default(),
            scheduler: Scheduler::new(),
            clock: Box::new(SystemClock::new()),
            target: None,
            par_table: None,
            ui: Box::new(NoUi),
            file: None,
            rng: StdRng::from_entropy(),
        };
        presetter.refresh_ui();
        presetter
    }

    pub fn with_settings(mut self, settings: PresetterSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_target(mut self, target: TargetRef) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_table(mut self, table: impl TableSource + 'static) -> Self {
        self.par_table = Some(Box::new(table));
        self
    }

    pub fn with_ui(mut self, ui: impl UiSurface + 'static) -> Self {
        self.ui = Box::new(ui);
        self.refresh_ui();
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Trigger the engine enables while a lerp runs
    pub fn with_trigger(mut self, trigger: impl PollTrigger + 'static) -> Self {
        self.lerp = LerpEngine::new(trigger);
        self
    }

    pub fn with_file(mut self, file: impl PresetFile + 'static) -> Self {
        self.file = Some(Box::new(file));
        self
    }

    /// Deterministic randomize
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ---------- Accessors ----------

    #[must_use]
    pub fn store(&self) -> &PresetStore {
        &self.store
    }

    #[must_use]
    pub fn settings(&self) -> &PresetterSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut PresetterSettings {
        &mut self.settings
    }

    #[must_use]
    pub fn lerp(&self) -> &LerpEngine {
        &self.lerp
    }

    #[must_use]
    pub fn is_lerping(&self) -> bool {
        self.lerp.is_active()
    }

    /// Change the target operator. A running lerp keeps its own target.
    pub fn set_target(&mut self, target: Option<TargetRef>) {
        self.target = target;
    }

    #[must_use]
    pub fn status_text(&self) -> String {
        self.store.status_text()
    }

    /// Deferred actions not yet run
    #[must_use]
    pub fn pending_actions(&self) -> usize {
        self.scheduler.len()
    }

    // ---------- Core preset functions ----------

    /// Save the parameter table as a preset and make it active.
    ///
    /// Without a name the next `preset_NNN` is used. An existing name is
    /// overwritten when `save_overwrite` is set and suffixed otherwise.
    pub fn save_preset(&mut self, name: Option<&str>) -> Result<String> {
        self.try_save(name)
            .inspect_err(|e| warn!("Could not save preset: {}", e))
    }

    fn try_save(&mut self, name: Option<&str>) -> Result<String> {
        let table = self
            .par_table
            .as_ref()
            .and_then(|source| source.table())
            .ok_or(PresetError::NoTable)?;
        let pars = table.read_pars();
        if pars.is_empty() {
            return Err(PresetError::EmptyTable);
        }

        let count = pars.len();
        let name = self.store.insert(name, pars, self.settings.save_overwrite);
        self.after_store_change();
        info!("Preset '{}' saved with {} parameters", name, count);
        Ok(name)
    }

    /// Mark `name` active without touching parameter values.
    pub fn set_active_preset(&mut self, name: Option<&str>) {
        self.store.set_active(name);
        self.update_info();
        self.update_menu();
    }

    /// Apply a preset to the target immediately.
    ///
    /// Best effort: parameters that are missing or reject their value are
    /// counted and skipped. Fails only if nothing could be applied.
    pub fn load_preset(&mut self, name: &str) -> Result<BatchResult> {
        self.try_load(name)
            .inspect_err(|e| warn!("Could not load preset: {}", e))
    }

    fn try_load(&mut self, name: &str) -> Result<BatchResult> {
        let data = self
            .store
            .get(name)
            .cloned()
            .ok_or_else(|| PresetError::NotFound(name.to_string()))?;
        let target = self.live_target()?;

        self.lerp.cancel();
        let result = apply_batch(&mut *target.borrow_mut(), &data);
        info!(
            "Loaded preset '{}': {} parameters set, {} errors",
            name,
            result.success_count(),
            result.error_count()
        );
        for (par, err) in &result.errors {
            debug!("  {}: {}", par, err);
        }

        // Let change callbacks triggered by the writes settle first
        self.scheduler
            .schedule(self.settings.settle_ticks, Deferred::ClearChanged);

        if !result.any_applied() {
            self.update_info();
            return Err(PresetError::NothingApplied {
                name: name.to_string(),
                errors: result.error_count(),
            });
        }

        self.store.set_active(Some(name));
        self.update_info();
        self.update_menu();
        Ok(result)
    }

    /// Interpolate to a preset over `seconds`. Very short times load
    /// instantly.
    pub fn load_preset_with_lerp(&mut self, name: &str, seconds: f64) -> Result<Recall> {
        if seconds <= MIN_LERP_SECONDS {
            return self.load_preset(name).map(Recall::Instant);
        }
        self.try_lerp(name, seconds)
            .inspect_err(|e| warn!("Could not start lerp: {}", e))
    }

    fn try_lerp(&mut self, name: &str, seconds: f64) -> Result<Recall> {
        let data = self
            .store
            .get(name)
            .ok_or_else(|| PresetError::NotFound(name.to_string()))?;
        let target = self.live_target()?;

        let plan = self.lerp.begin(data, &target, seconds, self.clock.now());

        self.store.set_active(Some(name));
        self.update_info();
        self.update_menu();
        info!(
            "Started lerp to preset '{}' over {} seconds ({} numeric parameters, {} non-numeric)",
            name, seconds, plan.numeric, plan.deferred
        );
        Ok(Recall::Lerp(plan))
    }

    /// Load using the lerp settings: interpolated when `lerp` is on.
    pub fn recall(&mut self, name: &str) -> Result<Recall> {
        if self.settings.lerp {
            let seconds = self.settings.lerp_time;
            self.load_preset_with_lerp(name, seconds)
        } else {
            self.load_preset(name).map(Recall::Instant)
        }
    }

    pub fn delete_preset(&mut self, name: &str) -> Result<()> {
        let was_active = self.store.current_preset_name() == Some(name);
        if self.store.remove(name).is_none() {
            let err = PresetError::NotFound(name.to_string());
            warn!("Could not delete preset: {}", err);
            return Err(err);
        }

        self.refresh_menu_items();
        if was_active {
            self.update_info();
            self.update_menu();
        }
        info!("Preset '{}' deleted", name);
        Ok(())
    }

    /// Remove every preset, returning how many were deleted.
    pub fn delete_all_presets(&mut self) -> Result<usize> {
        if self.store.is_empty() {
            warn!("No presets to delete");
            return Err(PresetError::NothingToDelete);
        }

        let count = self.store.clear();
        self.after_store_change();
        info!("Deleted all {} presets", count);
        Ok(count)
    }

    /// Set every parameter named in the table to a uniform random value
    /// within its normalized range.
    pub fn randomize(&mut self) -> Result<BatchResult> {
        self.try_randomize()
            .inspect_err(|e| warn!("Could not randomize: {}", e))
    }

    fn try_randomize(&mut self) -> Result<BatchResult> {
        let target = self.live_target()?;
        let table = self
            .par_table
            .as_ref()
            .and_then(|source| source.table())
            .ok_or(PresetError::NoTable)?;
        if table.num_rows() <= 1 {
            return Err(PresetError::EmptyTable);
        }

        let mut result = BatchResult::default();
        {
            let mut container = target.borrow_mut();
            for name in table.names() {
                let Some(par) = container.par_mut(name) else {
                    result.fail(name, ParError::NotFound(name.to_string()));
                    continue;
                };
                let Some((lo, hi)) = par
                    .bounds()
                    .filter(|(lo, hi)| (hi - lo).is_finite())
                else {
                    result.fail(name, ParError::NoBounds(name.to_string()));
                    continue;
                };

                let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                let value = self.rng.gen_range(lo..=hi);
                result.record(name, apply_value(par, &ParValue::Float(value)));
            }
        }

        info!(
            "Randomized {} parameters, {} errors",
            result.success_count(),
            result.error_count()
        );
        if result.any_applied() {
            self.mark_changed();
        }
        Ok(result)
    }

    /// Live parameters were edited; flag the active preset as changed.
    pub fn mark_changed(&mut self) {
        if self.store.current_preset_name().is_some() && !self.store.has_changed() {
            self.store.set_has_changed(true);
            self.update_info();
        }
    }

    // ---------- Host tick ----------

    /// Run due deferred actions, then advance a running lerp.
    pub fn update(&mut self) -> Option<TickOutcome> {
        for action in self.scheduler.advance() {
            self.run_deferred(action);
        }

        if !self.lerp.is_active() {
            return None;
        }

        let outcome = self.lerp.tick(self.clock.now(), self.settings.easing());
        if let TickOutcome::Completed { .. } = outcome {
            self.scheduler
                .schedule(self.settings.settle_ticks, Deferred::ClearChanged);
            self.update_info();
        }
        Some(outcome)
    }

    fn run_deferred(&mut self, action: Deferred) {
        match action {
            Deferred::ClearChanged => {
                self.store.set_has_changed(false);
                self.update_info();
            }
            Deferred::SyncMenu(value) => {
                if self.ui.menu_value().is_some_and(|current| current != value) {
                    self.ui.set_menu_value(&value);
                }
            }
            Deferred::ImportFile => {
                if let Err(e) = self.import_from_file() {
                    debug!("Deferred file import dropped: {}", e);
                }
            }
        }
    }

    // ---------- Display ----------

    /// Push the status text to the UI.
    pub fn update_info(&mut self) {
        let text = self.store.status_text();
        self.ui.set_status(&text);
    }

    /// Schedule the menu to follow the active preset, unless it already does.
    pub fn update_menu(&mut self) {
        let value = self
            .store
            .current_preset_name()
            .unwrap_or(MENU_NONE)
            .to_string();
        if self.ui.menu_value().is_some_and(|current| current != value) {
            self.scheduler
                .schedule(self.settings.menu_sync_ticks, Deferred::SyncMenu(value));
        }
    }

    fn refresh_menu_items(&mut self) {
        self.ui.set_menu_items(self.store.preset_names());
    }

    fn refresh_ui(&mut self) {
        self.update_info();
        self.refresh_menu_items();
    }

    fn after_store_change(&mut self) {
        self.refresh_menu_items();
        self.update_info();
        self.update_menu();
    }

    fn live_target(&self) -> Result<TargetRef> {
        self.target
            .as_ref()
            .filter(|target| target.borrow().is_alive())
            .cloned()
            .ok_or(PresetError::NoTarget)
    }

    fn selected_preset(&self) -> Option<String> {
        self.ui
            .menu_value()
            .filter(|value| !value.is_empty() && value != MENU_NONE)
    }

    // ---------- Callback handlers ----------

    /// Menu selection changed: recall the chosen preset, or clear on `None`.
    pub fn on_preset_menu(&mut self, value: &str) -> Result<Option<Recall>> {
        if value.is_empty() || value == MENU_NONE {
            self.store.set_active(None);
            self.update_info();
            return Ok(None);
        }
        self.recall(value).map(Some)
    }

    /// Save button: uses the save name setting, or auto-names when blank.
    pub fn on_save(&mut self) -> Result<String> {
        let name = self.settings.save_name().map(str::to_string);
        let saved = self.save_preset(name.as_deref())?;
        self.set_active_preset(Some(&saved));
        Ok(saved)
    }

    /// Save-as is handled by the host's own dialog.
    pub fn on_save_as(&mut self) {
        debug!("Save-as requested; handled by the host");
    }

    pub fn on_delete(&mut self) -> Result<()> {
        match self.selected_preset() {
            Some(name) => self.delete_preset(&name),
            None => {
                warn!("No preset selected to delete");
                Err(PresetError::NoSelection)
            }
        }
    }

    pub fn on_delete_all(&mut self) -> Result<usize> {
        self.delete_all_presets()
    }

    /// Reload button: recall the menu selection again.
    pub fn on_reload(&mut self) -> Result<Recall> {
        match self.selected_preset() {
            Some(name) => self.recall(&name),
            None => {
                warn!("No preset selected to reload");
                Err(PresetError::NoSelection)
            }
        }
    }

    pub fn on_randomize(&mut self) -> Result<BatchResult> {
        self.randomize()
    }

    /// Export the parameter table through the file collaborator.
    pub fn on_file_save(&mut self) -> Result<()> {
        self.try_file_save()
            .inspect_err(|e| warn!("Could not export preset table: {}", e))
    }

    fn try_file_save(&mut self) -> Result<()> {
        let table = self
            .par_table
            .as_ref()
            .and_then(|source| source.table())
            .ok_or(PresetError::NoTable)?;
        let file = self.file.as_mut().ok_or(PresetError::NoFile)?;
        file.write(&table)?;
        info!("Preset table exported to file");
        Ok(())
    }

    /// Reload the file, then import it as a preset a few ticks later.
    pub fn on_file_load(&mut self) -> Result<()> {
        let refreshed = match self.file.as_mut() {
            Some(file) => file.refresh().map_err(PresetError::from),
            None => Err(PresetError::NoFile),
        };
        if let Err(e) = refreshed {
            warn!("Could not reload preset file: {}", e);
            return Err(e);
        }
        self.scheduler
            .schedule(self.settings.import_ticks, Deferred::ImportFile);
        Ok(())
    }

    /// Store the loaded file as a preset named after the file, then recall it.
    pub fn import_from_file(&mut self) -> Result<String> {
        self.try_import()
            .inspect_err(|e| warn!("Could not import preset from file: {}", e))
    }

    fn try_import(&mut self) -> Result<String> {
        let file = self.file.as_ref().ok_or(PresetError::NoFile)?;
        let table = file.table().ok_or(FileError::NotLoaded)?;
        let pars = table.read_pars();
        if pars.is_empty() {
            return Err(PresetError::EmptyTable);
        }
        let path = file.source_path();
        let name = path
            .as_deref()
            .and_then(preset_name_from_path)
            .ok_or_else(|| PresetError::BadFileName(path.clone()))?;

        let count = pars.len();
        let name = self
            .store
            .insert(Some(&name), pars, self.settings.save_overwrite);
        self.after_store_change();
        info!(
            "Preset '{}' imported from file with {} parameters",
            name, count
        );

        if let Err(e) = self.recall(&name) {
            debug!("Imported preset '{}' was not applied: {}", name, e);
        }
        Ok(name)
    }
}
