//! # presetter
//!
//! Parameter presets for node-based graphics hosts, with eased time-based
//! recall.
//!
//! This crate provides:
//! - **Preset storage** - Named snapshots of parameter values, persisted through a host port
//! - **Lerp engine** - Time-based interpolation from live values to a preset
//! - **Easing curves** - Linear plus 30 quad/cubic/quart/quint/sine/expo/circ/back/elastic/bounce curves
//! - **Parameter seams** - Traits for the host's operators, tables, files and UI
//! - **Randomize** - Uniform random values within each parameter's range
//!
//! ## Quick Start
//!
//! ```rust
//! use presetter::prelude::*;
//!
//! let (live, target) = MemoryContainer::new()
//!     .with(MemoryParameter::new("Tx", ParStyle::Float, 0.0))
//!     .into_shared();
//!
//! let mut table = Table::with_header();
//! table.push_row(["Tx", "10.0"]);
//!
//! let clock = ManualClock::new(0.0);
//! let mut presetter = Presetter::new(PresetStore::in_memory())
//!     .with_target(target)
//!     .with_table(table)
//!     .with_clock(clock.clone());
//!
//! let name = presetter.save_preset(None).unwrap();
//! assert_eq!(name, "preset_001");
//!
//! // Move Tx to the stored value over two seconds
//! presetter.load_preset_with_lerp(&name, 2.0).unwrap();
//! clock.set(1.0);
//! presetter.update();
//! assert_eq!(live.borrow().get("Tx"), Some(ParValue::Float(5.0)));
//! ```
//!
//! ## Easing
//!
//! Curves are looked up by key; unknown keys fall back to linear.
//!
//! ```rust
//! use presetter::Easing;
//!
//! assert_eq!(Easing::from_name_or_linear("ease_in_quad").apply(0.5), 0.25);
//! assert_eq!(Easing::from_name_or_linear("wobble"), Easing::Linear);
//! ```

pub mod clock;
pub mod config;
pub mod easing;
pub mod error;
pub mod file;
pub mod lerp;
pub mod memory;
pub mod param;
pub mod presetter;
pub mod scheduler;
pub mod store;
pub mod table;
pub mod value;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::PresetterSettings;
pub use easing::{ease, Easing};
pub use error::{ConfigError, FileError, ParError, PresetError, StateError};
pub use file::{PresetFile, TsvFile};
pub use lerp::{LerpEngine, LerpPlan, PollTrigger, TickOutcome};
pub use param::{BatchResult, ParStyle, Parameter, ParameterContainer, TargetRef};
pub use presetter::{Presetter, Recall, UiSurface};
pub use store::{JsonFileState, MemoryState, PresetStore, StatePort, StoredState};
pub use table::{Table, TableSource};
pub use value::{ParValue, PresetData, Sample};

/// Prelude for common imports
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::config::PresetterSettings;
    pub use crate::easing::Easing;
    pub use crate::memory::{MemoryContainer, MemoryParameter, MemoryUi};
    pub use crate::param::{ParStyle, Parameter, ParameterContainer, TargetRef};
    pub use crate::presetter::{Presetter, Recall, UiSurface};
    pub use crate::store::{JsonFileState, PresetStore};
    pub use crate::table::Table;
    pub use crate::value::{ParValue, PresetData};
}
