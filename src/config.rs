//! Presetter control settings
//!
//! Mirrors the add-on's own parameters (save name, overwrite toggle, lerp
//! toggle, time and method). Hosts usually set these directly; they can also
//! be loaded from a TOML file.

use crate::easing::Easing;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetterSettings {
    /// Name used by the Save button; empty means auto-name
    pub save_name: String,
    /// Replace presets with the same name instead of suffixing `_NNN`
    pub save_overwrite: bool,
    /// Recall presets with interpolation
    pub lerp: bool,
    /// Interpolation time in seconds
    pub lerp_time: f64,
    /// Easing curve key, e.g. `ease_in_out_cubic`
    pub lerp_method: String,
    /// Ticks to wait before clearing the dirty flag after a load
    pub settle_ticks: u64,
    /// Ticks to wait before writing the preset menu
    pub menu_sync_ticks: u64,
    /// Ticks to wait for the file collaborator after a reload
    pub import_ticks: u64,
}

impl Default for PresetterSettings {
    fn default() -> Self {
        Self {
            save_name: String::new(),
            save_overwrite: false,
            lerp: false,
            lerp_time: 1.0,
            lerp_method: Easing::Linear.name().to_string(),
            settle_ticks: 2,
            menu_sync_ticks: 5,
            import_ticks: 5,
        }
    }
}

impl PresetterSettings {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Configured easing, linear for unknown names
    #[must_use]
    pub fn easing(&self) -> Easing {
        Easing::from_name_or_linear(&self.lerp_method)
    }

    /// Trimmed save name, `None` when blank
    #[must_use]
    pub fn save_name(&self) -> Option<&str> {
        Some(self.save_name.trim()).filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = PresetterSettings::default();
        assert!(!settings.lerp);
        assert_eq!(settings.easing(), Easing::Linear);
        assert_eq!(settings.save_name(), None);
        assert_eq!(settings.settle_ticks, 2);
    }

    #[test]
    fn test_parse_partial_toml() {
        let settings = PresetterSettings::from_toml_str(
            "lerp = true\nlerp_time = 2.5\nlerp_method = \"ease_out_bounce\"\n",
        )
        .unwrap();
        assert!(settings.lerp);
        assert_eq!(settings.lerp_time, 2.5);
        assert_eq!(settings.easing(), Easing::EaseOutBounce);
        assert!(!settings.save_overwrite);
    }

    #[test]
    fn test_unknown_method_is_linear() {
        let settings = PresetterSettings {
            lerp_method: "spring".into(),
            ..Default::default()
        };
        assert_eq!(settings.easing(), Easing::Linear);
    }

    #[test]
    fn test_save_name_trimmed() {
        let settings = PresetterSettings {
            save_name: "  warm  ".into(),
            ..Default::default()
        };
        assert_eq!(settings.save_name(), Some("warm"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            PresetterSettings::from_toml_str("lerp = \"yes\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presetter.toml");
        fs::write(&path, "save_overwrite = true\n").unwrap();
        assert!(PresetterSettings::load_from(&path).unwrap().save_overwrite);
    }
}
