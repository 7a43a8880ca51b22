//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// Failure on a single parameter during a batch write.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParError {
    #[error("parameter '{0}' not found on target")]
    NotFound(String),

    #[error("could not read parameter '{name}': {reason}")]
    Read { name: String, reason: String },

    #[error("could not set parameter '{name}': {reason}")]
    Write { name: String, reason: String },

    #[error("cannot convert {value} ({kind}) for {style} parameter")]
    Coercion {
        value: String,
        kind: &'static str,
        style: String,
    },

    #[error("parameter '{0}' has no usable range")]
    NoBounds(String),
}

/// Failure of a preset operation as a whole.
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("preset '{0}' not found")]
    NotFound(String),

    #[error("target operator is not set or no longer valid")]
    NoTarget,

    #[error("parameter table not found")]
    NoTable,

    #[error("no parameters found in table")]
    EmptyTable,

    #[error("no preset selected")]
    NoSelection,

    #[error("no presets to delete")]
    NothingToDelete,

    #[error("no parameters of preset '{name}' could be applied ({errors} errors)")]
    NothingApplied { name: String, errors: usize },

    #[error("preset file collaborator not configured")]
    NoFile,

    #[error("could not derive a preset name from {0:?}")]
    BadFileName(Option<PathBuf>),

    #[error(transparent)]
    File(#[from] FileError),
}

/// Persistence failures. Logged by the store, never fatal.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Preset file import/export failures.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no file has been loaded")]
    NotLoaded,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T, E = PresetError> = std::result::Result<T, E>;
