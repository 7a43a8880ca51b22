//! Preset file import/export
//!
//! The host's file operators are reached through [`PresetFile`]: a write
//! trigger, a reload trigger, the table the last reload produced and the path
//! it came from. [`TsvFile`] does the same on the local filesystem.

use crate::error::FileError;
use crate::table::Table;
use std::fs;
use std::path::{Path, PathBuf};

pub trait PresetFile {
    /// Export `table`
    fn write(&mut self, table: &Table) -> Result<(), FileError>;

    /// Re-read the file. The result may only be visible a few ticks later.
    fn refresh(&mut self) -> Result<(), FileError>;

    /// Table from the last refresh
    fn table(&self) -> Option<Table>;

    fn source_path(&self) -> Option<PathBuf>;
}

/// Tab-separated file on disk.
#[derive(Debug, Clone)]
pub struct TsvFile {
    path: PathBuf,
    loaded: Option<Table>,
}

impl TsvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: None,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> FileError {
        FileError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PresetFile for TsvFile {
    fn write(&mut self, table: &Table) -> Result<(), FileError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, table.to_tsv()).map_err(|e| self.io_error(e))
    }

    fn refresh(&mut self) -> Result<(), FileError> {
        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        self.loaded = Some(Table::from_tsv(&content));
        Ok(())
    }

    fn table(&self) -> Option<Table> {
        self.loaded.clone()
    }

    fn source_path(&self) -> Option<PathBuf> {
        Some(self.path.clone())
    }
}

/// File name without directory or extension, `None` if that leaves nothing.
#[must_use]
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .filter(|stem| !stem.is_empty())
}
