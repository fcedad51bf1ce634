//! Persisted display-mode preference stores.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Preference store errors
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Preference file is not valid JSON")]
    Json(#[from] serde_json::Error),
}

/// Key-value access to the single dark-mode boolean.
///
/// `load` returns `None` while nothing has been persisted yet.
pub trait PreferenceStore {
    fn load(&self) -> Result<Option<bool>, PreferenceError>;
    fn save(&mut self, dark: bool) -> Result<(), PreferenceError>;
}

/// In-process store, nothing survives the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStore {
    value: Option<bool>,
}

impl MemoryStore {
    pub const fn new(value: Option<bool>) -> Self {
        Self { value }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Result<Option<bool>, PreferenceError> {
        Ok(self.value)
    }

    fn save(&mut self, dark: bool) -> Result<(), PreferenceError> {
        self.value = Some(dark);
        Ok(())
    }
}

/// On-disk layout, same key the browser script uses in `localStorage`.
#[derive(Debug, Serialize, Deserialize)]
struct PreferenceFile {
    #[serde(rename = "darkMode")]
    dark_mode: bool,
}

/// JSON file store: `{ "darkMode": true }`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FileStore {
    fn load(&self) -> Result<Option<bool>, PreferenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|err| PreferenceError::Io(self.path.clone(), err))?;
        let file: PreferenceFile = serde_json::from_str(&content)?;
        Ok(Some(file.dark_mode))
    }

    fn save(&mut self, dark: bool) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| PreferenceError::Io(parent.into(), err))?;
        }
        let content = serde_json::to_string(&PreferenceFile { dark_mode: dark })?;
        fs::write(&self.path, content).map_err(|err| PreferenceError::Io(self.path.clone(), err))
    }
}
