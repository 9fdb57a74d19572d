//! YAML-backed settings source.
//!
//! Reads the toolbar settings from a config export directory, where each
//! config object lives in its own `{name}.yml` file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use super::{SETTINGS_NAMESPACE, SettingsSource, lookup};
use crate::error::{ToolbarError, ToolbarResult};

/// Maximum settings file size (1 MB). Larger files are rejected rather than
/// read into memory.
const MAX_SETTINGS_FILE_SIZE: u64 = 1024 * 1024;

/// Settings loaded from `wienimal_editor_toolbar.settings.yml`.
#[derive(Debug, Clone)]
pub struct YamlSettings {
    path: PathBuf,
    values: Value,
}

impl YamlSettings {
    /// File name of the settings object inside a config directory.
    pub fn filename() -> String {
        format!("{SETTINGS_NAMESPACE}.yml")
    }

    /// Load the settings file from a config export directory.
    ///
    /// A missing file yields empty settings: every flag off, every list empty.
    pub fn from_dir(dir: &Path) -> ToolbarResult<Self> {
        let path = dir.join(Self::filename());
        match fs::metadata(&path) {
            Ok(_) => Self::from_file(&path),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "toolbar settings not found, using defaults");
                Ok(Self {
                    path,
                    values: Value::Null,
                })
            }
            Err(e) => Err(ToolbarError::io(path, e)),
        }
    }

    /// Load a settings file.
    pub fn from_file(path: &Path) -> ToolbarResult<Self> {
        let metadata = fs::metadata(path).map_err(|e| ToolbarError::io(path, e))?;
        if metadata.len() > MAX_SETTINGS_FILE_SIZE {
            return Err(ToolbarError::TooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit: MAX_SETTINGS_FILE_SIZE,
            });
        }

        let contents = fs::read_to_string(path).map_err(|e| ToolbarError::io(path, e))?;
        let settings = Self::parse(path, &contents)?;
        debug!(path = %path.display(), "loaded toolbar settings");
        Ok(settings)
    }

    /// Parse settings from YAML text. `path` is only used in errors.
    pub fn parse(path: &Path, contents: &str) -> ToolbarResult<Self> {
        let values: Value = if contents.trim().is_empty() {
            Value::Null
        } else {
            serde_yml::from_str(contents).map_err(|source| ToolbarError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        };
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// Path the settings were loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsSource for YamlSettings {
    fn get(&self, key: &str) -> Option<Value> {
        lookup(&self.values, key).cloned()
    }
}
