//! Toolbar settings access.
//!
//! All settings reads go through [`SettingsSource`], a read-only key lookup
//! under the [`SETTINGS_NAMESPACE`] namespace. Dotted keys such as
//! `menu_items.expand` resolve into nested mappings.
//!
//! Manipulators never query a source directly: they work from a
//! [`ToolbarSettings`] snapshot taken once per operation chain.

mod snapshot;
pub mod yaml;

use serde_json::{Map, Value};

pub use snapshot::ToolbarSettings;
pub use yaml::YamlSettings;

/// Settings namespace owned by the editor toolbar.
pub const SETTINGS_NAMESPACE: &str = "wienimal_editor_toolbar.settings";

/// Setting keys.
pub mod keys {
    pub const SHOW_COMBINED_ADD_CONTENT: &str = "show_combined_add_content";
    pub const SHOW_COMBINED_CONTENT_OVERVIEW: &str = "show_combined_content_overview";
    pub const MENU_ITEMS_EXPAND: &str = "menu_items.expand";
    pub const MENU_ITEMS_REMOVE: &str = "menu_items.remove";
    pub const MENU_ITEMS_UNCLICKABLE: &str = "menu_items.unclickable";
    pub const CONTENT_TAXONOMY_TERM: &str = "content.taxonomy_term";
}

/// Read-only settings lookup.
pub trait SettingsSource: Send + Sync {
    /// Value stored under `key`, or `None` when unset.
    fn get(&self, key: &str) -> Option<Value>;
}

/// Resolve `key` against a settings document.
///
/// A literal key wins over a dotted path so flat documents work as well as
/// nested ones.
pub(crate) fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    if let Some(value) = root.get(key) {
        return Some(value);
    }
    key.split('.')
        .try_fold(root, |value, segment| value.get(segment))
}

/// In-memory settings, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: Value,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self {
            values: Value::Object(Map::new()),
        }
    }

    /// Wrap an existing settings document.
    pub fn from_value(values: Value) -> Self {
        Self { values }
    }

    /// Set a value under a literal key.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if !self.values.is_object() {
            self.values = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut self.values {
            map.insert(key.into(), value.into());
        }
        self
    }
}

impl SettingsSource for MemorySettings {
    fn get(&self, key: &str) -> Option<Value> {
        lookup(&self.values, key).cloned()
    }
}
