//! Settings snapshot used by the manipulators.

use serde_json::Value;
use tracing::warn;

use super::{SettingsSource, keys};

/// Taxonomy term display mode that lists every vocabulary in the overview.
const TAXONOMY_DISPLAY_ALL: &str = "all";

/// Toolbar settings, read once per operation chain.
///
/// Missing settings are `false` or empty. Settings of the wrong type are
/// logged and treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolbarSettings {
    /// Replace the built-in "add content" items with one combined item.
    pub show_combined_add_content: bool,

    /// Show the combined "content overview" item.
    pub show_combined_content_overview: bool,

    /// Root keys whose children move up to the root.
    pub expand: Vec<String>,

    /// Plugin ids to forbid.
    pub remove: Vec<String>,

    /// Plugin ids whose links become plain text.
    pub unclickable: Vec<String>,

    /// Taxonomy term display mode of the content overview.
    pub taxonomy_term_display: Option<String>,
}

impl ToolbarSettings {
    /// Read every toolbar setting from `source`.
    pub fn load(source: &dyn SettingsSource) -> Self {
        Self {
            show_combined_add_content: read_bool(source, keys::SHOW_COMBINED_ADD_CONTENT),
            show_combined_content_overview: read_bool(
                source,
                keys::SHOW_COMBINED_CONTENT_OVERVIEW,
            ),
            expand: read_list(source, keys::MENU_ITEMS_EXPAND),
            remove: read_list(source, keys::MENU_ITEMS_REMOVE),
            unclickable: read_list(source, keys::MENU_ITEMS_UNCLICKABLE),
            taxonomy_term_display: read_string(source, keys::CONTENT_TAXONOMY_TERM),
        }
    }

    /// Whether the content overview lists all taxonomy terms.
    pub fn lists_all_taxonomy_terms(&self) -> bool {
        self.taxonomy_term_display.as_deref() == Some(TAXONOMY_DISPLAY_ALL)
    }
}

fn read_bool(source: &dyn SettingsSource, key: &str) -> bool {
    match source.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => flag,
        // Config exports store checkboxes as 0/1.
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(other) => {
            warn!(key, value = %other, "expected boolean setting, treating as false");
            false
        }
    }
}

fn read_list(source: &dyn SettingsSource, key: &str) -> Vec<String> {
    match source.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                other => {
                    warn!(key, value = %other, "ignoring non-string list entry");
                    None
                }
            })
            .collect(),
        Some(other) => {
            warn!(key, value = %other, "expected list setting, treating as empty");
            Vec::new()
        }
    }
}

fn read_string(source: &dyn SettingsSource, key: &str) -> Option<String> {
    match source.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            warn!(key, value = %other, "expected string setting, ignoring");
            None
        }
    }
}
