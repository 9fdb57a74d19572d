//! Editor Toolbar Library
//!
//! Adjusts the administrative menu tree for editorial users: hides items,
//! merges subtrees into the root, disables links, and toggles the combined
//! "content overview" and "add content" shortcuts based on stored settings.
//! The `editor-toolbar` binary wraps this for use from the command line.

pub mod branding;
pub mod config;
pub mod error;
pub mod menu;
pub mod settings;

pub use branding::Branding;
pub use config::Config;
pub use error::{ToolbarError, ToolbarResult};
pub use menu::{MenuTree, ToolbarManipulators};
pub use settings::{MemorySettings, SettingsSource, ToolbarSettings, YamlSettings};
