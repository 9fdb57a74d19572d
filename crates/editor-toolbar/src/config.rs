//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Result, ensure};

/// Process configuration for the `editor-toolbar` binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Config export directory holding the toolbar settings file
    /// (default: ./config/sync).
    pub settings_dir: PathBuf,

    /// Site root that theme and module paths are relative to (default: .).
    pub site_root: PathBuf,

    /// Admin theme directory, relative to the site root.
    pub admin_theme_path: Option<PathBuf>,

    /// Active (front-end) theme directory, relative to the site root.
    pub active_theme_path: Option<PathBuf>,

    /// Toolbar module directory, relative to the site root
    /// (default: modules/contrib/wienimal_editor_toolbar).
    pub module_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let settings_dir = var("TOOLBAR_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./config/sync"));

        let site_root = var("SITE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let admin_theme_path = var("ADMIN_THEME_PATH").map(PathBuf::from);
        let active_theme_path = var("ACTIVE_THEME_PATH").map(PathBuf::from);

        let module_path = var("TOOLBAR_MODULE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("modules/contrib/wienimal_editor_toolbar"));

        for (name, path) in [
            ("ADMIN_THEME_PATH", admin_theme_path.as_ref()),
            ("ACTIVE_THEME_PATH", active_theme_path.as_ref()),
            ("TOOLBAR_MODULE_PATH", Some(&module_path)),
        ] {
            if let Some(path) = path {
                ensure!(
                    path.is_relative(),
                    "{name} must be relative to SITE_ROOT, got {}",
                    path.display()
                );
            }
        }

        Ok(Self {
            settings_dir,
            site_root,
            admin_theme_path,
            active_theme_path,
            module_path,
        })
    }
}
