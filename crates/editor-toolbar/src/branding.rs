//! Toolbar branding: logo discovery and deployed version info.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{ToolbarError, ToolbarResult};

/// Logo file extensions, in order of preference.
const LOGO_EXTENSIONS: &[&str] = &["svg", "png", "jpg"];

/// Version file written by deployments, relative to the site root.
const VERSION_FILE: &str = "version.json";

/// Logo and version info shown in the toolbar header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandingInfo {
    pub logo: Option<String>,
    pub version: Option<Value>,
}

/// Finds branding assets below a site root.
#[derive(Debug, Clone)]
pub struct Branding {
    site_root: PathBuf,
    admin_theme: Option<PathBuf>,
    active_theme: Option<PathBuf>,
    module: PathBuf,
}

impl Branding {
    /// `module` is the toolbar module directory, relative to `site_root`.
    pub fn new(site_root: impl Into<PathBuf>, module: impl Into<PathBuf>) -> Self {
        Self {
            site_root: site_root.into(),
            admin_theme: None,
            active_theme: None,
            module: module.into(),
        }
    }

    pub fn admin_theme(mut self, path: impl Into<PathBuf>) -> Self {
        self.admin_theme = Some(path.into());
        self
    }

    pub fn active_theme(mut self, path: impl Into<PathBuf>) -> Self {
        self.active_theme = Some(path.into());
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            site_root: config.site_root.clone(),
            admin_theme: config.admin_theme_path.clone(),
            active_theme: config.active_theme_path.clone(),
            module: config.module_path.clone(),
        }
    }

    /// Logo paths to check, relative to the site root, most specific first.
    ///
    /// The active theme's admin logo wins, then the admin theme's logo, the
    /// active theme's logo, and finally the module's bundled logo.
    pub fn logo_candidates(&self) -> Vec<PathBuf> {
        let stems = [
            self.active_theme.as_ref().map(|t| t.join("logo-admin")),
            self.admin_theme.as_ref().map(|t| t.join("logo")),
            self.active_theme.as_ref().map(|t| t.join("logo")),
            Some(self.module.join("logo")),
        ];

        stems
            .into_iter()
            .flatten()
            .flat_map(|stem| LOGO_EXTENSIONS.iter().map(move |ext| stem.with_extension(ext)))
            .collect()
    }

    /// Root-relative URL path of the first logo that exists.
    pub fn logo(&self) -> Option<String> {
        let found = self
            .logo_candidates()
            .into_iter()
            .find(|candidate| self.site_root.join(candidate).is_file());
        debug!(logo = ?found, "resolved toolbar logo");
        found.map(|path| url_path(&path))
    }

    /// Parsed `version.json`, or `None` when the site has none.
    pub fn version_info(&self) -> ToolbarResult<Option<Value>> {
        let path = self.site_root.join(VERSION_FILE);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ToolbarError::io(path, e)),
        }
    }

    pub fn info(&self) -> ToolbarResult<BrandingInfo> {
        Ok(BrandingInfo {
            logo: self.logo(),
            version: self.version_info()?,
        })
    }
}

/// Render a relative path as `/segment/segment`.
fn url_path(path: &Path) -> String {
    let segments: Vec<_> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(segment) => Some(segment.to_string_lossy()),
            _ => None,
        })
        .collect();
    format!("/{}", segments.join("/"))
}
