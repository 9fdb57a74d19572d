//! Library error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading settings, trees, or branding files.
///
/// Tree manipulation itself never fails; these only cover the I/O and
/// parsing done at the edges.
#[derive(Debug, Error)]
pub enum ToolbarError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("{path} is {size} bytes, limit is {limit}")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ToolbarError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using ToolbarError.
pub type ToolbarResult<T> = Result<T, ToolbarError>;
