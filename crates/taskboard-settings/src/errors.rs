//! Errors from loading settings and saving preferences.

use std::path::{Path, PathBuf};

/// Settings or preference file failure.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Reading or writing a file failed.
    #[error("cannot access {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for the settings shape.
    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value parsed but is unusable.
    #[error("invalid {key}: {reason}")]
    InvalidValue {
        /// Dotted camelCase key, e.g. `api.baseUrl`.
        key: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl SettingsError {
    /// Adapter for `map_err` on filesystem calls touching `path`.
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, SettingsError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
