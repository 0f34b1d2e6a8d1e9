//! Persisted theme preference.
//!
//! The dark-mode flag is the only client-side state kept on disk. It is read
//! once at startup and written back on every change, as
//! `{"darkMode": true}` in `~/.taskboard/preferences.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{Result, SettingsError};
use crate::loader::config_dir;

/// Default preference file path.
pub fn preferences_path() -> PathBuf {
    config_dir().join("preferences.json")
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredPreferences {
    dark_mode: bool,
}

/// Dark-mode preference backed by a JSON file.
#[derive(Clone, Debug)]
pub struct ThemePreference {
    path: PathBuf,
    dark_mode: bool,
}

impl ThemePreference {
    /// Read the preference from `path`.
    ///
    /// A missing or unreadable file yields `default_dark`; the file is not
    /// created until the first change.
    pub fn load(path: impl Into<PathBuf>, default_dark: bool) -> Self {
        let path = path.into();
        let dark_mode = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<StoredPreferences>(&content) {
                Ok(stored) => stored.dark_mode,
                Err(e) => {
                    warn!(?path, error = %e, "corrupt preference file, using default theme");
                    default_dark
                }
            },
            Err(_) => {
                debug!(?path, "no preference file, using default theme");
                default_dark
            }
        };
        Self { path, dark_mode }
    }

    /// Whether dark mode is on.
    pub fn is_dark(&self) -> bool {
        self.dark_mode
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the preference and persist it.
    pub fn set(&mut self, dark_mode: bool) -> Result<()> {
        self.dark_mode = dark_mode;
        self.persist()
    }

    /// Flip the preference, persist it, and return the new value.
    pub fn toggle(&mut self) -> Result<bool> {
        self.set(!self.dark_mode)?;
        Ok(self.dark_mode)
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(SettingsError::io(parent))?;
        }
        let body = serde_json::to_string_pretty(&StoredPreferences {
            dark_mode: self.dark_mode,
        })?;
        std::fs::write(&self.path, body).map_err(SettingsError::io(&self.path))?;
        debug!(path = ?self.path, dark_mode = self.dark_mode, "theme preference saved");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
