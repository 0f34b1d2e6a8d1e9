//! Shape of `settings.json`: the `api`, `logging` and `ui` sections.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]`, so a
//! settings file may specify any subset of fields.

use serde::{Deserialize, Serialize};

/// Root settings type for the taskboard client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskboardSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Remote service connection.
    pub api: ApiSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
    /// Initial UI preferences.
    pub ui: UiSettings,
}

impl Default for TaskboardSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "taskboard".to_string(),
            api: ApiSettings::default(),
            logging: LoggingSettings::default(),
            ui: UiSettings::default(),
        }
    }
}

/// Remote task service connection settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// UI defaults. The live theme choice is stored in the preference file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiSettings {
    /// Dark mode when no preference has been saved yet.
    pub dark_mode: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
