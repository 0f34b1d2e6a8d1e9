//! Layered settings: compiled defaults, then the user's JSON file, then
//! `TASKBOARD_*` environment variables.
//!
//! The file layer is merged key by key into the serialized defaults, so a
//! file only needs the keys it changes. Nested objects merge recursively,
//! anything else in the file replaces the default outright, and an explicit
//! `null` leaves the default in place.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{Result, SettingsError};
use crate::types::TaskboardSettings;

const TIMEOUT_RANGE_MS: RangeInclusive<u64> = 1000..=600_000;

/// `~/.taskboard`, falling back to `/tmp/.taskboard` when `HOME` is unset.
pub fn config_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map_or_else(|| PathBuf::from("/tmp"), PathBuf::from)
        .join(".taskboard")
}

/// `~/.taskboard/settings.json`.
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// [`load_settings_from_path`] on [`settings_path`].
pub fn load_settings() -> Result<TaskboardSettings> {
    load_settings_from_path(&settings_path())
}

/// Build settings from `path` and the process environment.
///
/// A missing file yields defaults; invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<TaskboardSettings> {
    let mut settings = load_file_layer(path)?;
    apply_overrides(&mut settings, |name| std::env::var(name).ok());
    validate(&settings)?;
    Ok(settings)
}

fn load_file_layer(path: &Path) -> Result<TaskboardSettings> {
    let mut layered = serde_json::to_value(TaskboardSettings::default())?;
    if path.is_file() {
        let raw = std::fs::read_to_string(path).map_err(SettingsError::io(path))?;
        deep_merge(&mut layered, serde_json::from_str(&raw)?);
        debug!(?path, "merged settings file");
    } else {
        debug!(?path, "no settings file");
    }
    Ok(serde_json::from_value(layered)?)
}

/// Merge `overlay` into `base` in place.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    let Value::Object(entries) = overlay else {
        *base = overlay;
        return;
    };
    let Value::Object(slots) = base else {
        *base = Value::Object(entries);
        return;
    };
    for (key, value) in entries.into_iter().filter(|(_, v)| !v.is_null()) {
        match slots.get_mut(&key) {
            Some(slot) => deep_merge(slot, value),
            None => {
                let _ = slots.insert(key, value);
            }
        }
    }
}

/// Apply overrides read through `lookup` (normally `std::env::var`).
///
/// - `TASKBOARD_API_URL`: base URL (non-empty)
/// - `TASKBOARD_TIMEOUT_MS`: request timeout, 1000..=600000
/// - `TASKBOARD_LOG_LEVEL`: default log filter
/// - `TASKBOARD_DARK_MODE`: boolean
///
/// Invalid values are ignored with a warning.
pub fn apply_overrides(settings: &mut TaskboardSettings, lookup: impl Fn(&str) -> Option<String>) {
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = read("TASKBOARD_API_URL") {
        settings.api.base_url = v;
    }
    if let Some(v) = read("TASKBOARD_TIMEOUT_MS") {
        match parse_bounded(&v, &TIMEOUT_RANGE_MS) {
            Some(ms) => settings.api.request_timeout_ms = ms,
            None => warn!(key = "TASKBOARD_TIMEOUT_MS", value = %v, "timeout override out of range, ignoring"),
        }
    }
    if let Some(v) = read("TASKBOARD_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read("TASKBOARD_DARK_MODE") {
        match parse_flag(&v) {
            Some(b) => settings.ui.dark_mode = b,
            None => warn!(key = "TASKBOARD_DARK_MODE", value = %v, "not a boolean, ignoring"),
        }
    }
}

fn validate(settings: &TaskboardSettings) -> Result<()> {
    if settings.api.base_url.trim().is_empty() {
        return Err(SettingsError::InvalidValue {
            key: "api.baseUrl",
            reason: "must not be empty",
        });
    }
    if settings.api.request_timeout_ms == 0 {
        return Err(SettingsError::InvalidValue {
            key: "api.requestTimeoutMs",
            reason: "must be positive",
        });
    }
    Ok(())
}

/// `true`/`1`/`yes`/`on` and `false`/`0`/`no`/`off`, any case.
fn parse_flag(raw: &str) -> Option<bool> {
    const TRUTHY: [&str; 4] = ["true", "1", "yes", "on"];
    const FALSY: [&str; 4] = ["false", "0", "no", "off"];
    let raw = raw.trim();
    if TRUTHY.iter().any(|t| raw.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if FALSY.iter().any(|f| raw.eq_ignore_ascii_case(f)) {
        Some(false)
    } else {
        None
    }
}

fn parse_bounded(raw: &str, range: &RangeInclusive<u64>) -> Option<u64> {
    raw.trim().parse().ok().filter(|n| range.contains(n))
}
