//! # taskboard-settings
//!
//! Configuration for the taskboard client, loaded from three layers (in
//! priority order):
//! 1. **Compiled defaults**: [`TaskboardSettings::default()`]
//! 2. **User file**: `~/.taskboard/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `TASKBOARD_*` overrides (highest priority)
//!
//! The theme preference lives in a separate file managed by
//! [`ThemePreference`], since it is written at runtime.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod theme;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_overrides, config_dir, deep_merge, load_settings, load_settings_from_path,
    settings_path,
};
pub use theme::{ThemePreference, preferences_path};
pub use types::*;
