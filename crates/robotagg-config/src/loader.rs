// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./robotagg.toml` > `~/.config/robotagg/robotagg.toml` >
//! `/etc/robotagg/robotagg.toml` with environment variable overrides via `ROBOTAGG_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RobotaggConfig;

/// Config file name searched in every layer.
pub const CONFIG_FILE_NAME: &str = "robotagg.toml";

/// System-wide config location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/robotagg/robotagg.toml";

/// Per-user config location, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("robotagg").join(CONFIG_FILE_NAME))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/robotagg/robotagg.toml` (system-wide)
/// 3. `~/.config/robotagg/robotagg.toml` (user XDG config)
/// 4. `./robotagg.toml` (local directory)
/// 5. `ROBOTAGG_*` environment variables
pub fn load_config() -> Result<RobotaggConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<RobotaggConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RobotaggConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RobotaggConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RobotaggConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RobotaggConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `ROBOTAGG_STORAGE_DATABASE_PATH` must map to
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("ROBOTAGG_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a prefix-stripped env key to its dotted config path.
///
/// Figment passes keys in their original case, so matching is done on the
/// lowercased key.
pub(crate) fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ["app", "storage", "gateway", "history", "ui"] {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}
