// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the robot aggregator.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use robotagg_core::Locale;
use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RobotaggConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Outbound HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Message history settings.
    #[serde(default)]
    pub history: HistoryConfig,

    /// User-facing message settings.
    #[serde(default)]
    pub ui: UiConfig,
}

/// Process-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("robotagg").join("robotagg.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("robotagg.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Outbound HTTP gateway configuration.
///
/// No timeout or retry setting: each call is a single
/// attempt with the HTTP client's default behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Reply text used when an endpoint reports success without a message.
    #[serde(default = "default_reply")]
    pub default_reply: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            default_reply: default_reply(),
        }
    }
}

fn default_user_agent() -> String {
    format!("robotagg/{}", env!("CARGO_PKG_VERSION"))
}

fn default_reply() -> String {
    "Message sent successfully".to_string()
}

/// Message history configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// Persist every send attempt as a message exchange.
    #[serde(default = "default_history_enabled")]
    pub enabled: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_history_enabled(),
        }
    }
}

fn default_history_enabled() -> bool {
    true
}

/// User-facing message configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    /// Language of controller messages.
    #[serde(default)]
    pub locale: Locale,
}
