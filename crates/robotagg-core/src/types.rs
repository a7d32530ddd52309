// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the store, gateway, registry, and controller.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Stable identifier of a registered robot. Assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RobotId(pub i64);

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RobotId {
    fn from(value: i64) -> Self {
        RobotId(value)
    }
}

/// A registered chat endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub id: RobotId,
    pub name: String,
    pub api_url: String,
    pub api_key: String,
    pub description: String,
    pub is_active: bool,
    /// Unix epoch milliseconds, set once at insert.
    pub created_at: i64,
    /// Unix epoch milliseconds of the last successful send.
    pub last_used: Option<i64>,
}

impl fmt::Debug for Robot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Robot")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("api_url", &self.api_url)
            .field("api_key", &REDACTED)
            .field("description", &self.description)
            .field("is_active", &self.is_active)
            .field("created_at", &self.created_at)
            .field("last_used", &self.last_used)
            .finish()
    }
}

/// The fields a caller supplies to register a robot.
///
/// The store assigns `id` and `created_at`; new robots start active.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RobotConfig {
    pub name: String,
    pub api_url: String,
    pub api_key: String,
    #[serde(default)]
    pub description: String,
}

impl RobotConfig {
    pub fn new(
        name: impl Into<String>,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl fmt::Debug for RobotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RobotConfig")
            .field("name", &self.name)
            .field("api_url", &self.api_url)
            .field("api_key", &REDACTED)
            .field("description", &self.description)
            .finish()
    }
}

const REDACTED: &str = "[REDACTED]";

/// Health status reported by store health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Fully operational.
    Healthy,
    /// Operational but experiencing issues.
    Degraded(String),
    /// Not operational.
    Unhealthy(String),
}

/// One outbound message and what came back, kept as chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageExchange {
    /// Store-assigned row id; `0` before the exchange is recorded.
    pub id: i64,
    pub robot_id: RobotId,
    pub message: String,
    /// The reply text on success, or the failure detail otherwise.
    pub response: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    pub success: bool,
}

/// Language used for user-facing controller messages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

/// Current time as Unix epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
