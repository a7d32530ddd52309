// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the robot aggregator.

use strum::Display;
use thiserror::Error;

use crate::types::RobotId;

/// The primary error type used across store, registry, and controller operations.
#[derive(Debug, Error)]
pub enum RobotaggError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A required field was empty or malformed. Raised before any I/O.
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The referenced robot does not exist in the store.
    #[error("robot {id} not found")]
    NotFound { id: RobotId },

    /// Remote endpoint interaction failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RobotaggError {
    /// Wraps any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RobotaggError::Storage {
            source: Box::new(err),
        }
    }

    /// Returns true if this error is the not-found existence failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RobotaggError::NotFound { .. })
    }
}

/// Failures from talking to a robot endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The base URL is not a well-formed absolute http(s) URL. No request was made.
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Network failure, non-2xx status, or an unreadable response body.
    #[error("{}", format_transport(*status, detail))]
    Transport { status: Option<u16>, detail: String },

    /// The endpoint answered but reported failure itself.
    #[error("{0}")]
    Application(String),
}

/// Coarse classification of a [`GatewayError`], used in structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum GatewayErrorKind {
    InvalidUrl,
    Transport,
    Application,
}

impl GatewayError {
    pub fn kind(&self) -> GatewayErrorKind {
        match self {
            GatewayError::InvalidUrl { .. } => GatewayErrorKind::InvalidUrl,
            GatewayError::Transport { .. } => GatewayErrorKind::Transport,
            GatewayError::Application(_) => GatewayErrorKind::Application,
        }
    }

    /// HTTP status carried by a transport failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

fn format_transport(status: Option<u16>, detail: &str) -> String {
    match status {
        Some(code) => format!("request failed: {code} {detail}").trim_end().to_string(),
        None => format!("request failed: {detail}"),
    }
}
