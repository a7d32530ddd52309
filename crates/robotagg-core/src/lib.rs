// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the robot aggregator.
//!
//! This crate provides the error taxonomy, domain types, the live collection
//! feed, and the seam traits that the storage, gateway, registry, and
//! controller crates are built against.

pub mod error;
pub mod feed;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{GatewayError, GatewayErrorKind, RobotaggError};
pub use feed::{FeedPublisher, RobotFeed, Snapshot};
pub use types::{
    HealthStatus, Locale, MessageExchange, Robot, RobotConfig, RobotId, now_millis,
};

pub use traits::{HistoryStore, RobotGateway, RobotStore};
