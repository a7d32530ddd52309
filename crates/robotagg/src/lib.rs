// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Robot registry and messaging gateway.
//!
//! Register remote chat endpoints, keep them in local SQLite storage, and
//! exchange messages with them over HTTP. [`App`] wires the components
//! together from layered configuration.

pub mod app;
pub mod telemetry;

pub use app::App;
pub use robotagg_config::RobotaggConfig;
pub use robotagg_controller::{Controller, ViewState};
pub use robotagg_core::{GatewayError, Locale, Robot, RobotConfig, RobotId, RobotaggError};
pub use robotagg_registry::Registry;
