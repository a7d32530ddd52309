// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway to robot chat endpoints.
//!
//! Provides [`HttpGateway`], a stateless [`RobotGateway`](robotagg_core::RobotGateway)
//! implementation that builds a fresh reqwest client per call, plus the base
//! URL validation shared with the registry.

pub mod client;
pub mod endpoint;
pub mod types;

pub use client::HttpGateway;
pub use endpoint::{endpoint_url, validate_base_url};
