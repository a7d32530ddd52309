// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for robot aggregator integration tests.
//!
//! Provides mock seams and test harness infrastructure for fast,
//! deterministic tests without network access.
//!
//! # Components
//!
//! - [`MockGateway`] - Scripted gateway that records every call
//! - [`MemoryRobotStore`] - In-memory robot store with failure injection
//! - [`TestHarness`] - Temp SQLite store plus a mock gateway

pub mod harness;
pub mod memory_store;
pub mod mock_gateway;

pub use harness::TestHarness;
pub use memory_store::MemoryRobotStore;
pub use mock_gateway::{GatewayCall, MockGateway};
