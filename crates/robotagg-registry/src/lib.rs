// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry facade for the robot aggregator.
//!
//! The [`Registry`] is the unit the controller depends on. It forwards CRUD to
//! a [`RobotStore`](robotagg_core::RobotStore), gates gateway calls behind base
//! URL validation, and records message history when a history store is set.

pub mod registry;

pub use registry::{DEFAULT_HISTORY_LIMIT, Registry};
