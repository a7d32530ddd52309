// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! UI-facing controller for the robot aggregator.
//!
//! The [`Controller`] mirrors the live robot list, tracks a loading flag that
//! is cleared on every path, and turns each operation's outcome into a
//! localized one-shot message.

pub mod controller;
pub mod messages;
pub mod state;

pub use controller::Controller;
pub use messages::Notice;
pub use state::ViewState;
