// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam traits between the registry and its collaborators.
//!
//! Storage and networking sit behind these traits so each can be substituted
//! independently (SQLite vs. in-memory, HTTP vs. a scripted mock). All traits
//! use `#[async_trait]` for dynamic dispatch through `Arc<dyn _>`.

pub mod gateway;
pub mod history;
pub mod store;

pub use gateway::RobotGateway;
pub use history::HistoryStore;
pub use store::RobotStore;
