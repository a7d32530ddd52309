// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable record storage for robot configurations.

use async_trait::async_trait;

use crate::error::RobotaggError;
use crate::feed::RobotFeed;
use crate::types::{HealthStatus, Robot, RobotConfig, RobotId};

/// Sole owner and writer of the robot collection.
///
/// Every successful mutation is published to all live feeds before the
/// mutating call returns. Mutations addressed to an id that does not exist
/// fail with [`RobotaggError::NotFound`] and change nothing.
#[async_trait]
pub trait RobotStore: Send + Sync + 'static {
    /// Live feed of the full collection, current snapshot first.
    fn subscribe_all(&self) -> RobotFeed;

    /// Live feed of robots with `is_active == true`, current snapshot first.
    fn subscribe_active(&self) -> RobotFeed;

    /// Point-in-time read of the full collection.
    async fn list_all(&self) -> Result<Vec<Robot>, RobotaggError>;

    /// Point-in-time read of the active subset.
    async fn list_active(&self) -> Result<Vec<Robot>, RobotaggError>;

    async fn get(&self, id: RobotId) -> Result<Option<Robot>, RobotaggError>;

    /// Inserts a new, active robot and returns its freshly assigned id.
    async fn insert(&self, config: RobotConfig) -> Result<RobotId, RobotaggError>;

    /// Replaces the stored record with `robot`. `created_at` is preserved.
    async fn update(&self, robot: &Robot) -> Result<(), RobotaggError>;

    async fn delete(&self, id: RobotId) -> Result<(), RobotaggError>;

    async fn set_active(&self, id: RobotId, active: bool) -> Result<(), RobotaggError>;

    async fn touch_last_used(&self, id: RobotId, timestamp: i64) -> Result<(), RobotaggError>;

    async fn health_check(&self) -> Result<HealthStatus, RobotaggError>;

    /// Flushes pending writes and releases the backend.
    async fn close(&self) -> Result<(), RobotaggError>;
}
