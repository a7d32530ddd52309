// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence for message exchange history.

use async_trait::async_trait;

use crate::error::RobotaggError;
use crate::types::{MessageExchange, RobotId};

#[async_trait]
pub trait HistoryStore: Send + Sync + 'static {
    /// Records an exchange and returns its row id. Fails with
    /// [`RobotaggError::NotFound`] if the robot no longer exists.
    async fn record_exchange(&self, exchange: &MessageExchange) -> Result<i64, RobotaggError>;

    /// Exchanges for one robot, newest first, at most `limit` rows.
    async fn list_exchanges(
        &self,
        robot_id: RobotId,
        limit: usize,
    ) -> Result<Vec<MessageExchange>, RobotaggError>;
}
