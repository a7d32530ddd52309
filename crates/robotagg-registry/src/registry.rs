// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coordination over the robot store, the gateway, and optional history.

use std::sync::Arc;

use robotagg_core::{
    GatewayError, HistoryStore, MessageExchange, Robot, RobotConfig, RobotFeed, RobotGateway,
    RobotId, RobotStore, RobotaggError, now_millis,
};
use robotagg_gateway::validate_base_url;
use tracing::{debug, warn};

/// Number of exchanges returned when callers do not pick a limit.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Facade combining storage and gateway operations.
///
/// Storage and networking stay independently substitutable: the registry only
/// holds trait objects and adds URL pre-validation plus send bookkeeping.
#[derive(Clone)]
pub struct Registry {
    store: Arc<dyn RobotStore>,
    gateway: Arc<dyn RobotGateway>,
    history: Option<Arc<dyn HistoryStore>>,
}

impl Registry {
    pub fn new(store: Arc<dyn RobotStore>, gateway: Arc<dyn RobotGateway>) -> Self {
        Self {
            store,
            gateway,
            history: None,
        }
    }

    /// Record every send that reaches the gateway in `history`.
    pub fn with_history(mut self, history: Arc<dyn HistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn subscribe_all(&self) -> RobotFeed {
        self.store.subscribe_all()
    }

    pub fn subscribe_active(&self) -> RobotFeed {
        self.store.subscribe_active()
    }

    pub async fn list_all(&self) -> Result<Vec<Robot>, RobotaggError> {
        self.store.list_all().await
    }

    pub async fn list_active(&self) -> Result<Vec<Robot>, RobotaggError> {
        self.store.list_active().await
    }

    pub async fn get(&self, id: RobotId) -> Result<Option<Robot>, RobotaggError> {
        self.store.get(id).await
    }

    /// Register a new robot. It starts active.
    pub async fn add(&self, config: RobotConfig) -> Result<RobotId, RobotaggError> {
        let id = self.store.insert(config).await?;
        debug!(%id, "robot added");
        Ok(id)
    }

    pub async fn update(&self, robot: &Robot) -> Result<(), RobotaggError> {
        self.store.update(robot).await
    }

    pub async fn delete(&self, robot: &Robot) -> Result<(), RobotaggError> {
        self.store.delete(robot.id).await?;
        debug!(id = %robot.id, "robot deleted");
        Ok(())
    }

    pub async fn set_active(&self, id: RobotId, active: bool) -> Result<(), RobotaggError> {
        self.store.set_active(id, active).await
    }

    /// Stamp `last_used` with the current time.
    pub async fn touch_last_used(&self, id: RobotId) -> Result<(), RobotaggError> {
        self.store.touch_last_used(id, now_millis()).await
    }

    /// Probe the robot's status endpoint.
    ///
    /// An invalid base URL fails with [`GatewayError::InvalidUrl`] before any
    /// request is made.
    pub async fn test_connection(&self, robot: &Robot) -> Result<(), GatewayError> {
        validate_base_url(&robot.api_url)?;
        let result = self
            .gateway
            .check_status(&robot.api_url, &robot.api_key)
            .await;
        if let Err(e) = &result {
            debug!(id = %robot.id, kind = %e.kind(), "connection test failed");
        }
        result
    }

    /// Send `text` to the robot and return its reply.
    ///
    /// The gateway works on the snapshot passed in. If the robot is deleted
    /// while the request is in flight, the reply is still returned and the
    /// follow-up bookkeeping is skipped with a warning.
    pub async fn send_message(&self, robot: &Robot, text: &str) -> Result<String, GatewayError> {
        validate_base_url(&robot.api_url)?;

        let result = self
            .gateway
            .send_message(&robot.api_url, &robot.api_key, text)
            .await;

        match &result {
            Ok(_) => {
                if let Err(e) = self.touch_last_used(robot.id).await {
                    warn!(id = %robot.id, error = %e, "could not update last_used after send");
                }
            }
            Err(e) => {
                debug!(id = %robot.id, kind = %e.kind(), "send failed");
            }
        }

        self.record(robot.id, text, &result).await;
        result
    }

    /// Recorded exchanges for a robot, newest first. Empty when history is off.
    pub async fn history(
        &self,
        robot_id: RobotId,
        limit: usize,
    ) -> Result<Vec<MessageExchange>, RobotaggError> {
        match &self.history {
            Some(history) => history.list_exchanges(robot_id, limit).await,
            None => Ok(Vec::new()),
        }
    }

    async fn record(&self, robot_id: RobotId, text: &str, result: &Result<String, GatewayError>) {
        let Some(history) = &self.history else {
            return;
        };
        let (response, success) = match result {
            Ok(reply) => (reply.clone(), true),
            Err(e) => (e.to_string(), false),
        };
        let exchange = MessageExchange {
            id: 0,
            robot_id,
            message: text.to_string(),
            response,
            timestamp: now_millis(),
            success,
        };
        if let Err(e) = history.record_exchange(&exchange).await {
            warn!(id = %robot_id, error = %e, "could not record message exchange");
        }
    }
}
