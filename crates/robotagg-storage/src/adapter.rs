// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the `RobotStore` and `HistoryStore` traits.

use async_trait::async_trait;
use tracing::{debug, warn};

use robotagg_config::model::StorageConfig;
use robotagg_core::{
    FeedPublisher, HealthStatus, HistoryStore, MessageExchange, Robot, RobotConfig, RobotFeed,
    RobotId, RobotStore, RobotaggError, now_millis,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed robot store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The live feed is seeded from the table at open time.
pub struct SqliteRobotStore {
    db: Database,
    feed: FeedPublisher,
}

impl SqliteRobotStore {
    /// Open the database described by `config` and load the initial snapshot.
    pub async fn open(config: &StorageConfig) -> Result<Self, RobotaggError> {
        let db = Database::open_with(&config.database_path, config.wal_mode).await?;
        let initial = queries::robots::list_robots(&db, false).await?;
        debug!(
            path = %config.database_path,
            robots = initial.len(),
            "SQLite robot store opened"
        );
        Ok(Self {
            db,
            feed: FeedPublisher::new(initial),
        })
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

fn require(found: bool, id: RobotId) -> Result<(), RobotaggError> {
    if found {
        Ok(())
    } else {
        Err(RobotaggError::NotFound { id })
    }
}

#[async_trait]
impl RobotStore for SqliteRobotStore {
    fn subscribe_all(&self) -> RobotFeed {
        self.feed.subscribe_all()
    }

    fn subscribe_active(&self) -> RobotFeed {
        self.feed.subscribe_active()
    }

    async fn list_all(&self) -> Result<Vec<Robot>, RobotaggError> {
        queries::robots::list_robots(&self.db, false).await
    }

    async fn list_active(&self) -> Result<Vec<Robot>, RobotaggError> {
        queries::robots::list_robots(&self.db, true).await
    }

    async fn get(&self, id: RobotId) -> Result<Option<Robot>, RobotaggError> {
        queries::robots::get_robot(&self.db, id).await
    }

    async fn insert(&self, config: RobotConfig) -> Result<RobotId, RobotaggError> {
        let name = config.name.clone();
        let id = queries::robots::insert_robot(&self.db, &self.feed, config, now_millis()).await?;
        debug!(%id, %name, "robot inserted");
        Ok(id)
    }

    async fn update(&self, robot: &Robot) -> Result<(), RobotaggError> {
        let found = queries::robots::update_robot(&self.db, &self.feed, robot).await?;
        require(found, robot.id)?;
        debug!(id = %robot.id, "robot updated");
        Ok(())
    }

    async fn delete(&self, id: RobotId) -> Result<(), RobotaggError> {
        let found = queries::robots::delete_robot(&self.db, &self.feed, id).await?;
        require(found, id)?;
        debug!(%id, "robot deleted");
        Ok(())
    }

    async fn set_active(&self, id: RobotId, active: bool) -> Result<(), RobotaggError> {
        let found = queries::robots::set_active(&self.db, &self.feed, id, active).await?;
        require(found, id)?;
        debug!(%id, active, "robot active flag set");
        Ok(())
    }

    async fn touch_last_used(&self, id: RobotId, timestamp: i64) -> Result<(), RobotaggError> {
        let found = queries::robots::touch_last_used(&self.db, &self.feed, id, timestamp).await?;
        require(found, id)
    }

    async fn health_check(&self) -> Result<HealthStatus, RobotaggError> {
        let probe = self
            .db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await;
        match probe {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => {
                warn!(error = %e, "storage health check failed");
                Ok(HealthStatus::Unhealthy(e.to_string()))
            }
        }
    }

    async fn close(&self) -> Result<(), RobotaggError> {
        self.db.clone().close().await?;
        debug!("SQLite robot store closed");
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for SqliteRobotStore {
    async fn record_exchange(&self, exchange: &MessageExchange) -> Result<i64, RobotaggError> {
        queries::exchanges::insert_exchange(&self.db, exchange)
            .await?
            .ok_or(RobotaggError::NotFound {
                id: exchange.robot_id,
            })
    }

    async fn list_exchanges(
        &self,
        robot_id: RobotId,
        limit: usize,
    ) -> Result<Vec<MessageExchange>, RobotaggError> {
        queries::exchanges::list_exchanges(&self.db, robot_id, limit).await
    }
}
