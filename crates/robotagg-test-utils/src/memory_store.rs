// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory robot store for tests that do not need SQLite.
//!
//! Follows the same contract as the SQLite store: newest-first ordering, ids
//! never reused, `NotFound` on missing ids, and a feed publication for every
//! committed mutation. Writes can be made to fail on demand.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use robotagg_core::{
    FeedPublisher, HealthStatus, HistoryStore, MessageExchange, Robot, RobotConfig, RobotFeed,
    RobotId, RobotStore, RobotaggError, now_millis,
};

#[derive(Default)]
struct Tables {
    robots: Vec<Robot>,
    last_robot_id: i64,
    exchanges: Vec<MessageExchange>,
    last_exchange_id: i64,
}

impl Tables {
    fn sorted(&self) -> Vec<Robot> {
        let mut robots = self.robots.clone();
        robots.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        robots
    }

    fn find_mut(&mut self, id: RobotId) -> Result<&mut Robot, RobotaggError> {
        self.robots
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RobotaggError::NotFound { id })
    }
}

/// A `RobotStore` and `HistoryStore` held entirely in memory.
#[derive(Clone)]
pub struct MemoryRobotStore {
    tables: Arc<Mutex<Tables>>,
    feed: FeedPublisher,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryRobotStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            feed: FeedPublisher::new(Vec::new()),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent mutation fail with a storage error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of live feed subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.feed.subscriber_count()
    }

    fn check_writable(&self) -> Result<(), RobotaggError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RobotaggError::storage(std::io::Error::other(
                "injected write failure",
            )));
        }
        Ok(())
    }

    async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut Tables) -> Result<T, RobotaggError>,
    ) -> Result<T, RobotaggError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().await;
        let out = op(&mut tables)?;
        self.feed.publish(tables.sorted());
        Ok(out)
    }
}

impl Default for MemoryRobotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RobotStore for MemoryRobotStore {
    fn subscribe_all(&self) -> RobotFeed {
        self.feed.subscribe_all()
    }

    fn subscribe_active(&self) -> RobotFeed {
        self.feed.subscribe_active()
    }

    async fn list_all(&self) -> Result<Vec<Robot>, RobotaggError> {
        Ok(self.tables.lock().await.sorted())
    }

    async fn list_active(&self) -> Result<Vec<Robot>, RobotaggError> {
        let robots = self.tables.lock().await.sorted();
        Ok(robots.into_iter().filter(|r| r.is_active).collect())
    }

    async fn get(&self, id: RobotId) -> Result<Option<Robot>, RobotaggError> {
        let tables = self.tables.lock().await;
        Ok(tables.robots.iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, config: RobotConfig) -> Result<RobotId, RobotaggError> {
        self.mutate(|t| {
            t.last_robot_id += 1;
            let id = RobotId(t.last_robot_id);
            t.robots.push(Robot {
                id,
                name: config.name,
                api_url: config.api_url,
                api_key: config.api_key,
                description: config.description,
                is_active: true,
                created_at: now_millis(),
                last_used: None,
            });
            Ok(id)
        })
        .await
    }

    async fn update(&self, robot: &Robot) -> Result<(), RobotaggError> {
        self.mutate(|t| {
            let stored = t.find_mut(robot.id)?;
            let created_at = stored.created_at;
            *stored = Robot {
                created_at,
                ..robot.clone()
            };
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: RobotId) -> Result<(), RobotaggError> {
        self.mutate(|t| {
            let before = t.robots.len();
            t.robots.retain(|r| r.id != id);
            if t.robots.len() == before {
                return Err(RobotaggError::NotFound { id });
            }
            t.exchanges.retain(|e| e.robot_id != id);
            Ok(())
        })
        .await
    }

    async fn set_active(&self, id: RobotId, active: bool) -> Result<(), RobotaggError> {
        self.mutate(|t| {
            t.find_mut(id)?.is_active = active;
            Ok(())
        })
        .await
    }

    async fn touch_last_used(&self, id: RobotId, timestamp: i64) -> Result<(), RobotaggError> {
        self.mutate(|t| {
            t.find_mut(id)?.last_used = Some(timestamp);
            Ok(())
        })
        .await
    }

    async fn health_check(&self) -> Result<HealthStatus, RobotaggError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Degraded("writes failing".into()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn close(&self) -> Result<(), RobotaggError> {
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for MemoryRobotStore {
    async fn record_exchange(&self, exchange: &MessageExchange) -> Result<i64, RobotaggError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().await;
        if !tables.robots.iter().any(|r| r.id == exchange.robot_id) {
            return Err(RobotaggError::NotFound {
                id: exchange.robot_id,
            });
        }
        tables.last_exchange_id += 1;
        let id = tables.last_exchange_id;
        tables.exchanges.push(MessageExchange {
            id,
            ..exchange.clone()
        });
        Ok(id)
    }

    async fn list_exchanges(
        &self,
        robot_id: RobotId,
        limit: usize,
    ) -> Result<Vec<MessageExchange>, RobotaggError> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<MessageExchange> = tables
            .exchanges
            .iter()
            .filter(|e| e.robot_id == robot_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
        rows.truncate(limit);
        Ok(rows)
    }
}
