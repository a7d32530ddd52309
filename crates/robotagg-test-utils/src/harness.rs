// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for integration testing against real SQLite storage.
//!
//! `TestHarness` assembles a temp-directory SQLite store and a scripted
//! [`MockGateway`]. Registry and controller tests build their component on
//! top of the exposed seam objects.

use std::sync::Arc;

use robotagg_config::model::StorageConfig;
use robotagg_core::{GatewayError, Robot, RobotConfig, RobotStore, RobotaggError};
use robotagg_storage::SqliteRobotStore;

use crate::mock_gateway::MockGateway;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    replies: Vec<Result<String, GatewayError>>,
    robots: Vec<RobotConfig>,
    wal_mode: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            replies: Vec::new(),
            robots: Vec::new(),
            wal_mode: true,
        }
    }

    /// Set scripted gateway send outcomes.
    pub fn with_replies(mut self, replies: Vec<Result<String, GatewayError>>) -> Self {
        self.replies = replies;
        self
    }

    /// Register a robot before the harness is returned.
    pub fn with_robot(mut self, config: RobotConfig) -> Self {
        self.robots.push(config);
        self
    }

    /// Disable WAL journaling on the temp database.
    pub fn without_wal(mut self) -> Self {
        self.wal_mode = false;
        self
    }

    /// Build the harness, creating the temp database and seeding robots.
    pub async fn build(self) -> Result<TestHarness, RobotaggError> {
        let temp_dir = tempfile::TempDir::new().map_err(RobotaggError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let store = SqliteRobotStore::open(&StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: self.wal_mode,
        })
        .await?;
        for config in self.robots {
            store.insert(config).await?;
        }

        Ok(TestHarness {
            store: Arc::new(store),
            gateway: Arc::new(MockGateway::with_replies(self.replies)),
            _temp_dir: temp_dir,
        })
    }
}

/// A test environment with temp SQLite storage and a mock gateway.
pub struct TestHarness {
    /// SQLite robot store (temp DB, cleaned up on drop).
    pub store: Arc<SqliteRobotStore>,
    /// Scripted gateway.
    pub gateway: Arc<MockGateway>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Current robots, newest first.
    pub async fn robots(&self) -> Vec<Robot> {
        self.store.list_all().await.unwrap_or_default()
    }
}
