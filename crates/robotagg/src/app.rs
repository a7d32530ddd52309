// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application bootstrap.
//!
//! Wires storage, gateway, registry, and controller from a validated
//! [`RobotaggConfig`].

use std::sync::Arc;

use robotagg_config::RobotaggConfig;
use robotagg_controller::Controller;
use robotagg_core::{HealthStatus, RobotStore, RobotaggError};
use robotagg_gateway::HttpGateway;
use robotagg_registry::Registry;
use robotagg_storage::SqliteRobotStore;
use tracing::{info, warn};

use crate::telemetry;

/// A running robot aggregator.
pub struct App {
    config: RobotaggConfig,
    store: Arc<SqliteRobotStore>,
    registry: Registry,
    controller: Controller,
}

impl App {
    /// Load configuration from the standard locations, install tracing, and
    /// start. Configuration diagnostics are rendered to stderr.
    pub async fn start_from_env() -> Result<Self, RobotaggError> {
        let config = match robotagg_config::load_and_validate() {
            Ok(config) => config,
            Err(errors) => {
                robotagg_config::render_errors(&errors);
                let summary = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(RobotaggError::Config(summary));
            }
        };
        telemetry::init_tracing(&config.app.log_level);
        Self::start(config).await
    }

    /// Open storage and build every component. Must run inside a Tokio runtime.
    pub async fn start(config: RobotaggConfig) -> Result<Self, RobotaggError> {
        info!(
            database = %config.storage.database_path,
            locale = %config.ui.locale,
            "starting robotagg"
        );

        let store = Arc::new(SqliteRobotStore::open(&config.storage).await?);
        match store.health_check().await? {
            HealthStatus::Healthy => {}
            HealthStatus::Degraded(reason) => warn!(%reason, "storage degraded"),
            HealthStatus::Unhealthy(reason) => {
                return Err(RobotaggError::Internal(format!(
                    "storage unhealthy: {reason}"
                )));
            }
        }

        let gateway = Arc::new(HttpGateway::new(&config.gateway));
        let mut registry = Registry::new(store.clone(), gateway);
        if config.history.enabled {
            registry = registry.with_history(store.clone());
        }
        let controller = Controller::new(registry.clone(), config.ui.locale);

        info!(
            robots = controller.robots().len(),
            history = config.history.enabled,
            "robotagg ready"
        );

        Ok(Self {
            config,
            store,
            registry,
            controller,
        })
    }

    pub fn config(&self) -> &RobotaggConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Stop the controller mirror and close storage.
    pub async fn shutdown(self) -> Result<(), RobotaggError> {
        let Self {
            store, controller, ..
        } = self;
        drop(controller);
        store.close().await?;
        info!("robotagg shut down");
        Ok(())
    }
}
