// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestration of registry calls into observable state.
//!
//! Every mutating operation holds a loading guard for its whole duration,
//! validates input before touching the registry, and leaves exactly one
//! localized message behind. Errors are still returned to the caller; the
//! message is what a presentation layer shows.

use std::sync::Arc;

use robotagg_core::{Locale, MessageExchange, Robot, RobotConfig, RobotId, RobotaggError};
use robotagg_registry::{DEFAULT_HISTORY_LIMIT, Registry};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::messages::Notice;
use crate::state::{StateCell, ViewState};

/// UI-facing controller.
///
/// Subscribes to the full robot collection at construction and mirrors it
/// into [`ViewState::robots`] for its whole lifetime. Must be created inside
/// a Tokio runtime.
pub struct Controller {
    registry: Registry,
    locale: Locale,
    state: Arc<StateCell>,
    mirror: JoinHandle<()>,
}

impl Controller {
    pub fn new(registry: Registry, locale: Locale) -> Self {
        let mut feed = registry.subscribe_all();
        let state = StateCell::new(ViewState {
            robots: feed.current(),
            ..ViewState::default()
        });

        let mirror_state = Arc::clone(&state);
        let mirror = tokio::spawn(async move {
            while let Some(robots) = feed.next().await {
                mirror_state.update(|s| s.robots = robots);
            }
            debug!("robot feed closed");
        });

        Self {
            registry,
            locale,
            state,
            mirror,
        }
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Current state snapshot.
    pub fn view(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn robots(&self) -> Vec<Robot> {
        self.state.borrow().robots.clone()
    }

    /// Robots that may be picked as message targets.
    pub fn active_robots(&self) -> Vec<Robot> {
        self.state
            .borrow()
            .robots
            .iter()
            .filter(|r| r.is_active)
            .cloned()
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn message(&self) -> Option<String> {
        self.state.borrow().message.clone()
    }

    pub fn connection_result(&self) -> Option<bool> {
        self.state.borrow().connection_result
    }

    pub fn clear_message(&self) {
        self.state.update(|s| s.message = None);
    }

    pub fn clear_connection_result(&self) {
        self.state.update(|s| s.connection_result = None);
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Check the store is readable and resync the list from the live feed.
    /// The mirror normally makes this unnecessary; it recovers after a
    /// storage failure.
    ///
    /// The list is taken from the feed, not from the read, so a write that
    /// commits in between cannot be overwritten by an older snapshot.
    pub async fn reload(&self) -> Result<(), RobotaggError> {
        let _loading = self.state.begin_loading();
        match self.registry.list_all().await {
            Ok(_) => {
                let robots = self.registry.subscribe_all().current();
                self.state.update(|s| s.robots = robots);
                Ok(())
            }
            Err(e) => Err(self.fail(Notice::LoadFailed(e.to_string()), e)),
        }
    }

    pub async fn add_robot(&self, config: RobotConfig) -> Result<RobotId, RobotaggError> {
        self.require_fields(&config.name, &config.api_url, &config.api_key)?;
        let _loading = self.state.begin_loading();

        match self.registry.add(config).await {
            Ok(id) => {
                self.notify(Notice::RobotAdded);
                Ok(id)
            }
            Err(e) => Err(self.fail(Notice::AddFailed(e.to_string()), e)),
        }
    }

    pub async fn update_robot(&self, robot: &Robot) -> Result<(), RobotaggError> {
        self.require_fields(&robot.name, &robot.api_url, &robot.api_key)?;
        let _loading = self.state.begin_loading();

        match self.registry.update(robot).await {
            Ok(()) => {
                self.notify(Notice::RobotUpdated);
                Ok(())
            }
            Err(e) => Err(self.fail(Notice::UpdateFailed(e.to_string()), e)),
        }
    }

    pub async fn delete_robot(&self, robot: &Robot) -> Result<(), RobotaggError> {
        let _loading = self.state.begin_loading();

        match self.registry.delete(robot).await {
            Ok(()) => {
                self.notify(Notice::RobotDeleted);
                Ok(())
            }
            Err(e) => Err(self.fail(Notice::DeleteFailed(e.to_string()), e)),
        }
    }

    pub async fn set_active(&self, id: RobotId, active: bool) -> Result<(), RobotaggError> {
        let _loading = self.state.begin_loading();

        match self.registry.set_active(id, active).await {
            Ok(()) => {
                self.notify(if active {
                    Notice::RobotEnabled
                } else {
                    Notice::RobotDisabled
                });
                Ok(())
            }
            Err(e) => Err(self.fail(Notice::StatusChangeFailed(e.to_string()), e)),
        }
    }

    /// Probe the robot and record the outcome in
    /// [`ViewState::connection_result`].
    pub async fn test_connection(&self, robot: &Robot) -> Result<(), RobotaggError> {
        let _loading = self.state.begin_loading();

        let result = self.registry.test_connection(robot).await;
        self.state
            .update(|s| s.connection_result = Some(result.is_ok()));
        match result {
            Ok(()) => {
                self.notify(Notice::ConnectionSucceeded);
                Ok(())
            }
            Err(e) => Err(self.fail(Notice::ConnectionFailed(e.to_string()), e.into())),
        }
    }

    /// Send `text` to an active robot and return the reply.
    pub async fn send_message(&self, robot: &Robot, text: &str) -> Result<String, RobotaggError> {
        if text.trim().is_empty() {
            return Err(self.reject(Notice::EnterMessage));
        }
        if !robot.is_active {
            return Err(self.reject(Notice::RobotInactive));
        }
        let _loading = self.state.begin_loading();

        match self.registry.send_message(robot, text).await {
            Ok(reply) => {
                self.notify(Notice::MessageSent(reply.clone()));
                Ok(reply)
            }
            Err(e) => Err(self.fail(Notice::SendFailed(e.to_string()), e.into())),
        }
    }

    /// Recent exchanges with a robot, newest first.
    pub async fn history(&self, robot_id: RobotId) -> Result<Vec<MessageExchange>, RobotaggError> {
        self.registry
            .history(robot_id, DEFAULT_HISTORY_LIMIT)
            .await
            .map_err(|e| self.fail(Notice::HistoryFailed(e.to_string()), e))
    }

    fn require_fields(&self, name: &str, url: &str, key: &str) -> Result<(), RobotaggError> {
        if [name, url, key].iter().any(|f| f.trim().is_empty()) {
            return Err(self.reject(Notice::FillAllFields));
        }
        Ok(())
    }

    fn notify(&self, notice: Notice) {
        self.state.set_message(notice.render(self.locale));
    }

    fn reject(&self, notice: Notice) -> RobotaggError {
        let message = notice.render(self.locale);
        self.state.set_message(message.clone());
        RobotaggError::Validation(message)
    }

    fn fail(&self, notice: Notice, err: RobotaggError) -> RobotaggError {
        warn!(error = %err, "controller operation failed");
        self.notify(notice);
        err
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.mirror.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use robotagg_core::{GatewayError, HealthStatus, RobotFeed, RobotStore};
    use robotagg_test_utils::{MemoryRobotStore, MockGateway};

    struct Fixture {
        controller: Controller,
        store: Arc<MemoryRobotStore>,
        gateway: Arc<MockGateway>,
    }

    fn fixture_with(locale: Locale) -> Fixture {
        let store = Arc::new(MemoryRobotStore::new());
        let gateway = Arc::new(MockGateway::new());
        let registry = Registry::new(store.clone(), gateway.clone()).with_history(store.clone());
        Fixture {
            controller: Controller::new(registry, locale),
            store,
            gateway,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(Locale::En)
    }

    async fn wait_for(
        controller: &Controller,
        pred: impl FnMut(&ViewState) -> bool,
    ) -> ViewState {
        let mut rx = controller.subscribe();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(pred))
            .await
            .expect("state never matched")
            .expect("state channel closed")
            .clone()
    }

    async fn add(f: &Fixture, url: &str) -> Robot {
        let id = f
            .controller
            .add_robot(RobotConfig::new("Bot1", url, "k1"))
            .await
            .unwrap();
        f.store.get(id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn robot_list_mirrors_store() {
        let f = fixture();
        let robot = add(&f, "https://x.test").await;

        let state = wait_for(&f.controller, |s| s.robots.len() == 1).await;
        assert_eq!(state.robots[0].id, robot.id);
        assert_eq!(f.controller.message().as_deref(), Some("Robot added"));

        f.controller.delete_robot(&robot).await.unwrap();
        wait_for(&f.controller, |s| s.robots.is_empty()).await;
        assert_eq!(f.controller.message().as_deref(), Some("Robot deleted"));
    }

    #[tokio::test]
    async fn blank_fields_short_circuit_before_registry() {
        let f = fixture();
        let err = f
            .controller
            .add_robot(RobotConfig::new("  ", "https://x.test", "k1"))
            .await
            .unwrap_err();

        assert!(matches!(err, RobotaggError::Validation(_)));
        assert_eq!(
            f.controller.message().as_deref(),
            Some("Please fill in all fields")
        );
        assert!(f.store.list_all().await.unwrap().is_empty());
        assert!(!f.controller.is_loading());
    }

    #[tokio::test]
    async fn send_success_reports_reply() {
        let f = fixture();
        let robot = add(&f, "https://x.test").await;
        f.gateway.push_reply(Ok("pong".into())).await;

        let reply = f.controller.send_message(&robot, "ping").await.unwrap();
        assert_eq!(reply, "pong");
        let message = f.controller.message().unwrap();
        assert!(message.contains("pong"), "got: {message}");
        assert!(!f.controller.is_loading());
    }

    #[tokio::test]
    async fn send_application_failure_reports_detail() {
        let f = fixture();
        let robot = add(&f, "https://x.test").await;
        f.gateway
            .push_reply(Err(GatewayError::Application("quota exceeded".into())))
            .await;

        let err = f.controller.send_message(&robot, "ping").await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        let message = f.controller.message().unwrap();
        assert!(message.contains("quota exceeded"), "got: {message}");
        assert!(!f.controller.is_loading());
    }

    #[tokio::test]
    async fn blank_message_is_rejected_without_network() {
        let f = fixture();
        let robot = add(&f, "https://x.test").await;

        assert!(f.controller.send_message(&robot, "   ").await.is_err());
        assert_eq!(
            f.controller.message().as_deref(),
            Some("Please enter a message")
        );
        assert_eq!(f.gateway.call_count().await, 0);
    }

    #[tokio::test]
    async fn inactive_robot_is_not_a_message_target() {
        let f = fixture();
        let robot = add(&f, "https://x.test").await;
        f.controller.set_active(robot.id, false).await.unwrap();
        let robot = f.store.get(robot.id).await.unwrap().unwrap();

        assert!(f.controller.send_message(&robot, "hi").await.is_err());
        assert_eq!(f.gateway.call_count().await, 0);
        wait_for(&f.controller, |s| s.robots.len() == 1).await;
        assert!(f.controller.active_robots().is_empty());
    }

    #[tokio::test]
    async fn invalid_url_connection_test_records_failure() {
        let f = fixture();
        let robot = add(&f, "not a url").await;

        let err = f.controller.test_connection(&robot).await.unwrap_err();
        assert!(matches!(
            err,
            RobotaggError::Gateway(GatewayError::InvalidUrl { .. })
        ));
        assert_eq!(f.controller.connection_result(), Some(false));
        assert!(
            f.controller
                .message()
                .unwrap()
                .starts_with("Connection failed: ")
        );
        assert_eq!(f.gateway.call_count().await, 0);

        f.controller.clear_connection_result();
        f.controller.clear_message();
        assert_eq!(f.controller.connection_result(), None);
        assert_eq!(f.controller.message(), None);
    }

    #[tokio::test]
    async fn successful_connection_test() {
        let f = fixture();
        let robot = add(&f, "https://x.test").await;
        f.controller.test_connection(&robot).await.unwrap();
        assert_eq!(f.controller.connection_result(), Some(true));
        assert_eq!(
            f.controller.message().as_deref(),
            Some("Connection successful")
        );
    }

    #[tokio::test]
    async fn storage_failure_becomes_message() {
        let f = fixture();
        f.store.fail_writes(true);

        let err = f
            .controller
            .add_robot(RobotConfig::new("Bot1", "https://x.test", "k1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RobotaggError::Storage { .. }));
        assert!(
            f.controller
                .message()
                .unwrap()
                .starts_with("Failed to add robot: ")
        );
        assert!(!f.controller.is_loading());
    }

    #[tokio::test]
    async fn update_missing_robot_reports_not_found() {
        let f = fixture();
        let mut robot = add(&f, "https://x.test").await;
        f.store.delete(robot.id).await.unwrap();
        robot.name = "Renamed".into();

        let err = f.controller.update_robot(&robot).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(
            f.controller
                .message()
                .unwrap()
                .starts_with("Failed to update robot: ")
        );
    }

    #[tokio::test]
    async fn loading_is_visible_while_request_in_flight() {
        let f = fixture();
        let robot = add(&f, "https://x.test").await;
        f.gateway.set_delay(Duration::from_millis(200)).await;

        let controller = Arc::new(f.controller);
        let task = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.send_message(&robot, "slow").await })
        };

        wait_for(&controller, |s| s.loading).await;
        task.await.unwrap().unwrap();
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn chinese_locale_messages() {
        let f = fixture_with(Locale::Zh);
        f.controller
            .add_robot(RobotConfig::new("", "", ""))
            .await
            .unwrap_err();
        assert_eq!(f.controller.message().as_deref(), Some("请填写所有字段"));

        let robot = add(&f, "https://x.test").await;
        assert_eq!(f.controller.message().as_deref(), Some("机器人添加成功"));

        f.gateway.push_reply(Ok("pong".into())).await;
        f.controller.send_message(&robot, "ping").await.unwrap();
        assert_eq!(f.controller.message().as_deref(), Some("消息发送成功: pong"));
    }

    #[tokio::test]
    async fn history_reads_recorded_exchanges() {
        let f = fixture();
        let robot = add(&f, "https://x.test").await;
        f.controller.send_message(&robot, "one").await.unwrap();
        f.controller.send_message(&robot, "two").await.unwrap();

        let history = f.controller.history(robot.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].message, "two");
    }

    #[tokio::test]
    async fn reload_recovers_list() {
        let f = fixture();
        add(&f, "https://x.test").await;
        f.controller.reload().await.unwrap();
        assert_eq!(f.controller.robots().len(), 1);
    }

    /// Store whose point-in-time read lags behind its feed.
    struct LaggingReadStore(Arc<MemoryRobotStore>);

    #[async_trait::async_trait]
    impl RobotStore for LaggingReadStore {
        fn subscribe_all(&self) -> RobotFeed {
            self.0.subscribe_all()
        }

        fn subscribe_active(&self) -> RobotFeed {
            self.0.subscribe_active()
        }

        async fn list_all(&self) -> Result<Vec<Robot>, RobotaggError> {
            Ok(Vec::new())
        }

        async fn list_active(&self) -> Result<Vec<Robot>, RobotaggError> {
            Ok(Vec::new())
        }

        async fn get(&self, id: RobotId) -> Result<Option<Robot>, RobotaggError> {
            self.0.get(id).await
        }

        async fn insert(&self, config: RobotConfig) -> Result<RobotId, RobotaggError> {
            self.0.insert(config).await
        }

        async fn update(&self, robot: &Robot) -> Result<(), RobotaggError> {
            self.0.update(robot).await
        }

        async fn delete(&self, id: RobotId) -> Result<(), RobotaggError> {
            self.0.delete(id).await
        }

        async fn set_active(&self, id: RobotId, active: bool) -> Result<(), RobotaggError> {
            self.0.set_active(id, active).await
        }

        async fn touch_last_used(&self, id: RobotId, timestamp: i64) -> Result<(), RobotaggError> {
            self.0.touch_last_used(id, timestamp).await
        }

        async fn health_check(&self) -> Result<HealthStatus, RobotaggError> {
            self.0.health_check().await
        }

        async fn close(&self) -> Result<(), RobotaggError> {
            self.0.close().await
        }
    }

    #[tokio::test]
    async fn reload_never_rolls_back_to_an_older_read() {
        let inner = Arc::new(MemoryRobotStore::new());
        let store = Arc::new(LaggingReadStore(inner.clone()));
        let registry = Registry::new(store, Arc::new(MockGateway::new()));
        let controller = Controller::new(registry, Locale::En);

        inner
            .insert(RobotConfig::new("Bot1", "https://x.test", "k1"))
            .await
            .unwrap();
        wait_for(&controller, |s| s.robots.len() == 1).await;

        controller.reload().await.unwrap();
        assert_eq!(controller.robots().len(), 1);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn drop_releases_feed_subscription() {
        let f = fixture();
        wait_for(&f.controller, |s| s.robots.is_empty()).await;
        assert!(f.store.subscriber_count() >= 1);

        drop(f.controller);
        tokio::time::timeout(Duration::from_secs(5), async {
            while f.store.subscriber_count() > 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("mirror task kept its subscription");
    }
}
