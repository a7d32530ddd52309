// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: SQLite storage, real HTTP gateway, wiremock endpoints.
//!
//! Each test opens an isolated database in a temp directory and is
//! independent of the others.

use std::time::Duration;

use robotagg::{App, GatewayError, Locale, RobotConfig, RobotId, RobotaggConfig, RobotaggError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(dir: &tempfile::TempDir) -> RobotaggConfig {
    let mut config = RobotaggConfig::default();
    config.storage.database_path = dir
        .path()
        .join("robots.db")
        .to_string_lossy()
        .into_owned();
    config
}

async fn start(dir: &tempfile::TempDir) -> App {
    App::start(test_config(dir)).await.unwrap()
}

async fn wait_for_robots(app: &App, count: usize) {
    let mut rx = app.controller().subscribe();
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| s.robots.len() == count))
        .await
        .expect("robot list never reached expected size")
        .unwrap();
}

// ---- Scenario A: add assigns the first id ----

#[tokio::test]
async fn add_then_get_first_robot() {
    let dir = tempfile::tempdir().unwrap();
    let app = start(&dir).await;

    let id = app
        .controller()
        .add_robot(RobotConfig::new("Bot1", "https://x.test", "k1"))
        .await
        .unwrap();
    assert_eq!(id, RobotId(1));

    let robot = app.registry().get(id).await.unwrap().unwrap();
    assert!(robot.is_active);
    assert!(robot.created_at > 0);

    app.shutdown().await.unwrap();
}

// ---- Scenario B: successful send over HTTP ----

#[tokio::test]
async fn send_message_success_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(serde_json::json!({"message": "ping", "apiKey": "k1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"success": true, "message": "pong"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = start(&dir).await;
    let controller = app.controller();
    let id = controller
        .add_robot(RobotConfig::new("Bot1", server.uri(), "k1"))
        .await
        .unwrap();
    let robot = app.registry().get(id).await.unwrap().unwrap();

    controller.send_message(&robot, "ping").await.unwrap();
    let message = controller.message().unwrap();
    assert!(message.contains("pong"), "got: {message}");
    assert!(!controller.is_loading());

    let stored = app.registry().get(id).await.unwrap().unwrap();
    assert!(stored.last_used.is_some());

    let history = controller.history(id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].response, "pong");

    app.shutdown().await.unwrap();
}

// ---- Scenario C: endpoint reports failure ----

#[tokio::test]
async fn send_message_application_failure_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"success": false, "error": "quota exceeded"}),
        ))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = start(&dir).await;
    let controller = app.controller();
    let id = controller
        .add_robot(RobotConfig::new("Bot1", server.uri(), "k1"))
        .await
        .unwrap();
    let robot = app.registry().get(id).await.unwrap().unwrap();

    let err = controller.send_message(&robot, "ping").await.unwrap_err();
    assert!(matches!(
        err,
        RobotaggError::Gateway(GatewayError::Application(ref detail)) if detail == "quota exceeded"
    ));
    assert!(controller.message().unwrap().contains("quota exceeded"));
    assert!(!controller.is_loading());

    let stored = app.registry().get(id).await.unwrap().unwrap();
    assert_eq!(stored.last_used, None);

    app.shutdown().await.unwrap();
}

// ---- Scenario D: invalid URL never hits the network ----

#[tokio::test]
async fn connection_test_with_invalid_url_makes_no_request() {
    let server = MockServer::start().await;

    let dir = tempfile::tempdir().unwrap();
    let app = start(&dir).await;
    let controller = app.controller();
    let id = controller
        .add_robot(RobotConfig::new("Broken", "not a url", "k1"))
        .await
        .unwrap();
    let robot = app.registry().get(id).await.unwrap().unwrap();

    let err = controller.test_connection(&robot).await.unwrap_err();
    assert!(matches!(
        err,
        RobotaggError::Gateway(GatewayError::InvalidUrl { .. })
    ));
    assert_eq!(controller.connection_result(), Some(false));
    assert!(server.received_requests().await.unwrap().is_empty());

    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn connection_test_sends_bearer_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .and(header("authorization", "Bearer k1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = start(&dir).await;
    let controller = app.controller();
    let id = controller
        .add_robot(RobotConfig::new("Bot1", format!("{}/", server.uri()), "k1"))
        .await
        .unwrap();
    let robot = app.registry().get(id).await.unwrap().unwrap();

    controller.test_connection(&robot).await.unwrap();
    assert_eq!(controller.connection_result(), Some(true));

    app.shutdown().await.unwrap();
}

// ---- Scenario E: delete propagates to the live list ----

#[tokio::test]
async fn delete_removes_robot_from_list_and_feed() {
    let dir = tempfile::tempdir().unwrap();
    let app = start(&dir).await;
    let controller = app.controller();
    let id = controller
        .add_robot(RobotConfig::new("Bot1", "https://x.test", "k1"))
        .await
        .unwrap();
    wait_for_robots(&app, 1).await;

    let robot = app.registry().get(id).await.unwrap().unwrap();
    controller.delete_robot(&robot).await.unwrap();

    wait_for_robots(&app, 0).await;
    assert!(app.registry().list_all().await.unwrap().is_empty());

    app.shutdown().await.unwrap();
}

// ---- Persistence and configuration ----

#[tokio::test]
async fn robots_persist_across_restart() {
    let dir = tempfile::tempdir().unwrap();

    let app = start(&dir).await;
    app.controller()
        .add_robot(RobotConfig::new("Bot1", "https://x.test", "k1").with_description("kept"))
        .await
        .unwrap();
    app.shutdown().await.unwrap();

    let app = start(&dir).await;
    let robots = app.controller().robots();
    assert_eq!(robots.len(), 1);
    assert_eq!(robots[0].description, "kept");

    let next = app
        .controller()
        .add_robot(RobotConfig::new("Bot2", "https://y.test", "k2"))
        .await
        .unwrap();
    assert_eq!(next, RobotId(2));

    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn history_can_be_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&dir);
    config.history.enabled = false;
    config.ui.locale = Locale::Zh;
    let app = App::start(config).await.unwrap();
    let controller = app.controller();

    let id = controller
        .add_robot(RobotConfig::new("Bot1", server.uri(), "k1"))
        .await
        .unwrap();
    let robot = app.registry().get(id).await.unwrap().unwrap();

    let reply = controller.send_message(&robot, "ping").await.unwrap();
    assert_eq!(reply, "Message sent successfully");
    assert_eq!(
        controller.message().as_deref(),
        Some("消息发送成功: Message sent successfully")
    );
    assert!(controller.history(id).await.unwrap().is_empty());

    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn config_from_toml_drives_startup() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("from-toml.db");
    let toml = format!(
        "[storage]\ndatabase_path = {:?}\nwal_mode = false\n\n[ui]\nlocale = \"zh\"\n",
        db_path.to_string_lossy()
    );
    let config = robotagg_config::load_and_validate_str(&toml).unwrap();

    let app = App::start(config).await.unwrap();
    assert_eq!(app.config().ui.locale, Locale::Zh);
    assert!(db_path.exists());
    app.shutdown().await.unwrap();
}
