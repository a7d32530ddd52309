// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Robot CRUD operations.
//!
//! Every mutation re-reads the table and publishes the snapshot from inside
//! the same serialized database call, so feed publications happen in commit
//! order. Mutations report whether a row was touched; the caller turns a
//! miss into `NotFound`.

use robotagg_core::{FeedPublisher, Robot, RobotConfig, RobotId, RobotaggError};
use rusqlite::{params, OptionalExtension, Row};

use crate::database::Database;

const SELECT_COLUMNS: &str =
    "SELECT id, name, api_url, api_key, description, is_active, created_at, last_used FROM robots";

fn row_to_robot(row: &Row<'_>) -> rusqlite::Result<Robot> {
    Ok(Robot {
        id: RobotId(row.get(0)?),
        name: row.get(1)?,
        api_url: row.get(2)?,
        api_key: row.get(3)?,
        description: row.get(4)?,
        is_active: row.get(5)?,
        created_at: row.get(6)?,
        last_used: row.get(7)?,
    })
}

/// Full table, newest first.
pub(crate) fn select_all(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<Robot>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC"
    ))?;
    let robots = stmt
        .query_map([], row_to_robot)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(robots)
}

/// List robots, optionally only the active ones.
pub async fn list_robots(db: &Database, active_only: bool) -> Result<Vec<Robot>, RobotaggError> {
    db.connection()
        .call(move |conn| -> Result<Vec<Robot>, rusqlite::Error> {
            if !active_only {
                return select_all(conn);
            }
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} WHERE is_active = 1 ORDER BY created_at DESC, id DESC"
            ))?;
            let robots = stmt
                .query_map([], row_to_robot)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(robots)
        })
        .await
        .map_err(RobotaggError::storage)
}

/// Get a robot by ID.
pub async fn get_robot(db: &Database, id: RobotId) -> Result<Option<Robot>, RobotaggError> {
    db.connection()
        .call(move |conn| -> Result<Option<Robot>, rusqlite::Error> {
            conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id.0],
                row_to_robot,
            )
            .optional()
        })
        .await
        .map_err(RobotaggError::storage)
}

/// Insert a new active robot. Returns the generated ID.
pub async fn insert_robot(
    db: &Database,
    feed: &FeedPublisher,
    config: RobotConfig,
    created_at: i64,
) -> Result<RobotId, RobotaggError> {
    let feed = feed.clone();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO robots (name, api_url, api_key, description, is_active, created_at)
                 VALUES (?1, ?2, ?3, ?4, 1, ?5)",
                params![
                    config.name,
                    config.api_url,
                    config.api_key,
                    config.description,
                    created_at,
                ],
            )?;
            let id = conn.last_insert_rowid();
            feed.publish(select_all(conn)?);
            Ok(id)
        })
        .await
        .map(RobotId)
        .map_err(RobotaggError::storage)
}

/// Replace every mutable field of an existing robot. `created_at` is kept.
pub async fn update_robot(
    db: &Database,
    feed: &FeedPublisher,
    robot: &Robot,
) -> Result<bool, RobotaggError> {
    let feed = feed.clone();
    let robot = robot.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE robots
                 SET name = ?1, api_url = ?2, api_key = ?3, description = ?4,
                     is_active = ?5, last_used = ?6
                 WHERE id = ?7",
                params![
                    robot.name,
                    robot.api_url,
                    robot.api_key,
                    robot.description,
                    robot.is_active,
                    robot.last_used,
                    robot.id.0,
                ],
            )?;
            publish_if_changed(conn, &feed, changed)
        })
        .await
        .map_err(RobotaggError::storage)
}

/// Delete a robot by ID.
pub async fn delete_robot(
    db: &Database,
    feed: &FeedPublisher,
    id: RobotId,
) -> Result<bool, RobotaggError> {
    let feed = feed.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let changed = conn.execute("DELETE FROM robots WHERE id = ?1", params![id.0])?;
            publish_if_changed(conn, &feed, changed)
        })
        .await
        .map_err(RobotaggError::storage)
}

/// Flip the active flag.
pub async fn set_active(
    db: &Database,
    feed: &FeedPublisher,
    id: RobotId,
    active: bool,
) -> Result<bool, RobotaggError> {
    let feed = feed.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE robots SET is_active = ?1 WHERE id = ?2",
                params![active, id.0],
            )?;
            publish_if_changed(conn, &feed, changed)
        })
        .await
        .map_err(RobotaggError::storage)
}

/// Record the time of the last successful send.
pub async fn touch_last_used(
    db: &Database,
    feed: &FeedPublisher,
    id: RobotId,
    timestamp: i64,
) -> Result<bool, RobotaggError> {
    let feed = feed.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE robots SET last_used = ?1 WHERE id = ?2",
                params![timestamp, id.0],
            )?;
            publish_if_changed(conn, &feed, changed)
        })
        .await
        .map_err(RobotaggError::storage)
}

fn publish_if_changed(
    conn: &rusqlite::Connection,
    feed: &FeedPublisher,
    changed: usize,
) -> rusqlite::Result<bool> {
    if changed == 0 {
        return Ok(false);
    }
    feed.publish(select_all(conn)?);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, FeedPublisher, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, FeedPublisher::new(Vec::new()), dir)
    }

    fn config(name: &str) -> RobotConfig {
        RobotConfig::new(name, "https://x.test", "k1")
    }

    #[tokio::test]
    async fn insert_and_get_robot_roundtrips() {
        let (db, feed, _dir) = setup_db().await;

        let id = insert_robot(&db, &feed, config("Bot1").with_description("first"), 1_000)
            .await
            .unwrap();
        assert_eq!(id, RobotId(1));

        let robot = get_robot(&db, id).await.unwrap().unwrap();
        assert_eq!(robot.name, "Bot1");
        assert_eq!(robot.api_url, "https://x.test");
        assert_eq!(robot.api_key, "k1");
        assert_eq!(robot.description, "first");
        assert!(robot.is_active);
        assert_eq!(robot.created_at, 1_000);
        assert_eq!(robot.last_used, None);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_nonexistent_robot_returns_none() {
        let (db, _feed, _dir) = setup_db().await;
        assert!(get_robot(&db, RobotId(99)).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_orders_newest_first() {
        let (db, feed, _dir) = setup_db().await;
        insert_robot(&db, &feed, config("old"), 1).await.unwrap();
        insert_robot(&db, &feed, config("new"), 2).await.unwrap();

        let names: Vec<String> = list_robots(&db, false)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["new", "old"]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mutations_publish_snapshots() {
        let (db, feed, _dir) = setup_db().await;
        let id = insert_robot(&db, &feed, config("Bot1"), 1).await.unwrap();
        assert_eq!(feed.snapshot().len(), 1);

        assert!(set_active(&db, &feed, id, false).await.unwrap());
        assert!(!feed.snapshot()[0].is_active);

        assert!(touch_last_used(&db, &feed, id, 77).await.unwrap());
        assert_eq!(feed.snapshot()[0].last_used, Some(77));

        assert!(delete_robot(&db, &feed, id).await.unwrap());
        assert!(feed.snapshot().is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mutations_on_missing_id_report_no_change() {
        let (db, feed, _dir) = setup_db().await;
        insert_robot(&db, &feed, config("Bot1"), 1).await.unwrap();
        let before = feed.snapshot();

        let ghost = Robot {
            id: RobotId(42),
            ..before[0].clone()
        };
        assert!(!update_robot(&db, &feed, &ghost).await.unwrap());
        assert!(!delete_robot(&db, &feed, RobotId(42)).await.unwrap());
        assert!(!set_active(&db, &feed, RobotId(42), false).await.unwrap());
        assert!(!touch_last_used(&db, &feed, RobotId(42), 5).await.unwrap());

        assert_eq!(feed.snapshot(), before);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_preserves_created_at() {
        let (db, feed, _dir) = setup_db().await;
        let id = insert_robot(&db, &feed, config("Bot1"), 500).await.unwrap();

        let mut robot = get_robot(&db, id).await.unwrap().unwrap();
        robot.name = "Renamed".into();
        robot.created_at = 9_999;
        assert!(update_robot(&db, &feed, &robot).await.unwrap());

        let stored = get_robot(&db, id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.created_at, 500);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let (db, feed, _dir) = setup_db().await;
        let first = insert_robot(&db, &feed, config("a"), 1).await.unwrap();
        delete_robot(&db, &feed, first).await.unwrap();
        let second = insert_robot(&db, &feed, config("b"), 2).await.unwrap();
        assert_ne!(first, second);
        assert!(second > first);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn active_filter_excludes_inactive() {
        let (db, feed, _dir) = setup_db().await;
        let a = insert_robot(&db, &feed, config("a"), 1).await.unwrap();
        insert_robot(&db, &feed, config("b"), 2).await.unwrap();
        set_active(&db, &feed, a, false).await.unwrap();

        let active = list_robots(&db, true).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "b");
        db.close().await.unwrap();
    }
}
