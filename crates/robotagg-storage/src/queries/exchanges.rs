// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message exchange history operations.

use robotagg_core::{MessageExchange, RobotId, RobotaggError};
use rusqlite::params;

use crate::database::Database;

/// Insert an exchange. Returns `None` if the robot no longer exists.
pub async fn insert_exchange(
    db: &Database,
    exchange: &MessageExchange,
) -> Result<Option<i64>, RobotaggError> {
    let exchange = exchange.clone();
    db.connection()
        .call(move |conn| -> Result<Option<i64>, rusqlite::Error> {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM robots WHERE id = ?1)",
                params![exchange.robot_id.0],
                |row| row.get(0),
            )?;
            if !exists {
                return Ok(None);
            }
            conn.execute(
                "INSERT INTO message_exchanges (robot_id, message, response, success, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    exchange.robot_id.0,
                    exchange.message,
                    exchange.response,
                    exchange.success,
                    exchange.timestamp,
                ],
            )?;
            Ok(Some(conn.last_insert_rowid()))
        })
        .await
        .map_err(RobotaggError::storage)
}

/// Exchanges for a robot, newest first.
pub async fn list_exchanges(
    db: &Database,
    robot_id: RobotId,
    limit: usize,
) -> Result<Vec<MessageExchange>, RobotaggError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| -> Result<Vec<MessageExchange>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, robot_id, message, response, success, created_at
                 FROM message_exchanges
                 WHERE robot_id = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2",
            )?;
            let rows = stmt
                .query_map(params![robot_id.0, limit], |row| {
                    Ok(MessageExchange {
                        id: row.get(0)?,
                        robot_id: RobotId(row.get(1)?),
                        message: row.get(2)?,
                        response: row.get(3)?,
                        success: row.get(4)?,
                        timestamp: row.get(5)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(RobotaggError::storage)
}
