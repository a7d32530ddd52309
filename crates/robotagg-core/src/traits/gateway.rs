// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request/response interaction with a robot endpoint.

use async_trait::async_trait;

use crate::error::GatewayError;

/// Stateless client for robot endpoints.
///
/// Every call is parameterized by the target base URL and credential; an
/// implementation holds no per-robot state between calls. One attempt per
/// call, no retry.
#[async_trait]
pub trait RobotGateway: Send + Sync + 'static {
    /// `GET {base_url}/status` with a bearer credential. Any 2xx is `Ok`.
    async fn check_status(&self, base_url: &str, api_key: &str) -> Result<(), GatewayError>;

    /// `POST {base_url}/chat` and return the endpoint's reply text.
    async fn send_message(
        &self,
        base_url: &str,
        api_key: &str,
        text: &str,
    ) -> Result<String, GatewayError>;
}
