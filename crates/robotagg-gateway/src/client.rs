// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for robot chat endpoints.
//!
//! Provides [`HttpGateway`], which validates the base URL, issues exactly one
//! request per call, and maps the outcome into a [`GatewayError`].

use async_trait::async_trait;
use reqwest::StatusCode;
use robotagg_config::model::GatewayConfig;
use robotagg_core::{GatewayError, RobotGateway};
use tracing::debug;

use crate::endpoint::endpoint_url;
use crate::types::{ChatRequest, ChatResponse};

const STATUS_PATH: &str = "status";
const CHAT_PATH: &str = "chat";

/// Failure text used when the endpoint reports failure without one.
const UNKNOWN_ERROR: &str = "unknown error";

/// Stateless HTTP gateway.
///
/// Holds only static settings; a client bound to the target is built for each
/// call, so nothing leaks between robots.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    user_agent: String,
    default_reply: String,
}

impl HttpGateway {
    /// Creates a gateway from the `[gateway]` config section.
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            default_reply: config.default_reply.clone(),
        }
    }

    fn client(&self) -> Result<reqwest::Client, GatewayError> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| GatewayError::Transport {
                status: None,
                detail: format!("failed to build HTTP client: {e}"),
            })
    }
}

fn transport(e: reqwest::Error) -> GatewayError {
    GatewayError::Transport {
        status: e.status().map(|s| s.as_u16()),
        detail: e.to_string(),
    }
}

fn status_error(status: StatusCode) -> GatewayError {
    GatewayError::Transport {
        status: Some(status.as_u16()),
        detail: status.canonical_reason().unwrap_or_default().to_string(),
    }
}

#[async_trait]
impl RobotGateway for HttpGateway {
    async fn check_status(&self, base_url: &str, api_key: &str) -> Result<(), GatewayError> {
        let url = endpoint_url(base_url, STATUS_PATH)?;

        let response = self
            .client()?
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        debug!(url = %url, status = %status, "status response received");

        if status.is_success() {
            Ok(())
        } else {
            Err(status_error(status))
        }
    }

    async fn send_message(
        &self,
        base_url: &str,
        api_key: &str,
        text: &str,
    ) -> Result<String, GatewayError> {
        let url = endpoint_url(base_url, CHAT_PATH)?;

        let response = self
            .client()?
            .post(&url)
            .json(&ChatRequest {
                message: text,
                api_key,
            })
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        debug!(url = %url, status = %status, "chat response received");

        if !status.is_success() {
            return Err(status_error(status));
        }

        let body = response.text().await.map_err(transport)?;
        let reply: ChatResponse =
            serde_json::from_str(&body).map_err(|e| GatewayError::Transport {
                status: None,
                detail: format!("failed to parse chat response: {e}"),
            })?;

        if reply.success {
            Ok(reply.message.unwrap_or_else(|| self.default_reply.clone()))
        } else {
            Err(GatewayError::Application(
                reply.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ))
        }
    }
}
