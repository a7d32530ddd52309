// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock robot gateway for deterministic testing.
//!
//! `MockGateway` implements `RobotGateway` with scripted outcomes and records
//! every call, so tests can assert exactly which requests would have gone out.
//! It performs no URL validation of its own.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use robotagg_core::{GatewayError, RobotGateway};

/// A call observed by [`MockGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Status { base_url: String, api_key: String },
    Send { base_url: String, api_key: String, text: String },
}

#[derive(Default)]
struct Script {
    status: VecDeque<Result<(), GatewayError>>,
    replies: VecDeque<Result<String, GatewayError>>,
    calls: Vec<GatewayCall>,
    delay: Option<Duration>,
}

/// A mock gateway that returns pre-configured outcomes.
///
/// Outcomes are popped from FIFO queues. When a queue is empty, status checks
/// succeed and sends reply with `"mock reply"`.
#[derive(Clone, Default)]
pub struct MockGateway {
    script: Arc<Mutex<Script>>,
}

impl MockGateway {
    /// Create a new mock gateway with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock gateway pre-loaded with send outcomes.
    pub fn with_replies(replies: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                replies: VecDeque::from(replies),
                ..Script::default()
            })),
        }
    }

    /// Queue the outcome of the next unanswered send.
    pub async fn push_reply(&self, reply: Result<String, GatewayError>) {
        self.script.lock().await.replies.push_back(reply);
    }

    /// Queue the outcome of the next unanswered status check.
    pub async fn push_status(&self, status: Result<(), GatewayError>) {
        self.script.lock().await.status.push_back(status);
    }

    /// Make every call wait before answering.
    pub async fn set_delay(&self, delay: Duration) {
        self.script.lock().await.delay = Some(delay);
    }

    /// Every call received so far, oldest first.
    pub async fn calls(&self) -> Vec<GatewayCall> {
        self.script.lock().await.calls.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.script.lock().await.calls.len()
    }

    async fn pause(&self) {
        let delay = self.script.lock().await.delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl RobotGateway for MockGateway {
    async fn check_status(&self, base_url: &str, api_key: &str) -> Result<(), GatewayError> {
        let outcome = {
            let mut script = self.script.lock().await;
            script.calls.push(GatewayCall::Status {
                base_url: base_url.to_string(),
                api_key: api_key.to_string(),
            });
            script.status.pop_front().unwrap_or(Ok(()))
        };
        self.pause().await;
        outcome
    }

    async fn send_message(
        &self,
        base_url: &str,
        api_key: &str,
        text: &str,
    ) -> Result<String, GatewayError> {
        let outcome = {
            let mut script = self.script.lock().await;
            script.calls.push(GatewayCall::Send {
                base_url: base_url.to_string(),
                api_key: api_key.to_string(),
                text: text.to_string(),
            });
            script
                .replies
                .pop_front()
                .unwrap_or_else(|| Ok("mock reply".to_string()))
        };
        self.pause().await;
        outcome
    }
}
