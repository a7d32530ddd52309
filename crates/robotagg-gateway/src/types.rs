// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat endpoint request/response wire types.

use serde::{Deserialize, Serialize};

/// Body of `POST {base}/chat`.
#[derive(Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    #[serde(rename = "apiKey")]
    pub api_key: &'a str,
}

/// Body returned by `POST {base}/chat` on a 2xx status.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
