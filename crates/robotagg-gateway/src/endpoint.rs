// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base URL validation and endpoint construction.
//!
//! A robot's base URL is usable only if it parses as an absolute `http` or
//! `https` URL with a non-empty host. Validation never touches the network.

use robotagg_core::GatewayError;
use url::Url;

/// Validate a robot base URL.
pub fn validate_base_url(base_url: &str) -> Result<Url, GatewayError> {
    let invalid = |reason: String| GatewayError::InvalidUrl {
        url: base_url.to_string(),
        reason,
    };

    let parsed = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme `{other}`"))),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    Ok(parsed)
}

/// Append `path` as a final segment of a validated base URL.
///
/// A trailing slash on the base is dropped first. Query and fragment of the
/// base are kept in place after the new path.
pub fn endpoint_url(base_url: &str, path: &str) -> Result<String, GatewayError> {
    let mut url = validate_base_url(base_url)?;
    url.path_segments_mut()
        .map_err(|()| GatewayError::InvalidUrl {
            url: base_url.to_string(),
            reason: "cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .push(path.trim_start_matches('/'));
    Ok(url.into())
}
