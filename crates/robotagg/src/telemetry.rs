// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Workspace crates that log at the configured level. Everything else logs
/// at `warn`.
const CRATES: &[&str] = &[
    "robotagg",
    "robotagg_core",
    "robotagg_config",
    "robotagg_storage",
    "robotagg_gateway",
    "robotagg_registry",
    "robotagg_controller",
];

/// Filter directives for `log_level`, e.g. `robotagg=info,...,warn`.
pub fn default_directives(log_level: &str) -> String {
    let mut directives: Vec<String> = CRATES
        .iter()
        .map(|krate| format!("{krate}={log_level}"))
        .collect();
    directives.push("warn".to_string());
    directives.join(",")
}

/// Install the global fmt subscriber. `RUST_LOG` takes precedence over
/// `log_level`.
///
/// Returns `false` if a global subscriber was already installed, which is not
/// an error.
pub fn init_tracing(log_level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn directives_cover_every_crate() {
        let directives = default_directives("debug");
        assert!(directives.starts_with("robotagg=debug,"));
        assert!(directives.contains("robotagg_storage=debug"));
        assert!(directives.ends_with(",warn"));
    }

    #[test]
    #[serial]
    fn second_install_is_not_an_error() {
        init_tracing("info");
        assert!(!init_tracing("debug"));
    }
}
