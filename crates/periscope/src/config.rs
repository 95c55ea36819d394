//! Runtime configuration for the periscope driver.

use relay::{DEFAULT_FETCH_TIMEOUT, DEFAULT_RELAY_BASE};
use std::env;
use std::time::Duration;

/// Driver configuration, loaded from environment variables.
#[derive(Clone, Debug)]
pub struct PeriscopeConfig {
    /// Relay endpoint all fetches are routed through.
    pub relay_base: String,
    /// Per-request fetch timeout.
    pub timeout: Duration,
    /// Whether to dump the rewritten HTML to stdout instead of just the
    /// display URL.
    pub dump_html: bool,
}

impl PeriscopeConfig {
    /// Reads configuration from the environment:
    /// - `PERISCOPE_RELAY_BASE`: relay endpoint (default: the public
    ///   cors-anywhere instance)
    /// - `PERISCOPE_TIMEOUT_SECS`: per-request timeout in seconds
    /// - `PERISCOPE_DUMP_HTML`: set to "1" to print the rewritten document
    pub fn from_env() -> Self {
        let relay_base =
            env::var("PERISCOPE_RELAY_BASE").unwrap_or_else(|_| DEFAULT_RELAY_BASE.to_owned());
        let timeout = env::var("PERISCOPE_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .map_or(DEFAULT_FETCH_TIMEOUT, Duration::from_secs);
        let dump_html = env::var("PERISCOPE_DUMP_HTML").is_ok_and(|value| value == "1");
        Self {
            relay_base,
            timeout,
            dump_html,
        }
    }
}
