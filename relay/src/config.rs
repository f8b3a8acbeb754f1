//! Configuration module for environment variable parsing.
//!
//! All settings are read once at startup into a [`Config`] value that is
//! shared read-only with the request handlers.

use std::env;
use std::time::Duration;
use tracing::warn;

/// Default Slack Web API base URL.
pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Base URL that webhooks are forwarded to (`NGROK_DOMAIN`)
    pub origin: Option<String>,

    /// Slack bot token used for telemetry notifications
    pub slack_token: Option<String>,

    /// Slack Web API base URL
    pub slack_api_base: String,

    /// Optional pre-shared key required on webhook routes
    pub api_key: Option<String>,

    /// Timeout for the forwarded request in milliseconds
    pub forward_timeout_ms: u64,

    /// Timeout for the Slack API call in milliseconds
    pub notify_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            origin: None,
            slack_token: None,
            slack_api_base: DEFAULT_SLACK_API_BASE.to_string(),
            api_key: None,
            forward_timeout_ms: 15_000,
            notify_timeout_ms: 10_000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Does not read `.env`; the binary does that before calling this.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            port: parse_number("PORT", defaults.port),

            origin: non_blank("NGROK_DOMAIN"),

            slack_token: non_blank("SLACK_TOKEN"),

            slack_api_base: non_blank("SLACK_API_BASE").unwrap_or(defaults.slack_api_base),

            api_key: non_blank("API_KEY"),

            forward_timeout_ms: parse_number("FORWARD_TIMEOUT_MS", defaults.forward_timeout_ms),

            notify_timeout_ms: parse_number("NOTIFY_TIMEOUT_MS", defaults.notify_timeout_ms),
        }
    }

    pub fn forward_timeout(&self) -> Duration {
        Duration::from_millis(self.forward_timeout_ms)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_millis(self.notify_timeout_ms)
    }

    /// Whether webhook routes require a pre-shared key.
    pub fn auth_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Read a variable, treating unset and whitespace-only values the same.
fn non_blank(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a numeric variable, falling back to `default` when unset or invalid.
fn parse_number<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<T>() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid numeric value, using default");
            default
        }
    }
}
