//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CHAT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CHAT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_COOKIE_JAR_PATH: &str = ".concierge-cookies.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl ChatTimeouts {
    /// Overall bound on one chat exchange: request plus connect time.
    #[must_use]
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.request_secs.saturating_add(self.connect_secs))
    }
}

impl Default for ChatTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_CHAT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CHAT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConciergeConfig {
    /// Backend project URL, without trailing slash.
    pub supabase_url: String,
    pub anon_key: String,
    pub hotel_id: String,
    pub timeouts: ChatTimeouts,
    pub cookie_jar_path: PathBuf,
}

impl ConciergeConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `SUPABASE_URL`
    /// - `SUPABASE_ANON_KEY`
    /// - `HOTEL_ID`
    ///
    /// Optional:
    /// - `CHAT_REQUEST_TIMEOUT_SECS`: default 30
    /// - `CHAT_CONNECT_TIMEOUT_SECS`: default 10
    /// - `COOKIE_JAR_PATH`: default `.concierge-cookies.json`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is missing or blank,
    /// or when the URL is not http(s).
    pub fn from_env() -> Result<Self, ConfigError> {
        let supabase_url = required("SUPABASE_URL")?
            .trim_end_matches('/')
            .to_string();
        if !(supabase_url.starts_with("http://") || supabase_url.starts_with("https://")) {
            return Err(ConfigError::Invalid { var: "SUPABASE_URL", reason: format!("not an http(s) URL: {supabase_url}") });
        }
        let anon_key = required("SUPABASE_ANON_KEY")?;
        let hotel_id = required("HOTEL_ID")?;
        let timeouts = ChatTimeouts {
            request_secs: env_parse_u64("CHAT_REQUEST_TIMEOUT_SECS", DEFAULT_CHAT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("CHAT_CONNECT_TIMEOUT_SECS", DEFAULT_CHAT_CONNECT_TIMEOUT_SECS),
        };
        let cookie_jar_path = std::env::var("COOKIE_JAR_PATH")
            .map_or_else(|_| PathBuf::from(DEFAULT_COOKIE_JAR_PATH), PathBuf::from);

        Ok(Self { supabase_url, anon_key, hotel_id, timeouts, cookie_jar_path })
    }

    /// Chat edge function URL.
    #[must_use]
    pub fn chat_url(&self) -> String {
        format!("{}/functions/v1/chat-handler", self.supabase_url)
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
