//! Client configuration, loaded from `~/.flowdesk/config.json`.
//!
//! Every field has a default so a missing or partial file still yields a
//! working config. `FLOWDESK_API_URL` overrides the file for local testing
//! against a staging backend.

use serde::{Deserialize, Serialize};

/// Production API base, including the version prefix.
pub const DEFAULT_API_URL: &str = "https://flowdeskapi.build91.in/api/v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL all endpoint paths are joined to.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-request timeout, independent of the retry budget. Expiry is
    /// treated as a connectivity failure.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Retry budget for rate-limited and transport-failed requests.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl AppConfig {
    /// Load config from disk, falling back to defaults when the file is
    /// missing or unreadable. A malformed file is reported, not fatal.
    pub fn load() -> Self {
        let path = crate::util::data_dir().join("config.json");
        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!("ignoring malformed {}: {}", path.display(), err);
                    AppConfig::default()
                }
            },
            Err(_) => AppConfig::default(),
        };

        if let Ok(url) = std::env::var("FLOWDESK_API_URL") {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_retries, 5);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"api_url": "http://localhost:4000/api/v1"}"#).unwrap();
        assert_eq!(config.api_url, "http://localhost:4000/api/v1");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_retries, 5);
    }
}
