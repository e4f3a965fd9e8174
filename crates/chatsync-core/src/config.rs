//! Client configuration model.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:50505";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ERROR_DISPLAY_MS: u64 = 5000;

/// Settings for reaching the remote store and for surfacing errors.
///
/// Every field has a default, so a partial (or empty) config file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Origin of the remote store; endpoint paths are joined onto it.
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// How long a mutation error stays visible before it clears itself.
    pub error_display_ms: u64,
    /// Keep session cookies between requests.
    pub cookie_store: bool,
}

impl SyncConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn error_display(&self) -> Duration {
        Duration::from_millis(self.error_display_ms)
    }

    /// Base URL without a trailing slash.
    pub fn base_url_trimmed(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            error_display_ms: DEFAULT_ERROR_DISPLAY_MS,
            cookie_store: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: SyncConfig = toml::from_str("").unwrap();
        assert_eq!(config, SyncConfig::default());
        assert_eq!(config.error_display(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: SyncConfig = toml::from_str(
            r#"
            base_url = "https://chat.example.com/"
            error_display_ms = 1500
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url_trimmed(), "https://chat.example.com");
        assert_eq!(config.error_display_ms, 1500);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert!(config.cookie_store);
    }
}
