//! Remote store health classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the remote store is (or is not) usable.
///
/// The closed variants cover the statuses the probe can infer on its own;
/// `Diagnostic` keeps a server-supplied explanation verbatim (422 responses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatus {
    NotConfigured,
    NotWorking,
    InvalidCredentials,
    InvalidDatabase,
    InvalidContainer,
    Working,
    Diagnostic(String),
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreStatus::NotConfigured => f.write_str("CosmosDB is not configured"),
            StoreStatus::NotWorking => f.write_str("CosmosDB is not working"),
            StoreStatus::InvalidCredentials => f.write_str("CosmosDB has invalid credentials"),
            StoreStatus::InvalidDatabase => f.write_str("Invalid CosmosDB database name"),
            StoreStatus::InvalidContainer => f.write_str("Invalid CosmosDB container name"),
            StoreStatus::Working => f.write_str("CosmosDB is configured and working"),
            StoreStatus::Diagnostic(message) => f.write_str(message),
        }
    }
}

/// Reachability of the remote store as seen at session start.
///
/// `available` follows the HTTP outcome while `status` follows the body, so
/// the two can disagree (a 200 without a message is available yet
/// `NotConfigured`). See [`HealthStatus::is_consistent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub available: bool,
    pub status: StoreStatus,
}

impl HealthStatus {
    pub fn new(available: bool, status: StoreStatus) -> Self {
        Self { available, status }
    }

    /// The probe could not reach the store at all.
    pub fn unreachable() -> Self {
        Self::new(false, StoreStatus::NotConfigured)
    }

    /// History turned out unusable after a healthy probe.
    pub fn not_working() -> Self {
        Self::new(false, StoreStatus::NotWorking)
    }

    /// Classifies a health-endpoint response.
    ///
    /// Priority: a `message` field means `Working`; otherwise the status code
    /// decides (500, 401, 422 with the server's `error` string); anything else
    /// is `NotConfigured`. `available` is simply "status was 2xx".
    pub fn classify(status_code: u16, message: Option<&str>, error: Option<&str>) -> Self {
        let status = if message.is_some_and(|m| !m.is_empty()) {
            StoreStatus::Working
        } else {
            match status_code {
                500 => StoreStatus::NotWorking,
                401 => StoreStatus::InvalidCredentials,
                422 => StoreStatus::Diagnostic(error.unwrap_or_default().to_string()),
                _ => StoreStatus::NotConfigured,
            }
        };

        Self::new((200..300).contains(&status_code), status)
    }

    /// True when `available` and `status` tell the same story.
    pub fn is_consistent(&self) -> bool {
        self.available == (self.status == StoreStatus::Working)
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::unreachable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_with_200_is_working() {
        let health = HealthStatus::classify(200, Some("ok"), None);
        assert_eq!(health, HealthStatus::new(true, StoreStatus::Working));
        assert!(health.is_consistent());
    }

    #[test]
    fn test_empty_500_is_not_working() {
        let health = HealthStatus::classify(500, None, None);
        assert_eq!(health, HealthStatus::new(false, StoreStatus::NotWorking));
    }

    #[test]
    fn test_empty_401_is_invalid_credentials() {
        let health = HealthStatus::classify(401, None, None);
        assert_eq!(health, HealthStatus::new(false, StoreStatus::InvalidCredentials));
    }

    #[test]
    fn test_empty_200_is_available_but_not_configured() {
        let health = HealthStatus::classify(200, None, None);
        assert_eq!(health, HealthStatus::new(true, StoreStatus::NotConfigured));
        assert!(!health.is_consistent());
    }

    #[test]
    fn test_422_keeps_server_diagnostic() {
        let health = HealthStatus::classify(422, None, Some("Invalid CosmosDB database name"));
        assert!(!health.available);
        assert_eq!(
            health.status,
            StoreStatus::Diagnostic("Invalid CosmosDB database name".to_string())
        );
    }

    #[test]
    fn test_message_wins_over_error_status() {
        let health = HealthStatus::classify(500, Some("partially up"), None);
        assert_eq!(health, HealthStatus::new(false, StoreStatus::Working));
    }

    #[test]
    fn test_display_uses_human_strings() {
        assert_eq!(
            StoreStatus::Working.to_string(),
            "CosmosDB is configured and working"
        );
        assert_eq!(StoreStatus::Diagnostic("x".into()).to_string(), "x");
    }
}
