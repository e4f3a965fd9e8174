//! Availability probe for the remote store.

use chatsync_core::health::HealthStatus;
use chatsync_core::remote::RemoteStore;
use std::sync::Arc;

/// Classifies whether the remote store is reachable and configured.
pub struct AvailabilityProbe {
    remote: Arc<dyn RemoteStore>,
}

impl AvailabilityProbe {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self { remote }
    }

    /// Runs one health request. Never fails: an unreachable store is
    /// reported as `{available: false, status: NotConfigured}`.
    pub async fn probe(&self) -> HealthStatus {
        let report = match self.remote.health_check().await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!("[Probe] health check failed: {}", e);
                return HealthStatus::unreachable();
            }
        };

        let health = HealthStatus::classify(
            report.status_code,
            report.message.as_deref(),
            report.error.as_deref(),
        );

        if !health.is_consistent() {
            tracing::warn!(
                "[Probe] status {} disagrees with availability {} (HTTP {})",
                health.status,
                health.available,
                report.status_code
            );
        }
        tracing::info!(
            "[Probe] available={} status={}",
            health.available,
            health.status
        );
        health
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockRemoteStore;
    use chatsync_core::health::StoreStatus;
    use chatsync_core::remote::{HealthReport, RemoteError};

    async fn probe_with(report: Result<HealthReport, RemoteError>) -> HealthStatus {
        let remote = Arc::new(MockRemoteStore::new().with_health(report));
        AvailabilityProbe::new(remote).probe().await
    }

    fn report(status_code: u16, message: Option<&str>, error: Option<&str>) -> HealthReport {
        HealthReport {
            status_code,
            message: message.map(String::from),
            error: error.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_probe_scenario_table() {
        let cases = [
            (report(200, Some("ok"), None), true, StoreStatus::Working),
            (report(500, None, None), false, StoreStatus::NotWorking),
            (report(401, None, None), false, StoreStatus::InvalidCredentials),
            (report(200, None, None), true, StoreStatus::NotConfigured),
        ];

        for (input, available, status) in cases {
            let health = probe_with(Ok(input)).await;
            assert_eq!(health, HealthStatus::new(available, status));
        }
    }

    #[tokio::test]
    async fn test_probe_keeps_server_diagnostic() {
        let health = probe_with(Ok(report(
            422,
            None,
            Some("Invalid CosmosDB container name"),
        )))
        .await;
        assert!(!health.available);
        assert_eq!(
            health.status,
            StoreStatus::Diagnostic("Invalid CosmosDB container name".into())
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_configured() {
        let health = probe_with(Err(RemoteError::transport("connection refused"))).await;
        assert_eq!(health, HealthStatus::unreachable());
    }
}
