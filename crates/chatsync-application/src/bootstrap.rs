//! Session startup sequencing.

use crate::history::{HistoryLoader, LoadOutcome};
use crate::probe::AvailabilityProbe;
use chatsync_core::health::HealthStatus;
use chatsync_core::remote::{RemoteError, RemoteStore};
use chatsync_core::state::{Action, LoadingState, StateStore};
use std::sync::Arc;

/// What happened to the history step of startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryStep {
    /// First page merged with this many conversations.
    Loaded(usize),
    /// The probe reported the store unavailable; no page was requested.
    Unavailable,
    /// The probe passed but the first page could not be fetched.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsStep {
    Loaded,
    Failed(RemoteError),
}

/// Typed outcome of each startup step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    /// Health as committed to the replica (downgraded if history failed).
    pub health: HealthStatus,
    pub history: HistoryStep,
    pub settings: SettingsStep,
}

/// Runs the probe, the first page load and the settings fetch.
///
/// The probe → first page chain and the settings fetch run concurrently.
/// Whatever happens, the session ends up ready with a terminal loading
/// state.
pub struct SessionBootstrap {
    remote: Arc<dyn RemoteStore>,
    store: Arc<StateStore>,
    probe: AvailabilityProbe,
    loader: Arc<HistoryLoader>,
}

impl SessionBootstrap {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        store: Arc<StateStore>,
        loader: Arc<HistoryLoader>,
    ) -> Self {
        Self {
            probe: AvailabilityProbe::new(remote.clone()),
            remote,
            store,
            loader,
        }
    }

    pub async fn start(&self) -> StartupReport {
        tracing::info!("[SessionBootstrap] starting session");
        let ((health, history), settings) = tokio::join!(self.load_history(), self.load_settings());

        let report = StartupReport {
            health,
            history,
            settings,
        };
        tracing::info!(
            "[SessionBootstrap] ready: history={:?}, settings={:?}",
            report.history,
            report.settings
        );
        report
    }

    async fn load_history(&self) -> (HealthStatus, HistoryStep) {
        self.store
            .dispatch(Action::SetLoadingState(LoadingState::Loading));

        let health = self.probe.probe().await;
        if !health.available {
            self.store.dispatch(Action::SetHealth(health.clone()));
            self.store
                .dispatch(Action::SetLoadingState(LoadingState::Fail));
            return (health, HistoryStep::Unavailable);
        }

        match self.first_page().await {
            Some(count) => {
                self.store.dispatch(Action::SetHealth(health.clone()));
                self.store
                    .dispatch(Action::SetLoadingState(LoadingState::Success));
                (health, HistoryStep::Loaded(count))
            }
            None => {
                tracing::error!("[SessionBootstrap] history unavailable after healthy probe");
                let downgraded = HealthStatus::not_working();
                self.store.dispatch(Action::SetHealth(downgraded.clone()));
                self.store
                    .dispatch(Action::SetLoadingState(LoadingState::Fail));
                (downgraded, HistoryStep::Failed)
            }
        }
    }

    /// Loads page 0, or adopts the result of a page load that was already
    /// running. `None` when no page could be merged.
    async fn first_page(&self) -> Option<usize> {
        loop {
            match self.loader.load_initial().await {
                LoadOutcome::Loaded(count) => return Some(count),
                LoadOutcome::Failed => return None,
                LoadOutcome::AlreadyInFlight => {
                    tracing::debug!("[SessionBootstrap] page load already running, waiting");
                    self.loader.wait_idle().await;
                    let merged = self.store.read(|state| state.history.as_ref().map(Vec::len));
                    if merged.is_some() {
                        return merged;
                    }
                }
            }
        }
    }

    async fn load_settings(&self) -> SettingsStep {
        match self.remote.get_settings().await {
            Ok(settings) => {
                self.store.dispatch(Action::ReplaceSettings(Some(settings)));
                SettingsStep::Loaded
            }
            Err(e) => {
                tracing::warn!("[SessionBootstrap] frontend settings unavailable: {}", e);
                self.store.dispatch(Action::ReplaceSettings(None));
                SettingsStep::Failed(e)
            }
        }
    }
}
