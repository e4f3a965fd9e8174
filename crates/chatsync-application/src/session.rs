//! Per-session wiring of the engine's services.

use crate::bootstrap::SessionBootstrap;
use crate::chat::ChatService;
use crate::feedback::FeedbackService;
use crate::history::HistoryLoader;
use crate::mutation::{MutationCoordinator, TransientErrorSlot};
use chatsync_core::config::SyncConfig;
use chatsync_core::remote::RemoteStore;
use chatsync_core::state::StateStore;
use std::sync::Arc;

/// Owns the replica of one session and the services that act on it.
///
/// Every service receives the same `StateStore` handle; the session is its
/// single owner and drops it when the session ends.
pub struct SyncSession {
    pub store: Arc<StateStore>,
    pub loader: Arc<HistoryLoader>,
    pub bootstrap: SessionBootstrap,
    pub mutations: MutationCoordinator,
    pub chat: ChatService,
    pub feedback: FeedbackService,
}

impl SyncSession {
    /// Creates a session with a fresh, all-unknown replica.
    pub fn new(remote: Arc<dyn RemoteStore>, config: &SyncConfig) -> Self {
        let store = Arc::new(StateStore::new());
        let loader = Arc::new(HistoryLoader::new(remote.clone(), store.clone()));

        Self {
            bootstrap: SessionBootstrap::new(remote.clone(), store.clone(), loader.clone()),
            mutations: MutationCoordinator::new(
                remote.clone(),
                store.clone(),
                TransientErrorSlot::new(config.error_display()),
            ),
            chat: ChatService::new(remote.clone(), store.clone()),
            feedback: FeedbackService::new(remote, store.clone()),
            loader,
            store,
        }
    }
}
