//! Single owner of the replica.

use super::action::Action;
use super::model::ReplicaState;
use super::reducer::reduce;
use tokio::sync::watch;

/// Holds the one live [`ReplicaState`] of a session.
///
/// Every change goes through [`StateStore::dispatch`], which applies
/// [`reduce`] under the channel lock, so dispatches are serialized and each
/// one sees the result of the previous one. Readers get owned snapshots or a
/// [`watch::Receiver`] that is notified after every dispatch.
///
/// Construct one per session and share it behind an `Arc`.
#[derive(Debug)]
pub struct StateStore {
    sender: watch::Sender<ReplicaState>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::with_state(ReplicaState::new())
    }

    pub fn with_state(state: ReplicaState) -> Self {
        let (sender, _receiver) = watch::channel(state);
        Self { sender }
    }

    /// Applies `action` to the current replica.
    pub fn dispatch(&self, action: Action) {
        let name = action.name();
        self.sender.send_modify(|state| {
            let current = std::mem::take(state);
            *state = reduce(current, action);
        });
        tracing::debug!("[StateStore] dispatched {}", name);
    }

    /// Owned copy of the current replica.
    pub fn snapshot(&self) -> ReplicaState {
        self.sender.borrow().clone()
    }

    /// Reads the current replica without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&ReplicaState) -> R) -> R {
        f(&self.sender.borrow())
    }

    /// A receiver that observes every subsequent dispatch.
    pub fn subscribe(&self) -> watch::Receiver<ReplicaState> {
        self.sender.subscribe()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
