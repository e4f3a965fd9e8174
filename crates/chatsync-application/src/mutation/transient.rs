//! Auto-expiring error slot for failed mutations.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;

/// Which user action produced a transient error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Rename,
    Delete,
    DeleteAll,
    Clear,
}

impl MutationKind {
    /// Message shown when the remote call for this action fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            MutationKind::Rename => "Error: could not rename item",
            MutationKind::Delete => "Error: could not delete item",
            MutationKind::DeleteAll => "Error deleting all of chat history",
            MutationKind::Clear => "Error clearing current chat",
        }
    }
}

pub const EMPTY_TITLE_MESSAGE: &str = "Error: Enter a new title to proceed.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientError {
    pub kind: MutationKind,
    pub message: String,
}

impl TransientError {
    pub fn new(kind: MutationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn failed(kind: MutationKind) -> Self {
        Self::new(kind, kind.failure_message())
    }
}

/// Holds at most one error, clearing it after the display period.
///
/// A newer error replaces the current one and restarts the period; the
/// timer of the replaced error then has no effect.
#[derive(Clone)]
pub struct TransientErrorSlot {
    sender: Arc<watch::Sender<Option<TransientError>>>,
    generation: Arc<AtomicU64>,
    display: Duration,
}

impl TransientErrorSlot {
    pub fn new(display: Duration) -> Self {
        let (sender, _receiver) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
            generation: Arc::new(AtomicU64::new(0)),
            display,
        }
    }

    /// Shows `error` and schedules its removal. Must run inside a tokio runtime.
    pub fn report(&self, error: TransientError) {
        tracing::debug!("[TransientErrorSlot] {:?}: {}", error.kind, error.message);
        let mut token = 0;
        self.sender.send_modify(|slot| {
            token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *slot = Some(error);
        });

        let sender = self.sender.clone();
        let generation = self.generation.clone();
        let display = self.display;
        tokio::spawn(async move {
            tokio::time::sleep(display).await;
            sender.send_if_modified(|slot| {
                if generation.load(Ordering::SeqCst) == token && slot.is_some() {
                    *slot = None;
                    true
                } else {
                    false
                }
            });
        });
    }

    pub fn current(&self) -> Option<TransientError> {
        self.sender.borrow().clone()
    }

    /// Dismisses the current error early.
    pub fn clear(&self) {
        self.sender.send_if_modified(|slot| slot.take().is_some());
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<TransientError>> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_error_expires_after_display_period() {
        let slot = TransientErrorSlot::new(Duration::from_secs(5));
        slot.report(TransientError::failed(MutationKind::Delete));

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(
            slot.current().map(|e| e.message),
            Some("Error: could not delete item".to_string())
        );

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(slot.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_error_restarts_period() {
        let slot = TransientErrorSlot::new(Duration::from_secs(5));
        slot.report(TransientError::failed(MutationKind::Delete));

        tokio::time::sleep(Duration::from_secs(3)).await;
        slot.report(TransientError::failed(MutationKind::Rename));

        // The first timer fires here but must not clear the newer error.
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(slot.current().map(|e| e.kind), Some(MutationKind::Rename));

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(slot.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_dismisses_early() {
        let slot = TransientErrorSlot::new(Duration::from_secs(5));
        let mut receiver = slot.subscribe();
        slot.report(TransientError::new(MutationKind::Rename, EMPTY_TITLE_MESSAGE));
        assert!(receiver.has_changed().unwrap());
        receiver.mark_unchanged();

        slot.clear();
        assert!(receiver.has_changed().unwrap());
        assert!(slot.current().is_none());
    }
}
