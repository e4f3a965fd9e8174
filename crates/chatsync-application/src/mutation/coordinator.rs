//! Remote-first history mutations.

use super::transient::{EMPTY_TITLE_MESSAGE, MutationKind, TransientError, TransientErrorSlot};
use chatsync_core::error::{Result, SyncError};
use chatsync_core::remote::{RemoteError, RemoteStore};
use chatsync_core::state::{Action, StateStore};
use std::sync::Arc;

/// Applies user edits to the remote store, then to the replica.
///
/// The replica changes only after the remote call succeeded. A failure
/// reports a transient error and leaves the replica exactly as it was; no
/// call is retried.
pub struct MutationCoordinator {
    remote: Arc<dyn RemoteStore>,
    store: Arc<StateStore>,
    errors: TransientErrorSlot,
}

impl MutationCoordinator {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        store: Arc<StateStore>,
        errors: TransientErrorSlot,
    ) -> Self {
        Self {
            remote,
            store,
            errors,
        }
    }

    pub fn errors(&self) -> &TransientErrorSlot {
        &self.errors
    }

    /// Renames a conversation.
    ///
    /// An empty title, or one equal to the current title, is rejected with
    /// [`SyncError::Validation`] before any network call.
    pub async fn rename(&self, conversation_id: &str, title: &str) -> Result<()> {
        let current = self.store.read(|state| {
            state
                .find_conversation(conversation_id)
                .or(state.selected.as_ref().filter(|c| c.id == conversation_id))
                .map(|c| c.title.clone())
        });
        let Some(current) = current else {
            return Err(SyncError::not_found("Conversation", conversation_id));
        };

        let rejection = if title.trim().is_empty() {
            Some("new title is empty".to_string())
        } else if title == current {
            Some(format!(
                "conversation {conversation_id} already has title '{current}'"
            ))
        } else {
            None
        };
        if let Some(reason) = rejection {
            self.errors
                .report(TransientError::new(MutationKind::Rename, EMPTY_TITLE_MESSAGE));
            return Err(SyncError::validation(reason));
        }

        self.remote
            .rename(conversation_id, title)
            .await
            .map_err(|e| self.fail(MutationKind::Rename, e))?;

        self.store.dispatch(Action::RenameConversation {
            conversation_id: conversation_id.to_string(),
            title: title.to_string(),
        });
        tracing::info!("[MutationCoordinator] renamed {}", conversation_id);
        Ok(())
    }

    pub async fn delete(&self, conversation_id: &str) -> Result<()> {
        self.remote
            .delete(conversation_id)
            .await
            .map_err(|e| self.fail(MutationKind::Delete, e))?;

        self.store.dispatch(Action::DeleteConversation {
            conversation_id: conversation_id.to_string(),
        });
        tracing::info!("[MutationCoordinator] deleted {}", conversation_id);
        Ok(())
    }

    pub async fn delete_all(&self) -> Result<()> {
        self.remote
            .delete_all()
            .await
            .map_err(|e| self.fail(MutationKind::DeleteAll, e))?;

        self.store.dispatch(Action::DeleteAll);
        tracing::info!("[MutationCoordinator] deleted all history");
        Ok(())
    }

    /// Clears the messages of the selected conversation.
    pub async fn clear(&self, conversation_id: &str) -> Result<()> {
        self.remote
            .clear_messages(conversation_id)
            .await
            .map_err(|e| self.fail(MutationKind::Clear, e))?;

        self.store.dispatch(Action::ClearCurrentMessages {
            conversation_id: conversation_id.to_string(),
        });
        tracing::info!("[MutationCoordinator] cleared {}", conversation_id);
        Ok(())
    }

    fn fail(&self, kind: MutationKind, error: RemoteError) -> SyncError {
        tracing::warn!("[MutationCoordinator] {:?} failed: {}", kind, error);
        self.errors.report(TransientError::failed(kind));
        error.into()
    }
}
