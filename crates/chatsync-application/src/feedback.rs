//! Per-message feedback submission.

use chatsync_core::conversation::FeedbackTag;
use chatsync_core::error::Result;
use chatsync_core::remote::RemoteStore;
use chatsync_core::state::{Action, StateStore};
use std::sync::Arc;

pub struct FeedbackService {
    remote: Arc<dyn RemoteStore>,
    store: Arc<StateStore>,
}

impl FeedbackService {
    pub fn new(remote: Arc<dyn RemoteStore>, store: Arc<StateStore>) -> Self {
        Self { remote, store }
    }

    /// Records `tag` for a message, remotely first. The session's feedback
    /// map is only updated once the store accepted it.
    pub async fn submit(&self, message_id: &str, tag: FeedbackTag) -> Result<()> {
        if let Err(e) = self.remote.post_feedback(message_id, tag).await {
            tracing::warn!("[FeedbackService] feedback for {} not recorded: {}", message_id, e);
            return Err(e.into());
        }

        self.store.dispatch(Action::SetFeedback {
            message_id: message_id.to_string(),
            tag,
        });
        tracing::debug!("[FeedbackService] {} marked {}", message_id, tag);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockRemoteStore;
    use chatsync_core::remote::RemoteError;

    #[tokio::test]
    async fn test_feedback_is_posted_then_recorded() {
        let remote = Arc::new(MockRemoteStore::new());
        let store = Arc::new(StateStore::new());
        let service = FeedbackService::new(remote.clone(), store.clone());

        service.submit("m1", FeedbackTag::Negative).await.unwrap();
        service.submit("m1", FeedbackTag::MissingCitation).await.unwrap();

        assert_eq!(
            remote.calls(),
            vec!["post_feedback:m1:negative", "post_feedback:m1:missing_citation"]
        );
        assert_eq!(
            store.snapshot().feedback_for("m1"),
            Some(FeedbackTag::MissingCitation)
        );
    }

    #[tokio::test]
    async fn test_rejected_feedback_is_not_recorded() {
        let remote = Arc::new(MockRemoteStore::new());
        remote.fail_mutations(RemoteError::status(500, "down"));
        let store = Arc::new(StateStore::new());
        let service = FeedbackService::new(remote, store.clone());

        assert!(service.submit("m1", FeedbackTag::Positive).await.is_err());
        assert!(store.snapshot().feedback.is_empty());
    }
}
