//! Replica state model.

use crate::conversation::{Conversation, FeedbackTag};
use crate::health::HealthStatus;
use crate::settings::FrontendSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Progress of the history load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadingState {
    #[default]
    NotStarted,
    Loading,
    Success,
    Fail,
}

/// The in-memory replica of conversation history.
///
/// Created once per session with all-unknown defaults. Every field changes
/// only through [`crate::state::reduce`].
///
/// `history` distinguishes "never fetched" (`None`) from "confirmed empty"
/// (`Some(vec![])`). `selected` is held by value, so it never aliases the
/// matching list entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplicaState {
    pub history_panel_open: bool,
    pub loading: LoadingState,
    pub health: HealthStatus,
    pub history: Option<Vec<Conversation>>,
    pub filtered_history: Option<Vec<Conversation>>,
    pub selected: Option<Conversation>,
    pub feedback: HashMap<String, FeedbackTag>,
    pub exec_results: HashMap<String, serde_json::Value>,
    pub settings: Option<FrontendSettings>,
    pub ready: bool,
}

impl ReplicaState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations in the replica (0 when unknown).
    pub fn history_len(&self) -> usize {
        self.history.as_ref().map_or(0, Vec::len)
    }

    pub fn find_conversation(&self, conversation_id: &str) -> Option<&Conversation> {
        self.history
            .as_ref()?
            .iter()
            .find(|conversation| conversation.id == conversation_id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|conversation| conversation.id.as_str())
    }

    /// Feedback for a message: the session map wins over what the store sent.
    pub fn feedback_for(&self, message_id: &str) -> Option<FeedbackTag> {
        if let Some(tag) = self.feedback.get(message_id) {
            return Some(*tag);
        }
        self.history
            .iter()
            .flatten()
            .flat_map(|conversation| conversation.messages.iter())
            .find(|message| message.id == message_id)
            .and_then(|message| message.feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Message, MessageRole};
    use crate::health::StoreStatus;

    #[test]
    fn test_new_state_is_all_unknown() {
        let state = ReplicaState::new();
        assert!(!state.history_panel_open);
        assert_eq!(state.loading, LoadingState::NotStarted);
        assert_eq!(state.health.status, StoreStatus::NotConfigured);
        assert!(!state.health.available);
        assert!(state.history.is_none());
        assert!(state.filtered_history.is_none());
        assert!(state.selected.is_none());
        assert!(state.feedback.is_empty());
        assert!(state.exec_results.is_empty());
        assert!(state.settings.is_none());
        assert!(!state.ready);
    }

    #[test]
    fn test_feedback_map_overrides_message_feedback() {
        let mut message = Message::new("m1", MessageRole::Assistant, "hi", "2024-01-01");
        message.feedback = Some(FeedbackTag::Negative);
        let mut state = ReplicaState::new();
        state.history =
            Some(vec![Conversation::new("c1", "t", "2024-01-01").with_messages(vec![message])]);

        assert_eq!(state.feedback_for("m1"), Some(FeedbackTag::Negative));

        state.feedback.insert("m1".to_string(), FeedbackTag::Positive);
        assert_eq!(state.feedback_for("m1"), Some(FeedbackTag::Positive));
        assert_eq!(state.feedback_for("missing"), None);
    }
}
