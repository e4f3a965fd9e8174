//! Replica transitions.

use super::model::LoadingState;
use crate::conversation::{Conversation, FeedbackTag, Message};
use crate::health::HealthStatus;
use crate::settings::FrontendSettings;

/// How a fetched history page lands in the replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMerge {
    /// First page of a session: the list becomes exactly the page.
    Replace,
    /// Later pages: concatenated after the existing entries.
    Append,
}

/// Every transition the replica accepts. Each variant carries exactly the
/// payload it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ToggleHistoryPanel,
    SetHealth(HealthStatus),
    SetLoadingState(LoadingState),
    SelectConversation(Option<Conversation>),
    ReplaceFilteredHistory(Option<Vec<Conversation>>),
    /// Replaces the entry with the same id in place, or appends it.
    AppendOrReplaceConversation(Conversation),
    RenameConversation {
        conversation_id: String,
        title: String,
    },
    DeleteConversation {
        conversation_id: String,
    },
    DeleteAll,
    ClearCurrentMessages {
        conversation_id: String,
    },
    /// Appends a completed exchange to a conversation the replica still
    /// knows and selects its current entry. Identity once it was deleted.
    CommitReply {
        conversation_id: String,
        messages: Vec<Message>,
    },
    ReplaceHistoryPage {
        page: Vec<Conversation>,
        merge: PageMerge,
    },
    ReplaceSettings(Option<FrontendSettings>),
    SetFeedback {
        message_id: String,
        tag: FeedbackTag,
    },
    SetExecResult {
        message_id: String,
        result: serde_json::Value,
    },
}

impl Action {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::ToggleHistoryPanel => "toggle_history_panel",
            Action::SetHealth(_) => "set_health",
            Action::SetLoadingState(_) => "set_loading_state",
            Action::SelectConversation(_) => "select_conversation",
            Action::ReplaceFilteredHistory(_) => "replace_filtered_history",
            Action::AppendOrReplaceConversation(_) => "append_or_replace_conversation",
            Action::RenameConversation { .. } => "rename_conversation",
            Action::DeleteConversation { .. } => "delete_conversation",
            Action::DeleteAll => "delete_all",
            Action::ClearCurrentMessages { .. } => "clear_current_messages",
            Action::CommitReply { .. } => "commit_reply",
            Action::ReplaceHistoryPage { .. } => "replace_history_page",
            Action::ReplaceSettings(_) => "replace_settings",
            Action::SetFeedback { .. } => "set_feedback",
            Action::SetExecResult { .. } => "set_exec_result",
        }
    }
}
