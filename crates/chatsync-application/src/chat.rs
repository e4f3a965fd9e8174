//! Sending a user message and committing the assistant's reply.

use chatsync_core::conversation::{Conversation, Message, MessageRole};
use chatsync_core::error::{Result, SyncError};
use chatsync_core::remote::{ChatEndpoint, ChatRequest, HistoryMetadata, RemoteError, RemoteStore};
use chatsync_core::state::{Action, StateStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Titles derived from a first question are cut to this many characters.
const DERIVED_TITLE_CHARS: usize = 40;

pub struct ChatService {
    remote: Arc<dyn RemoteStore>,
    store: Arc<StateStore>,
}

impl ChatService {
    pub fn new(remote: Arc<dyn RemoteStore>, store: Arc<StateStore>) -> Self {
        Self { remote, store }
    }

    /// Sends `text` in the selected conversation, or starts a new one.
    ///
    /// The exchange is persisted (`/history/generate`) when the store is
    /// available, otherwise it only reaches `/conversation`. Nothing is
    /// committed until the whole reply arrived: a cancelled or failed send
    /// leaves the replica untouched.
    ///
    /// A reply to an existing conversation lands on the replica's copy at
    /// commit time. If that conversation was deleted meanwhile, the reply is
    /// dropped and [`SyncError::NotFound`] is returned.
    pub async fn send(&self, text: &str, cancel: CancellationToken) -> Result<Conversation> {
        if text.trim().is_empty() {
            return Err(SyncError::validation("message text is empty"));
        }

        let (selected, persisted) = self.store.read(|state| {
            let selected = state
                .selected
                .as_ref()
                .map(|c| (c.id.clone(), c.messages.clone()));
            (selected, state.health.available)
        });

        let now = chrono::Utc::now().to_rfc3339();
        let question = Message::new(
            uuid::Uuid::new_v4().to_string(),
            MessageRole::User,
            text,
            now.clone(),
        );

        let (conversation_id, mut messages) = match selected {
            Some((id, messages)) => (Some(id), messages),
            None => (None, Vec::new()),
        };
        messages.push(question.clone());

        let request = ChatRequest {
            endpoint: if persisted {
                ChatEndpoint::HistoryGenerate
            } else {
                ChatEndpoint::Conversation
            },
            conversation_id: conversation_id.clone().filter(|_| persisted),
            messages: messages.clone(),
        };

        let reply = match self.remote.send_message(request, cancel).await {
            Ok(reply) => reply,
            Err(e) => {
                if e == RemoteError::Cancelled {
                    tracing::info!("[ChatService] send cancelled, nothing committed");
                } else {
                    tracing::warn!("[ChatService] send failed: {}", e);
                }
                return Err(e.into());
            }
        };

        let answer_id = reply
            .messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Assistant)
            .map(|m| m.id.clone());

        let committed = match conversation_id {
            Some(id) => {
                let mut exchange = vec![question];
                exchange.extend(reply.messages);
                self.commit_to_existing(id, exchange)?
            }
            None => {
                let conversation = new_conversation(text, &now, reply.history_metadata)
                    .with_messages(messages.into_iter().chain(reply.messages).collect());
                self.store
                    .dispatch(Action::SelectConversation(Some(conversation.clone())));
                self.store
                    .dispatch(Action::AppendOrReplaceConversation(conversation.clone()));
                conversation
            }
        };

        if let (Some(result), Some(message_id)) = (reply.exec_results, answer_id) {
            self.store.dispatch(Action::SetExecResult { message_id, result });
        }

        tracing::info!(
            "[ChatService] reply committed to {} ({} message(s))",
            committed.id,
            committed.messages.len()
        );
        Ok(committed)
    }

    /// Appends the exchange to the replica's current copy of the
    /// conversation, so mutations that landed during the send survive.
    fn commit_to_existing(&self, id: String, exchange: Vec<Message>) -> Result<Conversation> {
        self.store.dispatch(Action::CommitReply {
            conversation_id: id.clone(),
            messages: exchange,
        });
        self.store
            .read(|state| state.selected.clone().filter(|c| c.id == id))
            .ok_or_else(|| {
                tracing::warn!(
                    "[ChatService] {} was deleted while the reply was in flight",
                    id
                );
                SyncError::not_found("Conversation", id)
            })
    }
}

fn new_conversation(
    text: &str,
    now: &str,
    metadata: Option<HistoryMetadata>,
) -> Conversation {
    let id = metadata
        .as_ref()
        .map(|m| m.conversation_id.clone())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let title = metadata
        .as_ref()
        .map(|m| m.title.clone())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| derive_title(text));
    let date = metadata
        .map(|m| m.date)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| now.to_string());
    Conversation::new(id, title, date)
}

fn derive_title(text: &str) -> String {
    let text = text.trim();
    match text.char_indices().nth(DERIVED_TITLE_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
