//! Remote conversation store boundary.
//!
//! The engine never talks HTTP itself. It depends on [`RemoteStore`], and
//! every failure mode a transport can produce is normalized into
//! [`RemoteError`] before it reaches the engine.

use crate::conversation::{FeedbackTag, Message};
use crate::settings::FrontendSettings;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Normalized failure of a remote store operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// No response at all (connection refused, timeout, reset)
    #[error("remote store unreachable: {0}")]
    Transport(String),

    /// A response arrived with a non-2xx status
    #[error("remote store returned status {code}: {message}")]
    Status { code: u16, message: String },

    /// A 2xx response whose body does not have the expected shape
    #[error("malformed response: {0}")]
    Shape(String),

    /// The streamed reply itself reported a failure
    #[error("assistant reply failed: {0}")]
    Reply(String),

    /// The caller cancelled the operation before it completed
    #[error("operation cancelled")]
    Cancelled,
}

impl RemoteError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::Status {
            code,
            message: message.into(),
        }
    }

    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape(message.into())
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Raw outcome of the health endpoint.
///
/// Non-2xx statuses are meaningful here, so they are reported as data rather
/// than as [`RemoteError::Status`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HealthReport {
    pub status_code: u16,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// One entry of a history page.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub created_at: String,
    /// `None` when the page did not include message content.
    pub messages: Option<Vec<Message>>,
}

/// Where a send-message request goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEndpoint {
    /// `POST /conversation`: nothing is persisted remotely.
    Conversation,
    /// `POST /history/generate`: the exchange is persisted.
    HistoryGenerate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub endpoint: ChatEndpoint,
    pub conversation_id: Option<String>,
    /// Full message list, the new user message last.
    pub messages: Vec<Message>,
}

/// Conversation metadata attached to a persisted reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMetadata {
    pub conversation_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
}

/// A complete assistant reply, after all streamed chunks were folded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatReply {
    pub messages: Vec<Message>,
    pub history_metadata: Option<HistoryMetadata>,
    /// Opaque execution results attached to the reply, if any.
    pub exec_results: Option<serde_json::Value>,
}

/// An abstract client of the remote conversation store.
///
/// All operations are asynchronous and may fail with a transport error, a
/// non-success status or a malformed body; implementations report each as
/// the matching [`RemoteError`] variant and never hand a malformed body back
/// as a value.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// `GET /history/ensure`
    async fn health_check(&self) -> Result<HealthReport, RemoteError>;

    /// `GET /history/list?offset=N`
    async fn list_page(&self, offset: usize) -> Result<Vec<ConversationSummary>, RemoteError>;

    /// `POST /history/read`
    async fn read_messages(&self, conversation_id: &str) -> Result<Vec<Message>, RemoteError>;

    /// `POST /history/rename`
    async fn rename(&self, conversation_id: &str, title: &str) -> Result<(), RemoteError>;

    /// `DELETE /history/delete`
    async fn delete(&self, conversation_id: &str) -> Result<(), RemoteError>;

    /// `DELETE /history/delete_all`
    async fn delete_all(&self) -> Result<(), RemoteError>;

    /// `POST /history/clear`
    async fn clear_messages(&self, conversation_id: &str) -> Result<(), RemoteError>;

    /// `GET /frontend_settings`
    async fn get_settings(&self) -> Result<FrontendSettings, RemoteError>;

    /// `POST /history/message_feedback`
    async fn post_feedback(&self, message_id: &str, tag: FeedbackTag) -> Result<(), RemoteError>;

    /// `POST /conversation` or `POST /history/generate`.
    ///
    /// Resolves to [`RemoteError::Cancelled`] once `cancel` fires; no partial
    /// reply is ever returned.
    async fn send_message(
        &self,
        request: ChatRequest,
        cancel: CancellationToken,
    ) -> Result<ChatReply, RemoteError>;
}
