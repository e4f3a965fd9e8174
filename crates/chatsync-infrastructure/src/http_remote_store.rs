//! HTTP client for the remote conversation store.

use crate::dto::{
    ChatBody, ConversationIdBody, ConversationListEntry, FeedbackBody, HealthBody, ReadResponse,
    RenameBody, into_messages,
};
use crate::stream::ReplyAccumulator;
use async_trait::async_trait;
use chatsync_core::config::SyncConfig;
use chatsync_core::conversation::{FeedbackTag, Message};
use chatsync_core::error::SyncError;
use chatsync_core::remote::{
    ChatEndpoint, ChatReply, ChatRequest, ConversationSummary, HealthReport, RemoteError,
    RemoteStore,
};
use chatsync_core::settings::FrontendSettings;
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

/// Longest error body quoted back in a [`RemoteError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// [`RemoteStore`] over the store's same-origin JSON API.
///
/// Session cookies are kept by the underlying client when `cookie_store` is
/// enabled; no other authentication is sent.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
}

impl HttpRemoteStore {
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .cookie_store(config.cookie_store)
            .build()
            .map_err(|e| SyncError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url_trimmed().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request whose body is ignored on success.
    async fn send_expecting_success(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(), RemoteError> {
        let response = request.send().await.map_err(map_transport)?;
        ensure_success(response).await.map(|_| ())
    }
}

/// Normalizes a reqwest failure that happened before or while reading a body.
fn map_transport(err: reqwest::Error) -> RemoteError {
    if err.is_decode() {
        RemoteError::shape(err.to_string())
    } else {
        RemoteError::transport(err.to_string())
    }
}

async fn ensure_success(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        body.truncate(cut);
    }
    Err(RemoteError::status(status.as_u16(), body))
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    let bytes = response.bytes().await.map_err(map_transport)?;
    serde_json::from_slice(&bytes).map_err(|e| RemoteError::shape(e.to_string()))
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn health_check(&self) -> Result<HealthReport, RemoteError> {
        let response = self
            .client
            .get(self.url("/history/ensure"))
            .send()
            .await
            .map_err(map_transport)?;

        let status_code = response.status().as_u16();
        // Non-JSON bodies are common on failing statuses; classify on status alone.
        let body: HealthBody = parse_json(response).await.unwrap_or_default();

        Ok(HealthReport {
            status_code,
            message: body.message(),
            error: body.error(),
        })
    }

    async fn list_page(
        &self,
        offset: usize,
    ) -> Result<Vec<ConversationSummary>, RemoteError> {
        let response = self
            .client
            .get(self.url("/history/list"))
            .query(&[("offset", offset)])
            .send()
            .await
            .map_err(map_transport)?;
        let response = ensure_success(response).await?;

        let payload: serde_json::Value = parse_json(response).await?;
        if !payload.is_array() {
            return Err(RemoteError::shape("history list is not an array"));
        }
        let entries: Vec<ConversationListEntry> =
            serde_json::from_value(payload).map_err(|e| RemoteError::shape(e.to_string()))?;

        Ok(entries
            .into_iter()
            .map(ConversationListEntry::into_summary)
            .collect())
    }

    async fn read_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<Message>, RemoteError> {
        let response = self
            .client
            .post(self.url("/history/read"))
            .json(&ConversationIdBody { conversation_id })
            .send()
            .await
            .map_err(map_transport)?;
        let response = ensure_success(response).await?;

        let read: ReadResponse = parse_json(response).await?;
        Ok(into_messages(read.messages))
    }

    async fn rename(&self, conversation_id: &str, title: &str) -> Result<(), RemoteError> {
        self.send_expecting_success(
            self.client
                .post(self.url("/history/rename"))
                .json(&RenameBody {
                    conversation_id,
                    title,
                }),
        )
        .await
    }

    async fn delete(&self, conversation_id: &str) -> Result<(), RemoteError> {
        self.send_expecting_success(
            self.client
                .delete(self.url("/history/delete"))
                .json(&ConversationIdBody { conversation_id }),
        )
        .await
    }

    async fn delete_all(&self) -> Result<(), RemoteError> {
        self.send_expecting_success(
            self.client
                .delete(self.url("/history/delete_all"))
                .json(&serde_json::json!({})),
        )
        .await
    }

    async fn clear_messages(&self, conversation_id: &str) -> Result<(), RemoteError> {
        self.send_expecting_success(
            self.client
                .post(self.url("/history/clear"))
                .json(&ConversationIdBody { conversation_id }),
        )
        .await
    }

    async fn get_settings(&self) -> Result<FrontendSettings, RemoteError> {
        let response = self
            .client
            .get(self.url("/frontend_settings"))
            .send()
            .await
            .map_err(map_transport)?;
        let response = ensure_success(response).await?;
        parse_json(response).await
    }

    async fn post_feedback(
        &self,
        message_id: &str,
        tag: FeedbackTag,
    ) -> Result<(), RemoteError> {
        self.send_expecting_success(
            self.client
                .post(self.url("/history/message_feedback"))
                .json(&FeedbackBody {
                    message_id,
                    message_feedback: tag.as_str(),
                }),
        )
        .await
    }

    async fn send_message(
        &self,
        request: ChatRequest,
        cancel: CancellationToken,
    ) -> Result<ChatReply, RemoteError> {
        let path = match request.endpoint {
            ChatEndpoint::Conversation => "/conversation",
            ChatEndpoint::HistoryGenerate => "/history/generate",
        };
        let body = ChatBody {
            conversation_id: request.conversation_id.as_deref(),
            messages: &request.messages,
        };
        let pending = self.client.post(self.url(path)).json(&body).send();

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(RemoteError::Cancelled),
            result = pending => result.map_err(map_transport)?,
        };
        let response = ensure_success(response).await?;

        let mut stream = response.bytes_stream();
        let mut accumulator = ReplyAccumulator::new();
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(
                        "[HttpRemoteStore] send cancelled after {} chunk(s)",
                        accumulator.chunk_count()
                    );
                    return Err(RemoteError::Cancelled);
                }
                next = stream.next() => match next {
                    Some(Ok(bytes)) => accumulator.push_bytes(&bytes)?,
                    Some(Err(e)) => return Err(map_transport(e)),
                    None => break,
                },
            }
        }

        accumulator.finish()
    }
}
