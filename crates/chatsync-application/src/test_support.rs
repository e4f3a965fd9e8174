//! Hand-written [`RemoteStore`] double shared by the service tests.

use async_trait::async_trait;
use chatsync_core::conversation::{Conversation, FeedbackTag, Message, MessageRole};
use chatsync_core::remote::{
    ChatReply, ChatRequest, ConversationSummary, HealthReport, RemoteError, RemoteStore,
};
use chatsync_core::settings::FrontendSettings;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Scripted remote store recording every call it receives.
///
/// Pages and message reads that were not scripted succeed with an empty
/// list. A gate, when set, holds the matching call until it is notified.
pub struct MockRemoteStore {
    pub health: Mutex<Result<HealthReport, RemoteError>>,
    pub pages: Mutex<HashMap<usize, Result<Vec<ConversationSummary>, RemoteError>>>,
    pub reads: Mutex<HashMap<String, Result<Vec<Message>, RemoteError>>>,
    pub settings: Mutex<Result<FrontendSettings, RemoteError>>,
    pub mutation_error: Mutex<Option<RemoteError>>,
    pub reply: Mutex<Result<ChatReply, RemoteError>>,
    pub list_gate: Mutex<Option<Arc<Notify>>>,
    pub reply_gate: Mutex<Option<Arc<Notify>>>,
    pub calls: Mutex<Vec<String>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl MockRemoteStore {
    pub fn new() -> Self {
        Self {
            health: Mutex::new(Ok(HealthReport {
                status_code: 200,
                message: Some("CosmosDB is configured and working".into()),
                error: None,
            })),
            pages: Mutex::new(HashMap::new()),
            reads: Mutex::new(HashMap::new()),
            settings: Mutex::new(Ok(FrontendSettings::default())),
            mutation_error: Mutex::new(None),
            reply: Mutex::new(Ok(ChatReply::default())),
            list_gate: Mutex::new(None),
            reply_gate: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page(self, offset: usize, page: Vec<ConversationSummary>) -> Self {
        self.pages.lock().unwrap().insert(offset, Ok(page));
        self
    }

    pub fn with_failing_page(self, offset: usize, error: RemoteError) -> Self {
        self.pages.lock().unwrap().insert(offset, Err(error));
        self
    }

    pub fn with_health(self, report: Result<HealthReport, RemoteError>) -> Self {
        *self.health.lock().unwrap() = report;
        self
    }

    pub fn fail_mutations(&self, error: RemoteError) {
        *self.mutation_error.lock().unwrap() = Some(error);
    }

    pub fn gate_list(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.list_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn gate_reply(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.reply_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn mutation_result(&self) -> Result<(), RemoteError> {
        match self.mutation_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteStore for MockRemoteStore {
    async fn health_check(&self) -> Result<HealthReport, RemoteError> {
        self.record("health_check".into());
        self.health.lock().unwrap().clone()
    }

    async fn list_page(&self, offset: usize) -> Result<Vec<ConversationSummary>, RemoteError> {
        self.record(format!("list_page:{offset}"));
        let gate = self.list_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.pages
            .lock()
            .unwrap()
            .get(&offset)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn read_messages(&self, conversation_id: &str) -> Result<Vec<Message>, RemoteError> {
        self.record(format!("read_messages:{conversation_id}"));
        self.reads
            .lock()
            .unwrap()
            .get(conversation_id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn rename(&self, conversation_id: &str, title: &str) -> Result<(), RemoteError> {
        self.record(format!("rename:{conversation_id}:{title}"));
        self.mutation_result()
    }

    async fn delete(&self, conversation_id: &str) -> Result<(), RemoteError> {
        self.record(format!("delete:{conversation_id}"));
        self.mutation_result()
    }

    async fn delete_all(&self) -> Result<(), RemoteError> {
        self.record("delete_all".into());
        self.mutation_result()
    }

    async fn clear_messages(&self, conversation_id: &str) -> Result<(), RemoteError> {
        self.record(format!("clear_messages:{conversation_id}"));
        self.mutation_result()
    }

    async fn get_settings(&self) -> Result<FrontendSettings, RemoteError> {
        self.record("get_settings".into());
        self.settings.lock().unwrap().clone()
    }

    async fn post_feedback(&self, message_id: &str, tag: FeedbackTag) -> Result<(), RemoteError> {
        self.record(format!("post_feedback:{message_id}:{tag}"));
        self.mutation_result()
    }

    async fn send_message(
        &self,
        request: ChatRequest,
        cancel: CancellationToken,
    ) -> Result<ChatReply, RemoteError> {
        self.record("send_message".into());
        self.requests.lock().unwrap().push(request);
        let gate = self.reply_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            tokio::select! {
                _ = cancel.cancelled() => return Err(RemoteError::Cancelled),
                _ = gate.notified() => {}
            }
        }
        if cancel.is_cancelled() {
            return Err(RemoteError::Cancelled);
        }
        self.reply.lock().unwrap().clone()
    }
}

pub fn summary(id: &str, title: &str) -> ConversationSummary {
    ConversationSummary {
        id: id.into(),
        title: title.into(),
        created_at: "2024-05-01T10:00:00Z".into(),
        messages: None,
    }
}

pub fn page(prefix: &str, len: usize) -> Vec<ConversationSummary> {
    (0..len)
        .map(|i| summary(&format!("{prefix}{i}"), &format!("Chat {prefix}{i}")))
        .collect()
}

pub fn conversation(id: &str, title: &str) -> Conversation {
    Conversation::new(id, title, "2024-05-01T10:00:00Z").with_messages(vec![
        Message::new(format!("{id}-q"), MessageRole::User, "question", "2024-05-01T10:00:00Z"),
        Message::new(format!("{id}-a"), MessageRole::Assistant, "answer", "2024-05-01T10:00:02Z"),
    ])
}
