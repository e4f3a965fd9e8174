//! Wire representations of the remote store's JSON bodies.
//!
//! These types mirror the HTTP payloads exactly and are converted to the
//! domain types of `chatsync-core` at the client boundary. Nothing outside
//! this crate sees them.

use chatsync_core::conversation::{FeedbackTag, Message, MessageContent, MessageRole};
use chatsync_core::remote::{ConversationSummary, HistoryMetadata};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Responses
// ============================================================================

/// Body of `GET /history/ensure`. Either field may be absent or of any JSON
/// type; only truthy values count.
#[derive(Debug, Default, Deserialize)]
pub struct HealthBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl HealthBody {
    pub fn message(&self) -> Option<String> {
        truthy_text(self.message.as_ref())
    }

    pub fn error(&self) -> Option<String> {
        truthy_text(self.error.as_ref())
    }
}

/// Text of a truthy JSON value; `None` for null, false, 0 and "".
fn truthy_text(value: Option<&serde_json::Value>) -> Option<String> {
    use serde_json::Value;
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// One element of the `GET /history/list` array.
#[derive(Debug, Deserialize)]
pub struct ConversationListEntry {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(default)]
    pub messages: Option<Vec<StoredMessage>>,
}

impl ConversationListEntry {
    pub fn into_summary(self) -> ConversationSummary {
        ConversationSummary {
            id: self.id,
            title: self.title,
            created_at: self.created_at,
            messages: self.messages.map(into_messages),
        }
    }
}

/// Body of `POST /history/read`.
#[derive(Debug, Deserialize)]
pub struct ReadResponse {
    #[serde(default)]
    pub messages: Vec<StoredMessage>,
}

/// A message as persisted by the remote store.
#[derive(Debug, Deserialize)]
pub struct StoredMessage {
    pub id: String,
    pub role: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(default)]
    pub content: MessageContent,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub end_turn: Option<bool>,
    #[serde(default)]
    pub context: Option<String>,
}

impl StoredMessage {
    /// Converts to a domain message; `None` for roles the engine does not know.
    pub fn into_message(self) -> Option<Message> {
        let role = match MessageRole::from_str(&self.role) {
            Ok(role) => role,
            Err(e) => {
                tracing::warn!("[dto] skipping message {}: {}", self.id, e);
                return None;
            }
        };

        // Stored feedback may be a comma-joined list; the first tag is the verdict.
        let feedback = self
            .feedback
            .as_deref()
            .and_then(|raw| raw.split(',').next())
            .and_then(|tag| FeedbackTag::from_str(tag.trim()).ok());

        Some(Message {
            id: self.id,
            role,
            content: self.content,
            end_turn: self.end_turn,
            date: self.created_at,
            feedback,
            context: self.context,
        })
    }
}

pub fn into_messages(stored: Vec<StoredMessage>) -> Vec<Message> {
    stored
        .into_iter()
        .filter_map(StoredMessage::into_message)
        .collect()
}

/// One newline-delimited chunk of a chat reply.
#[derive(Debug, Default, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub history_metadata: Option<HistoryMetadata>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub exec_results: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub messages: Vec<ChunkMessage>,
}

/// A message fragment inside a chunk. Assistant fragments are deltas.
#[derive(Debug, Deserialize)]
pub struct ChunkMessage {
    #[serde(default)]
    pub id: String,
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub end_turn: Option<bool>,
    #[serde(default)]
    pub context: Option<String>,
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ConversationIdBody<'a> {
    pub conversation_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RenameBody<'a> {
    pub conversation_id: &'a str,
    pub title: &'a str,
}

#[derive(Debug, Serialize)]
pub struct FeedbackBody<'a> {
    pub message_id: &'a str,
    pub message_feedback: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<&'a str>,
    pub messages: &'a [Message],
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_health_body_accepts_non_string_message() {
        let body: HealthBody = serde_json::from_value(json!({"message": true})).unwrap();
        assert_eq!(body.message().as_deref(), Some("true"));
        assert_eq!(body.error(), None);
    }

    #[test]
    fn test_health_body_falsy_values_are_absent() {
        for falsy in [json!(null), json!(false), json!(0), json!("")] {
            let body: HealthBody =
                serde_json::from_value(json!({"message": falsy, "error": falsy})).unwrap();
            assert_eq!(body.message(), None);
            assert_eq!(body.error(), None);
        }
    }

    #[test]
    fn test_health_body_keeps_text() {
        let body: HealthBody = serde_json::from_value(json!({
            "message": "CosmosDB is configured and working",
            "error": "database missing"
        }))
        .unwrap();
        assert_eq!(body.message().as_deref(), Some("CosmosDB is configured and working"));
        assert_eq!(body.error().as_deref(), Some("database missing"));
    }

    #[test]
    fn test_list_entry_maps_created_at_to_date() {
        let entry: ConversationListEntry = serde_json::from_value(json!({
            "id": "c1",
            "title": "Quarterly numbers",
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        let summary = entry.into_summary();
        assert_eq!(summary.created_at, "2024-05-01T10:00:00Z");
        assert!(summary.messages.is_none());
    }

    #[test]
    fn test_read_response_maps_messages() {
        let read: ReadResponse = serde_json::from_value(json!({
            "messages": [
                {"id": "m1", "role": "user", "createdAt": "2024-05-01T10:00:00Z", "content": "hi"},
                {"id": "m2", "role": "assistant", "createdAt": "2024-05-01T10:00:02Z",
                 "content": "hello", "feedback": "negative,missing_citation"},
                {"id": "m3", "role": "system", "createdAt": "2024-05-01T10:00:03Z", "content": "x"},
                {"id": "m4", "role": "user", "createdAt": "2024-05-01T10:00:04Z",
                 "content": [{"type": "text", "text": "look"},
                             {"type": "image_url", "image_url": {"url": "data:image/png;base64,AA"}}]}
            ]
        }))
        .unwrap();

        let messages = into_messages(read.messages);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].date, "2024-05-01T10:00:00Z");
        assert_eq!(messages[1].feedback, Some(FeedbackTag::Negative));
        assert_eq!(messages[2].id, "m4");
        assert_eq!(messages[2].content.text(), "look");
    }

    #[test]
    fn test_chat_body_omits_missing_conversation_id() {
        let messages = vec![Message::new("u1", MessageRole::User, "hi", "2024-05-01")];
        let body = serde_json::to_value(ChatBody {
            conversation_id: None,
            messages: &messages,
        })
        .unwrap();

        assert!(body.get("conversation_id").is_none());
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["date"], "2024-05-01");
    }

    #[test]
    fn test_feedback_body_uses_wire_names() {
        let body = serde_json::to_value(FeedbackBody {
            message_id: "m1",
            message_feedback: FeedbackTag::OtherHarmful.as_str(),
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"message_id": "m1", "message_feedback": "other_harmlful"})
        );
    }
}
