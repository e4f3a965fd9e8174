//! Conversation domain model.

use super::message::Message;
use serde::{Deserialize, Serialize};

/// A conversation as held by the replica.
///
/// Identifiers are assigned by the remote store and never change. `date` is
/// the last-activity timestamp (ISO 8601); it drives display grouping only and
/// is never used to order the replica.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    /// Messages, oldest first.
    pub messages: Vec<Message>,
    pub date: String,
}

impl Conversation {
    pub fn new(id: impl Into<String>, title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            messages: Vec::new(),
            date: date.into(),
        }
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }
}
