//! Folding a newline-delimited chat reply into a [`ChatReply`].

use crate::dto::{ChatChunk, ChunkMessage};
use chatsync_core::conversation::{Message, MessageRole};
use chatsync_core::remote::{ChatReply, RemoteError};
use std::str::FromStr;

/// Accumulates chunks as they arrive.
///
/// Bytes may split a line anywhere, so input is buffered until a newline.
/// Consecutive assistant fragments sharing an id are concatenated into one
/// message; every tool fragment becomes its own message.
#[derive(Debug, Default)]
pub struct ReplyAccumulator {
    buffer: Vec<u8>,
    reply: ChatReply,
    chunks: usize,
}

impl ReplyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of complete chunks folded so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Feeds raw bytes from the response body.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), RemoteError> {
        self.buffer.extend_from_slice(bytes);
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.push_line(&line)?;
        }
        Ok(())
    }

    /// Flushes any trailing unterminated line and returns the folded reply.
    pub fn finish(mut self) -> Result<ChatReply, RemoteError> {
        let rest = std::mem::take(&mut self.buffer);
        self.push_line(&rest)?;
        Ok(self.reply)
    }

    fn push_line(&mut self, raw: &[u8]) -> Result<(), RemoteError> {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        let chunk: ChatChunk = serde_json::from_str(line)
            .map_err(|e| RemoteError::shape(format!("invalid reply chunk: {e}")))?;
        self.chunks += 1;
        self.apply(chunk)
    }

    fn apply(&mut self, chunk: ChatChunk) -> Result<(), RemoteError> {
        if let Some(error) = chunk.error.filter(|e| !e.is_null()) {
            let message = match error {
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            };
            return Err(RemoteError::Reply(message));
        }

        if let Some(metadata) = chunk.history_metadata {
            self.reply.history_metadata = Some(metadata);
        }
        if let Some(results) = chunk.exec_results.filter(|r| !r.is_null()) {
            self.reply.exec_results = Some(results);
        }

        for fragment in chunk.choices.into_iter().flat_map(|c| c.messages) {
            self.fold(fragment);
        }
        Ok(())
    }

    fn fold(&mut self, fragment: ChunkMessage) {
        let role = match MessageRole::from_str(&fragment.role) {
            Ok(role) => role,
            Err(e) => {
                tracing::debug!("[ReplyAccumulator] ignoring fragment: {}", e);
                return;
            }
        };

        match role {
            MessageRole::Assistant => {
                if let Some(last) = self.reply.messages.last_mut()
                    && last.role == MessageRole::Assistant
                    && last.id == fragment.id
                {
                    last.content.push_text(&fragment.content);
                    if fragment.end_turn.is_some() {
                        last.end_turn = fragment.end_turn;
                    }
                    return;
                }
                self.reply.messages.push(to_message(role, fragment));
            }
            MessageRole::Tool => self.reply.messages.push(to_message(role, fragment)),
            // The server echoes the user's turn; the engine already has it.
            MessageRole::User => {}
        }
    }
}

fn to_message(role: MessageRole, fragment: ChunkMessage) -> Message {
    let mut message = Message::new(fragment.id, role, fragment.content, fragment.date);
    message.end_turn = fragment.end_turn;
    message.context = fragment.context;
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(messages: &str) -> String {
        format!(r#"{{"id":"r1","model":"gpt","created":1,"object":"chat.completion.chunk","choices":[{{"messages":{messages}}}]}}"#)
    }

    #[test]
    fn test_assistant_deltas_concatenate() {
        let mut acc = ReplyAccumulator::new();
        let body = [
            chunk(r#"[{"id":"a1","role":"assistant","content":"Hel","date":"d"}]"#),
            chunk(r#"[{"id":"a1","role":"assistant","content":"lo","date":"d"}]"#),
            chunk(r#"[{"id":"a1","role":"assistant","content":"!","date":"d","end_turn":true}]"#),
        ]
        .join("\n");

        acc.push_bytes(body.as_bytes()).unwrap();
        let reply = acc.finish().unwrap();

        assert_eq!(reply.messages.len(), 1);
        assert_eq!(reply.messages[0].content.text(), "Hello!");
        assert_eq!(reply.messages[0].end_turn, Some(true));
    }

    #[test]
    fn test_tool_messages_stay_separate() {
        let mut acc = ReplyAccumulator::new();
        let body = format!(
            "{}\n{}\n",
            chunk(r#"[{"id":"t1","role":"tool","content":"{\"citations\":[]}","date":"d"}]"#),
            chunk(r#"[{"id":"a1","role":"assistant","content":"answer","date":"d"}]"#),
        );
        acc.push_bytes(body.as_bytes()).unwrap();
        let reply = acc.finish().unwrap();

        let roles: Vec<_> = reply.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![MessageRole::Tool, MessageRole::Assistant]);
    }

    #[test]
    fn test_line_split_across_byte_chunks() {
        let line = chunk(r#"[{"id":"a1","role":"assistant","content":"split","date":"d"}]"#);
        let (head, tail) = line.as_bytes().split_at(line.len() / 2);

        let mut acc = ReplyAccumulator::new();
        acc.push_bytes(head).unwrap();
        assert_eq!(acc.chunk_count(), 0);
        acc.push_bytes(tail).unwrap();
        acc.push_bytes(b"\n").unwrap();
        assert_eq!(acc.chunk_count(), 1);

        let reply = acc.finish().unwrap();
        assert_eq!(reply.messages[0].content.text(), "split");
    }

    #[test]
    fn test_metadata_and_exec_results_are_kept() {
        let mut acc = ReplyAccumulator::new();
        acc.push_bytes(
            br#"{"history_metadata":{"conversation_id":"c9","title":"New chat","date":"2024-05-01"},"exec_results":[{"intent":"sum"}],"choices":[]}"#,
        )
        .unwrap();
        let reply = acc.finish().unwrap();

        assert_eq!(reply.history_metadata.unwrap().conversation_id, "c9");
        assert_eq!(reply.exec_results.unwrap()[0]["intent"], "sum");
    }

    #[test]
    fn test_error_chunk_fails_reply() {
        let mut acc = ReplyAccumulator::new();
        let err = acc
            .push_bytes(b"{\"error\":\"The model is overloaded\"}\n")
            .unwrap_err();
        assert_eq!(err, RemoteError::Reply("The model is overloaded".into()));
    }

    #[test]
    fn test_garbage_line_is_shape_error() {
        let mut acc = ReplyAccumulator::new();
        acc.push_bytes(b"not json").unwrap();
        assert!(matches!(acc.finish(), Err(RemoteError::Shape(_))));
    }

    #[test]
    fn test_keepalive_chunks_are_harmless() {
        let mut acc = ReplyAccumulator::new();
        acc.push_bytes(b"{}\n\n{}\n").unwrap();
        let reply = acc.finish().unwrap();
        assert!(reply.messages.is_empty());
        assert!(reply.history_metadata.is_none());
    }
}
