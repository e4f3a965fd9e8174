//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `model`: the `Conversation` entity held by the replica
//! - `message`: messages, roles and multi-part content
//! - `feedback`: the closed set of feedback tags

mod feedback;
mod message;
mod model;

pub use feedback::FeedbackTag;
pub use message::{ContentPart, ImageUrl, Message, MessageContent, MessageRole};
pub use model::Conversation;
