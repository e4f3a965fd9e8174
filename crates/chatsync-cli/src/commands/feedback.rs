use anyhow::{Context, Result};
use chatsync_application::SyncSession;
use chatsync_core::conversation::FeedbackTag;

pub async fn run(session: &SyncSession, message_id: &str, tag: FeedbackTag) -> Result<()> {
    session
        .feedback
        .submit(message_id, tag)
        .await
        .context("There was an issue logging feedback")?;
    println!("✅ {message_id} marked {tag}");
    Ok(())
}
