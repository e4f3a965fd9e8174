use super::start_with_history;
use anyhow::{Context, Result};
use chatsync_application::SyncSession;
use chatsync_core::state::Action;

pub async fn rename(session: &SyncSession, conversation_id: &str, title: &str) -> Result<()> {
    start_with_history(session).await?;
    session
        .mutations
        .rename(conversation_id, title)
        .await
        .with_context(|| transient_message(session, "rename failed"))?;
    println!("✅ Renamed {conversation_id} to \"{title}\"");
    Ok(())
}

pub async fn delete(session: &SyncSession, conversation_id: &str) -> Result<()> {
    session
        .mutations
        .delete(conversation_id)
        .await
        .with_context(|| transient_message(session, "delete failed"))?;
    println!("✅ Deleted {conversation_id}");
    Ok(())
}

pub async fn delete_all(session: &SyncSession) -> Result<()> {
    session
        .mutations
        .delete_all()
        .await
        .with_context(|| transient_message(session, "delete-all failed"))?;
    println!("✅ History deleted");
    Ok(())
}

pub async fn clear(session: &SyncSession, conversation_id: &str) -> Result<()> {
    start_with_history(session).await?;
    let conversation = session
        .store
        .read(|state| state.find_conversation(conversation_id).cloned())
        .with_context(|| format!("Conversation {conversation_id} is not in the loaded history"))?;
    session
        .store
        .dispatch(Action::SelectConversation(Some(conversation)));

    session
        .mutations
        .clear(conversation_id)
        .await
        .with_context(|| transient_message(session, "clear failed"))?;
    println!("✅ Cleared messages of {conversation_id}");
    Ok(())
}

fn transient_message(session: &SyncSession, fallback: &str) -> String {
    session
        .mutations
        .errors()
        .current()
        .map(|error| error.message)
        .unwrap_or_else(|| fallback.to_string())
}
