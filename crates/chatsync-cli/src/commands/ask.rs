use anyhow::{Context, Result, bail};
use chatsync_application::SyncSession;
use chatsync_core::conversation::MessageRole;
use chatsync_core::state::Action;
use tokio_util::sync::CancellationToken;

pub async fn run(session: &SyncSession, text: &str, conversation_id: Option<&str>) -> Result<()> {
    let report = session.bootstrap.start().await;
    tracing::debug!("[ask] startup: {:?}", report.history);

    if let Some(id) = conversation_id {
        let conversation = session
            .store
            .read(|state| state.find_conversation(id).cloned())
            .with_context(|| format!("Conversation {id} is not in the loaded history"))?;
        session
            .store
            .dispatch(Action::SelectConversation(Some(conversation)));
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let result = session.chat.send(text, cancel).await;
    watcher.abort();

    let conversation = match result {
        Ok(conversation) => conversation,
        Err(e) if e.is_cancelled() => bail!("Cancelled; nothing was saved"),
        Err(e) => return Err(e).context("The answer could not be generated"),
    };

    let answer = conversation
        .messages
        .iter()
        .rev()
        .find(|m| m.role == MessageRole::Assistant)
        .map(|m| m.content.text())
        .unwrap_or_default();
    println!("{answer}");
    println!("\n[{}] {}", conversation.id, conversation.title);
    Ok(())
}
