use super::start_with_history;
use anyhow::Result;
use chatsync_application::{LoadOutcome, SyncSession};

pub async fn run(session: &SyncSession, pages: usize) -> Result<()> {
    start_with_history(session).await?;

    for _ in 1..pages {
        match session.loader.load_next().await {
            LoadOutcome::Loaded(0) => break,
            LoadOutcome::Loaded(_) | LoadOutcome::AlreadyInFlight => {}
            LoadOutcome::Failed => {
                eprintln!("⚠️  stopped at offset {}: page failed", session.loader.cursor());
                break;
            }
        }
    }

    let state = session.store.snapshot();
    let history = state.history.unwrap_or_default();
    if history.is_empty() {
        println!("No conversations.");
        return Ok(());
    }

    for conversation in &history {
        println!(
            "{}  {:<24}  {} ({} messages)",
            conversation.id,
            conversation.date,
            conversation.title,
            conversation.messages.len()
        );
    }
    println!("\n{} conversation(s)", history.len());
    Ok(())
}
