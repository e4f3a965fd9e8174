pub mod ask;
pub mod feedback;
pub mod history;
pub mod mutate;
pub mod probe;

use anyhow::{Result, bail};
use chatsync_application::{HistoryStep, SyncSession};

/// Runs session startup and fails unless history is usable.
pub async fn start_with_history(session: &SyncSession) -> Result<()> {
    let report = session.bootstrap.start().await;
    match report.history {
        HistoryStep::Loaded(_) => Ok(()),
        HistoryStep::Unavailable => bail!("History is unavailable: {}", report.health.status),
        HistoryStep::Failed => bail!("History could not be loaded: {}", report.health.status),
    }
}
