//! Paginated history loading.

use chatsync_core::conversation::{Conversation, Message};
use chatsync_core::remote::{ConversationSummary, RemoteStore};
use chatsync_core::state::{Action, PageMerge, StateStore};
use futures::future::join_all;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// Number of conversations requested per page.
pub const PAGE_SIZE: usize = 25;

/// Result of a load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was merged; carries the number of conversations it held.
    Loaded(usize),
    /// Another load is still waiting for its response; nothing was sent.
    AlreadyInFlight,
    /// The page request failed; replica and cursor are unchanged.
    Failed,
}

#[derive(Debug, Default)]
struct Cursor {
    offset: usize,
    generation: u64,
    in_flight: bool,
}

/// Fetches history pages and merges them into the replica.
///
/// The cursor only moves after a well-formed page was merged. At most one
/// page request is outstanding at a time: a load requested while another is
/// in flight returns [`LoadOutcome::AlreadyInFlight`] without a network call.
/// Each completed request/response cycle bumps the generation, which re-arms
/// the loader.
pub struct HistoryLoader {
    remote: Arc<dyn RemoteStore>,
    store: Arc<StateStore>,
    cursor: Mutex<Cursor>,
    idle: Notify,
}

/// Releases the in-flight slot when a load finishes or is dropped.
struct InFlight<'a> {
    loader: &'a HistoryLoader,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        {
            let mut cursor = self.loader.lock_cursor();
            cursor.in_flight = false;
            cursor.generation += 1;
        }
        self.loader.idle.notify_waiters();
    }
}

impl HistoryLoader {
    pub fn new(remote: Arc<dyn RemoteStore>, store: Arc<StateStore>) -> Self {
        Self {
            remote,
            store,
            cursor: Mutex::new(Cursor::default()),
            idle: Notify::new(),
        }
    }

    /// Offset of the next page to request.
    pub fn cursor(&self) -> usize {
        self.lock_cursor().offset
    }

    /// Number of completed request/response cycles.
    pub fn generation(&self) -> u64 {
        self.lock_cursor().generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.lock_cursor().in_flight
    }

    /// Resolves once no page request is outstanding.
    pub async fn wait_idle(&self) {
        loop {
            let mut notified = std::pin::pin!(self.idle.notified());
            notified.as_mut().enable();
            if !self.is_in_flight() {
                return;
            }
            notified.await;
        }
    }

    /// Loads the first page and replaces the replica's list with it.
    pub async fn load_initial(&self) -> LoadOutcome {
        let Some(_guard) = self.begin() else {
            return LoadOutcome::AlreadyInFlight;
        };

        match self.fetch_page(0).await {
            Some(page) => {
                let count = page.len();
                self.store.dispatch(Action::ReplaceHistoryPage {
                    page,
                    merge: PageMerge::Replace,
                });
                self.lock_cursor().offset = PAGE_SIZE;
                tracing::info!("[HistoryLoader] initial page loaded: {} conversation(s)", count);
                LoadOutcome::Loaded(count)
            }
            None => LoadOutcome::Failed,
        }
    }

    /// Loads the page at the cursor and appends it to the replica.
    pub async fn load_next(&self) -> LoadOutcome {
        let Some(_guard) = self.begin() else {
            tracing::debug!("[HistoryLoader] load_next ignored: request in flight");
            return LoadOutcome::AlreadyInFlight;
        };
        let offset = self.cursor();

        match self.fetch_page(offset).await {
            Some(page) => {
                let count = page.len();
                self.store.dispatch(Action::ReplaceHistoryPage {
                    page,
                    merge: PageMerge::Append,
                });
                self.lock_cursor().offset = offset + PAGE_SIZE;
                tracing::debug!(
                    "[HistoryLoader] page at offset {} appended: {} conversation(s)",
                    offset,
                    count
                );
                LoadOutcome::Loaded(count)
            }
            None => LoadOutcome::Failed,
        }
    }

    /// Fetches one page plus the messages of every summary that lacks them.
    ///
    /// Returns `None` when the page itself could not be fetched. A failed
    /// message read degrades that conversation to an empty message list.
    pub async fn fetch_page(&self, offset: usize) -> Option<Vec<Conversation>> {
        let summaries = match self.remote.list_page(offset).await {
            Ok(summaries) => summaries,
            Err(e) => {
                tracing::warn!("[HistoryLoader] page at offset {} failed: {}", offset, e);
                return None;
            }
        };

        let conversations = join_all(summaries.into_iter().map(|s| self.hydrate(s))).await;
        Some(conversations)
    }

    async fn hydrate(&self, summary: ConversationSummary) -> Conversation {
        let messages: Vec<Message> = match summary.messages {
            Some(messages) => messages,
            None => match self.remote.read_messages(&summary.id).await {
                Ok(messages) => messages,
                Err(e) => {
                    tracing::warn!(
                        "[HistoryLoader] messages of {} unavailable: {}",
                        summary.id,
                        e
                    );
                    Vec::new()
                }
            },
        };

        Conversation::new(summary.id, summary.title, summary.created_at).with_messages(messages)
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        let mut cursor = self.lock_cursor();
        if cursor.in_flight {
            return None;
        }
        cursor.in_flight = true;
        Some(InFlight { loader: self })
    }

    fn lock_cursor(&self) -> MutexGuard<'_, Cursor> {
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
