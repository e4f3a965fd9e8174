//! Wiring viewport proximity signals to the loader.

use super::loader::HistoryLoader;
use chatsync_core::error::{Result, SyncError};
use chatsync_core::viewport::{NearEndCallback, ViewportSignal};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;

/// Requests the next history page whenever the viewport nears the end.
pub struct PageTrigger;

impl PageTrigger {
    /// Registers a near-end callback on `signal` that loads the next page.
    ///
    /// The callback may fire from any thread; loads are spawned on the
    /// runtime current at attach time. Signals arriving while a page is in
    /// flight are dropped by the loader.
    pub fn attach(loader: Arc<HistoryLoader>, signal: &dyn ViewportSignal) -> Result<()> {
        let handle = Handle::try_current()
            .map_err(|e| SyncError::internal(format!("PageTrigger needs a tokio runtime: {e}")))?;

        signal.on_near_end(Arc::new(move || {
            if loader.is_in_flight() {
                tracing::debug!("[PageTrigger] near end while loading, ignored");
                return;
            }
            let loader = loader.clone();
            handle.spawn(async move {
                loader.load_next().await;
            });
        }));
        Ok(())
    }
}

/// A [`ViewportSignal`] fired by hand.
#[derive(Default)]
pub struct ManualViewportSignal {
    callbacks: Mutex<Vec<NearEndCallback>>,
}

impl ManualViewportSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invokes every registered callback once.
    pub fn fire(&self) {
        let callbacks = self
            .callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for callback in callbacks {
            callback();
        }
    }
}

impl ViewportSignal for ManualViewportSignal {
    fn on_near_end(&self, callback: NearEndCallback) {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(callback);
    }
}
