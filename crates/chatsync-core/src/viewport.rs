//! Proximity-to-end-of-list capability.

use std::sync::Arc;

/// Invoked each time the consumer's list nears its end.
pub type NearEndCallback = Arc<dyn Fn() + Send + Sync>;

/// Source of "the user is close to the end of the history list" signals.
///
/// The engine registers one callback and never asks how proximity is
/// detected; a renderer, a terminal pager or a test harness can drive it.
/// Implementations may fire the callback any number of times, from any
/// thread, including while a previous page is still loading.
pub trait ViewportSignal: Send + Sync {
    fn on_near_end(&self, callback: NearEndCallback);
}
