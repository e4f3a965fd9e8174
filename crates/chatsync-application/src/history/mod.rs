//! History pagination.
//!
//! - `loader`: cursor, page fetch and merge
//! - `trigger`: viewport proximity wiring

pub mod loader;
pub mod trigger;

pub use loader::{HistoryLoader, LoadOutcome, PAGE_SIZE};
pub use trigger::{ManualViewportSignal, PageTrigger};
