//! Application layer for chatsync.
//!
//! Services that drive the replica: startup sequencing, pagination,
//! remote-first mutations, chat and feedback. Each depends on the
//! `RemoteStore` trait and a shared `StateStore` handle.

pub mod bootstrap;
pub mod chat;
pub mod feedback;
pub mod history;
pub mod mutation;
pub mod probe;
pub mod session;

#[cfg(test)]
mod test_support;

pub use bootstrap::{HistoryStep, SessionBootstrap, SettingsStep, StartupReport};
pub use chat::ChatService;
pub use feedback::FeedbackService;
pub use history::{HistoryLoader, LoadOutcome, ManualViewportSignal, PAGE_SIZE, PageTrigger};
pub use mutation::{MutationCoordinator, MutationKind, TransientError, TransientErrorSlot};
pub use probe::AvailabilityProbe;
pub use session::SyncSession;
