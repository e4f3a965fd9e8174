//! The conversation-history replica and its transitions.

pub mod action;
pub mod model;
pub mod reducer;
pub mod store;

pub use action::{Action, PageMerge};
pub use model::{LoadingState, ReplicaState};
pub use reducer::reduce;
pub use store::StateStore;
