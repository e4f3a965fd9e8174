//! User-initiated history mutations.

pub mod coordinator;
pub mod transient;

pub use coordinator::MutationCoordinator;
pub use transient::{MutationKind, TransientError, TransientErrorSlot};
