pub mod config;
pub mod conversation;
pub mod error;
pub mod health;
pub mod remote;
pub mod settings;
pub mod state;
pub mod viewport;

// Re-export common error type
pub use error::{Result, SyncError};
