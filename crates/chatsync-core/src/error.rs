//! Error types for the chatsync engine.

use crate::remote::RemoteError;
use thiserror::Error;

/// A shared error type for the chatsync engine.
///
/// Remote failures arrive already normalized as [`RemoteError`]; everything
/// the engine itself rejects (validation, configuration) has its own variant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// Entity not found in the local replica
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A user edit was rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// The remote store call failed (transport, status or shape)
    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteError),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SyncError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// True when the failure was a cancelled send rather than a real error.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Remote(RemoteError::Cancelled))
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, SyncError>`.
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_conversion_keeps_cause() {
        let err: SyncError = RemoteError::status(500, "boom").into();
        assert!(err.is_remote());
        assert!(!err.is_cancelled());
        assert_eq!(
            err.to_string(),
            "Remote store error: remote store returned status 500: boom"
        );
    }

    #[test]
    fn test_cancelled_is_detected() {
        let err = SyncError::from(RemoteError::Cancelled);
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_toml_error_is_serialization() {
        let err: SyncError = toml::from_str::<toml::Value>("= nope").unwrap_err().into();
        assert!(matches!(err, SyncError::Serialization { ref format, .. } if format == "TOML"));
    }
}
