//! Path resolution for chatsync configuration files.
//!
//! ```text
//! ~/.config/chatsync/      # Config directory (platform config dir)
//! └── config.toml          # Client configuration
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// The platform config directory could not be determined.
    #[error("Cannot find config directory")]
    ConfigDirNotFound,
}

pub struct ChatsyncPaths;

impl ChatsyncPaths {
    const APP_DIR: &'static str = "chatsync";
    const CONFIG_FILE: &'static str = "config.toml";

    /// Returns the chatsync configuration directory (e.g. `~/.config/chatsync/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(Self::CONFIG_FILE))
    }
}
