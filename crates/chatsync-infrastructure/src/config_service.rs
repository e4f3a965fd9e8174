//! Configuration service implementation.
//!
//! Loads [`SyncConfig`] from `~/.config/chatsync/config.toml` and applies
//! environment overrides on top.

use crate::paths::ChatsyncPaths;
use chatsync_core::config::SyncConfig;
use chatsync_core::error::{Result, SyncError};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

pub const ENV_BASE_URL: &str = "CHATSYNC_BASE_URL";
pub const ENV_ERROR_DISPLAY_MS: &str = "CHATSYNC_ERROR_DISPLAY_MS";

/// Loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<SyncConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default config file.
    pub fn new() -> Result<Self> {
        let path = ChatsyncPaths::config_file().map_err(|e| SyncError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service reading an explicit config file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the configuration, loading it on first access.
    ///
    /// Environment variables override the file.
    pub fn get_config(&self) -> Result<SyncConfig> {
        if let Ok(guard) = self.config.read()
            && let Some(cached) = guard.as_ref()
        {
            return Ok(cached.clone());
        }

        let mut loaded = Self::load_file(&self.path)?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok())?;

        if let Ok(mut guard) = self.config.write() {
            *guard = Some(loaded.clone());
        }
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut guard) = self.config.write() {
            *guard = None;
        }
    }

    /// Reads a config file. A missing file yields the defaults.
    pub fn load_file(path: &Path) -> Result<SyncConfig> {
        if !path.exists() {
            tracing::debug!(
                "[ConfigService] {} not found, using defaults",
                path.display()
            );
            return Ok(SyncConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            SyncError::config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}

/// Applies `CHATSYNC_*` overrides read through `lookup`.
pub fn apply_env_overrides(
    config: &mut SyncConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
        config.base_url = base_url;
    }
    if let Some(raw) = lookup(ENV_ERROR_DISPLAY_MS) {
        config.error_display_ms = raw.trim().parse().map_err(|_| {
            SyncError::config(format!("{ENV_ERROR_DISPLAY_MS} must be milliseconds, got '{raw}'"))
        })?;
    }
    Ok(())
}
