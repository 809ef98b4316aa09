//! Platform path resolution for UNI configuration and storage files.
//!
//! ```text
//! ~/.config/uni/               # Config directory
//! └── config.toml              # Client configuration
//!
//! ~/.local/share/uni/          # Data directory
//! └── storage.json             # Filter selections and saved-items cache
//! ```

use std::path::PathBuf;

use uni_core::{Result, UniError};

const APP_DIR: &str = "uni";

/// Unified path management for UNI.
///
/// `with_base` roots both directories under one path, which tests use to keep
/// everything inside a temporary directory.
#[derive(Debug, Clone, Default)]
pub struct UniPaths {
    base: Option<PathBuf>,
}

impl UniPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    /// Returns the UNI configuration directory (e.g. `~/.config/uni/`).
    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| UniError::config("Cannot find home directory")),
        }
    }

    /// Returns the UNI data directory (e.g. `~/.local/share/uni/`).
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| UniError::config("Cannot find home directory")),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn storage_file(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("storage.json"))
    }
}
