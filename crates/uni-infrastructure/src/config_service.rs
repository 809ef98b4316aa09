//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `~/.config/uni/config.toml` and layers
//! environment overrides on top.

use std::path::{Path, PathBuf};

use uni_core::{ClientConfig, Result, UniError};

use crate::paths::UniPaths;

pub const ENV_API_URL: &str = "UNI_API_URL";
pub const ENV_SESSION_TOKEN: &str = "UNI_SESSION_TOKEN";
pub const ENV_USER_EMAIL: &str = "UNI_USER_EMAIL";

/// Reads the client configuration file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Creates a ConfigService for the platform config file.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(UniPaths::new().config_file()?))
    }

    /// Creates a ConfigService for an explicit file (used by tests and `--config`).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration file.
    ///
    /// A missing or empty file yields the defaults; a file that does not parse
    /// is a `Config` error naming the file.
    pub fn load(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "[ConfigService] {} not found, using defaults",
                self.path.display()
            );
            return Ok(ClientConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ClientConfig::default());
        }

        toml::from_str(&content).map_err(|e| {
            UniError::config(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    /// Loads the configuration file, then applies process environment overrides.
    pub fn load_with_env(&self) -> Result<ClientConfig> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }
}

/// Applies `UNI_API_URL`, `UNI_USER_EMAIL` and `UNI_SESSION_TOKEN` overrides.
///
/// `lookup` returns the value of an environment variable; empty values are ignored.
pub fn apply_env_overrides(config: &mut ClientConfig, lookup: impl Fn(&str) -> Option<String>) {
    let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(url) = lookup(ENV_API_URL) {
        config.api_base_url = url;
    }
    if let Some(email) = lookup(ENV_USER_EMAIL) {
        config.user_email = Some(email);
    }
    if let Some(token) = lookup(ENV_SESSION_TOKEN) {
        config.session_token = Some(token);
    }
}

/// Resolves the storage file: the configured override, else the platform default.
pub fn resolve_storage_path(config: &ClientConfig, paths: &UniPaths) -> Result<PathBuf> {
    match &config.storage_path {
        Some(path) => Ok(path.clone()),
        None => paths.storage_file(),
    }
}
