//! Process setup: configuration, logging and the directory use case.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};
use uni_application::DirectoryUseCase;
use uni_core::ClientConfig;
use uni_infrastructure::config_service::resolve_storage_path;
use uni_infrastructure::{ConfigService, JsonFileStore, UniPaths};

/// Loads the config file plus environment overrides; `--api-url` wins over both.
pub fn load_config(path: Option<PathBuf>, api_url: Option<String>) -> Result<ClientConfig> {
    let service = match path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new().context("Failed to locate the config directory")?,
    };
    let mut config = service
        .load_with_env()
        .with_context(|| format!("Failed to load {}", service.path().display()))?;

    if let Some(url) = api_url {
        config.api_base_url = url;
    }
    Ok(config)
}

/// Logs to stderr. `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn build_usecase(config: &ClientConfig) -> Result<DirectoryUseCase> {
    let storage_path = resolve_storage_path(config, &UniPaths::new())?;
    tracing::debug!("[Bootstrap] Storage file: {}", storage_path.display());

    let store = Arc::new(JsonFileStore::new(storage_path));
    Ok(DirectoryUseCase::from_config(config, store)?)
}
