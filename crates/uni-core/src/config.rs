//! Client configuration model.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_CATALOG_LIMIT: u32 = 1000;
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Settings for talking to the UNI web API and storing local state.
///
/// Every field has a default so a partial `config.toml` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the web application (no trailing path).
    pub api_base_url: String,
    /// Upper bound on catalog records requested.
    pub catalog_limit: u32,
    /// Seconds between background refreshes of saved items.
    pub refresh_interval_secs: u64,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Override for the key-value storage file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Signed-in account email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    /// Session token for the signed-in account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            catalog_limit: DEFAULT_CATALOG_LIMIT,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            storage_path: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            user_email: None,
            session_token: None,
        }
    }
}

impl ClientConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// The configured identity, if an email is set.
    pub fn identity(&self) -> Option<Identity> {
        let email = self.user_email.as_deref()?.trim();
        if email.is_empty() {
            return None;
        }
        let identity = Identity::new(email);
        Some(match &self.session_token {
            Some(token) if !token.is_empty() => identity.with_session_token(token.clone()),
            _ => identity,
        })
    }
}
