//! Shared HTTP plumbing for the UNI web API.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use uni_core::{ClientConfig, Identity, Result, UniError};

use crate::dto::ErrorResponse;

/// Cookie the web application reads its session from.
pub const SESSION_COOKIE: &str = "next-auth.session-token";

/// A `reqwest` client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client whose every request times out after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UniError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.api_base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    /// Attaches the identity's session cookie, if it has one.
    pub fn authenticate(request: RequestBuilder, identity: &Identity) -> RequestBuilder {
        match &identity.session_token {
            Some(token) => request.header(
                reqwest::header::COOKIE,
                format!("{}={}", SESSION_COOKIE, token),
            ),
            None => request,
        }
    }

    /// Sends `request` and decodes a JSON body of type `T`.
    ///
    /// - transport failures and timeouts become `Network`
    /// - 401 becomes `AuthRequired`, 400 becomes `Validation`
    /// - any other non-2xx status becomes `Network` carrying the status
    /// - a 2xx body that does not decode as `T` becomes `InvalidResponse`
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                UniError::network(format!("{} timed out", what))
            } else {
                UniError::network(format!("{} failed: {}", what, e))
            }
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| UniError::network(format!("{} body could not be read: {}", what, e)))?;

        if !status.is_success() {
            return Err(status_error(status, &body, what));
        }

        serde_json::from_slice(&body)
            .map_err(|e| UniError::invalid_response(format!("{} returned malformed JSON: {}", what, e)))
    }
}

fn status_error(status: StatusCode, body: &[u8], what: &str) -> UniError {
    let message = serde_json::from_slice::<ErrorResponse>(body)
        .map(|error| match error.details {
            Some(details) => format!("{} ({})", error.error, details),
            None => error.error,
        })
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown status").to_string());

    match status {
        StatusCode::UNAUTHORIZED => UniError::AuthRequired,
        StatusCode::BAD_REQUEST => UniError::validation(message),
        _ => UniError::network(format!("{} failed with HTTP {}: {}", what, status.as_u16(), message)),
    }
}
