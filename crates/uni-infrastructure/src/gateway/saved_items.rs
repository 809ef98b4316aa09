//! HTTP saved-items gateway.

use async_trait::async_trait;
use uni_core::{Identity, Result, SavedItemsGateway, UniError};

use super::api_client::ApiClient;
use crate::dto::{SavedUnicornsRequest, SavedUnicornsResponse};

pub const USER_PATH: &str = "/api/user";

/// Reads and replaces saved items through `GET`/`POST /api/user`.
#[derive(Debug, Clone)]
pub struct HttpSavedItemsGateway {
    api: ApiClient,
}

impl HttpSavedItemsGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

fn into_saved(response: SavedUnicornsResponse) -> Result<Vec<String>> {
    if let Some(error) = response.error {
        return Err(UniError::invalid_response(error));
    }
    response
        .saved_unicorns
        .ok_or_else(|| UniError::invalid_response("response has no 'savedUnicorns' list"))
}

#[async_trait]
impl SavedItemsGateway for HttpSavedItemsGateway {
    async fn fetch(&self, identity: &Identity) -> Result<Vec<String>> {
        let request = ApiClient::authenticate(self.api.get(USER_PATH), identity);
        let response = self.api.send_json(request, "saved items request").await?;
        let saved = into_saved(response)?;
        tracing::debug!(
            "[HttpSavedItemsGateway] Fetched {} saved items for {}",
            saved.len(),
            identity.email
        );
        Ok(saved)
    }

    async fn replace(&self, identity: &Identity, saved: &[String]) -> Result<Vec<String>> {
        let request = ApiClient::authenticate(self.api.post(USER_PATH), identity)
            .json(&SavedUnicornsRequest { saved_unicorns: saved });
        let response = self.api.send_json(request, "save request").await?;
        into_saved(response)
    }
}
