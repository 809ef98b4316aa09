//! HTTP catalog source.

use async_trait::async_trait;
use uni_core::{CatalogSource, CompanyRecord, Result, UniError};

use super::api_client::ApiClient;
use crate::dto::CatalogResponse;

pub const CATALOG_PATH: &str = "/api/unicorns";

/// Fetches the catalog from `GET /api/unicorns?limit=N`.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    api: ApiClient,
    limit: u32,
}

impl HttpCatalogSource {
    pub fn new(api: ApiClient, limit: u32) -> Self {
        Self { api, limit }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_all(&self) -> Result<Vec<CompanyRecord>> {
        let request = self.api.get(CATALOG_PATH).query(&[("limit", self.limit)]);
        let response: CatalogResponse = self.api.send_json(request, "catalog request").await?;

        if let Some(error) = response.error {
            return Err(UniError::invalid_response(error));
        }

        let rows = response
            .unicorns
            .ok_or_else(|| UniError::invalid_response("catalog response has no 'unicorns' field"))?;

        tracing::debug!("[HttpCatalogSource] Received {} catalog rows", rows.len());

        rows.into_iter().map(CompanyRecord::try_from).collect()
    }
}
