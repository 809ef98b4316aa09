//! Request and response bodies of the UNI JSON endpoints.

use serde::{Deserialize, Serialize};

use super::company::CompanyRecordDto;

/// `GET /api/unicorns` response.
#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub unicorns: Option<Vec<CompanyRecordDto>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET`/`POST /api/user` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedUnicornsResponse {
    #[serde(default)]
    pub saved_unicorns: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST /api/user` body: the complete desired list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedUnicornsRequest<'a> {
    pub saved_unicorns: &'a [String],
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub details: Option<String>,
}
