//! Catalog source trait.

use async_trait::async_trait;

use super::model::CompanyRecord;
use crate::error::Result;

/// Fetches the full company collection.
///
/// Implementations either return every record or fail; a partially decoded
/// collection is never returned.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<CompanyRecord>>;
}
