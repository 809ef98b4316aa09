//! Directory use case.
//!
//! Wires the catalog, the filter selection and the saved-items synchronizer
//! together and answers the questions a directory screen asks: which companies
//! are visible, which options each filter offers, and what a filter control
//! should read.

use std::sync::Arc;

use uni_core::{
    ClientConfig, CompanyRecord, FilterDimension, FilterOptions, Identity, KeyValueStore, Result,
    visible,
};
use uni_infrastructure::{ApiClient, HttpCatalogSource, HttpSavedItemsGateway};

use crate::catalog_store::CatalogStore;
use crate::filter_state::FilterState;
use crate::saved_items_sync::{SavedItemsSynchronizer, SyncOutcome, SyncSettings};

pub struct DirectoryUseCase {
    catalog: Arc<CatalogStore>,
    filters: Arc<FilterState>,
    saved: SavedItemsSynchronizer,
}

impl DirectoryUseCase {
    pub fn new(
        catalog: Arc<CatalogStore>,
        filters: Arc<FilterState>,
        saved: SavedItemsSynchronizer,
    ) -> Self {
        Self {
            catalog,
            filters,
            saved,
        }
    }

    /// Builds the use case against the HTTP API described by `config`.
    ///
    /// The filter selection is rehydrated from `store`, which also holds the
    /// saved-items cache.
    pub fn from_config(config: &ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let api = ApiClient::from_config(config)?;
        tracing::debug!("[DirectoryUseCase] Using API at {}", api.base_url());

        let catalog = Arc::new(CatalogStore::new(Arc::new(HttpCatalogSource::new(
            api.clone(),
            config.catalog_limit,
        ))));
        let filters = Arc::new(FilterState::rehydrate(store.clone()));
        let saved = SavedItemsSynchronizer::new(
            Arc::new(HttpSavedItemsGateway::new(api)),
            store,
            SyncSettings::from(config),
        );

        Ok(Self::new(catalog, filters, saved))
    }

    /// Loads the catalog and, when an identity is given, signs it in.
    ///
    /// Both run concurrently. A sign-in failure is reported through the
    /// synchronizer snapshot; a catalog failure is returned.
    pub async fn start(&self, identity: Option<Identity>) -> Result<()> {
        let sign_in = async move {
            match identity {
                Some(identity) => Some(self.saved.sign_in(identity).await),
                None => None,
            }
        };
        let (catalog, outcome) = tokio::join!(self.catalog.load(), sign_in);

        if let Some(SyncOutcome::Failed(error)) = &outcome {
            tracing::warn!("[DirectoryUseCase] Initial saved-items fetch failed: {}", error);
        }
        catalog.map(|_| ())
    }

    /// Companies passing the current filters, in catalog order.
    ///
    /// Empty until the catalog has loaded.
    pub fn visible(&self) -> Vec<CompanyRecord> {
        let Some(catalog) = self.catalog.catalog() else {
            return Vec::new();
        };
        let selection = self.filters.selection();
        let saved = self.saved.snapshot().saved;

        visible(&catalog.records, &selection, &saved)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn filter_options(&self) -> FilterOptions {
        self.catalog.options()
    }

    /// Summary text for the `dimension` filter control.
    pub fn selected_label(&self, dimension: FilterDimension) -> String {
        let options = self.catalog.options();
        self.filters
            .selection()
            .selected_label(dimension, options.get(dimension))
    }

    /// Saves the company if it is not saved yet, unsaves it otherwise.
    pub async fn toggle_favorite(&self, company_name: &str) -> SyncOutcome {
        self.saved.toggle(company_name).await
    }

    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    pub fn filters(&self) -> &Arc<FilterState> {
        &self.filters
    }

    pub fn saved(&self) -> &SavedItemsSynchronizer {
        &self.saved
    }

    pub fn shutdown(&self) {
        self.saved.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;
    use uni_core::{CatalogSource, SavedItemsGateway, UniError};
    use uni_infrastructure::MemoryStore;

    struct StaticCatalog(Vec<CompanyRecord>);

    #[async_trait]
    impl CatalogSource for StaticCatalog {
        async fn fetch_all(&self) -> Result<Vec<CompanyRecord>> {
            Ok(self.0.clone())
        }
    }

    struct FailingCatalog;

    #[async_trait]
    impl CatalogSource for FailingCatalog {
        async fn fetch_all(&self) -> Result<Vec<CompanyRecord>> {
            Err(UniError::network("catalog unavailable"))
        }
    }

    #[derive(Default)]
    struct EchoGateway {
        saved: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SavedItemsGateway for EchoGateway {
        async fn fetch(&self, _identity: &Identity) -> Result<Vec<String>> {
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn replace(&self, _identity: &Identity, saved: &[String]) -> Result<Vec<String>> {
            *self.saved.lock().unwrap() = saved.to_vec();
            Ok(saved.to_vec())
        }
    }

    fn record(name: &str, city: &str, industry: &str, investors: &[&str]) -> CompanyRecord {
        CompanyRecord {
            company_name: name.to_string(),
            city: city.to_string(),
            country: "United States".to_string(),
            industry: industry.to_string(),
            date_joined: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            valuation_billions: 1.0,
            investors: investors.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn usecase(source: Arc<dyn CatalogSource>) -> DirectoryUseCase {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        DirectoryUseCase::new(
            Arc::new(CatalogStore::new(source)),
            Arc::new(FilterState::rehydrate(store.clone())),
            SavedItemsSynchronizer::new(
                Arc::new(EchoGateway::default()),
                store,
                SyncSettings::default(),
            ),
        )
    }

    fn catalog() -> Arc<dyn CatalogSource> {
        Arc::new(StaticCatalog(vec![
            record("Stripe", "San Francisco", "Fintech", &["Sequoia Capital"]),
            record("Databricks", "San Francisco", "Data management & analytics", &["Accel"]),
            record("Revolut", "London", "Fintech", &["Index Ventures"]),
        ]))
    }

    fn names(records: &[CompanyRecord]) -> Vec<&str> {
        records.iter().map(|r| r.company_name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_visible_is_empty_before_load() {
        let usecase = usecase(catalog());
        assert!(usecase.visible().is_empty());
        assert!(usecase.filter_options().cities.is_empty());
    }

    #[tokio::test]
    async fn test_visible_applies_filters() {
        let usecase = usecase(catalog());
        usecase.start(None).await.unwrap();
        assert_eq!(usecase.visible().len(), 3);

        usecase
            .filters()
            .toggle(FilterDimension::Industries, "Fintech")
            .unwrap();
        assert_eq!(names(&usecase.visible()), vec!["Stripe", "Revolut"]);

        usecase
            .filters()
            .toggle(FilterDimension::Cities, "London")
            .unwrap();
        assert_eq!(names(&usecase.visible()), vec!["Revolut"]);
    }

    #[tokio::test]
    async fn test_toggle_favorite_feeds_favorites_filter() {
        let usecase = usecase(catalog());
        usecase
            .start(Some(Identity::new("ada@example.com")))
            .await
            .unwrap();

        assert!(usecase.toggle_favorite("Databricks").await.is_applied());
        usecase.filters().set_favorites_only(true).unwrap();
        assert_eq!(names(&usecase.visible()), vec!["Databricks"]);

        assert!(usecase.toggle_favorite("Databricks").await.is_applied());
        assert!(usecase.visible().is_empty());
    }

    #[tokio::test]
    async fn test_selected_label() {
        let usecase = usecase(catalog());
        usecase.start(None).await.unwrap();

        assert_eq!(usecase.selected_label(FilterDimension::Cities), "Select...");
        usecase
            .filters()
            .toggle(FilterDimension::Cities, "London")
            .unwrap();
        assert_eq!(usecase.selected_label(FilterDimension::Cities), "London");
        usecase
            .filters()
            .toggle(FilterDimension::Cities, "San Francisco")
            .unwrap();
        assert_eq!(usecase.selected_label(FilterDimension::Cities), "2 selected");
    }

    #[tokio::test]
    async fn test_start_reports_catalog_failure() {
        let usecase = usecase(Arc::new(FailingCatalog));
        let err = usecase
            .start(Some(Identity::new("ada@example.com")))
            .await
            .unwrap_err();

        assert!(err.is_network());
        assert!(usecase.visible().is_empty());
        // Saved items still sync without a catalog.
        assert!(usecase.saved().is_signed_in());
    }
}
