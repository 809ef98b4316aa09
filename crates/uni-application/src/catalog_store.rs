//! Catalog store.
//!
//! Holds the company records fetched once per session and the filter option
//! lists derived from them.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::Mutex;
use uni_core::{CatalogSource, CompanyRecord, FilterOptions, Result, UniError};

/// A loaded catalog: records in source order plus their option lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub records: Vec<CompanyRecord>,
    pub options: FilterOptions,
}

impl Catalog {
    pub fn new(records: Vec<CompanyRecord>) -> Self {
        let options = FilterOptions::derive(&records);
        Self { records, options }
    }
}

/// Where the store is in its load lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogStatus {
    NotLoaded,
    Loading,
    Ready,
    Failed(UniError),
}

struct CatalogState {
    status: CatalogStatus,
    catalog: Option<Arc<Catalog>>,
}

/// Loads the catalog at most once until [`CatalogStore::invalidate`] is called.
///
/// A failed load leaves the store empty with the error recorded; it is not
/// retried until invalidated.
pub struct CatalogStore {
    source: Arc<dyn CatalogSource>,
    state: RwLock<CatalogState>,
    load_lock: Mutex<()>,
}

impl CatalogStore {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            state: RwLock::new(CatalogState {
                status: CatalogStatus::NotLoaded,
                catalog: None,
            }),
            load_lock: Mutex::new(()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Loads the catalog if this session has not attempted it yet.
    ///
    /// Concurrent callers share one fetch. Returns the loaded catalog, or the
    /// recorded error of the attempt that failed.
    pub async fn load(&self) -> Result<Arc<Catalog>> {
        let _guard = self.load_lock.lock().await;

        {
            let state = self.read();
            match (&state.status, &state.catalog) {
                (CatalogStatus::Ready, Some(catalog)) => return Ok(catalog.clone()),
                (CatalogStatus::Failed(error), _) => return Err(error.clone()),
                _ => {}
            }
        }

        self.write().status = CatalogStatus::Loading;
        tracing::info!("[CatalogStore] Fetching catalog");

        match self.source.fetch_all().await {
            Ok(records) => {
                let catalog = Arc::new(Catalog::new(records));
                tracing::info!(
                    "[CatalogStore] Loaded {} companies ({} cities, {} industries, {} investors)",
                    catalog.records.len(),
                    catalog.options.cities.len(),
                    catalog.options.industries.len(),
                    catalog.options.investors.len()
                );
                let mut state = self.write();
                state.status = CatalogStatus::Ready;
                state.catalog = Some(catalog.clone());
                Ok(catalog)
            }
            Err(error) => {
                tracing::warn!("[CatalogStore] Catalog load failed: {}", error);
                let mut state = self.write();
                state.status = CatalogStatus::Failed(error.clone());
                state.catalog = None;
                Err(error)
            }
        }
    }

    /// Forgets the loaded catalog (or recorded failure) so the next `load` fetches again.
    pub fn invalidate(&self) {
        let mut state = self.write();
        state.status = CatalogStatus::NotLoaded;
        state.catalog = None;
        tracing::debug!("[CatalogStore] Invalidated");
    }

    /// Invalidates, then loads.
    pub async fn reload(&self) -> Result<Arc<Catalog>> {
        self.invalidate();
        self.load().await
    }

    pub fn catalog(&self) -> Option<Arc<Catalog>> {
        self.read().catalog.clone()
    }

    pub fn status(&self) -> CatalogStatus {
        self.read().status.clone()
    }

    /// The recorded load error, if the last attempt failed.
    pub fn error(&self) -> Option<UniError> {
        match &self.read().status {
            CatalogStatus::Failed(error) => Some(error.clone()),
            _ => None,
        }
    }

    /// Option lists of the loaded catalog; empty when nothing is loaded.
    pub fn options(&self) -> FilterOptions {
        self.catalog()
            .map(|catalog| catalog.options.clone())
            .unwrap_or_default()
    }
}
