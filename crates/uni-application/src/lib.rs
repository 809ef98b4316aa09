//! Application layer for UNI.
//!
//! Coordinates the domain types and the infrastructure gateways: the catalog
//! store, the persisted filter state, the saved-items synchronizer, and the
//! directory use case that combines them.

pub mod catalog_store;
pub mod directory_usecase;
pub mod filter_state;
pub mod saved_items_sync;

pub use catalog_store::{Catalog, CatalogStatus, CatalogStore};
pub use directory_usecase::DirectoryUseCase;
pub use filter_state::FilterState;
pub use saved_items_sync::{
    SavedItemsSynchronizer, SyncOutcome, SyncPhase, SyncSettings, SyncSnapshot,
};
