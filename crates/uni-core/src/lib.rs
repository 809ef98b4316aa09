//! Domain layer for the UNI unicorn directory.
//!
//! Holds the company catalog model, filter selections and their evaluation,
//! saved-item intents, and the traits the infrastructure layer implements.
//! Nothing in this crate performs I/O.

pub mod company;
pub mod config;
pub mod error;
pub mod filter;
pub mod identity;
pub mod saved;
pub mod storage;

// Re-export common types
pub use company::{CatalogSource, CompanyRecord, FilterOption, FilterOptions};
pub use config::ClientConfig;
pub use error::{Result, UniError};
pub use filter::{FilterDimension, FilterSelection, visible};
pub use identity::Identity;
pub use saved::{SavedIntent, SavedItemsGateway};
pub use storage::KeyValueStore;
