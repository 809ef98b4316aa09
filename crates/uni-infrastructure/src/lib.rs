//! Infrastructure layer for UNI.
//!
//! HTTP gateways to the web API, key-value storage backends, platform paths and
//! the configuration file service.

pub mod config_service;
pub mod dto;
pub mod gateway;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::gateway::{ApiClient, HttpCatalogSource, HttpSavedItemsGateway};
pub use crate::paths::UniPaths;
pub use crate::storage::{JsonFileStore, MemoryStore};
