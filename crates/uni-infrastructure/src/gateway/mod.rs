//! HTTP implementations of the core gateway traits.

mod api_client;
mod catalog;
mod saved_items;

pub use api_client::{ApiClient, SESSION_COOKIE};
pub use catalog::{CATALOG_PATH, HttpCatalogSource};
pub use saved_items::{HttpSavedItemsGateway, USER_PATH};
