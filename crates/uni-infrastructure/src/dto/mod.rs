//! Data transfer objects for the web API.

pub mod company;
pub mod payload;

pub use company::CompanyRecordDto;
pub use payload::{CatalogResponse, ErrorResponse, SavedUnicornsRequest, SavedUnicornsResponse};
