//! Company catalog domain module.
//!
//! # Module Structure
//!
//! - `model`: The immutable company record and investor parsing
//! - `options`: Filter option lists derived from a catalog
//! - `source`: The catalog source trait implemented by the infrastructure layer

mod model;
mod options;
mod source;

pub use model::{CompanyRecord, INVESTOR_SEPARATOR, parse_investors};
pub use options::{FilterOption, FilterOptions};
pub use source::CatalogSource;
