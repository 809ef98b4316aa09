//! Catalog filtering.
//!
//! `model` holds the user's selections; `evaluator` turns a catalog, a
//! selection and the saved items into the visible subset.

mod evaluator;
mod model;

pub use evaluator::visible;
pub use model::{FilterDimension, FilterSelection};
