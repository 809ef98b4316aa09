//! Company record domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Separator between investor names in the catalog's investor field.
pub const INVESTOR_SEPARATOR: &str = ", ";

/// A unicorn company as returned by the catalog.
///
/// Records are immutable once fetched. `company_name` is the unique key and is
/// also the value stored in a user's saved items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    pub company_name: String,
    pub city: String,
    pub country: String,
    pub industry: String,
    pub date_joined: NaiveDate,
    pub valuation_billions: f64,
    /// Investor names in catalog order.
    pub investors: Vec<String>,
}

impl CompanyRecord {
    /// Returns true if any of the record's investors is `name`.
    pub fn has_investor(&self, name: &str) -> bool {
        self.investors.iter().any(|investor| investor == name)
    }
}

/// Splits a raw investor field into individual names.
///
/// Splits on the literal `", "` separator. Empty segments are dropped so an
/// empty field yields no investors.
pub fn parse_investors(raw: &str) -> Vec<String> {
    raw.split(INVESTOR_SEPARATOR)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
