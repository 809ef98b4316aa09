//! Filter option derivation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::CompanyRecord;
use crate::filter::FilterDimension;

/// One selectable entry in a multi-select filter control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

impl FilterOption {
    /// Creates an option whose label and value are both `value`.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Option lists for every filter dimension, derived from a loaded catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub cities: Vec<FilterOption>,
    pub industries: Vec<FilterOption>,
    pub investors: Vec<FilterOption>,
}

impl FilterOptions {
    /// Derives the sorted, de-duplicated option lists from `records`.
    ///
    /// Empty field values produce no option. Investors are counted individually,
    /// after splitting the record's investor list.
    pub fn derive(records: &[CompanyRecord]) -> Self {
        let mut cities = BTreeSet::new();
        let mut industries = BTreeSet::new();
        let mut investors = BTreeSet::new();

        for record in records {
            if !record.city.is_empty() {
                cities.insert(record.city.as_str());
            }
            if !record.industry.is_empty() {
                industries.insert(record.industry.as_str());
            }
            for investor in &record.investors {
                if !investor.is_empty() {
                    investors.insert(investor.as_str());
                }
            }
        }

        Self {
            cities: to_options(cities),
            industries: to_options(industries),
            investors: to_options(investors),
        }
    }

    /// Returns the option list for `dimension`.
    pub fn get(&self, dimension: FilterDimension) -> &[FilterOption] {
        match dimension {
            FilterDimension::Cities => &self.cities,
            FilterDimension::Industries => &self.industries,
            FilterDimension::Investors => &self.investors,
        }
    }
}

fn to_options(values: BTreeSet<&str>) -> Vec<FilterOption> {
    values.into_iter().map(FilterOption::new).collect()
}
