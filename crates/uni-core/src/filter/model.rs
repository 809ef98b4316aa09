//! Filter selection domain model.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::company::FilterOption;
use crate::error::UniError;
use crate::storage::keys;

/// A multi-select filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterDimension {
    Cities,
    Industries,
    Investors,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 3] = [
        FilterDimension::Cities,
        FilterDimension::Industries,
        FilterDimension::Investors,
    ];

    /// Durable storage key holding this dimension's selection.
    pub fn storage_key(self) -> &'static str {
        match self {
            FilterDimension::Cities => keys::SELECTED_CITIES,
            FilterDimension::Industries => keys::SELECTED_INDUSTRIES,
            FilterDimension::Investors => keys::SELECTED_INVESTORS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterDimension::Cities => "cities",
            FilterDimension::Industries => "industries",
            FilterDimension::Investors => "investors",
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterDimension {
    type Err = UniError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "city" | "cities" => Ok(FilterDimension::Cities),
            "industry" | "industries" => Ok(FilterDimension::Industries),
            "investor" | "investors" => Ok(FilterDimension::Investors),
            other => Err(UniError::validation(format!(
                "unknown filter dimension '{}' (expected cities, industries or investors)",
                other
            ))),
        }
    }
}

/// The user's current filter selections.
///
/// Values are not checked against the current option lists; a value left over
/// from an earlier catalog simply matches no record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    pub selected_cities: BTreeSet<String>,
    pub selected_industries: BTreeSet<String>,
    pub selected_investors: BTreeSet<String>,
    pub show_favorites_only: bool,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self, dimension: FilterDimension) -> &BTreeSet<String> {
        match dimension {
            FilterDimension::Cities => &self.selected_cities,
            FilterDimension::Industries => &self.selected_industries,
            FilterDimension::Investors => &self.selected_investors,
        }
    }

    fn selected_mut(&mut self, dimension: FilterDimension) -> &mut BTreeSet<String> {
        match dimension {
            FilterDimension::Cities => &mut self.selected_cities,
            FilterDimension::Industries => &mut self.selected_industries,
            FilterDimension::Investors => &mut self.selected_investors,
        }
    }

    /// Flips membership of `value` in the `dimension` selection.
    ///
    /// Returns true if the value is selected afterwards.
    pub fn toggle(&mut self, dimension: FilterDimension, value: &str) -> bool {
        let set = self.selected_mut(dimension);
        if set.remove(value) {
            false
        } else {
            set.insert(value.to_string());
            true
        }
    }

    /// Replaces the whole selection of `dimension`.
    pub fn set_selected(&mut self, dimension: FilterDimension, values: BTreeSet<String>) {
        *self.selected_mut(dimension) = values;
    }

    /// Empties every dimension and turns the favorites-only toggle off.
    pub fn clear_all(&mut self) {
        self.selected_cities.clear();
        self.selected_industries.clear();
        self.selected_investors.clear();
        self.show_favorites_only = false;
    }

    /// True when no dimension has a selected value.
    ///
    /// The favorites-only toggle is not considered.
    pub fn has_no_dimension_filters(&self) -> bool {
        self.selected_cities.is_empty()
            && self.selected_industries.is_empty()
            && self.selected_investors.is_empty()
    }

    /// Summary text for a multi-select control.
    ///
    /// `"Select..."` when nothing is selected, the option label for a single
    /// selection, and `"N selected"` otherwise.
    pub fn selected_label(&self, dimension: FilterDimension, options: &[FilterOption]) -> String {
        let selected = self.selected(dimension);
        match selected.len() {
            0 => "Select...".to_string(),
            1 => {
                let value = selected.iter().next().map(String::as_str).unwrap_or_default();
                options
                    .iter()
                    .find(|option| option.value == value)
                    .map(|option| option.label.clone())
                    .unwrap_or_else(|| value.to_string())
            }
            n => format!("{} selected", n),
        }
    }
}
