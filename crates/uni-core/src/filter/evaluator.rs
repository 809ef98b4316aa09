//! Visible-record evaluation.

use std::collections::HashSet;

use super::model::FilterSelection;
use crate::company::CompanyRecord;

/// Returns the records that pass `selection`, in catalog order.
///
/// 1. With favorites-only on, records not in `saved` are dropped.
/// 2. With no dimension selections, every remaining record is kept.
/// 3. Otherwise a record must match every non-empty dimension; for investors it
///    is enough that one of its investors is selected.
pub fn visible<'a>(
    records: &'a [CompanyRecord],
    selection: &FilterSelection,
    saved: &[String],
) -> Vec<&'a CompanyRecord> {
    let saved: HashSet<&str> = if selection.show_favorites_only {
        saved.iter().map(String::as_str).collect()
    } else {
        HashSet::new()
    };

    records
        .iter()
        .filter(|record| {
            !selection.show_favorites_only || saved.contains(record.company_name.as_str())
        })
        .filter(|record| selection.has_no_dimension_filters() || matches(record, selection))
        .collect()
}

fn matches(record: &CompanyRecord, selection: &FilterSelection) -> bool {
    if !selection.selected_cities.is_empty() && !selection.selected_cities.contains(&record.city) {
        return false;
    }
    if !selection.selected_industries.is_empty()
        && !selection.selected_industries.contains(&record.industry)
    {
        return false;
    }
    if !selection.selected_investors.is_empty()
        && !selection
            .selected_investors
            .iter()
            .any(|investor| record.has_investor(investor))
    {
        return false;
    }
    true
}
