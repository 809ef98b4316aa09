//! Storage keys shared by the filter state and the saved-items cache.

pub const SELECTED_CITIES: &str = "selectedCities";
pub const SELECTED_INDUSTRIES: &str = "selectedIndustries";
pub const SELECTED_INVESTORS: &str = "selectedInvestors";
pub const SHOW_FAVORITES: &str = "showFavorites";
pub const SAVED_UNICORNS: &str = "savedUnicorns";
