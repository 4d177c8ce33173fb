mod actions;
mod offer_list;
pub mod paging;
pub mod sorting;

pub use actions::Action;
pub use offer_list::OfferListViewState;
pub use sorting::SortOption;

use serde::Deserialize;

/// Offers shown per page on the offers screen.
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// View configuration, the `[view]` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Offers per page
    pub page_size: usize,
    /// Ordering used when the screen opens
    pub default_sort: SortOption,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_sort: SortOption::DateDesc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_config_default() {
        let config = ViewConfig::default();
        assert_eq!(config.page_size, 4);
        assert_eq!(config.default_sort, SortOption::DateDesc);
    }

    #[test]
    fn test_view_config_partial_toml() {
        let config: ViewConfig = toml::from_str("default_sort = \"price_asc\"").unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.default_sort, SortOption::PriceAsc);
    }
}
