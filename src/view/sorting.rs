use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::state::Offer;

/// Orderings the offers screen offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Newest first, undated last.
    #[default]
    DateDesc,
    PriceAsc,
    PriceDesc,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DateDesc => "date_desc",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" | "date_desc" => Ok(Self::DateDesc),
            "asc" | "price_asc" => Ok(Self::PriceAsc),
            "desc" | "price_desc" => Ok(Self::PriceDesc),
            other => Err(format!("unknown sort option: {}", other)),
        }
    }
}

/// Compute the display order of `offers` as indexes into the slice.
///
/// Stable: offers with equal keys keep their fetched order.
/// The offers themselves are never touched.
pub fn sort_order(offers: &[Offer], option: SortOption) -> Vec<usize> {
    let mut order: Vec<usize> = (0..offers.len()).collect();
    match option {
        SortOption::PriceAsc => order.sort_by_key(|&i| offers[i].price),
        SortOption::PriceDesc => order.sort_by_key(|&i| Reverse(offers[i].price)),
        SortOption::DateDesc => order.sort_by_key(|&i| Reverse(offers[i].created_at_ms())),
    }
    order
}

/// Sorted copy of `offers`.
pub fn sorted(offers: &[Offer], option: SortOption) -> Vec<Offer> {
    sort_order(offers, option)
        .into_iter()
        .map(|i| offers[i].clone())
        .collect()
}
