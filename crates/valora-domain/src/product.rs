//! Product domain types: categories, pricing and stock states.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::UnknownVariant;
use crate::pagination::Sort;

/// Jewellery category a product is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Rings,
    Necklaces,
    Earrings,
    Bracelets,
    Bangles,
    Pendants,
    Chains,
    Coins,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Self::Rings,
        Self::Necklaces,
        Self::Earrings,
        Self::Bracelets,
        Self::Bangles,
        Self::Pendants,
        Self::Chains,
        Self::Coins,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rings => "rings",
            Self::Necklaces => "necklaces",
            Self::Earrings => "earrings",
            Self::Bracelets => "bracelets",
            Self::Bangles => "bangles",
            Self::Pendants => "pendants",
            Self::Chains => "chains",
            Self::Coins => "coins",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| UnknownVariant::new("category", s))
    }
}

/// Stock count at or below which an in-stock product is reported as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// A product without a price is announced but not yet purchasable.
pub fn is_coming_soon(price: Option<Decimal>) -> bool {
    price.is_none()
}

pub fn is_out_of_stock(in_stock: bool, stock_count: i32) -> bool {
    !in_stock || stock_count <= 0
}

/// Whole-number discount percentage of `price` against `original_price`.
///
/// Only reported for a real markdown: both prices present and `original > price > 0`.
/// Halves round away from zero.
pub fn sale_percentage(price: Option<Decimal>, original_price: Option<Decimal>) -> Option<u32> {
    let (price, original) = (price?, original_price?);
    if price <= Decimal::ZERO || original <= price {
        return None;
    }
    ((original - price) / original * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
}

/// Derived availability shown next to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    ComingSoon,
    OutOfStock,
    LowStock,
    InStock,
}

impl StockStatus {
    pub fn derive(price: Option<Decimal>, in_stock: bool, stock_count: i32) -> Self {
        if is_coming_soon(price) {
            Self::ComingSoon
        } else if is_out_of_stock(in_stock, stock_count) {
            Self::OutOfStock
        } else if stock_count <= LOW_STOCK_THRESHOLD {
            Self::LowStock
        } else {
            Self::InStock
        }
    }

    pub fn is_purchasable(self) -> bool {
        matches!(self, Self::LowStock | Self::InStock)
    }
}

/// Build a URL slug: lowercase ASCII alphanumerics separated by single hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Sort order for the `GET /api/products` listing endpoint.
///
/// Wire format is a single hyphenated string (e.g. `"price-asc"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSortBy {
    #[default]
    Newest,
    Oldest,
    Price(Sort),
    Rating,
    Name,
}

impl ProductSortBy {
    pub fn from_kebab_case(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            "price-asc" => Some(Self::Price(Sort::Asc)),
            "price-desc" => Some(Self::Price(Sort::Desc)),
            "rating" => Some(Self::Rating),
            "name" => Some(Self::Name),
            _ => None,
        }
    }
}
