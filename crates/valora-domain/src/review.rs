//! Review rating rules.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// A validated 1–5 star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Returns `None` outside 1–5.
    pub fn new(value: i64) -> Option<Self> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Average of the given ratings rounded to one decimal place, and the rating count.
///
/// An empty slice yields `(0.0, 0)`.
pub fn average_rating(ratings: &[u8]) -> (f64, i32) {
    if ratings.is_empty() {
        return (0.0, 0);
    }
    let sum: u32 = ratings.iter().map(|&r| u32::from(r)).sum();
    let count = ratings.len();
    let avg = (Decimal::from(sum) / Decimal::from(count))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    (
        avg.to_f64().unwrap_or_default(),
        i32::try_from(count).unwrap_or(i32::MAX),
    )
}
