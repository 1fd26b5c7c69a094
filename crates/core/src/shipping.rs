//! Shipping
//!
//! Flat-rate shipping with country-scoped, threshold-gated discounts.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::discounts::{DiscountError, apply_percentage};

/// Reduction of the flat shipping fee for one destination country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDiscount {
    /// Destination country code, compared ASCII case-insensitively
    pub country: String,

    /// Percent points taken off shipping; 100 means free shipping
    pub percentage: Decimal,

    /// Promoted subtotal the cart must reach
    #[serde(default)]
    pub minimum_price: Option<Decimal>,

    /// Start of the discount window, open when absent
    #[serde(default)]
    pub starts_at: Option<Timestamp>,

    /// End of the discount window, open when absent
    #[serde(default)]
    pub ends_at: Option<Timestamp>,
}

impl ShippingDiscount {
    /// Create an unconditional, open-ended discount for a country.
    pub fn new(country: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            country: country.into(),
            percentage,
            minimum_price: None,
            starts_at: None,
            ends_at: None,
        }
    }

    /// Require the promoted subtotal to reach `minimum_price`.
    #[must_use]
    pub fn with_minimum_price(mut self, minimum_price: Decimal) -> Self {
        self.minimum_price = Some(minimum_price);
        self
    }

    /// Limit the discount to a window.
    #[must_use]
    pub fn between(mut self, starts_at: Timestamp, ends_at: Timestamp) -> Self {
        self.starts_at = Some(starts_at);
        self.ends_at = Some(ends_at);
        self
    }

    /// Whether the discount applies to a cart going to `country` with `subtotal`.
    pub fn qualifies(&self, country: &str, subtotal: Decimal, now: Timestamp) -> bool {
        self.country.eq_ignore_ascii_case(country)
            && self.minimum_price.is_none_or(|minimum| subtotal >= minimum)
            && self.starts_at.is_none_or(|start| start <= now)
            && self.ends_at.is_none_or(|end| now <= end)
    }
}

/// Calculate the shipping price for a non-empty cart.
///
/// The largest qualifying discount is taken off `base_price`.
///
/// # Errors
///
/// Returns a [`DiscountError`] if the arithmetic overflows.
pub fn shipping_price(
    base_price: Decimal,
    discounts: &[ShippingDiscount],
    country: Option<&str>,
    subtotal: Decimal,
    now: Timestamp,
) -> Result<Decimal, DiscountError> {
    let Some(country) = country else {
        return Ok(base_price);
    };

    let best = discounts
        .iter()
        .filter(|discount| discount.qualifies(country, subtotal, now))
        .map(|discount| discount.percentage)
        .max();

    match best {
        Some(percentage) => Ok(apply_percentage(percentage, base_price)?.max(Decimal::ZERO)),
        None => Ok(base_price),
    }
}
