//! Discount utilities
//!
//! Shared arithmetic for promotions, promo codes and shipping discounts.
//! Percentages are whole-number percent points (`25` means 25%) and all
//! amounts stay exact decimals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Decimal arithmetic overflowed.
    #[error("discount arithmetic overflowed")]
    Overflow,
}

/// Discount applied to a single unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimpleDiscount {
    /// Take a percentage off the price (e.g., "25% off")
    PercentageOff {
        /// Percent points, between 0 and 100
        percentage: Decimal,
    },

    /// Subtract a fixed amount from the price (e.g., "5 off")
    AmountOff {
        /// Amount subtracted per unit
        amount: Decimal,
    },
}

impl SimpleDiscount {
    /// Percentage discount shorthand.
    pub const fn percentage_off(percentage: Decimal) -> Self {
        Self::PercentageOff { percentage }
    }

    /// Fixed amount discount shorthand.
    pub const fn amount_off(amount: Decimal) -> Self {
        Self::AmountOff { amount }
    }

    /// Calculate the discounted price. Never goes below zero.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::Overflow`] if the arithmetic cannot be represented.
    pub fn apply(&self, price: Decimal) -> Result<Decimal, DiscountError> {
        let discounted = match self {
            Self::PercentageOff { percentage } => apply_percentage(*percentage, price)?,
            Self::AmountOff { amount } => price.checked_sub(*amount).ok_or(DiscountError::Overflow)?,
        };

        Ok(discounted.max(Decimal::ZERO))
    }

    /// Check that the discount is within its valid range.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Self::PercentageOff { percentage } => is_valid_percentage(*percentage),
            Self::AmountOff { amount } => !amount.is_sign_negative(),
        }
    }
}

/// Calculate `percentage` percent of `amount`.
///
/// # Errors
///
/// Returns [`DiscountError::Overflow`] if the multiplication overflows.
pub fn percent_of(percentage: Decimal, amount: Decimal) -> Result<Decimal, DiscountError> {
    amount
        .checked_mul(percentage)
        .and_then(|value| value.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(DiscountError::Overflow)
}

/// Reduce `amount` by `percentage` percent: `amount × (1 − percentage / 100)`.
///
/// # Errors
///
/// Returns [`DiscountError::Overflow`] if the arithmetic overflows.
pub fn apply_percentage(percentage: Decimal, amount: Decimal) -> Result<Decimal, DiscountError> {
    amount
        .checked_sub(percent_of(percentage, amount)?)
        .ok_or(DiscountError::Overflow)
}

/// Percent points must fall within `0..=100`.
pub fn is_valid_percentage(percentage: Decimal) -> bool {
    (Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&percentage)
}
