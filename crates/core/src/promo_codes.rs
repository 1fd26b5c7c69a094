//! Promo Codes

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::discounts::{DiscountError, apply_percentage};

/// A user-supplied code taking a percentage off the whole cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    /// The code as typed by the customer, compared case-sensitively
    pub code: String,

    /// Percent points taken off the promoted subtotal
    pub percentage: Decimal,

    /// Codes can be retired without deleting them
    #[serde(default = "valid")]
    pub is_valid: bool,
}

const fn valid() -> bool {
    true
}

impl PromoCode {
    /// Create a valid promo code.
    pub fn new(code: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            code: code.into(),
            percentage,
            is_valid: true,
        }
    }

    /// Apply the code to a promoted subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if the arithmetic overflows.
    pub fn apply(&self, subtotal: Decimal) -> Result<Decimal, DiscountError> {
        apply_percentage(self.percentage, subtotal)
    }
}
