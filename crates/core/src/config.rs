//! Pricing Config

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Flat shipping fee charged on any non-empty cart before discounts.
pub const DEFAULT_BASE_SHIPPING_PRICE: Decimal = Decimal::TEN;

/// Settings for the pricing engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Shipping fee before shipping discounts
    #[serde(default = "default_base_shipping_price")]
    pub base_shipping_price: Decimal,
}

const fn default_base_shipping_price() -> Decimal {
    DEFAULT_BASE_SHIPPING_PRICE
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_shipping_price: DEFAULT_BASE_SHIPPING_PRICE,
        }
    }
}
