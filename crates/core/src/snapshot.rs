//! Cart Snapshot
//!
//! The priced cart returned to the storefront after every request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::carts::CartLine;

/// A cart line with its pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    /// The line as held in the cart
    #[serde(flatten)]
    pub line: CartLine,

    /// Unit price after the line's promotion
    pub promoted_unit_price: Decimal,

    /// Promoted unit price times quantity
    pub subtotal: Decimal,

    /// Name of the applied promotion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
}

/// Priced cart state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Priced lines in insertion order
    pub cart_products: Vec<PricedLine>,

    /// Sum of promoted line subtotals
    pub original_price: Decimal,

    /// Original price after the promo code
    pub total_products: Decimal,

    /// Amount the promo code took off the original price
    pub total_saved: Decimal,

    /// Amount promotions took off list prices
    #[serde(default)]
    pub promotion_saved: Decimal,

    /// Applied promo code
    #[serde(default)]
    pub code: Option<String>,

    /// Shipping after shipping discounts
    pub shipping_price: Decimal,

    /// Amount due: products plus shipping
    pub total: Decimal,
}

impl CartSnapshot {
    /// Snapshot of an empty cart.
    pub const fn empty() -> Self {
        Self {
            cart_products: Vec::new(),
            original_price: Decimal::ZERO,
            total_products: Decimal::ZERO,
            total_saved: Decimal::ZERO,
            promotion_saved: Decimal::ZERO,
            code: None,
            shipping_price: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.cart_products.is_empty()
    }

    /// Iterate over the lines.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.cart_products.iter().map(|priced| &priced.line)
    }
}

impl Default for CartSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
