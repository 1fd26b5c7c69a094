//! Products

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product identifier as assigned by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Create a product identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Return the raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Identity of a sellable variant, and therefore of a cart line.
///
/// Two lines with the same product, flavour and package size are the same line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantKey {
    /// Product identifier
    pub product_id: ProductId,

    /// Flavour name
    pub flavour: String,

    /// Package size in grams
    pub grams: u32,
}

impl VariantKey {
    /// Create a new variant key.
    pub fn new(product_id: ProductId, flavour: impl Into<String>, grams: u32) -> Self {
        Self {
            product_id,
            flavour: flavour.into(),
            grams,
        }
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "product {} ({}, {}g)",
            self.product_id, self.flavour, self.grams
        )
    }
}

/// A catalog entry: one flavour and package size of a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductVariant {
    /// Variant identity
    pub key: VariantKey,

    /// Product name
    pub name: String,

    /// Brand name, used for promotion matching
    pub brand: String,

    /// Category name, used for promotion matching
    pub category: String,

    /// List price per unit
    pub price: Decimal,

    /// Units available for sale
    pub stock: u32,
}
