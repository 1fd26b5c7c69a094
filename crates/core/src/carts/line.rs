//! Cart Lines

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::{ProductVariant, VariantKey};

/// A variant in the cart with its quantity.
///
/// Product attributes are captured from the catalog whenever the line is
/// added or updated, so pricing only needs the line itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Line identity
    #[serde(flatten)]
    pub key: VariantKey,

    /// Product name
    pub name: String,

    /// Brand name
    pub brand: String,

    /// Category name
    pub category: String,

    /// List price per unit
    pub unit_price: Decimal,

    /// Units in the cart, always at least one
    pub quantity: u32,
}

impl CartLine {
    /// Create a line for `quantity` units of a catalog variant.
    pub fn from_variant(variant: &ProductVariant, quantity: u32) -> Self {
        Self {
            key: variant.key.clone(),
            name: variant.name.clone(),
            brand: variant.brand.clone(),
            category: variant.category.clone(),
            unit_price: variant.price,
            quantity,
        }
    }

    /// Refresh catalog attributes and set a new quantity.
    pub(crate) fn update(&mut self, variant: &ProductVariant, quantity: u32) {
        self.name.clone_from(&variant.name);
        self.brand.clone_from(&variant.brand);
        self.category.clone_from(&variant.category);
        self.unit_price = variant.price;
        self.quantity = quantity;
    }
}
