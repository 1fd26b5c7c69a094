//! Catalog File
//!
//! YAML layout of a catalog file.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    config::PricingConfig,
    products::{ProductId, ProductVariant, VariantKey},
    promo_codes::PromoCode,
    promotions::Promotion,
    shipping::ShippingDiscount,
};

/// Top-level catalog document.
#[derive(Debug, Deserialize)]
pub(super) struct CatalogFile {
    /// Engine settings
    #[serde(default)]
    pub settings: PricingConfig,

    /// Products with their variants
    #[serde(default)]
    pub products: Vec<ProductEntry>,

    /// Promotions in priority order
    #[serde(default)]
    pub promotions: Vec<Promotion>,

    /// Promo codes
    #[serde(default)]
    pub promo_codes: Vec<PromoCode>,

    /// Shipping discounts
    #[serde(default)]
    pub shipping_discounts: Vec<ShippingDiscount>,
}

/// Product with shared attributes.
#[derive(Debug, Deserialize)]
pub(super) struct ProductEntry {
    pub id: u64,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub variants: Vec<VariantEntry>,
}

/// One flavour and package size of a product.
#[derive(Debug, Deserialize)]
pub(super) struct VariantEntry {
    pub flavour: String,
    pub grams: u32,

    /// Quoted decimal, e.g. `"15.99"`
    pub price: Decimal,

    #[serde(default)]
    pub stock: u32,
}

impl ProductEntry {
    /// Expand the product into one catalog variant per entry.
    pub fn into_variants(self) -> impl Iterator<Item = ProductVariant> {
        let Self {
            id,
            name,
            brand,
            category,
            variants,
        } = self;

        variants.into_iter().map(move |variant| ProductVariant {
            key: VariantKey::new(ProductId::new(id), variant.flavour, variant.grams),
            name: name.clone(),
            brand: brand.clone(),
            category: category.clone(),
            price: variant.price,
            stock: variant.stock,
        })
    }
}
