//! Catalog
//!
//! Read access to the products, promotions, promo codes and shipping
//! discounts the storefront persists.

use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::{
    products::{ProductVariant, VariantKey},
    promo_codes::PromoCode,
    promotions::Promotion,
    shipping::ShippingDiscount,
};

mod file;
mod memory;

pub use memory::InMemoryCatalog;

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two variants share a product, flavour and package size
    #[error("duplicate variant: {0}")]
    DuplicateVariant(String),

    /// Two promo codes share a code
    #[error("duplicate promo code: {0}")]
    DuplicatePromoCode(String),

    /// Negative price
    #[error("invalid price for {0}")]
    InvalidPrice(String),

    /// Percentage outside `0..=100` or negative amount
    #[error("invalid discount in {0}")]
    InvalidDiscount(String),
}

/// Source of catalog data for cart operations and pricing.
#[cfg_attr(test, automock)]
pub trait Catalog {
    /// Look up a variant by product, flavour and package size.
    fn variant(&self, key: &VariantKey) -> Option<ProductVariant>;

    /// Look up a promo code by its exact text.
    fn promo_code(&self, code: &str) -> Option<PromoCode>;

    /// All promotions, current or not, in priority order.
    fn promotions(&self) -> Vec<Promotion>;

    /// All shipping discounts.
    fn shipping_discounts(&self) -> Vec<ShippingDiscount>;
}
