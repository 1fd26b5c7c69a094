//! In-memory Catalog

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    catalog::{Catalog, CatalogError, file::CatalogFile},
    config::PricingConfig,
    discounts::is_valid_percentage,
    products::{ProductVariant, VariantKey},
    promo_codes::PromoCode,
    promotions::Promotion,
    shipping::ShippingDiscount,
};

/// Catalog held in memory, immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    config: PricingConfig,
    variants: FxHashMap<VariantKey, ProductVariant>,
    promo_codes: FxHashMap<String, PromoCode>,
    promotions: Vec<Promotion>,
    shipping_discounts: Vec<ShippingDiscount>,
}

impl InMemoryCatalog {
    /// Create an empty catalog with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its
    /// contents are inconsistent.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        debug!(path = %path.display(), "loading catalog");

        Self::from_yaml_str(&contents)
    }

    /// Load a catalog from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed, a variant or promo
    /// code is defined twice, a price is negative, or a discount is out of range.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_norway::from_str(yaml)?;

        let mut catalog = Self::new().with_config(file.settings);

        for variant in file.products.into_iter().flat_map(|product| product.into_variants()) {
            catalog.insert_variant(variant)?;
        }

        for promo_code in file.promo_codes {
            catalog.insert_promo_code(promo_code)?;
        }

        for promotion in file.promotions {
            catalog.insert_promotion(promotion)?;
        }

        for discount in file.shipping_discounts {
            catalog.insert_shipping_discount(discount)?;
        }

        debug!(
            variants = catalog.variants.len(),
            promotions = catalog.promotions.len(),
            promo_codes = catalog.promo_codes.len(),
            shipping_discounts = catalog.shipping_discounts.len(),
            "catalog loaded"
        );

        Ok(catalog)
    }

    /// Pricing settings from the catalog.
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Replace the pricing settings.
    #[must_use]
    pub fn with_config(mut self, config: PricingConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a variant.
    ///
    /// # Errors
    ///
    /// Returns an error if the variant already exists or its price is negative.
    pub fn with_variant(mut self, variant: ProductVariant) -> Result<Self, CatalogError> {
        self.insert_variant(variant)?;
        Ok(self)
    }

    /// Add a promotion.
    ///
    /// # Errors
    ///
    /// Returns an error if the discount is out of range.
    pub fn with_promotion(mut self, promotion: Promotion) -> Result<Self, CatalogError> {
        self.insert_promotion(promotion)?;
        Ok(self)
    }

    /// Add a promo code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code already exists or its percentage is out of range.
    pub fn with_promo_code(mut self, promo_code: PromoCode) -> Result<Self, CatalogError> {
        self.insert_promo_code(promo_code)?;
        Ok(self)
    }

    /// Add a shipping discount.
    ///
    /// # Errors
    ///
    /// Returns an error if the percentage is out of range.
    pub fn with_shipping_discount(
        mut self,
        discount: ShippingDiscount,
    ) -> Result<Self, CatalogError> {
        self.insert_shipping_discount(discount)?;
        Ok(self)
    }

    fn insert_variant(&mut self, variant: ProductVariant) -> Result<(), CatalogError> {
        if variant.price.is_sign_negative() {
            return Err(CatalogError::InvalidPrice(variant.key.to_string()));
        }

        if self.variants.contains_key(&variant.key) {
            return Err(CatalogError::DuplicateVariant(variant.key.to_string()));
        }

        self.variants.insert(variant.key.clone(), variant);

        Ok(())
    }

    fn insert_promotion(&mut self, promotion: Promotion) -> Result<(), CatalogError> {
        if !promotion.discount.is_well_formed() {
            return Err(CatalogError::InvalidDiscount(promotion.name));
        }

        self.promotions.push(promotion);

        Ok(())
    }

    fn insert_promo_code(&mut self, promo_code: PromoCode) -> Result<(), CatalogError> {
        if !is_valid_percentage(promo_code.percentage) {
            return Err(CatalogError::InvalidDiscount(promo_code.code));
        }

        if self.promo_codes.contains_key(&promo_code.code) {
            return Err(CatalogError::DuplicatePromoCode(promo_code.code));
        }

        self.promo_codes.insert(promo_code.code.clone(), promo_code);

        Ok(())
    }

    fn insert_shipping_discount(&mut self, discount: ShippingDiscount) -> Result<(), CatalogError> {
        if !is_valid_percentage(discount.percentage) {
            return Err(CatalogError::InvalidDiscount(format!(
                "shipping discount for {}",
                discount.country
            )));
        }

        self.shipping_discounts.push(discount);

        Ok(())
    }
}

impl Catalog for InMemoryCatalog {
    fn variant(&self, key: &VariantKey) -> Option<ProductVariant> {
        self.variants.get(key).cloned()
    }

    fn promo_code(&self, code: &str) -> Option<PromoCode> {
        self.promo_codes.get(code).cloned()
    }

    fn promotions(&self) -> Vec<Promotion> {
        self.promotions.clone()
    }

    fn shipping_discounts(&self) -> Vec<ShippingDiscount> {
        self.shipping_discounts.clone()
    }
}
