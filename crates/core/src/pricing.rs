//! Pricing
//!
//! Cart totals are computed in a fixed order:
//!
//! 1. each line's unit price is reduced by its best current promotion,
//! 2. promoted line subtotals are summed into the original price,
//! 3. the promo code, if any, takes its percentage off that sum,
//! 4. shipping is charged on the original price and destination country,
//! 5. the amount due is the discounted products plus shipping.

use jiff::Timestamp;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    carts::CartLine,
    config::PricingConfig,
    discounts::DiscountError,
    promo_codes::PromoCode,
    promotions::{Promotion, best_promotion},
    shipping::{ShippingDiscount, shipping_price},
    snapshot::{CartSnapshot, PricedLine},
};

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Wrapped discount arithmetic error.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// A line subtotal or cart total overflowed.
    #[error("cart total overflowed")]
    Overflow,
}

/// Everything besides the lines that pricing depends on.
#[derive(Debug, Clone, Copy)]
pub struct PricingContext<'a> {
    /// Candidate promotions; those not current at `now` are ignored
    pub promotions: &'a [Promotion],

    /// Applied promo code, already validated
    pub promo_code: Option<&'a PromoCode>,

    /// Candidate shipping discounts
    pub shipping_discounts: &'a [ShippingDiscount],

    /// Destination country code
    pub country: Option<&'a str>,

    /// Instant promotions and discount windows are evaluated at
    pub now: Timestamp,
}

impl<'a> PricingContext<'a> {
    /// A context with no promotions, promo code, discounts or country.
    pub const fn new(now: Timestamp) -> Self {
        Self {
            promotions: &[],
            promo_code: None,
            shipping_discounts: &[],
            country: None,
            now,
        }
    }

    /// Set the candidate promotions.
    #[must_use]
    pub const fn with_promotions(mut self, promotions: &'a [Promotion]) -> Self {
        self.promotions = promotions;
        self
    }

    /// Set the applied promo code.
    #[must_use]
    pub const fn with_promo_code(mut self, promo_code: Option<&'a PromoCode>) -> Self {
        self.promo_code = promo_code;
        self
    }

    /// Set the candidate shipping discounts.
    #[must_use]
    pub const fn with_shipping_discounts(mut self, discounts: &'a [ShippingDiscount]) -> Self {
        self.shipping_discounts = discounts;
        self
    }

    /// Set the destination country.
    #[must_use]
    pub const fn with_country(mut self, country: Option<&'a str>) -> Self {
        self.country = country;
        self
    }
}

/// Computes cart totals. Stateless apart from its configuration.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    /// Create an engine with the given settings.
    pub const fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Engine settings.
    pub const fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Price `lines` in `context`.
    ///
    /// An empty cart prices to all zeroes with no promo code.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if any arithmetic overflows.
    pub fn price(
        &self,
        lines: &[CartLine],
        context: &PricingContext<'_>,
    ) -> Result<CartSnapshot, PricingError> {
        if lines.is_empty() {
            return Ok(CartSnapshot::empty());
        }

        let mut cart_products = Vec::with_capacity(lines.len());
        let mut list_price = Decimal::ZERO;
        let mut original_price = Decimal::ZERO;

        for line in lines {
            let quantity = Decimal::from(line.quantity);
            let best = best_promotion(context.promotions, line, context.now)?;
            let promoted_unit_price = best.map_or(line.unit_price, |found| found.unit_price);

            let subtotal = promoted_unit_price
                .checked_mul(quantity)
                .ok_or(PricingError::Overflow)?;

            list_price = line
                .unit_price
                .checked_mul(quantity)
                .and_then(|line_total| list_price.checked_add(line_total))
                .ok_or(PricingError::Overflow)?;

            original_price = original_price
                .checked_add(subtotal)
                .ok_or(PricingError::Overflow)?;

            cart_products.push(PricedLine {
                line: line.clone(),
                promoted_unit_price,
                subtotal,
                promotion: best.map(|found| found.promotion.name.clone()),
            });
        }

        let total_products = match context.promo_code {
            Some(promo_code) => promo_code.apply(original_price)?,
            None => original_price,
        };

        let shipping_price = shipping_price(
            self.config.base_shipping_price,
            context.shipping_discounts,
            context.country,
            original_price,
            context.now,
        )?;

        let total = total_products
            .checked_add(shipping_price)
            .ok_or(PricingError::Overflow)?;

        Ok(CartSnapshot {
            cart_products,
            original_price,
            total_products,
            total_saved: original_price - total_products,
            promotion_saved: list_price - original_price,
            code: context.promo_code.map(|promo_code| promo_code.code.clone()),
            shipping_price,
            total,
        })
    }
}
