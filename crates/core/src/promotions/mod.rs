//! Promotions
//!
//! Scheduled, scope-limited discounts applied to the unit price of each
//! matching cart line.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    carts::CartLine,
    discounts::{DiscountError, SimpleDiscount},
};

pub mod scope;

pub use scope::ProductScope;

/// An automatic, scheduled discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    /// Promotion name
    pub name: String,

    /// Lines the promotion covers
    pub scope: ProductScope,

    /// Per-unit discount
    pub discount: SimpleDiscount,

    /// Manual on/off switch
    #[serde(default = "enabled")]
    pub is_active: bool,

    /// First instant the promotion applies
    pub starts_at: Timestamp,

    /// Last instant the promotion applies, open-ended when absent
    #[serde(default)]
    pub ends_at: Option<Timestamp>,
}

const fn enabled() -> bool {
    true
}

impl Promotion {
    /// Create an active, open-ended promotion starting at `starts_at`.
    pub fn new(
        name: impl Into<String>,
        scope: ProductScope,
        discount: SimpleDiscount,
        starts_at: Timestamp,
    ) -> Self {
        Self {
            name: name.into(),
            scope,
            discount,
            is_active: true,
            starts_at,
            ends_at: None,
        }
    }

    /// Set the end of the promotion window.
    #[must_use]
    pub fn ending_at(mut self, ends_at: Timestamp) -> Self {
        self.ends_at = Some(ends_at);
        self
    }

    /// Switch the promotion off.
    #[must_use]
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Whether the promotion is switched on and `now` is inside its window.
    pub fn is_current(&self, now: Timestamp) -> bool {
        self.is_active && self.starts_at <= now && self.ends_at.is_none_or(|end| now <= end)
    }
}

/// The promotion chosen for a line, with the promoted unit price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromotionMatch<'a> {
    /// Winning promotion
    pub promotion: &'a Promotion,

    /// Unit price after the promotion
    pub unit_price: Decimal,
}

/// Find the promotion giving the lowest unit price for `line` at `now`.
///
/// Promotions never stack on a line. When several cover it, the one with the
/// lowest resulting unit price wins and ties go to the earliest in `promotions`.
///
/// # Errors
///
/// Returns a [`DiscountError`] if discount arithmetic overflows.
pub fn best_promotion<'a>(
    promotions: &'a [Promotion],
    line: &CartLine,
    now: Timestamp,
) -> Result<Option<PromotionMatch<'a>>, DiscountError> {
    let mut best: Option<PromotionMatch<'a>> = None;

    for promotion in promotions
        .iter()
        .filter(|promotion| promotion.is_current(now) && promotion.scope.matches(line))
    {
        let unit_price = promotion.discount.apply(line.unit_price)?;

        if best.is_none_or(|current| unit_price < current.unit_price) {
            best = Some(PromotionMatch {
                promotion,
                unit_price,
            });
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::products::{ProductId, VariantKey};

    use super::*;

    fn line() -> CartLine {
        CartLine {
            key: VariantKey::new(ProductId::new(1), "Chocolate", 2270),
            name: "Nitro Whey".to_string(),
            brand: "MuscleTech".to_string(),
            category: "Protein".to_string(),
            unit_price: Decimal::new(100, 0),
            quantity: 2,
        }
    }

    fn at(s: &str) -> Result<Timestamp, jiff::Error> {
        s.parse()
    }

    #[test]
    fn window_bounds_are_inclusive() -> TestResult {
        let promotion = Promotion::new(
            "Spring",
            ProductScope::AllProducts,
            SimpleDiscount::percentage_off(Decimal::TEN),
            at("2026-03-01T00:00:00Z")?,
        )
        .ending_at(at("2026-05-31T23:59:59Z")?);

        assert!(promotion.is_current(at("2026-03-01T00:00:00Z")?));
        assert!(promotion.is_current(at("2026-05-31T23:59:59Z")?));
        assert!(!promotion.is_current(at("2026-02-28T23:59:59Z")?));
        assert!(!promotion.is_current(at("2026-06-01T00:00:00Z")?));

        Ok(())
    }

    #[test]
    fn inactive_promotion_is_never_current() -> TestResult {
        let promotion = Promotion::new(
            "Paused",
            ProductScope::AllProducts,
            SimpleDiscount::percentage_off(Decimal::TEN),
            at("2026-01-01T00:00:00Z")?,
        )
        .deactivated();

        assert!(!promotion.is_current(at("2026-06-01T00:00:00Z")?));

        Ok(())
    }

    #[test]
    fn best_promotion_picks_lowest_unit_price() -> TestResult {
        let start = at("2026-01-01T00:00:00Z")?;
        let promotions = [
            Promotion::new(
                "Brand 10%",
                ProductScope::brand("MuscleTech"),
                SimpleDiscount::percentage_off(Decimal::TEN),
                start,
            ),
            Promotion::new(
                "Protein 25 off",
                ProductScope::category("Protein"),
                SimpleDiscount::amount_off(Decimal::new(25, 0)),
                start,
            ),
        ];

        let best = best_promotion(&promotions, &line(), at("2026-06-01T00:00:00Z")?)?;

        assert_eq!(
            best.map(|found| (found.promotion.name.as_str(), found.unit_price)),
            Some(("Protein 25 off", Decimal::new(75, 0)))
        );

        Ok(())
    }

    #[test]
    fn best_promotion_tie_goes_to_first() -> TestResult {
        let start = at("2026-01-01T00:00:00Z")?;
        let promotions = [
            Promotion::new(
                "First",
                ProductScope::brand("MuscleTech"),
                SimpleDiscount::percentage_off(Decimal::TEN),
                start,
            ),
            Promotion::new(
                "Second",
                ProductScope::category("Protein"),
                SimpleDiscount::amount_off(Decimal::TEN),
                start,
            ),
        ];

        let best = best_promotion(&promotions, &line(), at("2026-06-01T00:00:00Z")?)?;

        assert_eq!(best.map(|found| found.promotion.name.as_str()), Some("First"));

        Ok(())
    }

    #[test]
    fn best_promotion_skips_out_of_scope_and_expired() -> TestResult {
        let promotions = [
            Promotion::new(
                "Other brand",
                ProductScope::brand("Optimum"),
                SimpleDiscount::percentage_off(Decimal::new(50, 0)),
                at("2026-01-01T00:00:00Z")?,
            ),
            Promotion::new(
                "Expired",
                ProductScope::AllProducts,
                SimpleDiscount::percentage_off(Decimal::new(50, 0)),
                at("2026-01-01T00:00:00Z")?,
            )
            .ending_at(at("2026-02-01T00:00:00Z")?),
        ];

        let best = best_promotion(&promotions, &line(), at("2026-06-01T00:00:00Z")?)?;

        assert!(best.is_none(), "no promotion should apply, got {best:?}");

        Ok(())
    }
}
