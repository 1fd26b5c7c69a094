//! Orders
//!
//! Persistable order records built from a priced cart at checkout.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    products::VariantKey,
    snapshot::{CartSnapshot, PricedLine},
    uuids::TypedUuid,
};

/// Order UUID
pub type CartRecordUuid = TypedUuid<CartRecord>;

/// Order line UUID
pub type CartProductRecordUuid = TypedUuid<CartProductRecord>;

/// Errors that can occur when placing an order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderError {
    /// Orders need at least one line.
    #[error("cannot place an order for an empty cart")]
    EmptyCart,
}

/// A placed order with its totals frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRecord {
    /// Order identifier
    pub uuid: CartRecordUuid,

    /// Sum of promoted line subtotals
    pub original_price: Decimal,

    /// Original price after the promo code
    pub total_products: Decimal,

    /// Amount the promo code saved
    pub total_saved: Decimal,

    /// Amount promotions saved
    pub promotion_saved: Decimal,

    /// Shipping charged
    pub shipping_price: Decimal,

    /// Products plus shipping
    pub total: Decimal,

    /// Applied promo code
    pub code: Option<String>,

    /// Ordered lines
    pub products: Vec<CartProductRecord>,

    /// When the order was placed
    pub created_at: Timestamp,
}

/// One ordered variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProductRecord {
    /// Line identifier
    pub uuid: CartProductRecordUuid,

    /// Ordered variant
    #[serde(flatten)]
    pub key: VariantKey,

    /// Product name at the time of the order
    pub name: String,

    /// Units ordered
    pub quantity: u32,

    /// List price at the time of the order
    pub unit_price: Decimal,

    /// Price actually charged per unit before the promo code
    pub promoted_unit_price: Decimal,
}

impl CartRecord {
    /// Freeze a priced cart into an order record.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] if the snapshot has no lines.
    pub fn from_snapshot(snapshot: &CartSnapshot, now: Timestamp) -> Result<Self, OrderError> {
        if snapshot.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        Ok(Self {
            uuid: CartRecordUuid::now_v7(),
            original_price: snapshot.original_price,
            total_products: snapshot.total_products,
            total_saved: snapshot.total_saved,
            promotion_saved: snapshot.promotion_saved,
            shipping_price: snapshot.shipping_price,
            total: snapshot.total,
            code: snapshot.code.clone(),
            products: snapshot
                .cart_products
                .iter()
                .map(CartProductRecord::from_priced)
                .collect(),
            created_at: now,
        })
    }

    /// Total units ordered.
    pub fn units(&self) -> u64 {
        self.products
            .iter()
            .map(|product| u64::from(product.quantity))
            .sum()
    }
}

impl CartProductRecord {
    fn from_priced(priced: &PricedLine) -> Self {
        Self {
            uuid: CartProductRecordUuid::now_v7(),
            key: priced.line.key.clone(),
            name: priced.line.name.clone(),
            quantity: priced.line.quantity,
            unit_price: priced.line.unit_price,
            promoted_unit_price: priced.promoted_unit_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        carts::CartLine,
        products::{ProductId, VariantKey},
    };

    use super::*;

    fn priced(id: u64, quantity: u32) -> PricedLine {
        PricedLine {
            line: CartLine {
                key: VariantKey::new(ProductId::new(id), "Vanilla", 908),
                name: format!("Product {id}"),
                brand: "Optimum".to_string(),
                category: "Protein".to_string(),
                unit_price: Decimal::new(20, 0),
                quantity,
            },
            promoted_unit_price: Decimal::new(15, 0),
            subtotal: Decimal::new(15, 0) * Decimal::from(quantity),
            promotion: Some("Optimum 5 off".to_string()),
        }
    }

    #[test]
    fn empty_cart_cannot_be_ordered() {
        let result = CartRecord::from_snapshot(&CartSnapshot::empty(), Timestamp::now());

        assert_eq!(result, Err(OrderError::EmptyCart));
    }

    #[test]
    fn record_freezes_totals_and_lines() -> TestResult {
        let snapshot = CartSnapshot {
            cart_products: vec![priced(1, 2), priced(2, 1)],
            original_price: Decimal::new(45, 0),
            total_products: Decimal::new(36, 0),
            total_saved: Decimal::new(9, 0),
            promotion_saved: Decimal::new(15, 0),
            code: Some("20% OFF!".to_string()),
            shipping_price: Decimal::TEN,
            total: Decimal::new(46, 0),
        };
        let now: Timestamp = "2026-10-19T12:00:00Z".parse()?;

        let record = CartRecord::from_snapshot(&snapshot, now)?;

        assert_eq!(record.total, Decimal::new(46, 0));
        assert_eq!(record.code.as_deref(), Some("20% OFF!"));
        assert_eq!(record.units(), 3);
        assert_eq!(record.created_at, now);

        let first = record.products.first().ok_or("missing first line")?;

        assert_eq!(first.unit_price, Decimal::new(20, 0));
        assert_eq!(first.promoted_unit_price, Decimal::new(15, 0));
        assert_ne!(
            record.products.first().map(|product| product.uuid),
            record.products.get(1).map(|product| product.uuid)
        );

        Ok(())
    }
}
