//! Receipt
//!
//! Terminal rendering of a priced cart: one table row per line followed by a
//! right-aligned summary of the cart totals.

use std::io;

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::snapshot::{CartSnapshot, PricedLine};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Writing to the output failed.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Printable view of a [`CartSnapshot`].
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'a> {
    snapshot: &'a CartSnapshot,
}

impl<'a> Receipt<'a> {
    /// Create a receipt for a snapshot.
    pub const fn new(snapshot: &'a CartSnapshot) -> Self {
        Self { snapshot }
    }

    /// Write the line table and the summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.snapshot.is_empty() {
            writeln!(out, "Cart is empty")?;

            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record([
            "",
            "Item",
            "Variant",
            "Qty",
            "Unit Price",
            "Promoted Price",
            "Subtotal",
            "Promotion",
        ]);

        for (idx, priced) in self.snapshot.cart_products.iter().enumerate() {
            builder.push_record(line_cells(idx, priced));
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(3..7), Alignment::right());

        writeln!(out, "\n{table}")?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let snapshot = self.snapshot;

        let mut rows = vec![
            ("Products:", snapshot.original_price.to_string()),
            ("Promotions saved:", snapshot.promotion_saved.to_string()),
        ];

        if let Some(code) = &snapshot.code {
            rows.push(("Promo code:", code.clone()));
        }

        rows.extend([
            ("Code saved:", snapshot.total_saved.to_string()),
            ("Shipping:", snapshot.shipping_price.to_string()),
            ("Total:", snapshot.total.to_string()),
        ]);

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows
            .iter()
            .map(|(_, value)| value.chars().count())
            .max()
            .unwrap_or(0);

        for (label, value) in rows {
            writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
        }

        writeln!(out)?;

        Ok(())
    }
}

fn line_cells(idx: usize, priced: &PricedLine) -> [String; 8] {
    let line = &priced.line;

    let promoted = if priced.promoted_unit_price == line.unit_price {
        String::new()
    } else {
        format_price(priced.promoted_unit_price)
    };

    [
        format!("#{:<3}", idx + 1),
        format!("{}\n{}", line.name, line.brand),
        format!("{}, {}g", line.key.flavour, line.key.grams),
        line.quantity.to_string(),
        format_price(line.unit_price),
        promoted,
        format_price(priced.subtotal),
        priced.promotion.clone().unwrap_or_default(),
    ]
}

fn format_price(price: Decimal) -> String {
    price.normalize().to_string()
}
