//! Carts
//!
//! The cart a customer builds up between requests: lines keyed by variant
//! plus at most one promo code. Every mutation is validated against the
//! catalog and leaves the cart untouched when it fails.

use tracing::debug;

use crate::{
    catalog::Catalog,
    products::{ProductVariant, VariantKey},
};

pub mod errors;
mod line;

pub use errors::{CartError, ErrorKind};
pub use line::CartLine;

/// Most distinct variants a cart holds.
pub const MAX_LINES: usize = 25;

/// Lines and applied promo code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    code: Option<String>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored variant keys, quantities and code.
    ///
    /// Attributes and list prices come from the catalog. Unknown variants and
    /// lines without units are dropped, repeated variants are merged and
    /// variants past [`MAX_LINES`] are ignored.
    pub fn restore<C: Catalog + ?Sized>(
        catalog: &C,
        items: impl IntoIterator<Item = (VariantKey, u32)>,
        code: Option<String>,
    ) -> Self {
        let mut cart = Self::new();

        for (key, quantity) in items.into_iter().filter(|(_, quantity)| *quantity > 0) {
            if let Some(existing) = cart.lines.iter_mut().find(|line| line.key == key) {
                existing.quantity = existing.quantity.saturating_add(quantity);
                continue;
            }

            if cart.lines.len() >= MAX_LINES {
                debug!(%key, "ignoring line past cart limit");
                continue;
            }

            match catalog.variant(&key) {
                Some(variant) => cart.lines.push(CartLine::from_variant(&variant, quantity)),
                None => debug!(%key, "dropping line for retired variant"),
            }
        }

        if !cart.lines.is_empty() {
            cart.code = code;
        }

        cart
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Applied promo code.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Find the line for a variant.
    pub fn line(&self, key: &VariantKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.key == key)
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    pub fn units(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Add `quantity` units of a variant, merging with an existing line.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidProductCount`]: `quantity` is not positive.
    /// - [`CartError::ProductNotFound`]: the catalog has no such variant.
    /// - [`CartError::NotEnoughStock`]: the line would exceed the units in stock.
    /// - [`CartError::CartFull`]: the cart already holds [`MAX_LINES`] other variants.
    pub fn add<C: Catalog + ?Sized>(
        &mut self,
        catalog: &C,
        key: &VariantKey,
        quantity: i64,
    ) -> Result<(), CartError> {
        let requested = requested_count(quantity)?;
        let variant = find_variant(catalog, key)?;

        let existing = self.line(key).map_or(0, |line| line.quantity);
        let wanted = existing
            .checked_add(requested)
            .ok_or(CartError::NotEnoughStock {
                available: variant.stock,
            })?;

        ensure_in_stock(&variant, wanted)?;
        self.ensure_room_for(key)?;

        debug!(%key, existing, wanted, "adding to cart");

        self.upsert(&variant, wanted);

        Ok(())
    }

    /// Set the quantity of a variant, creating the line if needed.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidProductCount`]: `quantity` is not positive.
    /// - [`CartError::ProductNotFound`]: the catalog has no such variant.
    /// - [`CartError::NotEnoughStock`]: `quantity` exceeds the units in stock.
    /// - [`CartError::CartFull`]: the cart already holds [`MAX_LINES`] other variants.
    pub fn set<C: Catalog + ?Sized>(
        &mut self,
        catalog: &C,
        key: &VariantKey,
        quantity: i64,
    ) -> Result<(), CartError> {
        let wanted = requested_count(quantity)?;
        let variant = find_variant(catalog, key)?;

        ensure_in_stock(&variant, wanted)?;
        self.ensure_room_for(key)?;

        debug!(%key, wanted, "setting cart quantity");

        self.upsert(&variant, wanted);

        Ok(())
    }

    /// Remove `quantity` units of a variant. Removing at least as many units as
    /// the line holds removes the line; emptying the cart clears the promo code.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidProductCount`]: `quantity` is not positive.
    /// - [`CartError::CartItemNotFound`]: the variant is not in the cart.
    pub fn remove(&mut self, key: &VariantKey, quantity: i64) -> Result<(), CartError> {
        let requested = requested_count(quantity)?;
        let index = self
            .position(key)
            .ok_or_else(|| CartError::CartItemNotFound(key.clone()))?;

        let remaining = self
            .lines
            .get(index)
            .map_or(0, |line| line.quantity.saturating_sub(requested));

        debug!(%key, remaining, "removing from cart");

        if remaining == 0 {
            self.lines.remove(index);
        } else if let Some(line) = self.lines.get_mut(index) {
            line.quantity = remaining;
        }

        if self.lines.is_empty() {
            self.code = None;
        }

        Ok(())
    }

    /// Apply a promo code, replacing any code already applied.
    ///
    /// # Errors
    ///
    /// - [`CartError::EmptyCart`]: the cart has no lines.
    /// - [`CartError::InvalidPromoCode`]: the code is unknown or no longer valid.
    pub fn apply_promo_code<C: Catalog + ?Sized>(
        &mut self,
        catalog: &C,
        code: &str,
    ) -> Result<(), CartError> {
        if self.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let promo_code = catalog
            .promo_code(code)
            .filter(|promo_code| promo_code.is_valid)
            .ok_or_else(|| CartError::InvalidPromoCode(code.to_string()))?;

        debug!(code = %promo_code.code, replaced = ?self.code, "applying promo code");

        self.code = Some(promo_code.code);

        Ok(())
    }

    /// Remove the applied promo code.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::PromoCodeNotApplied`] if `code` is not the applied code.
    pub fn remove_promo_code(&mut self, code: &str) -> Result<(), CartError> {
        if self.code.as_deref() != Some(code) {
            return Err(CartError::PromoCodeNotApplied(code.to_string()));
        }

        self.code = None;

        Ok(())
    }

    /// Drop the promo code without validation, used when it has gone stale.
    pub(crate) fn discard_promo_code(&mut self) {
        self.code = None;
    }

    /// Remove every line and the promo code.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.code = None;
    }

    /// Reload every line's attributes and list price from the catalog,
    /// dropping lines whose variant no longer exists.
    pub fn refresh<C: Catalog + ?Sized>(&mut self, catalog: &C) {
        self.lines.retain_mut(|line| match catalog.variant(&line.key) {
            Some(variant) => {
                line.update(&variant, line.quantity);
                true
            }
            None => {
                debug!(key = %line.key, "dropping line for retired variant");
                false
            }
        });

        if self.lines.is_empty() {
            self.code = None;
        }
    }

    fn ensure_room_for(&self, key: &VariantKey) -> Result<(), CartError> {
        if self.line(key).is_none() && self.lines.len() >= MAX_LINES {
            return Err(CartError::CartFull { limit: MAX_LINES });
        }

        Ok(())
    }

    fn position(&self, key: &VariantKey) -> Option<usize> {
        self.lines.iter().position(|line| &line.key == key)
    }

    fn upsert(&mut self, variant: &ProductVariant, quantity: u32) {
        match self.lines.iter_mut().find(|line| line.key == variant.key) {
            Some(line) => line.update(variant, quantity),
            None => self.lines.push(CartLine::from_variant(variant, quantity)),
        }
    }
}

/// Validate a client-supplied quantity.
fn requested_count(quantity: i64) -> Result<u32, CartError> {
    u32::try_from(quantity)
        .ok()
        .filter(|count| *count > 0)
        .ok_or(CartError::InvalidProductCount(quantity))
}

fn find_variant<C: Catalog + ?Sized>(
    catalog: &C,
    key: &VariantKey,
) -> Result<ProductVariant, CartError> {
    catalog
        .variant(key)
        .ok_or_else(|| CartError::ProductNotFound(key.clone()))
}

fn ensure_in_stock(variant: &ProductVariant, wanted: u32) -> Result<(), CartError> {
    if wanted > variant.stock {
        return Err(CartError::NotEnoughStock {
            available: variant.stock,
        });
    }

    Ok(())
}
