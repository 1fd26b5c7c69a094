//! Cart errors.

use thiserror::Error;

use crate::products::VariantKey;

/// How a failure should be reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was malformed or cannot be satisfied.
    Validation,

    /// The request referenced something that does not exist.
    NotFound,
}

impl ErrorKind {
    /// HTTP status code the web layer responds with.
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::NotFound => 404,
        }
    }
}

/// Rejected cart mutations. The cart is left unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    /// Requested quantity was zero, negative or out of range.
    #[error("invalid product count: {0}")]
    InvalidProductCount(i64),

    /// Requested quantity exceeds the units in stock.
    #[error("not enough stock, only {available} available")]
    NotEnoughStock {
        /// Units actually in stock
        available: u32,
    },

    /// Adding another variant would exceed the line limit.
    #[error("cart cannot hold more than {limit} different products")]
    CartFull {
        /// Most distinct variants allowed
        limit: usize,
    },

    /// No catalog variant for the product, flavour and package size.
    #[error("{0} not found")]
    ProductNotFound(VariantKey),

    /// The line to remove is not in the cart.
    #[error("{0} is not in the cart")]
    CartItemNotFound(VariantKey),

    /// Promo codes need at least one line.
    #[error("promo codes cannot be applied to an empty cart")]
    EmptyCart,

    /// Unknown or retired promo code.
    #[error("promo code {0:?} is not valid")]
    InvalidPromoCode(String),

    /// The code to remove is not the one applied.
    #[error("promo code {0:?} is not applied to the cart")]
    PromoCodeNotApplied(String),
}

impl CartError {
    /// Machine-readable message key.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::InvalidProductCount(_) => "InvalidProductCount",
            Self::NotEnoughStock { .. } => "NotEnoughStock",
            Self::CartFull { .. } => "CartFull",
            Self::ProductNotFound(_) => "ProductNotFound",
            Self::CartItemNotFound(_) => "CartItemNotFound",
            Self::EmptyCart => "EmptyCart",
            Self::InvalidPromoCode(_) => "InvalidPromoCode",
            Self::PromoCodeNotApplied(_) => "PromoCodeNotApplied",
        }
    }

    /// Error class for response mapping.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::CartItemNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::products::ProductId;

    use super::*;

    #[test]
    fn stock_message_names_available_units() {
        let error = CartError::NotEnoughStock { available: 100 };

        assert_eq!(error.to_string(), "not enough stock, only 100 available");
        assert_eq!(error.key(), "NotEnoughStock");
    }

    #[test]
    fn only_missing_lines_are_not_found() {
        let key = VariantKey::new(ProductId::new(1), "Vanilla", 908);

        assert_eq!(CartError::CartItemNotFound(key.clone()).kind().status_code(), 404);
        assert_eq!(CartError::ProductNotFound(key).kind().status_code(), 400);
        assert_eq!(CartError::EmptyCart.kind(), ErrorKind::Validation);
    }
}
