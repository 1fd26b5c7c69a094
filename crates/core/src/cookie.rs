//! Cart Cookie
//!
//! The `ShoppingCart` cookie carries the cart between requests as JSON,
//! base64url-encoded without padding. It holds variant keys, quantities and
//! the applied code only; names, prices and totals are rebuilt from the
//! catalog on every request.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{carts::Cart, catalog::Catalog, products::VariantKey};

/// Name of the cookie holding the cart.
pub const COOKIE_NAME: &str = "ShoppingCart";

/// Browsers drop cookies larger than this, name included.
pub const MAX_COOKIE_BYTES: usize = 4096;

const COOKIE_ATTRIBUTES: &str = "Path=/; HttpOnly; SameSite=Lax";

/// Cookie encoding and decoding errors.
#[derive(Debug, Error)]
pub enum CookieError {
    /// Cookie value is not valid base64url.
    #[error("cart cookie is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Cookie payload is not a valid cart.
    #[error("cart cookie is not a valid cart: {0}")]
    Json(#[from] serde_json::Error),

    /// Encoded cart does not fit in a cookie.
    #[error("cart cookie would be {size} bytes, limit is {MAX_COOKIE_BYTES}")]
    TooLarge {
        /// Size of the full cookie pair in bytes
        size: usize,
    },
}

/// One stored line: which variant and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieLine {
    /// Line identity
    #[serde(flatten)]
    pub key: VariantKey,

    /// Units in the cart
    pub quantity: u32,
}

/// Cookie payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCookie {
    /// Stored lines in insertion order
    #[serde(default)]
    pub lines: Vec<CookieLine>,

    /// Applied promo code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl CartCookie {
    /// Capture what is needed to rebuild `cart`.
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| CookieLine {
                    key: line.key.clone(),
                    quantity: line.quantity,
                })
                .collect(),
            code: cart.code().map(str::to_string),
        }
    }

    /// Rebuild the cart against the catalog.
    pub fn into_cart<C: Catalog + ?Sized>(self, catalog: &C) -> Cart {
        Cart::restore(
            catalog,
            self.lines.into_iter().map(|line| (line.key, line.quantity)),
            self.code,
        )
    }

    /// Encode as a cookie value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the cookie would be too large.
    pub fn encode(&self) -> Result<String, CookieError> {
        let json = serde_json::to_vec(self)?;
        let value = URL_SAFE_NO_PAD.encode(json);

        let size = COOKIE_NAME.len() + 1 + value.len();

        if size > MAX_COOKIE_BYTES {
            return Err(CookieError::TooLarge { size });
        }

        Ok(value)
    }

    /// Decode a cookie value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not base64url or not a cart.
    pub fn decode(value: &str) -> Result<Self, CookieError> {
        let json = URL_SAFE_NO_PAD.decode(value.trim())?;

        Ok(serde_json::from_slice(&json)?)
    }
}

/// What to do with the cart cookie after a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetCookie {
    /// Store the encoded cart.
    Store(String),

    /// Delete the cookie, the cart is empty or has been ordered.
    Expire,
}

impl SetCookie {
    /// `Set-Cookie` header value.
    pub fn header(&self) -> String {
        match self {
            Self::Store(value) => format!("{COOKIE_NAME}={value}; {COOKIE_ATTRIBUTES}"),
            Self::Expire => format!("{COOKIE_NAME}=; Max-Age=0; {COOKIE_ATTRIBUTES}"),
        }
    }

    /// Stored value, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Store(value) => Some(value),
            Self::Expire => None,
        }
    }
}
