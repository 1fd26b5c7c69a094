//! Checkout
//!
//! Cart pricing for the storefront: per-line promotions, promo codes,
//! country-scoped shipping discounts and the `ShoppingCart` cookie that
//! carries the cart between requests.

pub mod carts;
pub mod catalog;
pub mod config;
pub mod cookie;
pub mod discounts;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promo_codes;
pub mod promotions;
pub mod receipt;
pub mod service;
pub mod shipping;
pub mod snapshot;
pub mod uuids;
