//! Checkout prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    carts::{Cart, CartError, CartLine, ErrorKind, MAX_LINES},
    catalog::{Catalog, CatalogError, InMemoryCatalog},
    config::PricingConfig,
    cookie::{COOKIE_NAME, CartCookie, CookieError, CookieLine, MAX_COOKIE_BYTES, SetCookie},
    discounts::{DiscountError, SimpleDiscount},
    orders::{CartProductRecord, CartRecord, OrderError},
    pricing::{PricingContext, PricingEngine, PricingError},
    products::{ProductId, ProductVariant, VariantKey},
    promo_codes::PromoCode,
    promotions::{ProductScope, Promotion, PromotionMatch, best_promotion},
    receipt::{Receipt, ReceiptError},
    service::{
        CartCommand, CartRequest, CartResponse, CartService, CheckoutResponse, ServiceError,
    },
    shipping::{ShippingDiscount, shipping_price},
    snapshot::{CartSnapshot, PricedLine},
};
