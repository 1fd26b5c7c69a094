//! Cart Service
//!
//! One request-response cycle of the storefront cart: decode the cookie,
//! apply a single command, reprice against the catalog and hand back the
//! cookie to store.

use jiff::Timestamp;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    carts::{Cart, CartError, ErrorKind},
    catalog::{Catalog, InMemoryCatalog},
    cookie::{CartCookie, CookieError, SetCookie},
    orders::{CartRecord, OrderError},
    pricing::{PricingContext, PricingEngine, PricingError},
    products::VariantKey,
    snapshot::CartSnapshot,
};

/// Errors that can occur while handling a cart request.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requested mutation was rejected.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The cart cookie could not be decoded or encoded.
    #[error(transparent)]
    Cookie(#[from] CookieError),

    /// The cart could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The cart could not be turned into an order.
    #[error(transparent)]
    Order(#[from] OrderError),
}

impl ServiceError {
    /// Machine-readable message key.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Cart(error) => error.key(),
            Self::Cookie(CookieError::TooLarge { .. }) => "CartFull",
            Self::Cookie(_) => "InvalidCart",
            Self::Pricing(_) => "PricingFailed",
            Self::Order(OrderError::EmptyCart) => "EmptyCart",
        }
    }

    /// Error class, `None` for failures the client cannot fix.
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Cart(error) => Some(error.kind()),
            Self::Cookie(_) | Self::Order(_) => Some(ErrorKind::Validation),
            Self::Pricing(_) => None,
        }
    }

    /// HTTP status code the web layer responds with.
    pub const fn status_code(&self) -> u16 {
        match self.kind() {
            Some(kind) => kind.status_code(),
            None => 500,
        }
    }
}

/// A single cart mutation or query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    /// Add units of a variant.
    Add {
        /// Variant to add
        key: VariantKey,

        /// Units to add
        quantity: i64,
    },

    /// Set the units of a variant.
    Set {
        /// Variant to set
        key: VariantKey,

        /// New number of units
        quantity: i64,
    },

    /// Remove units of a variant.
    Remove {
        /// Variant to remove
        key: VariantKey,

        /// Units to remove
        quantity: i64,
    },

    /// Apply a promo code, replacing any applied code.
    ApplyPromoCode(String),

    /// Remove the applied promo code.
    RemovePromoCode(String),

    /// Empty the cart.
    Clear,

    /// Reprice without changes.
    Show,
}

impl CartCommand {
    /// Short name used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Set { .. } => "set",
            Self::Remove { .. } => "remove",
            Self::ApplyPromoCode(_) => "apply_promo_code",
            Self::RemovePromoCode(_) => "remove_promo_code",
            Self::Clear => "clear",
            Self::Show => "show",
        }
    }
}

/// A cart request as received from the storefront.
#[derive(Debug, Clone)]
pub struct CartRequest {
    /// Value of the `ShoppingCart` cookie, if the client sent one
    pub cookie: Option<String>,

    /// Requested change
    pub command: CartCommand,

    /// Shipping destination country code
    pub country: Option<String>,

    /// Instant promotions and discounts are evaluated at
    pub now: Timestamp,
}

impl CartRequest {
    /// Create a request with no cookie and no destination country.
    pub fn new(command: CartCommand, now: Timestamp) -> Self {
        Self {
            cookie: None,
            command,
            country: None,
            now,
        }
    }

    /// Attach the previous cookie value.
    #[must_use]
    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie;
        self
    }

    /// Set the shipping destination country.
    #[must_use]
    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country;
        self
    }
}

/// Result of a cart request.
#[derive(Debug, Clone)]
pub struct CartResponse {
    /// The repriced cart
    pub snapshot: CartSnapshot,

    /// Cookie instruction for the response
    pub cookie: SetCookie,
}

/// Result of placing an order.
#[derive(Debug, Clone)]
pub struct CheckoutResponse {
    /// The frozen order
    pub record: CartRecord,

    /// Cookie instruction for the response, always [`SetCookie::Expire`]
    pub cookie: SetCookie,
}

/// Applies cart commands and reprices against a catalog.
#[derive(Debug, Clone)]
pub struct CartService<C> {
    catalog: C,
    engine: PricingEngine,
}

impl CartService<InMemoryCatalog> {
    /// Create a service priced with the catalog's own settings.
    pub fn from_catalog(catalog: InMemoryCatalog) -> Self {
        let engine = PricingEngine::new(catalog.config().clone());

        Self::new(catalog, engine)
    }
}

impl<C: Catalog> CartService<C> {
    /// Create a service.
    pub const fn new(catalog: C, engine: PricingEngine) -> Self {
        Self { catalog, engine }
    }

    /// The catalog carts are validated and priced against.
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Apply one command to the cart in the request cookie and reprice it.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the cookie is malformed, the command is
    /// rejected or the cart cannot be priced or encoded.
    #[tracing::instrument(
        name = "cart.handle",
        skip_all,
        fields(
            command = request.command.name(),
            lines = tracing::field::Empty,
            code = tracing::field::Empty
        ),
        err
    )]
    pub fn handle(&self, request: &CartRequest) -> Result<CartResponse, ServiceError> {
        let mut cart = self.load(request.cookie.as_deref())?;

        self.apply(&mut cart, &request.command)?;

        let snapshot = self.price(&mut cart, request.country.as_deref(), request.now)?;

        let span = tracing::Span::current();

        span.record("lines", snapshot.cart_products.len());

        if let Some(code) = &snapshot.code {
            span.record("code", code.as_str());
        }

        let cookie = if cart.is_empty() {
            SetCookie::Expire
        } else {
            SetCookie::Store(CartCookie::from_cart(&cart).encode()?)
        };

        Ok(CartResponse { snapshot, cookie })
    }

    /// Price the cart in a cookie and freeze it into an order record. The
    /// ordered cart is gone, so the response expires the cookie.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the cookie is malformed, the cart is
    /// empty or cannot be priced.
    #[tracing::instrument(
        name = "cart.checkout",
        skip_all,
        fields(order_uuid = tracing::field::Empty),
        err
    )]
    pub fn checkout(
        &self,
        cookie: Option<&str>,
        country: Option<&str>,
        now: Timestamp,
    ) -> Result<CheckoutResponse, ServiceError> {
        let mut cart = self.load(cookie)?;
        let snapshot = self.price(&mut cart, country, now)?;
        let record = CartRecord::from_snapshot(&snapshot, now)?;

        tracing::Span::current().record("order_uuid", tracing::field::display(record.uuid));

        info!(total = %record.total, units = record.units(), "placed order");

        Ok(CheckoutResponse {
            record,
            cookie: SetCookie::Expire,
        })
    }

    /// Price a cart. Catalog prices replace whatever the cart carries and a
    /// promo code that is no longer valid is dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the arithmetic overflows.
    pub fn price(
        &self,
        cart: &mut Cart,
        country: Option<&str>,
        now: Timestamp,
    ) -> Result<CartSnapshot, PricingError> {
        cart.refresh(&self.catalog);

        let promo_code = cart.code().and_then(|code| {
            self.catalog
                .promo_code(code)
                .filter(|promo_code| promo_code.is_valid)
        });

        if promo_code.is_none()
            && let Some(code) = cart.code()
        {
            debug!(code, "dropping promo code that is no longer valid");

            cart.discard_promo_code();
        }

        let promotions = self.catalog.promotions();
        let shipping_discounts = self.catalog.shipping_discounts();

        let context = PricingContext::new(now)
            .with_promotions(&promotions)
            .with_promo_code(promo_code.as_ref())
            .with_shipping_discounts(&shipping_discounts)
            .with_country(country);

        self.engine.price(cart.lines(), &context)
    }

    fn load(&self, cookie: Option<&str>) -> Result<Cart, CookieError> {
        let Some(value) = cookie.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(Cart::new());
        };

        Ok(CartCookie::decode(value)?.into_cart(&self.catalog))
    }

    fn apply(&self, cart: &mut Cart, command: &CartCommand) -> Result<(), CartError> {
        match command {
            CartCommand::Add { key, quantity } => cart.add(&self.catalog, key, *quantity),
            CartCommand::Set { key, quantity } => cart.set(&self.catalog, key, *quantity),
            CartCommand::Remove { key, quantity } => cart.remove(key, *quantity),
            CartCommand::ApplyPromoCode(code) => cart.apply_promo_code(&self.catalog, code),
            CartCommand::RemovePromoCode(code) => cart.remove_promo_code(code),
            CartCommand::Clear => {
                cart.clear();
                Ok(())
            }
            CartCommand::Show => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        carts::MAX_LINES,
        catalog::MockCatalog,
        config::PricingConfig,
        cookie::CookieLine,
        discounts::SimpleDiscount,
        products::{ProductId, ProductVariant},
        promo_codes::PromoCode,
        promotions::{ProductScope, Promotion},
        shipping::ShippingDiscount,
    };

    use super::*;

    fn key() -> VariantKey {
        VariantKey::new(ProductId::new(4), "Strawberry", 908)
    }

    fn variant() -> ProductVariant {
        ProductVariant {
            key: key(),
            name: "Iso Whey".to_string(),
            brand: "Optimum".to_string(),
            category: "Protein".to_string(),
            price: Decimal::new(659_29, 2),
            stock: 100,
        }
    }

    fn now() -> Result<Timestamp, jiff::Error> {
        "2026-10-19T12:00:00Z".parse()
    }

    fn catalog() -> MockCatalog {
        let mut catalog = MockCatalog::new();

        catalog
            .expect_variant()
            .returning(|requested| (requested == &key()).then(variant));

        catalog.expect_promo_code().returning(|code| {
            (code == "20% OFF!").then(|| PromoCode::new("20% OFF!", Decimal::new(20, 0)))
        });

        catalog.expect_promotions().returning(Vec::new);

        catalog
            .expect_shipping_discounts()
            .returning(|| vec![ShippingDiscount::new("BG", Decimal::ONE_HUNDRED)]);

        catalog
    }

    fn service(catalog: MockCatalog) -> CartService<MockCatalog> {
        CartService::new(catalog, PricingEngine::new(PricingConfig::default()))
    }

    fn add(quantity: i64) -> CartCommand {
        CartCommand::Add {
            key: key(),
            quantity,
        }
    }

    #[test]
    fn add_then_apply_code_round_trips_through_cookie() -> TestResult {
        let service = service(catalog());

        let first = service.handle(&CartRequest::new(add(3), now()?))?;
        let cookie = first.cookie.value().map(str::to_string);

        assert!(cookie.is_some(), "non-empty cart should be stored");

        let second = service.handle(
            &CartRequest::new(CartCommand::ApplyPromoCode("20% OFF!".to_string()), now()?)
                .with_cookie(cookie),
        )?;

        assert_eq!(second.snapshot.original_price, Decimal::new(1977_87, 2));
        assert_eq!(second.snapshot.total_products, Decimal::new(1582_296, 3));
        assert_eq!(second.snapshot.total_saved, Decimal::new(395_574, 3));
        assert_eq!(second.snapshot.code.as_deref(), Some("20% OFF!"));

        Ok(())
    }

    #[test]
    fn country_selects_shipping_discount() -> TestResult {
        let service = service(catalog());

        let request = CartRequest::new(add(1), now()?).with_country(Some("bg".to_string()));
        let response = service.handle(&request)?;

        assert_eq!(response.snapshot.shipping_price, Decimal::ZERO);

        let request = CartRequest::new(add(1), now()?).with_country(Some("GR".to_string()));
        let response = service.handle(&request)?;

        assert_eq!(response.snapshot.shipping_price, Decimal::TEN);

        Ok(())
    }

    #[test]
    fn clearing_expires_cookie() -> TestResult {
        let service = service(catalog());

        let first = service.handle(&CartRequest::new(add(1), now()?))?;
        let cleared = service.handle(
            &CartRequest::new(CartCommand::Clear, now()?)
                .with_cookie(first.cookie.value().map(str::to_string)),
        )?;

        assert_eq!(cleared.cookie, SetCookie::Expire);
        assert_eq!(cleared.snapshot, CartSnapshot::empty());
        assert!(cleared.cookie.header().contains("Max-Age=0"));

        Ok(())
    }

    #[test]
    fn rejected_command_reports_validation_error() -> TestResult {
        let service = service(catalog());

        let result = service.handle(&CartRequest::new(add(101), now()?));

        let Err(error) = result else {
            return Err("expected stock error".into());
        };

        assert_eq!(error.key(), "NotEnoughStock");
        assert_eq!(error.status_code(), 400);
        assert!(error.to_string().contains("100"), "message should cite stock");

        Ok(())
    }

    #[test]
    fn removing_missing_line_is_not_found() -> TestResult {
        let service = service(catalog());

        let result = service.handle(&CartRequest::new(
            CartCommand::Remove {
                key: key(),
                quantity: 1,
            },
            now()?,
        ));

        assert!(
            matches!(&result, Err(error) if error.status_code() == 404),
            "expected 404, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn malformed_cookie_is_a_snapshot_error() -> TestResult {
        let service = service(catalog());

        let result = service.handle(
            &CartRequest::new(CartCommand::Show, now()?)
                .with_cookie(Some("%%% not a cart %%%".to_string())),
        );

        assert!(
            matches!(&result, Err(error) if error.key() == "InvalidCart"),
            "expected InvalidCart, got {result:?}"
        );

        Ok(())
    }

    fn stored(quantity: u32, code: Option<&str>) -> Result<String, CookieError> {
        CartCookie {
            lines: vec![CookieLine {
                key: key(),
                quantity,
            }],
            code: code.map(str::to_string),
        }
        .encode()
    }

    #[test]
    fn retired_promo_code_is_dropped_on_reprice() -> TestResult {
        let response = service(catalog()).handle(
            &CartRequest::new(CartCommand::Show, now()?)
                .with_cookie(Some(stored(1, Some("RETIRED"))?)),
        )?;

        assert!(response.snapshot.code.is_none());
        assert_eq!(response.snapshot.total_saved, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn stored_cart_is_priced_from_catalog() -> TestResult {
        let response = service(catalog()).handle(
            &CartRequest::new(CartCommand::Show, now()?).with_cookie(Some(stored(2, None)?)),
        )?;

        assert_eq!(response.snapshot.original_price, Decimal::new(1318_58, 2));
        assert_eq!(
            response.cookie.value().map(CartCookie::decode).transpose()?,
            Some(CartCookie {
                lines: vec![CookieLine {
                    key: key(),
                    quantity: 2,
                }],
                code: None,
            })
        );

        Ok(())
    }

    #[test]
    fn many_distinct_lines_round_trip_until_cart_is_full() -> TestResult {
        let mut catalog = MockCatalog::new();

        catalog.expect_variant().returning(|requested| {
            Some(ProductVariant {
                key: requested.clone(),
                ..variant()
            })
        });
        catalog.expect_promo_code().returning(|_| None);
        catalog.expect_promotions().returning(Vec::new);
        catalog.expect_shipping_discounts().returning(Vec::new);

        let service = service(catalog);
        let mut cookie = None;
        let line = |grams| CartCommand::Add {
            key: VariantKey::new(ProductId::new(4), "Cookies and Cream", grams),
            quantity: 3,
        };

        for grams in 1..=u32::try_from(MAX_LINES)? {
            let response =
                service.handle(&CartRequest::new(line(grams), now()?).with_cookie(cookie))?;

            assert_eq!(response.snapshot.cart_products.len(), usize::try_from(grams)?);

            cookie = response.cookie.value().map(str::to_string);
        }

        let result = service.handle(&CartRequest::new(line(9999), now()?).with_cookie(cookie));

        let Err(error) = result else {
            return Err("cart past the line limit should be rejected".into());
        };

        assert_eq!(error.key(), "CartFull");
        assert_eq!(error.status_code(), 400);

        Ok(())
    }

    #[test]
    fn promotions_come_from_catalog() -> TestResult {
        let mut catalog = MockCatalog::new();

        catalog.expect_variant().returning(|_| Some(variant()));
        catalog.expect_promo_code().never();
        catalog.expect_shipping_discounts().returning(Vec::new);
        catalog.expect_promotions().once().returning(|| {
            vec![Promotion::new(
                "Optimum 10 off",
                ProductScope::brand("Optimum"),
                SimpleDiscount::amount_off(Decimal::TEN),
                Timestamp::UNIX_EPOCH,
            )]
        });

        let response = service(catalog).handle(&CartRequest::new(add(1), now()?))?;

        assert_eq!(response.snapshot.original_price, Decimal::new(649_29, 2));
        assert_eq!(response.snapshot.promotion_saved, Decimal::TEN);

        Ok(())
    }

    #[test]
    fn checkout_builds_order_record() -> TestResult {
        let service = service(catalog());
        let added = service.handle(&CartRequest::new(add(2), now()?))?;

        let placed = service.checkout(added.cookie.value(), Some("BG"), now()?)?;

        assert_eq!(placed.record.total, Decimal::new(1318_58, 2));
        assert_eq!(placed.record.products.len(), 1);
        assert_eq!(placed.cookie, SetCookie::Expire);

        let empty = service.checkout(None, None, now()?);

        assert!(matches!(empty, Err(ServiceError::Order(OrderError::EmptyCart))));

        Ok(())
    }
}
