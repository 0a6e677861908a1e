//! A shopper's browsing session.
//!
//! A session owns one cart, one wishlist and one filter engine, all reading
//! from the same shared catalog. Pages query the session instead of holding
//! their own copies of any of this state.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{Span, instrument};
use uuid::Uuid;
use woodcraft_core::{Product, ProductId};

use crate::cart::{CartEngine, CartLine, CartSnapshot};
use crate::catalog::CatalogStore;
use crate::checkout::{CheckoutFlow, Order, OrderTotals};
use crate::config::StorefrontConfig;
use crate::error::{Result, StorefrontError};
use crate::filter::{FilterEngine, FilterSelection, FilterValue};
use crate::wishlist::{WishlistEngine, WishlistSnapshot};

/// Shopping session state.
pub struct StorefrontSession {
    id: Uuid,
    span: Span,
    config: StorefrontConfig,
    catalog: Arc<dyn CatalogStore>,
    cart: CartEngine,
    wishlist: WishlistEngine,
    filters: FilterEngine,
}

impl std::fmt::Debug for StorefrontSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontSession")
            .field("id", &self.id)
            .field("cart_lines", &self.cart.line_count())
            .field("wishlist", &self.wishlist.len())
            .field("active_filters", &self.filters.active_filter_count())
            .finish_non_exhaustive()
    }
}

impl StorefrontSession {
    /// Start a session over a shared catalog.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogStore>, config: StorefrontConfig) -> Self {
        let id = Uuid::new_v4();
        let span = tracing::info_span!("session", session_id = %id);
        let filters = FilterEngine::from_store(catalog.as_ref());
        let cart = CartEngine::new().with_backorder(config.allow_backorder);

        span.in_scope(|| tracing::debug!(products = filters.catalog().len(), "Session started"));

        Self {
            id,
            span,
            config,
            catalog,
            cart,
            wishlist: WishlistEngine::new(),
            filters,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogStore {
        self.catalog.as_ref()
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    #[must_use]
    pub const fn cart(&self) -> &CartEngine {
        &self.cart
    }

    /// Look up a product and add it to the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::ProductNotFound` for unknown IDs, or the
    /// cart's rejection.
    #[instrument(parent = &self.span, skip(self))]
    pub fn add_to_cart_by_id(&mut self, id: ProductId, quantity: u32) -> Result<()> {
        let product = self
            .catalog
            .product_by_id(id)
            .ok_or(StorefrontError::ProductNotFound(id))?;
        self.cart.add_to_cart(product, quantity)?;
        Ok(())
    }

    /// Add an already-resolved product to the cart.
    ///
    /// # Errors
    ///
    /// Returns the cart's rejection.
    pub fn add_to_cart(&mut self, product: Arc<Product>, quantity: u32) -> Result<()> {
        let _entered = self.span.enter();
        self.cart.add_to_cart(product, quantity)?;
        Ok(())
    }

    pub fn remove_from_cart(&mut self, id: ProductId) {
        let _entered = self.span.enter();
        self.cart.remove_from_cart(id);
    }

    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) {
        let _entered = self.span.enter();
        self.cart.update_quantity(id, quantity);
    }

    pub fn clear_cart(&mut self) {
        let _entered = self.span.enter();
        self.cart.clear_cart();
    }

    pub fn cart_lines(&self) -> impl ExactSizeIterator<Item = &CartLine> {
        self.cart.cart_lines()
    }

    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.cart.cart_count()
    }

    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.cart.cart_total()
    }

    #[must_use]
    pub fn subscribe_cart(&self) -> watch::Receiver<CartSnapshot> {
        self.cart.subscribe()
    }

    // -------------------------------------------------------------------------
    // Wishlist
    // -------------------------------------------------------------------------

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistEngine {
        &self.wishlist
    }

    #[must_use]
    pub fn is_in_wishlist(&self, id: ProductId) -> bool {
        self.wishlist.is_in_wishlist(id)
    }

    pub fn add_to_wishlist(&mut self, id: ProductId) {
        let _entered = self.span.enter();
        self.wishlist.add_to_wishlist(id);
    }

    pub fn remove_from_wishlist(&mut self, id: ProductId) {
        let _entered = self.span.enter();
        self.wishlist.remove_from_wishlist(id);
    }

    /// Toggle a product's saved state. Returns whether it is saved afterwards.
    pub fn toggle_wishlist(&mut self, id: ProductId) -> bool {
        let _entered = self.span.enter();
        self.wishlist.toggle(id)
    }

    pub fn wishlist_ids(&self) -> impl ExactSizeIterator<Item = ProductId> + '_ {
        self.wishlist.wishlist_ids()
    }

    /// Saved products still present in the catalog, in saved order.
    #[must_use]
    pub fn wishlist_products(&self) -> Vec<Arc<Product>> {
        self.wishlist.products(self.catalog.as_ref())
    }

    #[must_use]
    pub fn subscribe_wishlist(&self) -> watch::Receiver<WishlistSnapshot> {
        self.wishlist.subscribe()
    }

    // -------------------------------------------------------------------------
    // Filters
    // -------------------------------------------------------------------------

    #[must_use]
    pub const fn filters(&self) -> &FilterEngine {
        &self.filters
    }

    /// Replace the filter selection and return the matching products.
    pub fn apply_filters(&mut self, selection: FilterSelection) -> Vec<Arc<Product>> {
        let _entered = self.span.enter();
        self.filters.apply_filters(selection)
    }

    pub fn clear_filters(&mut self) -> Vec<Arc<Product>> {
        let _entered = self.span.enter();
        self.filters.clear_filters()
    }

    pub fn remove_filter_value(&mut self, value: FilterValue) -> Vec<Arc<Product>> {
        let _entered = self.span.enter();
        self.filters.remove_filter_value(value)
    }

    #[must_use]
    pub fn filtered_products(&self) -> Vec<Arc<Product>> {
        self.filters.filtered_products()
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// Begin a checkout using the session's tax rate and currency.
    #[must_use]
    pub const fn checkout(&self) -> CheckoutFlow {
        CheckoutFlow::new(self.config.tax_rate, self.config.currency)
    }

    /// Totals for the current cart.
    #[must_use]
    pub fn order_totals(&self) -> OrderTotals {
        OrderTotals::from_subtotal(self.cart.cart_total(), self.config.tax_rate)
    }

    /// Place the order held by `flow`, clearing this session's cart.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Checkout` if the flow is incomplete, the cart
    /// is empty, or the order was already placed.
    pub fn place_order(&mut self, flow: &mut CheckoutFlow) -> Result<Order> {
        let _entered = self.span.enter();
        Ok(flow.place_order(&mut self.cart)?)
    }
}
