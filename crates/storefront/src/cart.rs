//! Cart engine.
//!
//! The cart maps product IDs to lines in insertion order. Each line shares
//! its product with the catalog through an `Arc`, so prices and names can
//! never drift from the source of truth.
//!
//! Totals and counts are always computed from the current lines; nothing is
//! cached. Consumers that want to react to changes call
//! [`CartEngine::subscribe`] and receive a fresh [`CartSnapshot`] after every
//! mutation that actually changed the cart.

use std::sync::Arc;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::watch;
use woodcraft_core::{Product, ProductId};

/// Errors raised by cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantities added to the cart must be at least 1.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    /// The product is out of stock and backorders are disabled.
    #[error("Product {0} is out of stock")]
    OutOfStock(ProductId),

    /// The line quantity would exceed `u32::MAX`.
    #[error("Quantity for product {0} is too large")]
    QuantityOverflow(ProductId),

    /// The cart total would no longer fit in a `Decimal`.
    #[error("Cart total too large to add product {0}")]
    TotalOverflow(ProductId),
}

/// One product-and-quantity pair in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product: Arc<Product>,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity.
    ///
    /// The engine only keeps lines whose totals fit, so this cannot overflow
    /// for lines read from a cart.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Immutable view of the cart published to subscribers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartSnapshot {
    lines: Vec<CartLine>,
}

impl CartSnapshot {
    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Owns the cart of a single session.
#[derive(Debug)]
pub struct CartEngine {
    lines: IndexMap<ProductId, CartLine>,
    allow_backorder: bool,
    updates: watch::Sender<CartSnapshot>,
}

impl Default for CartEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CartEngine {
    /// Create an empty cart that rejects out-of-stock products.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: IndexMap::new(),
            allow_backorder: false,
            updates: watch::Sender::new(CartSnapshot::default()),
        }
    }

    /// Allow (or forbid) adding products whose `in_stock` flag is false.
    #[must_use]
    pub const fn with_backorder(mut self, allow: bool) -> Self {
        self.allow_backorder = allow;
        self
    }

    /// Add `quantity` units of a product.
    ///
    /// Increments the existing line for the product, or appends a new line.
    ///
    /// # Errors
    ///
    /// - `CartError::InvalidQuantity` if `quantity` is 0
    /// - `CartError::OutOfStock` if the product is out of stock and backorders are disabled
    /// - `CartError::QuantityOverflow` if the line quantity would overflow
    /// - `CartError::TotalOverflow` if the cart total would overflow
    pub fn add_to_cart(&mut self, product: Arc<Product>, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if !product.in_stock && !self.allow_backorder {
            tracing::warn!(product_id = %product.id, "Rejected out-of-stock product");
            return Err(CartError::OutOfStock(product.id));
        }

        let id = product.id;
        let (price, new_quantity) = match self.lines.get(&id) {
            Some(line) => (
                line.product.price,
                line.quantity
                    .checked_add(quantity)
                    .ok_or(CartError::QuantityOverflow(id))?,
            ),
            None => (product.price, quantity),
        };
        if self.total_with(id, price, new_quantity).is_none() {
            tracing::warn!(product_id = %id, quantity = new_quantity, "Rejected cart total overflow");
            return Err(CartError::TotalOverflow(id));
        }

        if let Some(line) = self.lines.get_mut(&id) {
            line.quantity = new_quantity;
            tracing::debug!(product_id = %id, quantity = line.quantity, "Cart line incremented");
        } else {
            self.lines.insert(id, CartLine { product, quantity });
            tracing::debug!(product_id = %id, quantity, "Cart line added");
        }

        self.publish();
        Ok(())
    }

    /// Remove the line for a product. Absent products are a no-op.
    pub fn remove_from_cart(&mut self, id: ProductId) {
        // shift_remove keeps the remaining lines in insertion order
        if self.lines.shift_remove(&id).is_some() {
            tracing::debug!(product_id = %id, "Cart line removed");
            self.publish();
        } else {
            tracing::debug!(product_id = %id, "Remove ignored, product not in cart");
        }
    }

    /// Replace the quantity of an existing line.
    ///
    /// A quantity of 0 removes the line. Absent products are a no-op, and so
    /// is a quantity whose cart total would overflow.
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove_from_cart(id);
            return;
        }

        if let Some(line) = self.lines.get(&id)
            && self.total_with(id, line.product.price, quantity).is_none()
        {
            tracing::warn!(product_id = %id, quantity, "Update ignored, cart total would overflow");
            return;
        }

        match self.lines.get_mut(&id) {
            Some(line) if line.quantity == quantity => {}
            Some(line) => {
                line.quantity = quantity;
                tracing::debug!(product_id = %id, quantity, "Cart line quantity set");
                self.publish();
            }
            None => {
                tracing::debug!(product_id = %id, "Update ignored, product not in cart");
            }
        }
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        self.lines.clear();
        tracing::debug!("Cart cleared");
        self.publish();
    }

    /// Sum of `price * quantity` over all lines; zero for an empty cart.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.lines.values().map(CartLine::line_total).sum()
    }

    /// Sum of all line quantities (the badge count), not the number of lines.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.lines.values().map(|l| u64::from(l.quantity)).sum()
    }

    /// Lines in insertion order.
    pub fn cart_lines(&self) -> impl ExactSizeIterator<Item = &CartLine> {
        self.lines.values()
    }

    /// Quantity of a product in the cart, if present.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> Option<u32> {
        self.lines.get(&id).map(|l| l.quantity)
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.values().cloned().collect(),
        }
    }

    /// Receive a snapshot after every change to the cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.updates.subscribe()
    }

    /// Cart total if the line for `id` held `quantity` units at `price`,
    /// or `None` if it overflows.
    fn total_with(&self, id: ProductId, price: Decimal, quantity: u32) -> Option<Decimal> {
        let line_total = price.checked_mul(Decimal::from(quantity))?;
        self.lines
            .values()
            .filter(|line| line.product.id != id)
            .try_fold(line_total, |total, line| total.checked_add(line.line_total()))
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}
