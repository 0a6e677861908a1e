//! Wishlist engine: the set of products a shopper has saved.
//!
//! Entries keep the order they were saved in so the wishlist renders
//! consistently. The wishlist survives checkout; only an explicit
//! [`WishlistEngine::clear`] empties it.

use std::sync::Arc;

use indexmap::IndexSet;
use tokio::sync::watch;
use woodcraft_core::{Product, ProductId};

use crate::catalog::CatalogStore;

/// Saved product IDs, in the order they were saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishlistSnapshot {
    ids: Vec<ProductId>,
}

impl WishlistSnapshot {
    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Owns the wishlist of a single session.
#[derive(Debug)]
pub struct WishlistEngine {
    ids: IndexSet<ProductId>,
    updates: watch::Sender<WishlistSnapshot>,
}

impl Default for WishlistEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl WishlistEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ids: IndexSet::new(),
            updates: watch::Sender::new(WishlistSnapshot::default()),
        }
    }

    #[must_use]
    pub fn is_in_wishlist(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    /// Save a product. Saving it again is a no-op.
    pub fn add_to_wishlist(&mut self, id: ProductId) {
        if self.ids.insert(id) {
            tracing::debug!(product_id = %id, "Saved to wishlist");
            self.publish();
        }
    }

    /// Unsave a product. Absent products are a no-op.
    pub fn remove_from_wishlist(&mut self, id: ProductId) {
        if self.ids.shift_remove(&id) {
            tracing::debug!(product_id = %id, "Removed from wishlist");
            self.publish();
        }
    }

    /// Remove the product if saved, save it otherwise.
    ///
    /// Returns whether the product is saved afterwards.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        if self.is_in_wishlist(id) {
            self.remove_from_wishlist(id);
            false
        } else {
            self.add_to_wishlist(id);
            true
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        if !self.ids.is_empty() {
            self.ids.clear();
            self.publish();
        }
    }

    /// Saved IDs, in the order they were saved.
    pub fn wishlist_ids(&self) -> impl ExactSizeIterator<Item = ProductId> + '_ {
        self.ids.iter().copied()
    }

    /// Resolve saved IDs against a catalog, skipping IDs it no longer has.
    pub fn products<C>(&self, catalog: &C) -> Vec<Arc<Product>>
    where
        C: CatalogStore + ?Sized,
    {
        self.ids
            .iter()
            .filter_map(|&id| catalog.product_by_id(id))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn snapshot(&self) -> WishlistSnapshot {
        WishlistSnapshot {
            ids: self.ids.iter().copied().collect(),
        }
    }

    /// Receive a snapshot after every change to the wishlist.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<WishlistSnapshot> {
        self.updates.subscribe()
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::catalog::InMemoryCatalog;

    #[test]
    fn test_add_is_idempotent() {
        let mut wishlist = WishlistEngine::new();
        wishlist.add_to_wishlist(ProductId::new(2));
        let once = wishlist.snapshot();
        wishlist.add_to_wishlist(ProductId::new(2));
        assert_eq!(wishlist.snapshot(), once);
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut wishlist = WishlistEngine::new();
        wishlist.remove_from_wishlist(ProductId::new(5));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut wishlist = WishlistEngine::new();
        assert!(wishlist.toggle(ProductId::new(3)));
        assert!(wishlist.is_in_wishlist(ProductId::new(3)));
        assert!(!wishlist.toggle(ProductId::new(3)));
        assert!(!wishlist.is_in_wishlist(ProductId::new(3)));
    }

    #[test]
    fn test_saved_order_is_stable() {
        let mut wishlist = WishlistEngine::new();
        for id in [4, 1, 6, 2] {
            wishlist.add_to_wishlist(ProductId::new(id));
        }
        wishlist.remove_from_wishlist(ProductId::new(1));
        let ids: Vec<i32> = wishlist.wishlist_ids().map(|id| id.as_i32()).collect();
        assert_eq!(ids, vec![4, 6, 2]);
    }

    #[test]
    fn test_products_resolves_against_catalog() {
        let catalog = InMemoryCatalog::bundled().unwrap();
        let mut wishlist = WishlistEngine::new();
        wishlist.add_to_wishlist(ProductId::new(6));
        wishlist.add_to_wishlist(ProductId::new(404));
        wishlist.add_to_wishlist(ProductId::new(2));

        let names: Vec<String> = wishlist
            .products(&catalog)
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, vec!["Homestead Dining Chair", "Serenity Bookshelf"]);
    }

    #[test]
    fn test_subscribers_notified_on_change_only() {
        let mut wishlist = WishlistEngine::new();
        let mut rx = wishlist.subscribe();

        wishlist.remove_from_wishlist(ProductId::new(1));
        assert!(!rx.has_changed().unwrap());

        wishlist.add_to_wishlist(ProductId::new(1));
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().contains(ProductId::new(1)));

        wishlist.add_to_wishlist(ProductId::new(1));
        assert!(!rx.has_changed().unwrap());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(i32),
        Remove(i32),
        Toggle(i32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1..6i32).prop_map(Op::Add),
            (1..6i32).prop_map(Op::Remove),
            (1..6i32).prop_map(Op::Toggle),
        ]
    }

    proptest! {
        #[test]
        fn prop_membership_reflects_latest_operation(ops in proptest::collection::vec(op(), 0..40)) {
            let mut wishlist = WishlistEngine::new();
            let mut model = std::collections::HashSet::new();
            for op in ops {
                match op {
                    Op::Add(id) => {
                        wishlist.add_to_wishlist(ProductId::new(id));
                        model.insert(id);
                    }
                    Op::Remove(id) => {
                        wishlist.remove_from_wishlist(ProductId::new(id));
                        model.remove(&id);
                    }
                    Op::Toggle(id) => {
                        let expected = if model.remove(&id) {
                            false
                        } else {
                            model.insert(id)
                        };
                        prop_assert_eq!(wishlist.toggle(ProductId::new(id)), expected);
                    }
                }
                for id in 1..6 {
                    prop_assert_eq!(wishlist.is_in_wishlist(ProductId::new(id)), model.contains(&id));
                }
            }
        }
    }
}
