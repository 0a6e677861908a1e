//! Artisan Woodcraft storefront library.
//!
//! Client-side state engines for the furniture storefront: the cart, the
//! wishlist and catalog filtering, plus a simulated checkout that consumes
//! the cart. All engines read products from a shared [`catalog::CatalogStore`].
//!
//! A [`session::StorefrontSession`] bundles one of each engine for a single
//! shopper.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod filter;
pub mod session;
pub mod wishlist;

#[cfg(test)]
mod testing;

pub use cart::{CartEngine, CartError, CartLine, CartSnapshot};
pub use catalog::{CatalogError, CatalogStore, InMemoryCatalog};
pub use checkout::{CheckoutError, CheckoutFlow, Order, OrderTotals};
pub use config::StorefrontConfig;
pub use error::{Result, StorefrontError};
pub use filter::{FilterEngine, FilterSelection, FilterValue};
pub use session::StorefrontSession;
pub use wishlist::{WishlistEngine, WishlistSnapshot};
