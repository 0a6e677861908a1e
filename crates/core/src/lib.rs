//! Artisan Woodcraft Core - Shared domain types.
//!
//! This crate provides the types shared by every Woodcraft component:
//! - `storefront` - Cart, wishlist, filter and checkout state engines
//! - `cli` - Command-line front end over the storefront engines
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no session state.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, catalog attributes, products, emails and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
