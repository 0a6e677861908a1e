//! Integration tests for Artisan Woodcraft.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p woodcraft-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_flow` - Cart, wishlist and filters driven through a session
//! - `checkout_flow` - Full checkouts from cart to order
//! - `catalog_file` - Loading catalogs from JSON files
//!
//! This library holds the fixtures the test files share.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use chrono::NaiveDate;
use woodcraft_storefront::checkout::{PaymentForm, ShippingForm};
use woodcraft_storefront::{CatalogError, InMemoryCatalog, StorefrontConfig, StorefrontSession};

/// The bundled catalog, shared behind an `Arc`.
///
/// # Errors
///
/// Returns `CatalogError` if the bundled catalog fails validation.
pub fn bundled_catalog() -> Result<Arc<InMemoryCatalog>, CatalogError> {
    InMemoryCatalog::bundled().map(Arc::new)
}

/// A fresh session over the bundled catalog with default configuration.
///
/// # Errors
///
/// Returns `CatalogError` if the bundled catalog fails validation.
pub fn session() -> Result<StorefrontSession, CatalogError> {
    session_with(StorefrontConfig::default())
}

/// A fresh session over the bundled catalog.
///
/// # Errors
///
/// Returns `CatalogError` if the bundled catalog fails validation.
pub fn session_with(config: StorefrontConfig) -> Result<StorefrontSession, CatalogError> {
    Ok(StorefrontSession::new(bundled_catalog()?, config))
}

/// A complete, valid shipping form.
#[must_use]
pub fn shipping_form() -> ShippingForm {
    ShippingForm {
        first_name: "Marcus".to_string(),
        last_name: "Oyelaran".to_string(),
        email: "marcus@example.com".to_string(),
        address: "48 Sawmill Road".to_string(),
        city: "Asheville".to_string(),
        state: "NC".to_string(),
        zip_code: "28801".to_string(),
        country: "United States".to_string(),
    }
}

/// A complete, valid payment form using a test card number.
#[must_use]
pub fn payment_form() -> PaymentForm {
    PaymentForm {
        card_name: "Marcus Oyelaran".to_string(),
        card_number: "5555 5555 5555 4444".to_string(),
        exp_date: "08/29".to_string(),
        cvv: "321".to_string(),
    }
}

/// Fixed date used to validate card expiry.
#[must_use]
pub fn checkout_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap_or_default()
}
