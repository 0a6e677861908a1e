//! Unified error handling.
//!
//! Every fallible storefront operation surfaces as a [`StorefrontError`] at
//! the session boundary. Engine-level errors convert in through `?`.

use thiserror::Error;
use woodcraft_core::ProductId;

use crate::cart::CartError;
use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;

/// Storefront-level error type.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A cart mutation was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout failed validation or was attempted out of order.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// No product with this ID exists in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
}

impl StorefrontError {
    /// Whether the shopper caused the error and can correct it.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Cart(_) | Self::Checkout(_) | Self::ProductNotFound(_)
        )
    }

    /// Message safe to show a shopper.
    ///
    /// Configuration and catalog failures are summarised; their details go
    /// to the log instead.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Cart(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::ProductNotFound(_) => "That product is no longer available".to_string(),
            Self::Config(_) | Self::Catalog(_) => {
                tracing::error!(error = %self, "Storefront unavailable");
                "The storefront is temporarily unavailable".to_string()
            }
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
