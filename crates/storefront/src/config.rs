//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `WOODCRAFT_TAX_RATE` - Sales tax rate applied at checkout (default: 0.08)
//! - `WOODCRAFT_CURRENCY` - ISO 4217 store currency (default: USD)
//! - `WOODCRAFT_CATALOG_PATH` - JSON catalog file replacing the bundled catalog
//! - `WOODCRAFT_ALLOW_BACKORDER` - Allow out-of-stock products in the cart (default: false)

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use woodcraft_core::CurrencyCode;

/// Default sales tax rate (8%).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Tax rate as a fraction (0.08 = 8%)
    pub tax_rate: Decimal,
    /// Currency prices are quoted in
    pub currency: CurrencyCode,
    /// Catalog file to load instead of the bundled catalog
    pub catalog_path: Option<PathBuf>,
    /// Whether out-of-stock products may be added to the cart
    pub allow_backorder: bool,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            currency: CurrencyCode::default(),
            catalog_path: None,
            allow_backorder: false,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let tax_rate = parse_or(&lookup, "WOODCRAFT_TAX_RATE", defaults.tax_rate)?;
        validate_tax_rate(tax_rate)?;

        let currency = parse_or(&lookup, "WOODCRAFT_CURRENCY", defaults.currency)?;
        let catalog_path = lookup("WOODCRAFT_CATALOG_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let allow_backorder = lookup("WOODCRAFT_ALLOW_BACKORDER")
            .map(|value| parse_bool("WOODCRAFT_ALLOW_BACKORDER", &value))
            .transpose()?
            .unwrap_or(defaults.allow_backorder);

        Ok(Self {
            tax_rate,
            currency,
            catalog_path,
            allow_backorder,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable with `FromStr`, falling back to `default` when unset.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a boolean flag (`true`/`false`/`1`/`0`/`yes`/`no`).
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Tax rate must be a fraction in `[0, 1)`.
fn validate_tax_rate(rate: Decimal) -> Result<(), ConfigError> {
    if rate.is_sign_negative() || rate >= Decimal::ONE {
        return Err(ConfigError::InvalidEnvVar(
            "WOODCRAFT_TAX_RATE".to_string(),
            format!("must be between 0 and 1 (got {rate})"),
        ));
    }
    Ok(())
}
