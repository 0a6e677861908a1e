//! Read-only product catalog.
//!
//! The catalog is the single source of truth for product records. Engines
//! share products through `Arc<Product>` handed out by a [`CatalogStore`];
//! nothing downstream ever owns a private copy.
//!
//! The bundled catalog is compiled in from `content/catalog.json`. A
//! different file can be supplied through `WOODCRAFT_CATALOG_PATH`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;
use woodcraft_core::{Collection, Finish, Product, ProductId, Review, WoodType};

use crate::config::StorefrontConfig;

/// JSON source of the bundled catalog.
const BUNDLED_CATALOG: &str = include_str!("../content/catalog.json");

/// Highest unit price a catalog may list (1,000,000 in the store currency).
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Errors raised while loading or validating a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog JSON is malformed or does not match the product schema.
    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share an ID.
    #[error("Duplicate product id {0}")]
    DuplicateId(ProductId),

    /// A product has no gallery images.
    #[error("Product {0} has no images")]
    NoImages(ProductId),

    /// A product has a negative price.
    #[error("Product {0} has a negative price")]
    NegativePrice(ProductId),

    /// A product's price exceeds [`MAX_PRICE`].
    #[error("Product {product} price exceeds the maximum of {max}")]
    PriceTooLarge { product: ProductId, max: Decimal },

    /// A review rating is outside 1..=5.
    #[error("Product {product} has a review rated {rating} (expected 1-5)")]
    InvalidRating { product: ProductId, rating: u8 },
}

/// Source of product records for a session.
///
/// Implementations are read-only. Every list is returned in catalog order.
pub trait CatalogStore: Send + Sync {
    /// All products, in catalog order.
    fn list_products(&self) -> Vec<Arc<Product>>;

    /// Look up a product by ID.
    fn product_by_id(&self, id: ProductId) -> Option<Arc<Product>>;

    /// Products flagged for the home page.
    fn featured_products(&self) -> Vec<Arc<Product>> {
        self.list_products()
            .into_iter()
            .filter(|p| p.featured)
            .collect()
    }

    /// Products made from the given wood.
    fn products_by_wood_type(&self, wood_type: WoodType) -> Vec<Arc<Product>> {
        self.list_products()
            .into_iter()
            .filter(|p| p.wood_type == wood_type)
            .collect()
    }

    /// Products with the given finish.
    fn products_by_finish(&self, finish: Finish) -> Vec<Arc<Product>> {
        self.list_products()
            .into_iter()
            .filter(|p| p.finish == finish)
            .collect()
    }

    /// Products in the given collection.
    fn products_by_collection(&self, collection: Collection) -> Vec<Arc<Product>> {
        self.list_products()
            .into_iter()
            .filter(|p| p.collection == collection)
            .collect()
    }
}

/// Catalog held entirely in memory.
///
/// Cheaply cloneable; clones share the same product records.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    products: Arc<[Arc<Product>]>,
    by_id: Arc<HashMap<ProductId, usize>>,
}

impl InMemoryCatalog {
    /// Build a catalog from product records, validating them.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if IDs repeat, a product has no images or a
    /// negative price, or a review rating is out of range.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(products.len());
        for (index, product) in products.iter().enumerate() {
            validate_product(product)?;
            if by_id.insert(product.id, index).is_some() {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }

        Ok(Self {
            products: products.into_iter().map(Arc::new).collect(),
            by_id: Arc::new(by_id),
        })
    }

    /// Parse and validate a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON, or a validation error.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::from_products(products)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, otherwise as
    /// [`Self::from_json_str`].
    #[instrument]
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::info!(products = catalog.len(), "Catalog loaded from file");
        Ok(catalog)
    }

    /// The catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled JSON fails validation.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json_str(BUNDLED_CATALOG)
    }

    /// Load the catalog named by the configuration, or the bundled one.
    ///
    /// # Errors
    ///
    /// Propagates loading and validation errors.
    pub fn load(config: &StorefrontConfig) -> Result<Self, CatalogError> {
        match &config.catalog_path {
            Some(path) => Self::from_path(path),
            None => Self::bundled(),
        }
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl CatalogStore for InMemoryCatalog {
    fn list_products(&self) -> Vec<Arc<Product>> {
        self.products.to_vec()
    }

    fn product_by_id(&self, id: ProductId) -> Option<Arc<Product>> {
        self.by_id
            .get(&id)
            .and_then(|&index| self.products.get(index))
            .cloned()
    }
}

fn validate_product(product: &Product) -> Result<(), CatalogError> {
    if product.images.is_empty() {
        return Err(CatalogError::NoImages(product.id));
    }
    if product.price.is_sign_negative() && !product.price.is_zero() {
        return Err(CatalogError::NegativePrice(product.id));
    }
    if product.price > MAX_PRICE {
        return Err(CatalogError::PriceTooLarge {
            product: product.id,
            max: MAX_PRICE,
        });
    }
    if let Some(review) = product
        .reviews
        .iter()
        .find(|r| !(Review::MIN_RATING..=Review::MAX_RATING).contains(&r.rating))
    {
        return Err(CatalogError::InvalidRating {
            product: product.id,
            rating: review.rating,
        });
    }
    Ok(())
}
