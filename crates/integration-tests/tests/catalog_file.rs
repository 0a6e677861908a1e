//! Integration tests for loading catalogs from JSON files.
//!
//! Run with: cargo test -p woodcraft-integration-tests

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use rust_decimal::Decimal;
use uuid::Uuid;
use woodcraft_core::{ProductId, WoodType};
use woodcraft_storefront::{
    CatalogError, CatalogStore, InMemoryCatalog, StorefrontConfig, StorefrontSession,
};

/// A JSON file in the temp directory, removed on drop.
struct TempCatalog {
    path: PathBuf,
}

impl TempCatalog {
    fn new(json: &str) -> Self {
        let path = std::env::temp_dir().join(format!("woodcraft-catalog-{}.json", Uuid::new_v4()));
        std::fs::write(&path, json).unwrap();
        Self { path }
    }
}

impl Drop for TempCatalog {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

const TWO_PRODUCTS: &str = r#"[
  {
    "id": 10,
    "name": "Ridge Side Table",
    "shortDescription": "Compact maple side table",
    "description": "A small table for a reading corner.",
    "price": "249.50",
    "images": ["https://images.example.com/ridge.jpeg"],
    "woodType": "Maple",
    "finish": "Oiled",
    "collection": "Minimalist",
    "dimensions": { "width": 45, "depth": 45, "height": 55 },
    "weight": 6,
    "inStock": true,
    "featured": true,
    "story": "Cut from a single board.",
    "reviews": []
  },
  {
    "id": 11,
    "name": "Ridge Bench",
    "shortDescription": "Maple entry bench",
    "description": "Seats two.",
    "price": "420",
    "images": ["https://images.example.com/bench.jpeg"],
    "woodType": "Maple",
    "finish": "Natural",
    "collection": "Farmhouse",
    "dimensions": { "width": 120, "depth": 35, "height": 46 },
    "weight": 14,
    "inStock": true,
    "featured": false,
    "story": "",
    "reviews": []
  }
]"#;

#[test]
fn test_session_uses_configured_catalog_file() {
    let file = TempCatalog::new(TWO_PRODUCTS);
    let path = file.path.display().to_string();
    let config = StorefrontConfig::from_lookup(|key| match key {
        "WOODCRAFT_CATALOG_PATH" => Some(path.clone()),
        _ => None,
    })
    .unwrap();

    let catalog = InMemoryCatalog::load(&config).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.products_by_wood_type(WoodType::Maple).len(), 2);
    assert_eq!(catalog.featured_products().len(), 1);

    let mut session = StorefrontSession::new(std::sync::Arc::new(catalog), config);
    session.add_to_cart_by_id(ProductId::new(10), 2).unwrap();
    assert_eq!(session.cart_total(), Decimal::new(49_900, 2));
    assert_eq!(session.filters().wood_type_options().len(), 1);
}

#[test]
fn test_missing_catalog_file() {
    let err = InMemoryCatalog::from_path(&std::env::temp_dir().join("woodcraft-missing.json"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
}

#[test]
fn test_duplicate_ids_rejected() {
    let json = TWO_PRODUCTS.replace("\"id\": 11", "\"id\": 10");
    let file = TempCatalog::new(&json);
    assert!(matches!(
        InMemoryCatalog::from_path(&file.path),
        Err(CatalogError::DuplicateId(id)) if id == ProductId::new(10)
    ));
}

#[test]
fn test_unknown_attribute_value_rejected() {
    let json = TWO_PRODUCTS.replace("\"woodType\": \"Maple\"", "\"woodType\": \"Teak\"");
    assert!(matches!(
        InMemoryCatalog::from_json_str(&json),
        Err(CatalogError::Parse(_))
    ));
}
