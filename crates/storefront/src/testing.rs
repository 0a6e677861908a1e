//! Product fixtures shared by unit tests.

use std::sync::Arc;

use rust_decimal::Decimal;
use url::Url;
use woodcraft_core::{Collection, Dimensions, Finish, Product, ProductId, WoodType};

/// An in-stock product with the given attributes and a whole-dollar price.
#[allow(clippy::unwrap_used)]
pub fn product(
    id: i32,
    price: i64,
    wood_type: WoodType,
    finish: Finish,
    collection: Collection,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("{wood_type} {collection} piece #{id}"),
        short_description: format!("{finish} {wood_type}"),
        description: "Handcrafted in our workshop.".to_string(),
        price: Decimal::from(price),
        images: vec![Url::parse(&format!("https://images.example.com/{id}.jpeg")).unwrap()],
        wood_type,
        finish,
        collection,
        dimensions: Dimensions {
            width: 100,
            depth: 50,
            height: 75,
        },
        weight: 20,
        in_stock: true,
        featured: false,
        story: String::new(),
        crafting_video: None,
        reviews: Vec::new(),
    }
}

/// A shared oak product with only ID and price mattering.
pub fn priced(id: i32, price: i64) -> Arc<Product> {
    Arc::new(product(
        id,
        price,
        WoodType::Oak,
        Finish::Natural,
        Collection::Modern,
    ))
}
