//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! woodcraft products --wood oak --finish natural
//! woodcraft products --featured
//! woodcraft product 4
//! woodcraft filters --json
//! ```

use std::sync::Arc;

use indexmap::IndexSet;
use serde::Serialize;
use woodcraft_core::{Collection, Finish, Price, Product, ProductId, WoodType};
use woodcraft_storefront::{FilterSelection, StorefrontError, StorefrontSession};

use super::{CliError, Output};

/// Filters given on the command line.
pub struct ProductQuery {
    pub wood_types: Vec<WoodType>,
    pub finishes: Vec<Finish>,
    pub collections: Vec<Collection>,
    pub featured: bool,
}

/// List products matching the query.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn products(
    session: &mut StorefrontSession,
    output: &Output,
    query: ProductQuery,
) -> Result<(), CliError> {
    let selection = FilterSelection::new()
        .with_wood_types(query.wood_types)
        .with_finishes(query.finishes)
        .with_collections(query.collections);
    let active: Vec<String> = selection.values().iter().map(ToString::to_string).collect();

    let mut products = session.apply_filters(selection);
    if query.featured {
        products.retain(|p| p.featured);
    }

    tracing::debug!(
        matches = products.len(),
        filters = active.len(),
        "Products filtered"
    );

    if output.is_json() {
        let records: Vec<&Product> = products.iter().map(Arc::as_ref).collect();
        return output.json(&records);
    }

    let currency = session.config().currency;
    let mut lines = Vec::with_capacity(products.len() + 2);
    if !active.is_empty() {
        lines.push(format!("Filters: {}", active.join(", ")));
    }
    lines.push(format!(
        "Showing {} of {} products",
        products.len(),
        session.filters().catalog().len()
    ));
    lines.extend(products.iter().map(|p| {
        format!(
            "{:>3}  {:<28} {:>10}  {} / {} / {}{}",
            p.id,
            p.name,
            p.price_in(currency).display(),
            p.wood_type,
            p.finish,
            p.collection,
            if p.in_stock { "" } else { "  (out of stock)" }
        )
    }));
    output.lines(lines)
}

/// Show the details of one product.
///
/// # Errors
///
/// Returns `StorefrontError::ProductNotFound` for unknown IDs, or an output
/// error.
pub fn product(session: &StorefrontSession, output: &Output, id: ProductId) -> Result<(), CliError> {
    let product = session
        .catalog()
        .product_by_id(id)
        .ok_or(StorefrontError::ProductNotFound(id))?;

    if output.is_json() {
        return output.json(&*product);
    }

    let price = Price::new(product.price, session.config().currency);
    let mut lines = vec![
        format!("{} ({})", product.name, price),
        product.short_description.clone(),
        String::new(),
        product.description.clone(),
        String::new(),
        format!("Wood:       {}", product.wood_type),
        format!("Finish:     {}", product.finish),
        format!("Collection: {}", product.collection),
        format!("Dimensions: {}", product.dimensions),
        format!("Weight:     {} kg", product.weight),
        format!(
            "Stock:      {}",
            if product.in_stock { "In stock" } else { "Out of stock" }
        ),
    ];
    if let Some(rating) = product.average_rating() {
        lines.push(format!(
            "Rating:     {}{} {rating:.1} ({})",
            "★".repeat(usize::from(product.rounded_rating())),
            "☆".repeat(usize::from(5 - product.rounded_rating().min(5))),
            product.review_count_label()
        ));
    }
    if !product.story.is_empty() {
        lines.push(String::new());
        lines.push(product.story.clone());
    }
    output.lines(lines)
}

#[derive(Serialize)]
struct FilterOptions {
    wood_types: IndexSet<WoodType>,
    finishes: IndexSet<Finish>,
    collections: IndexSet<Collection>,
}

/// List the values each filter can take, in catalog order.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn filters(session: &StorefrontSession, output: &Output) -> Result<(), CliError> {
    let filters = session.filters();
    let options = FilterOptions {
        wood_types: filters.wood_type_options(),
        finishes: filters.finish_options(),
        collections: filters.collection_options(),
    };

    if output.is_json() {
        return output.json(&options);
    }

    output.lines([
        format!("Wood:       {}", join(&options.wood_types)),
        format!("Finish:     {}", join(&options.finishes)),
        format!("Collection: {}", join(&options.collections)),
    ])
}

fn join<T: ToString>(values: &IndexSet<T>) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
