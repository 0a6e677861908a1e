//! Filter engine: narrows the catalog by wood type, finish and collection.
//!
//! A [`FilterSelection`] holds one set per [`Dimension`]. An empty set places
//! no restriction on its dimension; non-empty sets are combined with AND.
//! Filtering never reorders products.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use woodcraft_core::{AttributeParseError, Collection, Finish, Product, WoodType};

use crate::catalog::CatalogStore;

/// A filterable attribute axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    WoodType,
    Finish,
    Collection,
}

impl Dimension {
    /// Every dimension, in the order the filter panel shows them.
    pub const ALL: [Self; 3] = [Self::WoodType, Self::Finish, Self::Collection];

    /// Short label used on active filter tags.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::WoodType => "Wood",
            Self::Finish => "Finish",
            Self::Collection => "Collection",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single value on one dimension, e.g. `Wood: Oak`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "dimension", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    WoodType(WoodType),
    Finish(Finish),
    Collection(Collection),
}

impl FilterValue {
    /// Parse a value on a given dimension.
    ///
    /// # Errors
    ///
    /// Returns `AttributeParseError` if `value` is not in the dimension's domain.
    pub fn parse(dimension: Dimension, value: &str) -> Result<Self, AttributeParseError> {
        Ok(match dimension {
            Dimension::WoodType => Self::WoodType(value.parse()?),
            Dimension::Finish => Self::Finish(value.parse()?),
            Dimension::Collection => Self::Collection(value.parse()?),
        })
    }

    #[must_use]
    pub const fn dimension(&self) -> Dimension {
        match self {
            Self::WoodType(_) => Dimension::WoodType,
            Self::Finish(_) => Dimension::Finish,
            Self::Collection(_) => Dimension::Collection,
        }
    }

    /// Whether the product carries this value.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::WoodType(wood_type) => product.wood_type == *wood_type,
            Self::Finish(finish) => product.finish == *finish,
            Self::Collection(collection) => product.collection == *collection,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WoodType(v) => write!(f, "{}: {v}", self.dimension()),
            Self::Finish(v) => write!(f, "{}: {v}", self.dimension()),
            Self::Collection(v) => write!(f, "{}: {v}", self.dimension()),
        }
    }
}

/// The values a shopper has chosen, one set per dimension.
///
/// Sets remember selection order so active filter tags render in the order
/// they were picked. `==` ignores that order; [`Self::identical_to`] does not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub wood_types: IndexSet<WoodType>,
    #[serde(default)]
    pub finishes: IndexSet<Finish>,
    #[serde(default)]
    pub collections: IndexSet<Collection>,
}

impl FilterSelection {
    /// A selection that restricts nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_wood_types(mut self, values: impl IntoIterator<Item = WoodType>) -> Self {
        self.wood_types.extend(values);
        self
    }

    #[must_use]
    pub fn with_finishes(mut self, values: impl IntoIterator<Item = Finish>) -> Self {
        self.finishes.extend(values);
        self
    }

    #[must_use]
    pub fn with_collections(mut self, values: impl IntoIterator<Item = Collection>) -> Self {
        self.collections.extend(values);
        self
    }

    /// Whether no dimension is restricted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wood_types.is_empty() && self.finishes.is_empty() && self.collections.is_empty()
    }

    /// Total number of selected values across all dimensions.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.wood_types.len() + self.finishes.len() + self.collections.len()
    }

    #[must_use]
    pub fn contains(&self, value: FilterValue) -> bool {
        match value {
            FilterValue::WoodType(v) => self.wood_types.contains(&v),
            FilterValue::Finish(v) => self.finishes.contains(&v),
            FilterValue::Collection(v) => self.collections.contains(&v),
        }
    }

    /// Add a value. Returns `false` if it was already selected.
    pub fn insert(&mut self, value: FilterValue) -> bool {
        match value {
            FilterValue::WoodType(v) => self.wood_types.insert(v),
            FilterValue::Finish(v) => self.finishes.insert(v),
            FilterValue::Collection(v) => self.collections.insert(v),
        }
    }

    /// Remove a value. Returns `false` if it was not selected.
    pub fn remove(&mut self, value: FilterValue) -> bool {
        match value {
            FilterValue::WoodType(v) => self.wood_types.shift_remove(&v),
            FilterValue::Finish(v) => self.finishes.shift_remove(&v),
            FilterValue::Collection(v) => self.collections.shift_remove(&v),
        }
    }

    /// Select the value if unselected, unselect it otherwise.
    ///
    /// Returns whether the value is selected afterwards.
    pub fn toggle(&mut self, value: FilterValue) -> bool {
        if self.remove(value) {
            false
        } else {
            self.insert(value)
        }
    }

    /// Empty every dimension.
    pub fn clear(&mut self) {
        self.wood_types.clear();
        self.finishes.clear();
        self.collections.clear();
    }

    /// Whether the product satisfies every restricted dimension.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        (self.wood_types.is_empty() || self.wood_types.contains(&product.wood_type))
            && (self.finishes.is_empty() || self.finishes.contains(&product.finish))
            && (self.collections.is_empty() || self.collections.contains(&product.collection))
    }

    /// Same values picked in the same order in every dimension.
    #[must_use]
    pub fn identical_to(&self, other: &Self) -> bool {
        self.wood_types.iter().eq(&other.wood_types)
            && self.finishes.iter().eq(&other.finishes)
            && self.collections.iter().eq(&other.collections)
    }

    /// Selected values as tags: wood types, then finishes, then collections,
    /// each in selection order.
    #[must_use]
    pub fn values(&self) -> Vec<FilterValue> {
        self.wood_types
            .iter()
            .copied()
            .map(FilterValue::WoodType)
            .chain(self.finishes.iter().copied().map(FilterValue::Finish))
            .chain(self.collections.iter().copied().map(FilterValue::Collection))
            .collect()
    }
}

/// Products matching `selection`, in catalog order.
#[must_use]
pub fn filter_products(catalog: &[Arc<Product>], selection: &FilterSelection) -> Vec<Arc<Product>> {
    catalog
        .iter()
        .filter(|product| selection.matches(product))
        .cloned()
        .collect()
}

/// Wood types used by at least one product, in first-appearance order.
#[must_use]
pub fn distinct_wood_types(products: &[Arc<Product>]) -> IndexSet<WoodType> {
    products.iter().map(|p| p.wood_type).collect()
}

/// Finishes used by at least one product, in first-appearance order.
#[must_use]
pub fn distinct_finishes(products: &[Arc<Product>]) -> IndexSet<Finish> {
    products.iter().map(|p| p.finish).collect()
}

/// Collections used by at least one product, in first-appearance order.
#[must_use]
pub fn distinct_collections(products: &[Arc<Product>]) -> IndexSet<Collection> {
    products.iter().map(|p| p.collection).collect()
}

/// Filter state for one product listing.
///
/// The displayed subset is recomputed from the catalog and the current
/// selection on every read.
#[derive(Debug)]
pub struct FilterEngine {
    catalog: Vec<Arc<Product>>,
    selection: FilterSelection,
    updates: watch::Sender<FilterSelection>,
}

impl FilterEngine {
    /// Create an engine over a fixed list of products with no filters active.
    #[must_use]
    pub fn new(catalog: Vec<Arc<Product>>) -> Self {
        Self {
            catalog,
            selection: FilterSelection::default(),
            updates: watch::Sender::new(FilterSelection::default()),
        }
    }

    /// Create an engine over every product in a store.
    #[must_use]
    pub fn from_store<C>(store: &C) -> Self
    where
        C: CatalogStore + ?Sized,
    {
        Self::new(store.list_products())
    }

    /// Replace the selection and return the matching products.
    ///
    /// Re-applying the same values in a new order updates the tag order.
    pub fn apply_filters(&mut self, selection: FilterSelection) -> Vec<Arc<Product>> {
        if !selection.identical_to(&self.selection) {
            tracing::debug!(active = selection.active_count(), "Filters applied");
            self.selection = selection;
            self.publish();
        }
        self.filtered_products()
    }

    /// Drop every filter and return the full catalog.
    pub fn clear_filters(&mut self) -> Vec<Arc<Product>> {
        self.apply_filters(FilterSelection::default())
    }

    /// Dismiss one active filter tag and re-apply.
    pub fn remove_filter_value(&mut self, value: FilterValue) -> Vec<Arc<Product>> {
        let mut selection = self.selection.clone();
        selection.remove(value);
        self.apply_filters(selection)
    }

    /// Products matching the current selection, in catalog order.
    #[must_use]
    pub fn filtered_products(&self) -> Vec<Arc<Product>> {
        filter_products(&self.catalog, &self.selection)
    }

    #[must_use]
    pub const fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Active filter tags, see [`FilterSelection::values`].
    #[must_use]
    pub fn active_filters(&self) -> Vec<FilterValue> {
        self.selection.values()
    }

    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        self.selection.active_count()
    }

    /// The unfiltered product list.
    #[must_use]
    pub fn catalog(&self) -> &[Arc<Product>] {
        &self.catalog
    }

    /// Wood types offered in the filter panel.
    #[must_use]
    pub fn wood_type_options(&self) -> IndexSet<WoodType> {
        distinct_wood_types(&self.catalog)
    }

    /// Finishes offered in the filter panel.
    #[must_use]
    pub fn finish_options(&self) -> IndexSet<Finish> {
        distinct_finishes(&self.catalog)
    }

    /// Collections offered in the filter panel.
    #[must_use]
    pub fn collection_options(&self) -> IndexSet<Collection> {
        distinct_collections(&self.catalog)
    }

    /// Receive the selection after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FilterSelection> {
        self.updates.subscribe()
    }

    fn publish(&self) {
        self.updates.send_replace(self.selection.clone());
    }
}
