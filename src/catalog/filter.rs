//! Catalog Filtering
//!
//! A three-level category → subcategory → variety drill-down. Setting a level
//! always clears the levels below it, and resolution is a pure function over
//! the catalog: the filtered list always reflects the most specific level
//! currently set, falling back to broader levels and finally the full
//! catalog. Unknown ids are not errors; they simply match nothing.

use crate::{
    catalog::Catalog,
    products::{Product, ProductKey},
};

/// The user's current drill-down selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    category: Option<String>,
    subcategory: Option<String>,
    variety: Option<String>,
}

impl FilterState {
    /// Create an unfiltered state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the category. Clears subcategory and variety.
    pub fn select_category(&mut self, category: Option<String>) {
        self.category = category;
        self.subcategory = None;
        self.variety = None;
    }

    /// Set or clear the subcategory. Clears variety.
    pub fn select_subcategory(&mut self, subcategory: Option<String>) {
        self.subcategory = subcategory;
        self.variety = None;
    }

    /// Set or clear the variety.
    pub fn select_variety(&mut self, variety: Option<String>) {
        self.variety = variety;
    }

    /// Currently selected category id.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Currently selected subcategory id.
    #[must_use]
    pub fn subcategory(&self) -> Option<&str> {
        self.subcategory.as_deref()
    }

    /// Currently selected variety id.
    #[must_use]
    pub fn variety(&self) -> Option<&str> {
        self.variety.as_deref()
    }

    fn matches(&self, product: &Product) -> bool {
        if let Some(variety) = &self.variety {
            product.taxonomy.variety == *variety
        } else if let Some(subcategory) = &self.subcategory {
            product.taxonomy.subcategory == *subcategory
        } else if let Some(category) = &self.category {
            product.taxonomy.category == *category
        } else {
            true
        }
    }

    /// Resolve the filtered product list for the current selection.
    ///
    /// Pure and recomputed on every call; the result is the catalog subset
    /// matching the most specific non-empty level, in catalog order.
    #[must_use]
    pub fn resolve(&self, catalog: &Catalog) -> Vec<ProductKey> {
        catalog
            .products()
            .filter(|(_, product)| self.matches(product))
            .map(|(key, _)| key)
            .collect()
    }
}
