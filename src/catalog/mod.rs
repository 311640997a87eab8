//! Catalog
//!
//! Holds product and farm reference data for a session. Collaborators hand
//! the catalog arrays of records; the catalog stores them verbatim and keys
//! them for in-process lookups. External string ids map to slot keys, and
//! every lookup by an absent id yields `None` rather than an error.

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::{SecondaryMap, SlotMap};
use thiserror::Error;

use crate::{
    farms::{Farm, FarmKey},
    products::{Product, ProductKey},
};

pub mod filter;

/// Errors related to catalog population.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A product's currency differs from the catalog currency (product id, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// Catalog
#[derive(Debug, Default)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,
    product_keys: FxHashMap<String, ProductKey>,
    product_ids: SecondaryMap<ProductKey, String>,
    farms: SlotMap<FarmKey, Farm>,
    farm_keys: FxHashMap<String, FarmKey>,
    currency: Option<&'static Currency>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a product under its external id, replacing any product already
    /// stored under that id.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError::CurrencyMismatch` if the product's currency
    /// differs from the currency established by earlier inserts.
    pub fn insert_product(
        &mut self,
        id: impl Into<String>,
        product: Product,
    ) -> Result<ProductKey, CatalogError> {
        let id = id.into();
        let currency = product.price.currency();

        if let Some(existing) = self.currency {
            if existing != currency {
                return Err(CatalogError::CurrencyMismatch(
                    id,
                    currency.iso_alpha_code,
                    existing.iso_alpha_code,
                ));
            }
        } else {
            self.currency = Some(currency);
        }

        if let Some(&key) = self.product_keys.get(&id) {
            if let Some(slot) = self.products.get_mut(key) {
                *slot = product;
            }

            return Ok(key);
        }

        let key = self.products.insert(product);

        self.product_ids.insert(key, id.clone());
        self.product_keys.insert(id, key);

        Ok(key)
    }

    /// Replace the whole product list with the supplied records.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError::CurrencyMismatch` if the records mix currencies.
    pub fn replace_products(
        &mut self,
        products: impl IntoIterator<Item = (String, Product)>,
    ) -> Result<(), CatalogError> {
        self.products.clear();
        self.product_keys.clear();
        self.product_ids.clear();
        self.currency = None;

        for (id, product) in products {
            self.insert_product(id, product)?;
        }

        Ok(())
    }

    /// Insert a farm under its external id, replacing any farm already stored
    /// under that id.
    pub fn insert_farm(&mut self, id: impl Into<String>, farm: Farm) -> FarmKey {
        let id = id.into();

        if let Some(&key) = self.farm_keys.get(&id) {
            if let Some(slot) = self.farms.get_mut(key) {
                *slot = farm;
            }

            return key;
        }

        let key = self.farms.insert(farm);

        self.farm_keys.insert(id, key);

        key
    }

    /// Replace the whole farm list with the supplied records.
    pub fn replace_farms(&mut self, farms: impl IntoIterator<Item = (String, Farm)>) {
        self.farms.clear();
        self.farm_keys.clear();

        for (id, farm) in farms {
            self.insert_farm(id, farm);
        }
    }

    /// Get a product by key.
    #[must_use]
    pub fn product(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    /// Get a product by its external id.
    #[must_use]
    pub fn product_by_id(&self, id: &str) -> Option<&Product> {
        self.product_keys
            .get(id)
            .and_then(|key| self.products.get(*key))
    }

    /// Look up the key for an external product id.
    #[must_use]
    pub fn product_key(&self, id: &str) -> Option<ProductKey> {
        self.product_keys.get(id).copied()
    }

    /// Look up the external id for a product key.
    #[must_use]
    pub fn product_id(&self, key: ProductKey) -> Option<&str> {
        self.product_ids.get(key).map(String::as_str)
    }

    /// Iterate over products in insertion order.
    pub fn products(&self) -> impl Iterator<Item = (ProductKey, &Product)> {
        self.products.iter()
    }

    /// Get a farm by key.
    #[must_use]
    pub fn farm(&self, key: FarmKey) -> Option<&Farm> {
        self.farms.get(key)
    }

    /// Get a farm by its external id.
    #[must_use]
    pub fn farm_by_id(&self, id: &str) -> Option<&Farm> {
        self.farm_keys.get(id).and_then(|key| self.farms.get(*key))
    }

    /// Iterate over farms in insertion order.
    pub fn farms(&self) -> impl Iterator<Item = (FarmKey, &Farm)> {
        self.farms.iter()
    }

    /// Currency established by the loaded products, if any are loaded.
    #[must_use]
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }

    /// Get the number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
