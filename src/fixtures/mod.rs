//! Fixtures
//!
//! YAML-backed reference data: farms and products loaded into a catalog.
//! Fixture sets stand in for the remote catalog source during development
//! and tests.

use std::{fs, path::PathBuf};

use thiserror::Error;

use crate::catalog::{Catalog, CatalogError};

pub mod farms;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Farm referenced by a product is not loaded
    #[error("Farm not found: {0}")]
    FarmNotFound(String),

    /// The catalog rejected a record
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Fixture
///
/// Loads farm and product fixture files from a base path into a catalog.
/// Farms must be loaded before the products that reference them.
#[derive(Debug)]
pub struct Fixture {
    base_path: PathBuf,
    catalog: Catalog,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::new(),
        }
    }

    /// Load farms from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_farms(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("farms").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: farms::FarmsFixture = serde_norway::from_str(&contents)?;

        for farm_fixture in fixture.farms {
            let (id, farm) = farm_fixture.into_record();

            self.catalog.insert_farm(id, farm);
        }

        Ok(self)
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a product
    /// references an unloaded farm, or if the records mix currencies.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: products::ProductsFixture = serde_norway::from_str(&contents)?;

        for product_fixture in fixture.products {
            let farm_name = self
                .catalog
                .farm_by_id(&product_fixture.farm)
                .map(|farm| farm.name.clone())
                .ok_or_else(|| FixtureError::FarmNotFound(product_fixture.farm.clone()))?;

            let (id, product) = product_fixture.into_record(farm_name)?;

            self.catalog.insert_product(id, product)?;
        }

        Ok(self)
    }

    /// Load a complete fixture set (farms and products with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if either fixture file cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_farms(name)?.load_products(name)?;

        Ok(fixture)
    }

    /// The catalog loaded so far.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Consume the fixture, keeping the loaded catalog.
    #[must_use]
    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
