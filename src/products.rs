//! Products

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Whether and how a product can be bought right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Availability {
    /// The product can currently be added to a cart.
    pub in_stock: bool,

    /// The product qualifies for instant delivery.
    pub instant_delivery: bool,
}

impl Default for Availability {
    fn default() -> Self {
        Self {
            in_stock: true,
            instant_delivery: false,
        }
    }
}

/// How the product was grown and where it is in its season.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Provenance {
    /// Certified organic.
    pub organic: bool,

    /// Currently in season.
    pub in_season: bool,

    /// Sold before picking; delivered once harvested.
    pub pre_harvest: bool,
}

/// Catalog classification for a product, from broadest to most specific.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    /// Category id (e.g. `vegetables`).
    pub category: String,

    /// Subcategory id (e.g. `root-vegetables`).
    pub subcategory: String,

    /// Variety id, the most specific level (e.g. `rainbow-carrots`).
    pub variety: String,
}

/// Product
///
/// Immutable reference data within a session, owned by the catalog. Farm id
/// and name are denormalized onto the product so cart lines can snapshot them
/// without a second lookup.
#[derive(Debug, Clone)]
pub struct Product {
    /// Product name
    pub name: String,

    /// Product price
    pub price: Money<'static, Currency>,

    /// Sales unit (e.g. "bunch", "500g")
    pub unit: String,

    /// Image asset path
    pub image: String,

    /// Id of the farm that grows this product
    pub farm_id: String,

    /// Display name of the farm that grows this product
    pub farm_name: String,

    /// Average review rating
    pub rating: f32,

    /// Number of reviews behind the rating
    pub review_count: u32,

    /// Freshness score from 0 to 100, when known
    pub freshness: Option<u8>,

    /// Stock and delivery availability
    pub availability: Availability,

    /// Growing provenance flags
    pub provenance: Provenance,

    /// Category / subcategory / variety classification
    pub taxonomy: Taxonomy,
}
