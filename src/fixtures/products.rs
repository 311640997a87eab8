//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Availability, Product, Provenance, Taxonomy},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Product records, in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// External product id
    pub id: String,

    /// Product name
    pub name: String,

    /// Product price (e.g., "2.49 USD")
    pub price: String,

    /// Sales unit (e.g., "bunch")
    pub unit: String,

    /// Image asset path
    #[serde(default)]
    pub image: String,

    /// Id of the farm the product belongs to
    pub farm: String,

    /// Average review rating
    #[serde(default)]
    pub rating: f32,

    /// Number of reviews behind the rating
    #[serde(default)]
    pub reviews: u32,

    /// Freshness score, 0-100
    #[serde(default)]
    pub freshness: Option<u8>,

    /// Stock and delivery availability
    #[serde(default)]
    pub availability: Availability,

    /// Growing provenance flags
    #[serde(default)]
    pub provenance: Provenance,

    /// Category id
    pub category: String,

    /// Subcategory id
    pub subcategory: String,

    /// Variety id
    pub variety: String,
}

impl ProductFixture {
    /// Convert the fixture into an id + product record, denormalizing the
    /// resolved farm name onto the product.
    ///
    /// # Errors
    ///
    /// Returns an error if the price string cannot be parsed.
    pub(crate) fn into_record(self, farm_name: String) -> Result<(String, Product), FixtureError> {
        let (minor_units, currency) = parse_price(&self.price)?;

        let product = Product {
            name: self.name,
            price: Money::from_minor(minor_units, currency),
            unit: self.unit,
            image: self.image,
            farm_id: self.farm,
            farm_name,
            rating: self.rating,
            review_count: self.reviews,
            freshness: self.freshness,
            availability: self.availability,
            provenance: self.provenance,
            taxonomy: Taxonomy {
                category: self.category,
                subcategory: self.subcategory,
                variety: self.variety,
            },
        };

        Ok((self.id, product))
    }
}

/// Parse price string (e.g., "2.49 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "USD" => USD,
        "GBP" => GBP,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}
