//! Cart
//!
//! The authoritative cart state for a storefront session. Every line is a
//! snapshot of the product at the time it was added, so later catalog changes
//! never alter what the shopper agreed to pay. Mutations on absent lines are
//! silent no-ops, and aggregate queries degrade to zero rather than
//! propagating arithmetic failures.

use rusty_money::{Money, MoneyError, iso::Currency};
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;
use tracing::warn;

use crate::{catalog::Catalog, products::Product};

pub mod groups;

new_key_type! {
    /// Cart Item Key
    pub struct CartItemKey;
}

/// Errors related to cart price aggregation.
#[derive(Debug, Error, PartialEq)]
pub enum CartTotalError {
    /// A line total overflowed minor-unit arithmetic.
    #[error("line total for product {product_id} overflowed")]
    Overflow {
        /// External id of the offending line's product.
        product_id: String,
    },

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Delivery cadence for a subscription line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Delivered every week.
    Weekly,

    /// Delivered every other week.
    Biweekly,

    /// Delivered once a month.
    Monthly,
}

/// Subscription metadata carried by a recurring cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Weekday id the delivery should arrive on (e.g. `saturday`).
    pub delivery_day: String,

    /// Delivery cadence.
    pub frequency: Frequency,
}

/// A cart line: a snapshot of a product and the quantity wanted.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    /// External id of the product this line was created from.
    pub product_id: String,

    /// Farm id captured when the line was created.
    pub farm_id: String,

    /// Farm display name captured when the line was created.
    pub farm_name: String,

    /// Product name snapshot.
    pub name: String,

    /// Unit price snapshot.
    pub price: Money<'static, Currency>,

    /// Image asset path snapshot.
    pub image: String,

    /// Sales unit snapshot.
    pub unit: String,

    /// Number of units; at least 1 for any stored line.
    pub quantity: u32,

    /// Subscription metadata, when the line is a recurring delivery.
    pub subscription: Option<Subscription>,
}

impl CartItem {
    fn from_product(product_id: &str, product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product_id.to_string(),
            farm_id: product.farm_id.clone(),
            farm_name: product.farm_name.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            unit: product.unit.clone(),
            quantity,
            subscription: None,
        }
    }

    /// Price of this line: unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns a `CartTotalError::Overflow` if the multiplication overflows
    /// minor-unit arithmetic.
    pub fn line_total(&self) -> Result<Money<'static, Currency>, CartTotalError> {
        let minor = self
            .price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
            .ok_or_else(|| CartTotalError::Overflow {
                product_id: self.product_id.clone(),
            })?;

        Ok(Money::from_minor(minor, self.price.currency()))
    }
}

/// Cart
#[derive(Debug)]
pub struct Cart {
    items: SlotMap<CartItemKey, CartItem>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart denominated in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: SlotMap::with_key(),
            currency,
        }
    }

    fn find_line(&self, product_id: &str, farm_id: &str) -> Option<CartItemKey> {
        self.items.iter().find_map(|(key, item)| {
            (item.product_id == product_id && item.farm_id == farm_id).then_some(key)
        })
    }

    /// Add `quantity` units of a product to the cart.
    ///
    /// A line matching the same product and farm has its quantity incremented
    /// instead of a duplicate line being created. A zero quantity is a no-op,
    /// as is a product priced in a different currency than the cart (logged,
    /// not surfaced).
    pub fn add_item(
        &mut self,
        product_id: &str,
        product: &Product,
        quantity: u32,
    ) -> Option<CartItemKey> {
        if quantity == 0 {
            return None;
        }

        if product.price.currency() != self.currency {
            warn!(product_id, "product currency does not match cart; skipped");
            return None;
        }

        if let Some(key) = self.find_line(product_id, &product.farm_id) {
            if let Some(line) = self.items.get_mut(key) {
                line.quantity = line.quantity.saturating_add(quantity);
            }

            return Some(key);
        }

        Some(
            self.items
                .insert(CartItem::from_product(product_id, product, quantity)),
        )
    }

    /// Add a recurring line to the cart.
    ///
    /// Merging follows the same product + farm rule as [`Cart::add_item`];
    /// when the merged-into line already carries subscription metadata, that
    /// metadata is kept and the supplied one is dropped.
    pub fn add_subscription_item(
        &mut self,
        product_id: &str,
        product: &Product,
        quantity: u32,
        subscription: Subscription,
    ) -> Option<CartItemKey> {
        let key = self.add_item(product_id, product, quantity)?;

        if let Some(line) = self.items.get_mut(key) {
            if line.subscription.is_none() {
                line.subscription = Some(subscription);
            }
        }

        Some(key)
    }

    /// Remove a line. Silent no-op when the key is absent.
    pub fn remove_item(&mut self, item: CartItemKey) {
        self.items.remove(item);
    }

    /// Replace a line's quantity. Zero removes the line; an absent key is a
    /// silent no-op.
    pub fn set_quantity(&mut self, item: CartItemKey, quantity: u32) {
        if quantity == 0 {
            self.items.remove(item);
            return;
        }

        if let Some(line) = self.items.get_mut(item) {
            line.quantity = quantity;
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Discard the current contents and add one unit of each given product id
    /// found in the catalog. Unknown ids are silently skipped.
    pub fn generate_magic_cart(&mut self, product_ids: &[String], catalog: &Catalog) {
        self.clear();

        for id in product_ids {
            let Some(product) = catalog.product_by_id(id) else {
                continue;
            };

            self.add_item(id, product, 1);
        }
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items
            .values()
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Calculate the cart total.
    ///
    /// # Errors
    ///
    /// Returns a `CartTotalError` if a line total overflows or money
    /// arithmetic fails.
    pub fn try_total_price(&self) -> Result<Money<'static, Currency>, CartTotalError> {
        self.items
            .values()
            .try_fold(Money::from_minor(0, self.currency), |acc, item| {
                acc.add(item.line_total()?).map_err(CartTotalError::from)
            })
    }

    /// The cart total, degrading to zero in the cart currency if the
    /// computation fails. The failure is logged, never surfaced.
    #[must_use]
    pub fn total_price(&self) -> Money<'static, Currency> {
        match self.try_total_price() {
            Ok(total) => total,
            Err(error) => {
                warn!("cart total fell back to zero: {error}");
                Money::from_minor(0, self.currency)
            }
        }
    }

    /// Get a line by key.
    #[must_use]
    pub fn get(&self, item: CartItemKey) -> Option<&CartItem> {
        self.items.get(item)
    }

    /// Iterate over lines with their keys.
    pub fn iter(&self) -> impl Iterator<Item = (CartItemKey, &CartItem)> {
        self.items.iter()
    }

    /// Iterate over lines.
    pub fn items(&self) -> impl Iterator<Item = &CartItem> {
        self.items.values()
    }

    /// Get the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Reinsert previously persisted lines. Records with a zero quantity or a
    /// foreign currency are dropped rather than rejected.
    pub(crate) fn restore(&mut self, items: impl IntoIterator<Item = CartItem>) {
        for item in items {
            if item.quantity == 0 || item.price.currency() != self.currency {
                continue;
            }

            self.items.insert(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{GBP, USD},
    };
    use testresult::TestResult;

    use crate::products::{Availability, Provenance, Taxonomy};

    use super::*;

    fn product(farm_id: &str, price_minor: i64) -> Product {
        Product {
            name: "Rainbow Carrots".to_string(),
            price: Money::from_minor(price_minor, USD),
            unit: "bunch".to_string(),
            image: "carrots.webp".to_string(),
            farm_id: farm_id.to_string(),
            farm_name: format!("{farm_id} farm"),
            rating: 4.5,
            review_count: 42,
            freshness: Some(90),
            availability: Availability::default(),
            provenance: Provenance::default(),
            taxonomy: Taxonomy {
                category: "vegetables".to_string(),
                subcategory: "root-vegetables".to_string(),
                variety: "rainbow-carrots".to_string(),
            },
        }
    }

    fn subscription() -> Subscription {
        Subscription {
            delivery_day: "saturday".to_string(),
            frequency: Frequency::Weekly,
        }
    }

    #[test]
    fn adding_same_product_and_farm_merges_quantities() {
        let mut cart = Cart::new(USD);
        let carrots = product("greenhollow", 240);

        let first = cart.add_item("p-carrot", &carrots, 1);
        let second = cart.add_item("p-carrot", &carrots, 2);

        assert_eq!(first, second);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn same_product_from_another_farm_stays_a_separate_line() {
        let mut cart = Cart::new(USD);

        cart.add_item("p-carrot", &product("greenhollow", 240), 1);
        cart.add_item("p-carrot", &product("millbrook", 220), 1);

        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn zero_quantity_add_is_a_no_op() {
        let mut cart = Cart::new(USD);

        let key = cart.add_item("p-carrot", &product("greenhollow", 240), 0);

        assert!(key.is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn foreign_currency_add_is_skipped() {
        let mut cart = Cart::new(USD);
        let mut imported = product("greenhollow", 240);
        imported.price = Money::from_minor(240, GBP);

        let key = cart.add_item("p-import", &imported, 1);

        assert!(key.is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_replaces_rather_than_increments() -> TestResult {
        let mut cart = Cart::new(USD);

        let key = cart
            .add_item("p-carrot", &product("greenhollow", 240), 5)
            .ok_or_else(|| "expected a cart line".to_string())?;

        cart.set_quantity(key, 2);

        assert_eq!(cart.get(key).map(|line| line.quantity), Some(2));
        assert_eq!(cart.total_items(), 2);

        Ok(())
    }

    #[test]
    fn set_quantity_zero_removes_the_line() -> TestResult {
        let mut cart = Cart::new(USD);

        let key = cart
            .add_item("p-carrot", &product("greenhollow", 240), 5)
            .ok_or_else(|| "expected a cart line".to_string())?;

        cart.set_quantity(key, 0);

        assert!(cart.get(key).is_none());
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn mutations_on_absent_keys_are_silent() -> TestResult {
        let mut cart = Cart::new(USD);

        let key = cart
            .add_item("p-carrot", &product("greenhollow", 240), 1)
            .ok_or_else(|| "expected a cart line".to_string())?;

        cart.remove_item(key);
        cart.remove_item(key);
        cart.set_quantity(key, 3);

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn total_price_is_sum_of_line_totals() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add_item("p-carrot", &product("greenhollow", 240), 2);
        cart.add_item("p-beet", &product("millbrook", 310), 1);

        assert_eq!(cart.try_total_price()?, Money::from_minor(790, USD));
        assert_eq!(cart.total_price(), Money::from_minor(790, USD));

        Ok(())
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let cart = Cart::new(USD);

        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Money::from_minor(0, USD));
    }

    #[test]
    fn overflowing_total_falls_back_to_zero() -> TestResult {
        let mut cart = Cart::new(USD);

        let key = cart
            .add_item("p-carrot", &product("greenhollow", i64::MAX), 1)
            .ok_or_else(|| "expected a cart line".to_string())?;

        cart.set_quantity(key, u32::MAX);

        assert!(matches!(
            cart.try_total_price(),
            Err(CartTotalError::Overflow { .. })
        ));
        assert_eq!(cart.total_price(), Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn generate_magic_cart_replaces_existing_contents() -> TestResult {
        let mut catalog = Catalog::new();
        let carrots = product("greenhollow", 240);
        let beets = product("millbrook", 310);

        catalog.insert_product("p-carrot", carrots.clone())?;
        catalog.insert_product("p-beet", beets)?;

        let mut cart = Cart::new(USD);
        cart.add_item("p-old", &carrots, 7);

        cart.generate_magic_cart(
            &[
                "p-carrot".to_string(),
                "p-missing".to_string(),
                "p-beet".to_string(),
            ],
            &catalog,
        );

        assert_eq!(cart.len(), 2);
        assert!(cart.items().all(|line| line.quantity == 1));
        assert!(cart.items().any(|line| line.product_id == "p-carrot"));
        assert!(cart.items().any(|line| line.product_id == "p-beet"));
        assert!(!cart.items().any(|line| line.product_id == "p-old"));

        Ok(())
    }

    #[test]
    fn subscription_merge_keeps_the_first_metadata() -> TestResult {
        let mut cart = Cart::new(USD);
        let carrots = product("greenhollow", 240);

        cart.add_subscription_item("p-carrot", &carrots, 1, subscription());

        let later = Subscription {
            delivery_day: "tuesday".to_string(),
            frequency: Frequency::Monthly,
        };
        let key = cart
            .add_subscription_item("p-carrot", &carrots, 1, later)
            .ok_or_else(|| "expected a cart line".to_string())?;

        let line = cart.get(key).ok_or_else(|| "expected the merged line".to_string())?;

        assert_eq!(line.quantity, 2);
        assert_eq!(line.subscription, Some(subscription()));

        Ok(())
    }

    #[test]
    fn subscription_attaches_to_an_existing_plain_line() -> TestResult {
        let mut cart = Cart::new(USD);
        let carrots = product("greenhollow", 240);

        cart.add_item("p-carrot", &carrots, 1);

        let key = cart
            .add_subscription_item("p-carrot", &carrots, 1, subscription())
            .ok_or_else(|| "expected a cart line".to_string())?;

        let line = cart.get(key).ok_or_else(|| "expected the merged line".to_string())?;

        assert_eq!(line.quantity, 2);
        assert_eq!(line.subscription, Some(subscription()));

        Ok(())
    }

    #[test]
    fn restore_drops_zero_quantity_and_foreign_records() {
        let mut cart = Cart::new(USD);
        let good = CartItem::from_product("p-carrot", &product("greenhollow", 240), 2);

        let mut empty = good.clone();
        empty.quantity = 0;

        let mut foreign = good.clone();
        foreign.price = Money::from_minor(240, GBP);

        cart.restore([good, empty, foreign]);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 2);
    }
}
