//! Orders
//!
//! Append-only order history. An order is an immutable snapshot of the cart
//! taken at checkout; it never changes once recorded.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use uuid::Uuid;

use crate::cart::{Cart, CartItem};

/// A placed order.
#[derive(Debug, Clone)]
pub struct Order {
    /// Locally generated order id.
    pub uuid: Uuid,

    /// When the order was placed.
    pub placed_at: Timestamp,

    /// Order total at checkout.
    pub total: Money<'static, Currency>,

    /// Line snapshots at checkout.
    pub items: Vec<CartItem>,
}

impl Order {
    /// Snapshot the given cart. Returns `None` for an empty cart.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Option<Self> {
        if cart.is_empty() {
            return None;
        }

        Some(Self {
            uuid: Uuid::now_v7(),
            placed_at: Timestamp::now(),
            total: cart.total_price(),
            items: cart.items().cloned().collect(),
        })
    }
}

/// Order Book
#[derive(Debug, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    /// Create an empty order book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a placed order.
    pub fn record(&mut self, order: Order) {
        self.orders.push(order);
    }

    /// The most recently placed order.
    #[must_use]
    pub fn latest(&self) -> Option<&Order> {
        self.orders.last()
    }

    /// Iterate over orders, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Get the number of recorded orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if no order has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Reinsert previously persisted orders, oldest first.
    pub(crate) fn restore(&mut self, orders: impl IntoIterator<Item = Order>) {
        self.orders.extend(orders);
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::products::{Availability, Product, Provenance, Taxonomy};

    use super::*;

    fn product() -> Product {
        Product {
            name: "Rainbow Carrots".to_string(),
            price: Money::from_minor(240, USD),
            unit: "bunch".to_string(),
            image: String::new(),
            farm_id: "greenhollow".to_string(),
            farm_name: "Green Hollow Farm".to_string(),
            rating: 4.5,
            review_count: 12,
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

    #[test]
    fn snapshot_of_empty_cart_is_none() {
        let cart = Cart::new(USD);

        assert!(Order::from_cart(&cart).is_none());
    }

    #[test]
    fn snapshot_captures_items_and_total() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add_item("p-carrot", &product(), 3);

        let order = Order::from_cart(&cart).ok_or_else(|| "expected an order".to_string())?;

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total, Money::from_minor(720, USD));

        Ok(())
    }

    #[test]
    fn latest_returns_the_most_recent_order() -> TestResult {
        let mut cart = Cart::new(USD);
        let mut book = OrderBook::new();

        cart.add_item("p-carrot", &product(), 1);
        let first = Order::from_cart(&cart).ok_or_else(|| "expected an order".to_string())?;

        cart.add_item("p-carrot", &product(), 1);
        let second = Order::from_cart(&cart).ok_or_else(|| "expected an order".to_string())?;
        let second_uuid = second.uuid;

        book.record(first);
        book.record(second);

        assert_eq!(book.len(), 2);
        assert_eq!(book.latest().map(|order| order.uuid), Some(second_uuid));

        Ok(())
    }
}
