//! State Records
//!
//! Serialized shapes for the persisted blobs, decoupled from the in-memory
//! domain types: prices travel as minor units and are rebound to the session
//! currency on restore.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    cart::{Cart, CartItem, Subscription},
    orders::{Order, OrderBook},
};

/// Persisted cart blob: `{ "items": [...] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Persisted cart lines.
    pub items: Vec<CartItemRecord>,
}

impl CartSnapshot {
    /// Snapshot the in-memory cart.
    #[must_use]
    pub fn of(cart: &Cart) -> Self {
        Self {
            items: cart.items().map(CartItemRecord::from).collect(),
        }
    }

    /// Rebuild cart lines, binding prices to the given currency.
    #[must_use]
    pub fn into_items(self, currency: &'static Currency) -> Vec<CartItem> {
        self.items
            .into_iter()
            .map(|record| record.into_item(currency))
            .collect()
    }
}

/// Persisted cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemRecord {
    /// External id of the product the line was created from.
    pub product_id: String,

    /// Farm id snapshot.
    pub farm_id: String,

    /// Farm display name snapshot.
    pub farm_name: String,

    /// Product name snapshot.
    pub name: String,

    /// Unit price in minor units.
    pub price_minor: i64,

    /// Image asset path snapshot.
    pub image: String,

    /// Sales unit snapshot.
    pub unit: String,

    /// Number of units.
    pub quantity: u32,

    /// Subscription metadata, when the line is a recurring delivery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Subscription>,
}

impl From<&CartItem> for CartItemRecord {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            farm_id: item.farm_id.clone(),
            farm_name: item.farm_name.clone(),
            name: item.name.clone(),
            price_minor: item.price.to_minor_units(),
            image: item.image.clone(),
            unit: item.unit.clone(),
            quantity: item.quantity,
            subscription: item.subscription.clone(),
        }
    }
}

impl CartItemRecord {
    fn into_item(self, currency: &'static Currency) -> CartItem {
        CartItem {
            product_id: self.product_id,
            farm_id: self.farm_id,
            farm_name: self.farm_name,
            name: self.name,
            price: Money::from_minor(self.price_minor, currency),
            image: self.image,
            unit: self.unit,
            quantity: self.quantity,
            subscription: self.subscription,
        }
    }
}

/// Persisted order-history blob: `{ "orders": [...] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OrdersSnapshot {
    /// Persisted orders, oldest first.
    pub orders: Vec<OrderRecord>,
}

impl OrdersSnapshot {
    /// Snapshot the in-memory order book.
    #[must_use]
    pub fn of(orders: &OrderBook) -> Self {
        Self {
            orders: orders.iter().map(OrderRecord::from).collect(),
        }
    }

    /// Rebuild orders, binding prices to the given currency.
    #[must_use]
    pub fn into_orders(self, currency: &'static Currency) -> Vec<Order> {
        self.orders
            .into_iter()
            .map(|record| record.into_order(currency))
            .collect()
    }
}

/// Persisted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Order id.
    pub uuid: Uuid,

    /// When the order was placed.
    pub placed_at: Timestamp,

    /// Order total in minor units.
    pub total_minor: i64,

    /// Persisted line snapshots.
    pub items: Vec<CartItemRecord>,
}

impl From<&Order> for OrderRecord {
    fn from(order: &Order) -> Self {
        Self {
            uuid: order.uuid,
            placed_at: order.placed_at,
            total_minor: order.total.to_minor_units(),
            items: order.items.iter().map(CartItemRecord::from).collect(),
        }
    }
}

impl OrderRecord {
    fn into_order(self, currency: &'static Currency) -> Order {
        Order {
            uuid: self.uuid,
            placed_at: self.placed_at,
            total: Money::from_minor(self.total_minor, currency),
            items: self
                .items
                .into_iter()
                .map(|record| record.into_item(currency))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{
        cart::{Frequency, Subscription},
        products::{Availability, Product, Provenance, Taxonomy},
    };

    use super::*;

    fn product() -> Product {
        Product {
            name: "Rainbow Carrots".to_string(),
            price: Money::from_minor(240, USD),
            unit: "bunch".to_string(),
            image: "carrots.webp".to_string(),
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
    fn cart_snapshot_round_trips_through_json() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add_item("p-carrot", &product(), 2);
        cart.add_subscription_item(
            "p-milk",
            &product(),
            1,
            Subscription {
                delivery_day: "saturday".to_string(),
                frequency: Frequency::Weekly,
            },
        );

        let encoded = serde_json::to_string(&CartSnapshot::of(&cart))?;
        let decoded: CartSnapshot = serde_json::from_str(&encoded)?;

        let mut restored = Cart::new(USD);
        restored.restore(decoded.into_items(USD));

        assert_eq!(restored.len(), cart.len());
        assert_eq!(restored.total_items(), cart.total_items());
        assert_eq!(restored.total_price(), cart.total_price());

        Ok(())
    }

    #[test]
    fn snapshot_shape_is_an_items_array() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add_item("p-carrot", &product(), 1);

        let encoded = serde_json::to_value(CartSnapshot::of(&cart))?;

        let items = encoded
            .get("items")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| "expected an items array".to_string())?;

        assert_eq!(items.len(), 1);

        let line = items
            .first()
            .ok_or_else(|| "expected a first line".to_string())?;

        assert_eq!(
            line.get("product_id").and_then(serde_json::Value::as_str),
            Some("p-carrot")
        );
        assert_eq!(
            line.get("price_minor").and_then(serde_json::Value::as_i64),
            Some(240)
        );
        assert!(line.get("subscription").is_none());

        Ok(())
    }

    #[test]
    fn orders_snapshot_round_trips_through_json() -> TestResult {
        let mut cart = Cart::new(USD);
        let mut book = OrderBook::new();

        cart.add_item("p-carrot", &product(), 3);

        let order = Order::from_cart(&cart).ok_or_else(|| "expected an order".to_string())?;
        let placed_uuid = order.uuid;

        book.record(order);

        let encoded = serde_json::to_string(&OrdersSnapshot::of(&book))?;
        let decoded: OrdersSnapshot = serde_json::from_str(&encoded)?;

        let mut restored = OrderBook::new();
        restored.restore(decoded.into_orders(USD));

        assert_eq!(restored.len(), 1);
        assert_eq!(restored.latest().map(|order| order.uuid), Some(placed_uuid));
        assert_eq!(
            restored.latest().map(|order| order.total),
            Some(Money::from_minor(720, USD))
        );

        Ok(())
    }
}
