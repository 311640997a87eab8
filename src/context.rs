//! Storefront Context
//!
//! The application root owning every state store for a session. Consumers
//! receive the context by reference instead of reaching for globals, so tests
//! can run isolated sessions side by side. Mutating operations write through
//! to the vault; a failed write is logged and never surfaced, and the
//! in-memory stores stay authoritative.

use std::path::PathBuf;

use rusty_money::iso::Currency;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    cart::{Cart, CartItemKey, Subscription},
    catalog::Catalog,
    orders::{Order, OrderBook},
    persistence::{
        Vault,
        records::{CartSnapshot, OrdersSnapshot},
    },
    products::ProductKey,
    selection,
};

const CART_STATE_KEY: &str = "cart";
const ORDERS_STATE_KEY: &str = "orders";

/// Storefront session configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding the persisted state blobs.
    pub storage_dir: PathBuf,

    /// Currency every price in the session is denominated in.
    pub currency: &'static Currency,
}

/// Storefront Context
#[derive(Debug)]
pub struct StorefrontContext {
    /// Reference data for the session.
    pub catalog: Catalog,

    /// The active cart.
    pub cart: Cart,

    /// Order history.
    pub orders: OrderBook,

    vault: Vault,
}

impl StorefrontContext {
    /// Open a storefront session.
    ///
    /// Persisted state is rehydrated once, here; a missing blob starts the
    /// store empty, and an unreadable one logs a warning and falls back to
    /// empty rather than failing the session.
    #[must_use]
    pub fn open(config: StorefrontConfig, catalog: Catalog) -> Self {
        let vault = Vault::new(config.storage_dir);

        let mut cart = Cart::new(config.currency);

        match vault.load::<CartSnapshot>(CART_STATE_KEY) {
            Ok(Some(snapshot)) => cart.restore(snapshot.into_items(config.currency)),
            Ok(None) => {}
            Err(error) => warn!("failed to restore cart state, starting empty: {error}"),
        }

        let mut orders = OrderBook::new();

        match vault.load::<OrdersSnapshot>(ORDERS_STATE_KEY) {
            Ok(Some(snapshot)) => orders.restore(snapshot.into_orders(config.currency)),
            Ok(None) => {}
            Err(error) => warn!("failed to restore order history, starting empty: {error}"),
        }

        Self {
            catalog,
            cart,
            orders,
            vault,
        }
    }

    /// Add `quantity` units of a catalog product to the cart. Unknown product
    /// ids are ignored.
    pub fn add_to_cart(&mut self, product_id: &str, quantity: u32) -> Option<CartItemKey> {
        let product = self.catalog.product_by_id(product_id)?;
        let key = self.cart.add_item(product_id, product, quantity);

        self.flush_cart();

        key
    }

    /// Add a recurring line for a catalog product. Unknown product ids are
    /// ignored.
    pub fn add_subscription_to_cart(
        &mut self,
        product_id: &str,
        quantity: u32,
        subscription: Subscription,
    ) -> Option<CartItemKey> {
        let product = self.catalog.product_by_id(product_id)?;
        let key = self
            .cart
            .add_subscription_item(product_id, product, quantity, subscription);

        self.flush_cart();

        key
    }

    /// Remove a cart line.
    pub fn remove_from_cart(&mut self, item: CartItemKey) {
        self.cart.remove_item(item);
        self.flush_cart();
    }

    /// Replace a cart line's quantity; zero removes the line.
    pub fn set_cart_quantity(&mut self, item: CartItemKey, quantity: u32) {
        self.cart.set_quantity(item, quantity);
        self.flush_cart();
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.flush_cart();
    }

    /// Replace the cart with one unit of each given product id found in the
    /// catalog.
    pub fn generate_magic_cart(&mut self, product_ids: &[String]) {
        self.cart.generate_magic_cart(product_ids, &self.catalog);
        self.flush_cart();
    }

    /// Pick the best in-stock, instant-delivery product for a variety and add
    /// one unit of it to the cart. Returns the chosen product's key, or
    /// `None` when nothing qualifies.
    pub fn add_best_for_variety(&mut self, variety: &str) -> Option<ProductKey> {
        let key = selection::pick_best(&self.catalog, variety)?;
        let product = self.catalog.product(key)?;
        let product_id = self.catalog.product_id(key)?;

        self.cart.add_item(product_id, product, 1);
        self.flush_cart();

        Some(key)
    }

    /// Place an order from the current cart, clearing the cart on success.
    /// Returns `None` when the cart is empty.
    pub fn place_order(&mut self) -> Option<Uuid> {
        let order = Order::from_cart(&self.cart)?;
        let uuid = order.uuid;

        info!(order_uuid = %uuid, item_count = order.items.len(), "placed order");

        self.orders.record(order);
        self.cart.clear();

        self.flush_cart();
        self.flush_orders();

        Some(uuid)
    }

    fn flush_cart(&self) {
        if let Err(error) = self.vault.save(CART_STATE_KEY, &CartSnapshot::of(&self.cart)) {
            warn!("failed to persist cart state: {error}");
        }
    }

    fn flush_orders(&self) {
        if let Err(error) = self
            .vault
            .save(ORDERS_STATE_KEY, &OrdersSnapshot::of(&self.orders))
        {
            warn!("failed to persist order history: {error}");
        }
    }
}
