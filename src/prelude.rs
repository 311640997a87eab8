//! Croft prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        Cart, CartItem, CartItemKey, CartTotalError, Frequency, Subscription, groups::CartGroup,
    },
    catalog::{Catalog, CatalogError, filter::FilterState},
    context::{StorefrontConfig, StorefrontContext},
    farms::{Farm, FarmKey},
    fixtures::{Fixture, FixtureError},
    orders::{Order, OrderBook},
    persistence::{
        Vault, VaultError,
        records::{CartItemRecord, CartSnapshot, OrderRecord, OrdersSnapshot},
    },
    products::{Availability, Product, ProductKey, Provenance, Taxonomy},
    selection::{pick_best, score},
};
