//! Croft
//!
//! Croft is the client-side cart, catalogue and ordering state engine for a
//! farm-to-consumer grocery storefront.

pub mod cart;
pub mod catalog;
pub mod context;
pub mod farms;
pub mod fixtures;
pub mod orders;
pub mod persistence;
pub mod prelude;
pub mod products;
pub mod selection;
