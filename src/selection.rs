//! Magic Basket Selection
//!
//! Deterministic scoring that picks exactly one "best" product for a
//! requested variety. Only in-stock, instant-delivery products of the
//! requested variety are candidates; among those, cheapness, rating,
//! freshness and review volume are weighed into a single score and the
//! first highest-scoring candidate in catalog order wins.

use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{
    catalog::Catalog,
    products::{Product, ProductKey},
};

const PRICE_WEIGHT: f64 = 10.0;
const RATING_WEIGHT: f64 = 2.0;
const FRESHNESS_WEIGHT: f64 = 5.0;
const REVIEW_WEIGHT: f64 = 3.0;

/// Review counts at or beyond this contribute the full review weight.
const REVIEW_SATURATION: f64 = 100.0;

/// Score a candidate product.
///
/// `(1 / price) * 10 + rating * 2 + (freshness / 100) * 5 + min(reviews / 100, 1) * 3`,
/// with the freshness term contributing nothing when the score is unknown.
/// A zero price yields an infinite score and therefore always wins; whether
/// free products should be excluded or clamped is an open question, so the
/// behavior is kept as-is.
#[must_use]
pub fn score(product: &Product) -> f64 {
    let price_major = Decimal::new(product.price.to_minor_units(), 2)
        .to_f64()
        .unwrap_or_default();

    let mut score =
        (1.0 / price_major) * PRICE_WEIGHT + f64::from(product.rating) * RATING_WEIGHT;

    if let Some(freshness) = product.freshness {
        score += f64::from(freshness) / 100.0 * FRESHNESS_WEIGHT;
    }

    score += (f64::from(product.review_count) / REVIEW_SATURATION).min(1.0) * REVIEW_WEIGHT;

    score
}

fn eligible(product: &Product, variety: &str) -> bool {
    product.availability.in_stock
        && product.availability.instant_delivery
        && product.taxonomy.variety == variety
}

/// Pick the best product for the requested variety.
///
/// Returns `None` when no in-stock, instant-delivery product of that variety
/// exists. Ties keep the earlier candidate in catalog order, so the result is
/// stable for a given catalog.
#[must_use]
pub fn pick_best(catalog: &Catalog, variety: &str) -> Option<ProductKey> {
    let mut best: Option<(ProductKey, f64)> = None;

    for (key, product) in catalog.products() {
        if !eligible(product, variety) {
            continue;
        }

        let candidate = score(product);

        match best {
            Some((_, best_score)) if candidate <= best_score => {}
            _ => best = Some((key, candidate)),
        }
    }

    best.map(|(key, _)| key)
}
