//! Cart Groups
//!
//! A derived, display-only partition of cart lines by originating farm.
//! Groups are never stored; they are recomputed from the cart on every call.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tracing::warn;

use crate::cart::{Cart, CartItem, CartTotalError};

/// Cart lines from a single farm.
#[derive(Debug, Clone)]
pub struct CartGroup {
    farm_id: String,
    farm_name: String,
    items: SmallVec<[CartItem; 4]>,
    currency: &'static Currency,
}

impl CartGroup {
    /// Id of the farm this group belongs to.
    #[must_use]
    pub fn farm_id(&self) -> &str {
        &self.farm_id
    }

    /// Display name of the farm this group belongs to.
    #[must_use]
    pub fn farm_name(&self) -> &str {
        &self.farm_name
    }

    /// Iterate over the lines in the group.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Get the number of lines in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Calculate the group subtotal.
    ///
    /// # Errors
    ///
    /// Returns a `CartTotalError` if a line total overflows or money
    /// arithmetic fails.
    pub fn try_subtotal(&self) -> Result<Money<'static, Currency>, CartTotalError> {
        self.items
            .iter()
            .try_fold(Money::from_minor(0, self.currency), |acc, item| {
                acc.add(item.line_total()?).map_err(CartTotalError::from)
            })
    }

    /// The group subtotal, degrading to zero in the cart currency if the
    /// computation fails. The failure is logged, never surfaced.
    #[must_use]
    pub fn subtotal(&self) -> Money<'static, Currency> {
        match self.try_subtotal() {
            Ok(subtotal) => subtotal,
            Err(error) => {
                warn!(farm_id = %self.farm_id, "group subtotal fell back to zero: {error}");
                Money::from_minor(0, self.currency)
            }
        }
    }
}

impl Cart {
    /// Partition the cart by farm, in first-seen farm order.
    ///
    /// Every line lands in exactly one group, and a line's farm id always
    /// matches its group's farm id.
    #[must_use]
    pub fn groups(&self) -> Vec<CartGroup> {
        let mut groups: Vec<CartGroup> = Vec::new();
        let mut index_by_farm: FxHashMap<String, usize> = FxHashMap::default();

        for item in self.items() {
            if let Some(&index) = index_by_farm.get(&item.farm_id) {
                if let Some(group) = groups.get_mut(index) {
                    group.items.push(item.clone());
                }
            } else {
                index_by_farm.insert(item.farm_id.clone(), groups.len());

                let mut items = SmallVec::new();
                items.push(item.clone());

                groups.push(CartGroup {
                    farm_id: item.farm_id.clone(),
                    farm_name: item.farm_name.clone(),
                    items,
                    currency: self.currency(),
                });
            }
        }

        groups
    }
}
