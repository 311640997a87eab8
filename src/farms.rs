//! Farms

use slotmap::new_key_type;

new_key_type! {
    /// Farm Key
    pub struct FarmKey;
}

/// Farm
///
/// Static reference data about a producer. Owned by the catalog.
#[derive(Debug, Clone)]
pub struct Farm {
    /// Farm display name
    pub name: String,

    /// Where the farm is located
    pub location: String,

    /// Average review rating
    pub rating: f32,

    /// Zone ids the farm delivers to
    pub delivery_zones: Vec<String>,

    /// What the farm is known for
    pub specialties: Vec<String>,
}
