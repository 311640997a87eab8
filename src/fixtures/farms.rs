//! Farm Fixtures

use serde::Deserialize;

use crate::farms::Farm;

/// Wrapper for farms in YAML
#[derive(Debug, Deserialize)]
pub struct FarmsFixture {
    /// Farm records
    pub farms: Vec<FarmFixture>,
}

/// Farm Fixture
#[derive(Debug, Deserialize)]
pub struct FarmFixture {
    /// External farm id
    pub id: String,

    /// Farm display name
    pub name: String,

    /// Where the farm is located
    pub location: String,

    /// Average review rating
    #[serde(default)]
    pub rating: f32,

    /// Zone ids the farm delivers to
    #[serde(default)]
    pub delivery_zones: Vec<String>,

    /// What the farm is known for
    #[serde(default)]
    pub specialties: Vec<String>,
}

impl FarmFixture {
    /// Convert the fixture into an id + farm record.
    pub(crate) fn into_record(self) -> (String, Farm) {
        let farm = Farm {
            name: self.name,
            location: self.location,
            rating: self.rating,
            delivery_zones: self.delivery_zones,
            specialties: self.specialties,
        };

        (self.id, farm)
    }
}
