use serde::{Deserialize, Serialize};

use carpool_lib::place::Place;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlaceRead {
    pub id: i64,
    pub name: String,
}

impl From<Place> for PlaceRead {
    fn from(place: Place) -> Self {
        Self {
            id: place.place_id,
            name: place.name,
        }
    }
}
