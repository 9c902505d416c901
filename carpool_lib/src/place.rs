use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Place {
    pub place_id: i64,
    pub name: String,
}

impl Place {
    pub fn new(place_id: i64, name: String) -> Self {
        Self { place_id, name }
    }
}
