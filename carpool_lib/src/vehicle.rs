use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Vehicle {
    pub vehicle_id: i64,
    pub user_id: i64,
    pub make: String,
    pub model: String,
    pub reg_number: String,
    pub image: Option<String>,
}

impl Vehicle {
    pub fn new(
        vehicle_id: i64,
        user_id: i64,
        make: String,
        model: String,
        reg_number: String,
        image: Option<String>,
    ) -> Self {
        Self {
            vehicle_id,
            user_id,
            make,
            model,
            reg_number,
            image,
        }
    }

    pub fn vehicle_name(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

/// Media path for a vehicle image: vehicles/<filename>
pub fn vehicle_image_path(filename: &str) -> String {
    format!("vehicles/{filename}")
}
