use serde::{Deserialize, Serialize};

use carpool_lib::vehicle::Vehicle;

use super::user::user_url;

pub fn vehicle_url(vehicle_id: i64) -> String {
    format!("/api/v1/vehicles/{vehicle_id}/")
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VehicleRead {
    pub id: i64,
    pub url: String,
    pub make: String,
    pub model: String,
    pub reg_number: String,
    pub image: Option<String>,
    pub owner_url: String,
}

impl From<Vehicle> for VehicleRead {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.vehicle_id,
            url: vehicle_url(vehicle.vehicle_id),
            owner_url: user_url(vehicle.user_id),
            make: vehicle.make,
            model: vehicle.model,
            reg_number: vehicle.reg_number,
            image: vehicle.image,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VehicleWrite {
    pub make: String,
    pub model: String,
    pub reg_number: String,
    pub image: Option<String>,
}
