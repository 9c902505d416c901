use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Trip {
    pub trip_id: i64,
    /// The driver.
    pub user_id: i64,
    pub origin_id: i64,
    pub destination_id: i64,
    pub vehicle_id: i64,
    pub trip_date: NaiveDate,
    pub num_seats: i64,
}

impl Trip {
    pub fn new(
        trip_id: i64,
        user_id: i64,
        origin_id: i64,
        destination_id: i64,
        vehicle_id: i64,
        trip_date: NaiveDate,
        num_seats: i64,
    ) -> Self {
        Self {
            trip_id,
            user_id,
            origin_id,
            destination_id,
            vehicle_id,
            trip_date,
            num_seats,
        }
    }
}
