use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use carpool_data_management::TripFilter;
use carpool_lib::{place::Place, trip::Trip, user::User, vehicle::Vehicle};

use super::{place::PlaceRead, user::UserRead, vehicle::VehicleRead};

pub fn trip_url(trip_id: i64) -> String {
    format!("/api/v1/trips/{trip_id}/")
}

/// Fully expanded trip: places, vehicle and driver as nested objects. The
/// driver is keyed `driver` on the wire.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripRead {
    pub id: i64,
    pub url: String,
    pub trip_date: NaiveDate,
    pub num_seats: i64,
    pub origin: PlaceRead,
    pub destination: PlaceRead,
    pub vehicle: VehicleRead,
    pub driver: UserRead,
}

impl TripRead {
    pub fn new(trip: Trip, origin: Place, destination: Place, vehicle: Vehicle, driver: User) -> Self {
        Self {
            id: trip.trip_id,
            url: trip_url(trip.trip_id),
            trip_date: trip.trip_date,
            num_seats: trip.num_seats,
            origin: origin.into(),
            destination: destination.into(),
            vehicle: vehicle.into(),
            driver: driver.into(),
        }
    }
}

/// Flat write shape. `vehicle_id` only resolves among the requester's own
/// vehicles; the driver is never part of the input.
#[derive(Debug, Deserialize)]
pub struct TripWrite {
    pub trip_date: NaiveDate,
    pub num_seats: Option<i64>,
    pub origin_id: i64,
    pub destination_id: i64,
    pub vehicle_id: i64,
}

/// Trip list query parameters, combined conjunctively.
#[derive(Debug, Deserialize, Default)]
pub struct TripQuery {
    pub trip_date: Option<NaiveDate>,
    pub num_seats: Option<i64>,
    pub origin: Option<String>,
    pub destination: Option<String>,
}

impl From<TripQuery> for TripFilter {
    fn from(query: TripQuery) -> Self {
        TripFilter {
            trip_date: query.trip_date,
            num_seats: query.num_seats,
            origin: query.origin,
            destination: query.destination,
        }
    }
}
