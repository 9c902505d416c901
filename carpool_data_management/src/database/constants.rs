#![allow(dead_code)]

pub const PLACES_TABLE_NAME: &str = "Places";
pub const PLACE_ID: &str = "place_id";
pub const NAME: &str = "name";

pub const USERS_TABLE_NAME: &str = "Users";
pub const USER_ID: &str = "user_id";
pub const USERNAME: &str = "username";
pub const EMAIL: &str = "email";
pub const FIRST_NAME: &str = "first_name";
pub const LAST_NAME: &str = "last_name";
pub const PASSWORD_HASH: &str = "password_hash";
pub const GENDER: &str = "gender";
pub const BIRTH_DATE: &str = "birth_date";
pub const PROFILE_PIC: &str = "profile_pic";
pub const IS_ACTIVE: &str = "is_active";
pub const IS_STAFF: &str = "is_staff";
pub const IS_SUPERUSER: &str = "is_superuser";
pub const API_TOKEN: &str = "api_token";

pub const VEHICLES_TABLE_NAME: &str = "Vehicles";
pub const VEHICLE_ID: &str = "vehicle_id";
pub const MAKE: &str = "make";
pub const MODEL: &str = "model";
pub const REG_NUMBER: &str = "reg_number";
pub const IMAGE: &str = "image";

pub const TRIPS_TABLE_NAME: &str = "Trips";
pub const TRIP_ID: &str = "trip_id";
pub const ORIGIN_ID: &str = "origin_id";
pub const DESTINATION_ID: &str = "destination_id";
pub const TRIP_DATE: &str = "trip_date";
pub const NUM_SEATS: &str = "num_seats";
