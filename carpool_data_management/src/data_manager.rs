use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use sha2::{Digest, Sha256};

use carpool_lib::{
    place::Place,
    trip::Trip,
    user::{Gender, User},
    validation,
    vehicle::Vehicle,
};

use crate::{database::db::CarpoolDatabase, DataManagerError, DATA_DIR, MEDIA_DIR};

/// Input shape for user registration. Ids, name fields and profile pictures
/// are filled in later, the account flags come from the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub api_token: String,
}

/// Conjunctive trip list filters. Absent fields are not applied.
#[derive(Debug, Clone, Default)]
pub struct TripFilter {
    pub trip_date: Option<NaiveDate>,
    pub num_seats: Option<i64>,
    pub origin: Option<String>,
    pub destination: Option<String>,
}

#[derive(Clone)]
pub struct DataManager {
    pub(crate) database: CarpoolDatabase,
}

/// The public interface for all carpool data management. Domain rules are
/// enforced here on every write, so callers that bypass the API layer get
/// the same guarantees.
impl DataManager {
    pub async fn start() -> Result<Self, DataManagerError> {
        // Create data and media dirs if they don't exist
        let root: PathBuf = project_root::get_project_root()
            .map_err(|_| DataManagerError::Database("Failed to locate project root".to_string()))?;
        for dir in [DATA_DIR, MEDIA_DIR] {
            let dir = root.join(dir);
            if !dir.exists() {
                std::fs::create_dir_all(&dir)
                    .map_err(|_| DataManagerError::Database(format!("Failed to create data directory: {:?}", dir)))?;
            }
        }

        let database = CarpoolDatabase::connect().await?;

        Ok(DataManager { database })
    }

    /// Backing store in memory, for tests.
    pub async fn start_in_memory() -> Result<Self, DataManagerError> {
        let database = CarpoolDatabase::connect_in_memory().await?;
        Ok(DataManager { database })
    }

    pub async fn register_place(&self, name: &str) -> Result<Place, DataManagerError> {
        self.database.insert_place(name).await
    }

    pub async fn get_place(&self, place_id: i64) -> Result<Place, DataManagerError> {
        self.database.get_place(place_id).await
    }

    pub async fn get_places(&self) -> Result<Vec<Place>, DataManagerError> {
        self.database.get_places().await
    }

    pub async fn delete_place(&self, place_id: i64) -> Result<(), DataManagerError> {
        self.database.delete_place(place_id).await
    }

    pub async fn register_user(&self, new_user: &NewUser) -> Result<User, DataManagerError> {
        if let Some(birth_date) = new_user.birth_date {
            validation::validate_birth_date(birth_date, Local::now().date_naive())?;
        }
        self.database.insert_user(new_user).await
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, DataManagerError> {
        self.database.get_user(user_id).await
    }

    pub async fn get_user_by_token(&self, api_token: &str) -> Result<Option<User>, DataManagerError> {
        self.database.get_user_by_token(api_token).await
    }

    pub async fn get_users(&self) -> Result<Vec<User>, DataManagerError> {
        self.database.get_users().await
    }

    pub async fn update_user(&self, user: &User) -> Result<(), DataManagerError> {
        if let Some(birth_date) = user.birth_date {
            validation::validate_birth_date(birth_date, Local::now().date_naive())?;
        }
        self.database.update_user(user).await
    }

    /// Cascades to the user's vehicles and trips.
    pub async fn delete_user(&self, user_id: i64) -> Result<(), DataManagerError> {
        self.database.delete_user(user_id).await
    }

    pub async fn register_vehicle(
        &self,
        user_id: i64,
        make: &str,
        model: &str,
        reg_number: &str,
        image: Option<&str>,
    ) -> Result<Vehicle, DataManagerError> {
        self.database.insert_vehicle(user_id, make, model, reg_number, image).await
    }

    pub async fn get_vehicle(&self, vehicle_id: i64) -> Result<Vehicle, DataManagerError> {
        self.database.get_vehicle(vehicle_id).await
    }

    pub async fn get_user_vehicle(&self, user_id: i64, vehicle_id: i64) -> Result<Option<Vehicle>, DataManagerError> {
        self.database.get_user_vehicle(user_id, vehicle_id).await
    }

    pub async fn get_vehicles(&self) -> Result<Vec<Vehicle>, DataManagerError> {
        self.database.get_vehicles().await
    }

    pub async fn update_vehicle(&self, vehicle: &Vehicle) -> Result<(), DataManagerError> {
        self.database.update_vehicle(vehicle).await
    }

    /// Cascades to trips using the vehicle.
    pub async fn delete_vehicle(&self, vehicle_id: i64) -> Result<(), DataManagerError> {
        self.database.delete_vehicle(vehicle_id).await
    }

    pub async fn register_trip(
        &self,
        user_id: i64,
        origin_id: i64,
        destination_id: i64,
        vehicle_id: i64,
        trip_date: NaiveDate,
        num_seats: i64,
    ) -> Result<Trip, DataManagerError> {
        validation::validate_trip_route(origin_id, destination_id)?;
        validation::validate_trip_date(trip_date, Local::now().date_naive())?;
        self.database.insert_trip(user_id, origin_id, destination_id, vehicle_id, trip_date, num_seats).await
    }

    pub async fn get_trip(&self, trip_id: i64) -> Result<Trip, DataManagerError> {
        self.database.get_trip(trip_id).await
    }

    pub async fn get_trips(&self, filter: &TripFilter) -> Result<Vec<Trip>, DataManagerError> {
        self.database.get_trips(filter).await
    }

    pub async fn update_trip(&self, trip: &Trip) -> Result<(), DataManagerError> {
        validation::validate_trip_route(trip.origin_id, trip.destination_id)?;
        validation::validate_trip_date(trip.trip_date, Local::now().date_naive())?;
        self.database.update_trip(trip).await
    }

    pub async fn delete_trip(&self, trip_id: i64) -> Result<(), DataManagerError> {
        self.database.delete_trip(trip_id).await
    }

    pub async fn count_vehicles(&self) -> Result<i64, DataManagerError> {
        self.database.count_vehicles().await
    }

    pub async fn count_trips(&self) -> Result<i64, DataManagerError> {
        self.database.count_trips().await
    }
}

pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn generate_api_token() -> String {
    let random_bytes: [u8; 16] = rand::random();
    hex::encode(random_bytes)
}
