use std::path::PathBuf;

use chrono::NaiveDate;
use const_format::concatcp;
use sqlx::{
    query, query_as,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Executor, Pool, Sqlite, SqlitePool,
};

use carpool_lib::{
    place::Place, trip::Trip, user::User, validation::ValidationError, vehicle::Vehicle,
};

use crate::{DataManagerError, NewUser, TripFilter, DATABASE_PATH};

use super::constants::*;

#[derive(Clone)]
pub struct CarpoolDatabase {
    pool: Pool<Sqlite>,
}

impl CarpoolDatabase {
    pub async fn connect() -> Result<Self, DataManagerError> {
        let root: PathBuf = project_root::get_project_root()
            .map_err(|_| DataManagerError::Database("Failed to locate project root".to_string()))?;
        let options = SqliteConnectOptions::new()
            .filename(root.join(DATABASE_PATH))
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await
            .map_err(|_| DataManagerError::Database("Failed to connect to database".to_string()))?;

        let db = Self { pool };

        db.init().await?;

        Ok(db)
    }

    /// A private in-memory database. One connection only, as every SQLite
    /// connection gets its own memory database.
    pub async fn connect_in_memory() -> Result<Self, DataManagerError> {
        let options = SqliteConnectOptions::new()
            .in_memory(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options).await
            .map_err(|_| DataManagerError::Database("Failed to connect to database".to_string()))?;

        let db = Self { pool };

        db.init().await?;

        Ok(db)
    }

    pub async fn init(&self) -> Result<(), DataManagerError> {
        self.pool.execute(concatcp!("
            CREATE TABLE IF NOT EXISTS ", PLACES_TABLE_NAME, "(",
                PLACE_ID, " INTEGER PRIMARY KEY AUTOINCREMENT,",
                NAME,     " TEXT NOT NULL UNIQUE);

            CREATE TABLE IF NOT EXISTS ", USERS_TABLE_NAME, "(",
                USER_ID,       " INTEGER PRIMARY KEY AUTOINCREMENT,",
                USERNAME,      " TEXT NOT NULL UNIQUE,",
                EMAIL,         " TEXT NOT NULL,",
                FIRST_NAME,    " TEXT NOT NULL DEFAULT '',",
                LAST_NAME,     " TEXT NOT NULL DEFAULT '',",
                PASSWORD_HASH, " TEXT NOT NULL,",
                GENDER,        " TEXT NOT NULL DEFAULT 'wont-say',",
                BIRTH_DATE,    " DATE,",
                PROFILE_PIC,   " TEXT,",
                IS_ACTIVE,     " BOOLEAN NOT NULL DEFAULT 1,",
                IS_STAFF,      " BOOLEAN NOT NULL DEFAULT 0,",
                IS_SUPERUSER,  " BOOLEAN NOT NULL DEFAULT 0,",
                API_TOKEN,     " TEXT NOT NULL UNIQUE);

            CREATE TABLE IF NOT EXISTS ", VEHICLES_TABLE_NAME, "(",
                VEHICLE_ID, " INTEGER PRIMARY KEY AUTOINCREMENT,",
                USER_ID,    " INTEGER NOT NULL,",
                MAKE,       " TEXT NOT NULL,",
                MODEL,      " TEXT NOT NULL,",
                REG_NUMBER, " TEXT NOT NULL,",
                IMAGE,      " TEXT,
                FOREIGN KEY(", USER_ID, ") REFERENCES ", USERS_TABLE_NAME, "(", USER_ID, ") ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS ", TRIPS_TABLE_NAME, "(",
                TRIP_ID,        " INTEGER PRIMARY KEY AUTOINCREMENT,",
                USER_ID,        " INTEGER NOT NULL,",
                ORIGIN_ID,      " INTEGER NOT NULL,",
                DESTINATION_ID, " INTEGER NOT NULL,",
                VEHICLE_ID,     " INTEGER NOT NULL,",
                TRIP_DATE,      " DATE NOT NULL,",
                NUM_SEATS,      " INTEGER NOT NULL DEFAULT 1,
                CHECK (", ORIGIN_ID, " != ", DESTINATION_ID, "),
                FOREIGN KEY(", USER_ID, ") REFERENCES ", USERS_TABLE_NAME, "(", USER_ID, ") ON DELETE CASCADE,
                FOREIGN KEY(", ORIGIN_ID, ") REFERENCES ", PLACES_TABLE_NAME, "(", PLACE_ID, ") ON DELETE CASCADE,
                FOREIGN KEY(", DESTINATION_ID, ") REFERENCES ", PLACES_TABLE_NAME, "(", PLACE_ID, ") ON DELETE CASCADE,
                FOREIGN KEY(", VEHICLE_ID, ") REFERENCES ", VEHICLES_TABLE_NAME, "(", VEHICLE_ID, ") ON DELETE CASCADE
            )")).await
            .map_err(|_| DataManagerError::Database("Failed to create tables".to_string()))?;

        Ok(())
    }

    pub async fn insert_place(&self, name: &str) -> Result<Place, DataManagerError> {
        let id = query_as::<_, (i64,)>(concatcp!("
            INSERT INTO ", PLACES_TABLE_NAME, "(", PLACE_ID, ", ", NAME, ")
            VALUES (NULL, ?1) RETURNING ", PLACE_ID))
                .bind(name)
                .fetch_one(&self.pool).await
                .map_err(|err| match &err {
                    sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                        DataManagerError::Validation(ValidationError::DuplicatePlaceName)
                    }
                    _ => DataManagerError::Database("Failed to insert place".to_string()),
                })
                .map(|row| row.0)?;

        Ok(Place::new(id, name.to_string()))
    }

    pub async fn get_place(&self, place_id: i64) -> Result<Place, DataManagerError> {
        query_as::<_, Place>(concatcp!("SELECT * FROM ", PLACES_TABLE_NAME, " WHERE ", PLACE_ID, " = ?1"))
            .bind(place_id)
            .fetch_optional(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to get place".to_string()))?
            .ok_or(DataManagerError::NotFound("Place"))
    }

    pub async fn get_places(&self) -> Result<Vec<Place>, DataManagerError> {
        query_as::<_, Place>(concatcp!("SELECT * FROM ", PLACES_TABLE_NAME, " ORDER BY ", NAME, " ASC"))
            .fetch_all(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to get places".to_string()))
    }

    pub async fn delete_place(&self, place_id: i64) -> Result<(), DataManagerError> {
        let result = query(concatcp!("DELETE FROM ", PLACES_TABLE_NAME, " WHERE ", PLACE_ID, " = ?1"))
            .bind(place_id)
            .execute(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to delete place".to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DataManagerError::NotFound("Place"));
        }
        Ok(())
    }

    pub async fn insert_user(&self, new_user: &NewUser) -> Result<User, DataManagerError> {
        query_as::<_, User>(concatcp!("
            INSERT INTO ", USERS_TABLE_NAME, "(",
            USER_ID, ", ", USERNAME, ", ", EMAIL, ", ", PASSWORD_HASH, ", ", GENDER, ", ",
            BIRTH_DATE, ", ", IS_STAFF, ", ", IS_SUPERUSER, ", ", API_TOKEN, ")
            VALUES (NULL, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING *"))
                .bind(&new_user.username)
                .bind(&new_user.email)
                .bind(&new_user.password_hash)
                .bind(new_user.gender)
                .bind(new_user.birth_date)
                .bind(new_user.is_staff)
                .bind(new_user.is_superuser)
                .bind(&new_user.api_token)
                .fetch_one(&self.pool).await
                .map_err(|_| DataManagerError::Database("Failed to insert user".to_string()))
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, DataManagerError> {
        query_as::<_, User>(concatcp!("SELECT * FROM ", USERS_TABLE_NAME, " WHERE ", USER_ID, " = ?1"))
            .bind(user_id)
            .fetch_optional(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to get user".to_string()))?
            .ok_or(DataManagerError::NotFound("User"))
    }

    pub async fn get_user_by_token(&self, api_token: &str) -> Result<Option<User>, DataManagerError> {
        query_as::<_, User>(concatcp!("SELECT * FROM ", USERS_TABLE_NAME, " WHERE ", API_TOKEN, " = ?1"))
            .bind(api_token)
            .fetch_optional(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to get user by token".to_string()))
    }

    pub async fn get_users(&self) -> Result<Vec<User>, DataManagerError> {
        query_as::<_, User>(concatcp!("SELECT * FROM ", USERS_TABLE_NAME))
            .fetch_all(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to get users".to_string()))
    }

    pub async fn update_user(&self, user: &User) -> Result<(), DataManagerError> {
        let result = query(concatcp!("
            UPDATE ", USERS_TABLE_NAME, " SET ",
            USERNAME, " = ?1, ", EMAIL, " = ?2, ", FIRST_NAME, " = ?3, ", LAST_NAME, " = ?4, ",
            GENDER, " = ?5, ", BIRTH_DATE, " = ?6, ", PROFILE_PIC, " = ?7
            WHERE ", USER_ID, " = ?8"))
                .bind(&user.username)
                .bind(&user.email)
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(user.gender)
                .bind(user.birth_date)
                .bind(&user.profile_pic)
                .bind(user.user_id)
                .execute(&self.pool).await
                .map_err(|_| DataManagerError::Database("Failed to update user".to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DataManagerError::NotFound("User"));
        }
        Ok(())
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<(), DataManagerError> {
        let result = query(concatcp!("DELETE FROM ", USERS_TABLE_NAME, " WHERE ", USER_ID, " = ?1"))
            .bind(user_id)
            .execute(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to delete user".to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DataManagerError::NotFound("User"));
        }
        Ok(())
    }

    pub async fn insert_vehicle(
        &self,
        user_id: i64,
        make: &str,
        model: &str,
        reg_number: &str,
        image: Option<&str>,
    ) -> Result<Vehicle, DataManagerError> {
        let id = query_as::<_, (i64,)>(concatcp!("
            INSERT INTO ", VEHICLES_TABLE_NAME, "(",
            VEHICLE_ID, ", ", USER_ID, ", ", MAKE, ", ", MODEL, ", ", REG_NUMBER, ", ", IMAGE, ")
            VALUES (NULL, ?1, ?2, ?3, ?4, ?5) RETURNING ", VEHICLE_ID))
                .bind(user_id)
                .bind(make)
                .bind(model)
                .bind(reg_number)
                .bind(image)
                .fetch_one(&self.pool).await
                .map_err(|_| DataManagerError::Database("Failed to insert vehicle".to_string()))
                .map(|row| row.0)?;

        Ok(Vehicle::new(
            id,
            user_id,
            make.to_string(),
            model.to_string(),
            reg_number.to_string(),
            image.map(str::to_string),
        ))
    }

    pub async fn get_vehicle(&self, vehicle_id: i64) -> Result<Vehicle, DataManagerError> {
        query_as::<_, Vehicle>(concatcp!("SELECT * FROM ", VEHICLES_TABLE_NAME, " WHERE ", VEHICLE_ID, " = ?1"))
            .bind(vehicle_id)
            .fetch_optional(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to get vehicle".to_string()))?
            .ok_or(DataManagerError::NotFound("Vehicle"))
    }

    /// Lookup restricted to one owner's vehicles. Someone else's vehicle id
    /// resolves to None, same as an unknown id.
    pub async fn get_user_vehicle(&self, user_id: i64, vehicle_id: i64) -> Result<Option<Vehicle>, DataManagerError> {
        query_as::<_, Vehicle>(concatcp!("
            SELECT * FROM ", VEHICLES_TABLE_NAME, "
            WHERE ", VEHICLE_ID, " = ?1 AND ", USER_ID, " = ?2"))
                .bind(vehicle_id)
                .bind(user_id)
                .fetch_optional(&self.pool).await
                .map_err(|_| DataManagerError::Database("Failed to get vehicle".to_string()))
    }

    pub async fn get_vehicles(&self) -> Result<Vec<Vehicle>, DataManagerError> {
        query_as::<_, Vehicle>(concatcp!("SELECT * FROM ", VEHICLES_TABLE_NAME))
            .fetch_all(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to get vehicles".to_string()))
    }

    pub async fn update_vehicle(&self, vehicle: &Vehicle) -> Result<(), DataManagerError> {
        let result = query(concatcp!("
            UPDATE ", VEHICLES_TABLE_NAME, " SET ",
            MAKE, " = ?1, ", MODEL, " = ?2, ", REG_NUMBER, " = ?3, ", IMAGE, " = ?4
            WHERE ", VEHICLE_ID, " = ?5"))
                .bind(&vehicle.make)
                .bind(&vehicle.model)
                .bind(&vehicle.reg_number)
                .bind(&vehicle.image)
                .bind(vehicle.vehicle_id)
                .execute(&self.pool).await
                .map_err(|_| DataManagerError::Database("Failed to update vehicle".to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DataManagerError::NotFound("Vehicle"));
        }
        Ok(())
    }

    pub async fn delete_vehicle(&self, vehicle_id: i64) -> Result<(), DataManagerError> {
        let result = query(concatcp!("DELETE FROM ", VEHICLES_TABLE_NAME, " WHERE ", VEHICLE_ID, " = ?1"))
            .bind(vehicle_id)
            .execute(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to delete vehicle".to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DataManagerError::NotFound("Vehicle"));
        }
        Ok(())
    }

    pub async fn insert_trip(
        &self,
        user_id: i64,
        origin_id: i64,
        destination_id: i64,
        vehicle_id: i64,
        trip_date: NaiveDate,
        num_seats: i64,
    ) -> Result<Trip, DataManagerError> {
        let id = query_as::<_, (i64,)>(concatcp!("
            INSERT INTO ", TRIPS_TABLE_NAME, "(",
            TRIP_ID, ", ", USER_ID, ", ", ORIGIN_ID, ", ", DESTINATION_ID, ", ",
            VEHICLE_ID, ", ", TRIP_DATE, ", ", NUM_SEATS, ")
            VALUES (NULL, ?1, ?2, ?3, ?4, ?5, ?6) RETURNING ", TRIP_ID))
                .bind(user_id)
                .bind(origin_id)
                .bind(destination_id)
                .bind(vehicle_id)
                .bind(trip_date)
                .bind(num_seats)
                .fetch_one(&self.pool).await
                .map_err(|_| DataManagerError::Database("Failed to insert trip".to_string()))
                .map(|row| row.0)?;

        Ok(Trip::new(id, user_id, origin_id, destination_id, vehicle_id, trip_date, num_seats))
    }

    pub async fn get_trip(&self, trip_id: i64) -> Result<Trip, DataManagerError> {
        query_as::<_, Trip>(concatcp!("SELECT * FROM ", TRIPS_TABLE_NAME, " WHERE ", TRIP_ID, " = ?1"))
            .bind(trip_id)
            .fetch_optional(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to get trip".to_string()))?
            .ok_or(DataManagerError::NotFound("Trip"))
    }

    /// Filters compose conjunctively; absent parameters are skipped by the
    /// `?N IS NULL` guards. Place names match case-insensitively.
    pub async fn get_trips(&self, filter: &TripFilter) -> Result<Vec<Trip>, DataManagerError> {
        query_as::<_, Trip>(concatcp!("
            SELECT t.* FROM ", TRIPS_TABLE_NAME, " t
            JOIN ", PLACES_TABLE_NAME, " o ON t.", ORIGIN_ID, " = o.", PLACE_ID, "
            JOIN ", PLACES_TABLE_NAME, " d ON t.", DESTINATION_ID, " = d.", PLACE_ID, "
            WHERE (?1 IS NULL OR t.", TRIP_DATE, " = ?1)
              AND (?2 IS NULL OR t.", NUM_SEATS, " >= ?2)
              AND (?3 IS NULL OR o.", NAME, " = ?3 COLLATE NOCASE)
              AND (?4 IS NULL OR d.", NAME, " = ?4 COLLATE NOCASE)
            ORDER BY t.", TRIP_DATE, " ASC"))
                .bind(filter.trip_date)
                .bind(filter.num_seats)
                .bind(filter.origin.as_deref())
                .bind(filter.destination.as_deref())
                .fetch_all(&self.pool).await
                .map_err(|_| DataManagerError::Database("Failed to get trips".to_string()))
    }

    pub async fn update_trip(&self, trip: &Trip) -> Result<(), DataManagerError> {
        let result = query(concatcp!("
            UPDATE ", TRIPS_TABLE_NAME, " SET ",
            ORIGIN_ID, " = ?1, ", DESTINATION_ID, " = ?2, ", VEHICLE_ID, " = ?3, ",
            TRIP_DATE, " = ?4, ", NUM_SEATS, " = ?5
            WHERE ", TRIP_ID, " = ?6"))
                .bind(trip.origin_id)
                .bind(trip.destination_id)
                .bind(trip.vehicle_id)
                .bind(trip.trip_date)
                .bind(trip.num_seats)
                .bind(trip.trip_id)
                .execute(&self.pool).await
                .map_err(|_| DataManagerError::Database("Failed to update trip".to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DataManagerError::NotFound("Trip"));
        }
        Ok(())
    }

    pub async fn delete_trip(&self, trip_id: i64) -> Result<(), DataManagerError> {
        let result = query(concatcp!("DELETE FROM ", TRIPS_TABLE_NAME, " WHERE ", TRIP_ID, " = ?1"))
            .bind(trip_id)
            .execute(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to delete trip".to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DataManagerError::NotFound("Trip"));
        }
        Ok(())
    }

    pub async fn count_vehicles(&self) -> Result<i64, DataManagerError> {
        query_as::<_, (i64,)>(concatcp!("SELECT COUNT(*) FROM ", VEHICLES_TABLE_NAME))
            .fetch_one(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to count vehicles".to_string()))
            .map(|row| row.0)
    }

    pub async fn count_trips(&self) -> Result<i64, DataManagerError> {
        query_as::<_, (i64,)>(concatcp!("SELECT COUNT(*) FROM ", TRIPS_TABLE_NAME))
            .fetch_one(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to count trips".to_string()))
            .map(|row| row.0)
    }
}
