use std::sync::Arc;

use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use chrono::Local;

use carpool_data_management::{DataManager, DataManagerError};
use carpool_lib::{trip::Trip, validation};

use crate::{
    auth::Requester,
    data::trip::{TripQuery, TripRead, TripWrite},
    error::{ApiError, FieldErrors},
    permissions,
    server_state::ServerState,
};

/// Ordered by trip date ascending; filters compose conjunctively.
pub async fn list_trips(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<TripQuery>,
) -> Result<Json<Vec<TripRead>>, ApiError> {
    let trips = state.data_manager.get_trips(&query.into()).await?;

    let mut reads = Vec::with_capacity(trips.len());
    for trip in trips {
        reads.push(expand(&state.data_manager, trip).await?);
    }
    Ok(Json(reads))
}

pub async fn get_trip(
    State(state): State<Arc<ServerState>>,
    Path(trip_id): Path<i64>,
) -> Result<Json<TripRead>, ApiError> {
    let trip = state.data_manager.get_trip(trip_id).await?;
    Ok(Json(expand(&state.data_manager, trip).await?))
}

pub async fn create_trip(
    State(state): State<Arc<ServerState>>,
    requester: Requester,
    Json(write): Json<TripWrite>,
) -> Result<(StatusCode, Json<TripRead>), ApiError> {
    let driver = permissions::require_authenticated(&requester)?;
    validate(&state.data_manager, driver.user_id, &write).await?;

    let trip = state
        .data_manager
        .register_trip(
            driver.user_id,
            write.origin_id,
            write.destination_id,
            write.vehicle_id,
            write.trip_date,
            write.num_seats.unwrap_or(1),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(expand(&state.data_manager, trip).await?)))
}

pub async fn update_trip(
    State(state): State<Arc<ServerState>>,
    requester: Requester,
    Path(trip_id): Path<i64>,
    Json(write): Json<TripWrite>,
) -> Result<Json<TripRead>, ApiError> {
    let mut trip = state.data_manager.get_trip(trip_id).await?;
    permissions::check_owner_write(&requester, trip.user_id)?;
    validate(&state.data_manager, trip.user_id, &write).await?;

    trip.origin_id = write.origin_id;
    trip.destination_id = write.destination_id;
    trip.vehicle_id = write.vehicle_id;
    trip.trip_date = write.trip_date;
    trip.num_seats = write.num_seats.unwrap_or(trip.num_seats);

    state.data_manager.update_trip(&trip).await?;

    Ok(Json(expand(&state.data_manager, trip).await?))
}

pub async fn delete_trip(
    State(state): State<Arc<ServerState>>,
    requester: Requester,
    Path(trip_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let trip = state.data_manager.get_trip(trip_id).await?;
    permissions::check_owner_write(&requester, trip.user_id)?;

    state.data_manager.delete_trip(trip.trip_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Input-boundary validation: domain rules plus reference resolution. The
/// vehicle lookup is restricted to the requester's own vehicles, so a
/// foreign vehicle id fails exactly like an unknown one.
async fn validate(
    data_manager: &DataManager,
    driver_id: i64,
    write: &TripWrite,
) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();

    if let Err(err) = validation::validate_trip_route(write.origin_id, write.destination_id) {
        errors.push_validation(err);
    }
    if let Err(err) = validation::validate_trip_date(write.trip_date, Local::now().date_naive()) {
        errors.push_validation(err);
    }

    for (field, place_id) in [("origin_id", write.origin_id), ("destination_id", write.destination_id)] {
        match data_manager.get_place(place_id).await {
            Ok(_) => {}
            Err(DataManagerError::NotFound(_)) => errors.push(field, "Place does not exist"),
            Err(err) => return Err(err.into()),
        }
    }

    if data_manager.get_user_vehicle(driver_id, write.vehicle_id).await?.is_none() {
        errors.push("vehicle_id", "Vehicle does not exist");
    }

    errors.into_result()
}

async fn expand(data_manager: &DataManager, trip: Trip) -> Result<TripRead, ApiError> {
    let origin = data_manager.get_place(trip.origin_id).await?;
    let destination = data_manager.get_place(trip.destination_id).await?;
    let vehicle = data_manager.get_vehicle(trip.vehicle_id).await?;
    let driver = data_manager.get_user(trip.user_id).await?;
    Ok(TripRead::new(trip, origin, destination, vehicle, driver))
}
