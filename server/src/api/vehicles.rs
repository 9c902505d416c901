use std::sync::Arc;

use axum::{extract::{Path, State}, http::StatusCode, Json};

use carpool_lib::vehicle::vehicle_image_path;

use crate::{
    auth::Requester,
    data::vehicle::{VehicleRead, VehicleWrite},
    error::{ApiError, FieldErrors},
    permissions,
    server_state::ServerState,
};

pub async fn list_vehicles(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<VehicleRead>>, ApiError> {
    let vehicles = state.data_manager.get_vehicles().await?;
    Ok(Json(vehicles.into_iter().map(VehicleRead::from).collect()))
}

pub async fn get_vehicle(
    State(state): State<Arc<ServerState>>,
    Path(vehicle_id): Path<i64>,
) -> Result<Json<VehicleRead>, ApiError> {
    let vehicle = state.data_manager.get_vehicle(vehicle_id).await?;
    Ok(Json(vehicle.into()))
}

fn validate(write: &VehicleWrite) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    errors.require_non_blank("make", &write.make);
    errors.require_non_blank("model", &write.model);
    errors.require_non_blank("reg_number", &write.reg_number);
    errors.into_result()
}

/// The owner is always the requester, never part of the input.
pub async fn create_vehicle(
    State(state): State<Arc<ServerState>>,
    requester: Requester,
    Json(write): Json<VehicleWrite>,
) -> Result<(StatusCode, Json<VehicleRead>), ApiError> {
    let owner = permissions::require_authenticated(&requester)?;
    validate(&write)?;

    let image = write.image.as_deref().map(vehicle_image_path);
    let vehicle = state
        .data_manager
        .register_vehicle(
            owner.user_id,
            &write.make,
            &write.model,
            &write.reg_number,
            image.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(vehicle.into())))
}

pub async fn update_vehicle(
    State(state): State<Arc<ServerState>>,
    requester: Requester,
    Path(vehicle_id): Path<i64>,
    Json(write): Json<VehicleWrite>,
) -> Result<Json<VehicleRead>, ApiError> {
    let mut vehicle = state.data_manager.get_vehicle(vehicle_id).await?;
    permissions::check_owner_write(&requester, vehicle.user_id)?;
    validate(&write)?;

    vehicle.make = write.make;
    vehicle.model = write.model;
    vehicle.reg_number = write.reg_number;
    if let Some(image) = write.image {
        vehicle.image = Some(vehicle_image_path(&image));
    }

    state.data_manager.update_vehicle(&vehicle).await?;

    Ok(Json(vehicle.into()))
}

pub async fn delete_vehicle(
    State(state): State<Arc<ServerState>>,
    requester: Requester,
    Path(vehicle_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let vehicle = state.data_manager.get_vehicle(vehicle_id).await?;
    permissions::check_owner_write(&requester, vehicle.user_id)?;

    state.data_manager.delete_vehicle(vehicle.vehicle_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
