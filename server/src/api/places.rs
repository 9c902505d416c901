use std::sync::Arc;

use axum::{extract::{Path, State}, Json};

use crate::{data::place::PlaceRead, error::ApiError, server_state::ServerState};

/// Places are read-only over the API; the admin collaborator creates them.
/// Listed by name ascending.
pub async fn list_places(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<PlaceRead>>, ApiError> {
    let places = state.data_manager.get_places().await?;
    Ok(Json(places.into_iter().map(PlaceRead::from).collect()))
}

pub async fn get_place(
    State(state): State<Arc<ServerState>>,
    Path(place_id): Path<i64>,
) -> Result<Json<PlaceRead>, ApiError> {
    let place = state.data_manager.get_place(place_id).await?;
    Ok(Json(place.into()))
}
