use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use carpool_data_management::MEDIA_DIR;

use crate::server_state::ServerState;

pub mod places;
pub mod trips;
pub mod users;
pub mod vehicles;

/// All resource routes under /api/v1/, plus the media file tree. Methods a
/// resource does not expose fall through to the router's 405.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/v1/places/", get(places::list_places))
        .route("/api/v1/places/{place_id}/", get(places::get_place))
        .route("/api/v1/users/", get(users::list_users))
        .route(
            "/api/v1/users/{user_id}/",
            get(users::get_user).put(users::update_user),
        )
        .route(
            "/api/v1/vehicles/",
            get(vehicles::list_vehicles).post(vehicles::create_vehicle),
        )
        .route(
            "/api/v1/vehicles/{vehicle_id}/",
            get(vehicles::get_vehicle)
                .put(vehicles::update_vehicle)
                .delete(vehicles::delete_vehicle),
        )
        .route(
            "/api/v1/trips/",
            get(trips::list_trips).post(trips::create_trip),
        )
        .route(
            "/api/v1/trips/{trip_id}/",
            get(trips::get_trip)
                .put(trips::update_trip)
                .delete(trips::delete_trip),
        )
        .nest_service("/media", ServeDir::new(MEDIA_DIR))
        .with_state(state)
}
