use std::sync::Arc;

use axum::{extract::{Path, State}, Json};
use chrono::Local;

use carpool_lib::{user::profile_pic_path, validation};

use crate::{
    auth::Requester,
    data::user::{UserRead, UserWrite},
    error::{ApiError, FieldErrors},
    permissions,
    server_state::ServerState,
};

/// User creation and deletion are not exposed here; accounts come from the
/// registration collaborator and DELETE falls through to the router's 405.
pub async fn list_users(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<UserRead>>, ApiError> {
    let users = state.data_manager.get_users().await?;
    Ok(Json(users.into_iter().map(UserRead::from).collect()))
}

pub async fn get_user(
    State(state): State<Arc<ServerState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserRead>, ApiError> {
    let user = state.data_manager.get_user(user_id).await?;
    Ok(Json(user.into()))
}

pub async fn update_user(
    State(state): State<Arc<ServerState>>,
    requester: Requester,
    Path(user_id): Path<i64>,
    Json(write): Json<UserWrite>,
) -> Result<Json<UserRead>, ApiError> {
    let mut user = state.data_manager.get_user(user_id).await?;
    permissions::check_self_write(&requester, user.user_id)?;

    let mut errors = FieldErrors::new();
    errors.require_non_blank("username", &write.username);
    errors.require_non_blank("email", &write.email);
    if let Some(birth_date) = write.birth_date {
        if let Err(err) = validation::validate_birth_date(birth_date, Local::now().date_naive()) {
            errors.push_validation(err);
        }
    }
    errors.into_result()?;

    user.username = write.username;
    user.email = write.email;
    if let Some(first_name) = write.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = write.last_name {
        user.last_name = last_name;
    }
    if let Some(gender) = write.gender {
        user.gender = gender;
    }
    if let Some(birth_date) = write.birth_date {
        user.birth_date = Some(birth_date);
    }
    if let Some(profile_pic) = write.profile_pic {
        // Uploads land in the media tree under the user's own directory.
        user.profile_pic = Some(profile_pic_path(user.user_id, &profile_pic));
    }

    state.data_manager.update_user(&user).await?;

    Ok(Json(user.into()))
}
