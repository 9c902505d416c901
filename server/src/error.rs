use std::collections::BTreeMap;

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;

use carpool_data_management::DataManagerError;
use carpool_lib::validation::ValidationError;

/// Request-level failure, mapped onto an HTTP response. Validation errors
/// carry a field -> reasons body, everything else a `detail` message.
#[derive(Debug)]
pub enum ApiError {
    Validation(BTreeMap<String, Vec<String>>),
    AuthenticationRequired,
    PermissionDenied,
    NotFound,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(fields) => {
                (StatusCode::BAD_REQUEST, Json(fields)).into_response()
            }
            ApiError::AuthenticationRequired => (
                StatusCode::FORBIDDEN,
                Json(json!({"detail": "Authentication credentials were not provided."})),
            )
                .into_response(),
            ApiError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                Json(json!({"detail": "You do not have permission to perform this action."})),
            )
                .into_response(),
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"detail": "Internal server error."})),
                )
                    .into_response()
            }
        }
    }
}

impl From<DataManagerError> for ApiError {
    fn from(err: DataManagerError) -> Self {
        match err {
            DataManagerError::Database(msg) => ApiError::Internal(msg),
            DataManagerError::NotFound(_) => ApiError::NotFound,
            DataManagerError::Validation(err) => {
                let mut fields = FieldErrors::new();
                fields.push(validation_field(&err), err.reason());
                ApiError::Validation(fields.0)
            }
        }
    }
}

/// The field key a domain validation reason is reported under.
pub fn validation_field(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::SameOriginAndDestination => "non_field_errors",
        ValidationError::TripDateInPast => "trip_date",
        ValidationError::BirthDateInFuture | ValidationError::UnderMinimumAge => "birth_date",
        ValidationError::DuplicatePlaceName => "name",
    }
}

/// Accumulates per-field reasons so one response can report them all.
#[derive(Debug, Default)]
pub struct FieldErrors(pub BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, reason: &str) {
        self.0.entry(field.to_string()).or_default().push(reason.to_string());
    }

    pub fn push_validation(&mut self, err: ValidationError) {
        self.push(validation_field(&err), err.reason());
    }

    pub fn require_non_blank(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "This field may not be blank");
        }
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.0))
        }
    }
}
