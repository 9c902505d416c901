use std::sync::Arc;

use axum::{extract::FromRequestParts, http::{header::AUTHORIZATION, request::Parts}};

use carpool_lib::user::User;

use crate::server_state::ServerState;

/// The identity behind a request, resolved by the auth collaborator's
/// `Authorization: Bearer <api_token>` header. Anything that doesn't match a
/// stored token is the anonymous sentinel.
#[derive(Debug)]
pub enum Requester {
    Anonymous,
    User(User),
}

impl Requester {
    pub fn user(&self) -> Option<&User> {
        match self {
            Requester::Anonymous => None,
            Requester::User(user) => Some(user),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Requester::Anonymous)
    }
}

impl FromRequestParts<Arc<ServerState>> for Requester {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
        else {
            return Ok(Requester::Anonymous);
        };

        match state.data_manager.get_user_by_token(token).await {
            Ok(Some(user)) => Ok(Requester::User(user)),
            Ok(None) => Ok(Requester::Anonymous),
            Err(err) => {
                tracing::error!("Failed to resolve request identity: {err}");
                Ok(Requester::Anonymous)
            }
        }
    }
}
