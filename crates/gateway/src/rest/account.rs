//! Endpoints that require a verified bearer token

use std::sync::Arc;

use axum::{routing::get, Extension, Json, Router};
use serde::Serialize;
use tollgate_users::User;
use utoipa::ToSchema;

use crate::state::GatewayState;

/// Public view of the token's user claim; the digest is never echoed back.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

pub fn create_account_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/me", get(me))
}

#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Account",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User embedded in the access token", body = UserResponse),
        (status = 401, description = "Missing or invalid access token", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(user.into())
}
