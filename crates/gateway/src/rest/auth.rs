//! Authentication REST endpoints

use std::sync::Arc;

use axum::{extract::FromRequest, extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tollgate_users::{ChangePasswordInput, DeleteInput, SignInput, SignUpInput};
use utoipa::ToSchema;

use crate::error::{ApiError, ApiResult};
use crate::state::GatewayState;

/// JSON body extractor that reports malformed payloads as [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignUpRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignInRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default, alias = "oldpassword")]
    pub old_password: String,
    #[serde(default, alias = "password")]
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteAccountRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

impl From<SignUpRequest> for SignUpInput {
    fn from(request: SignUpRequest) -> Self {
        SignUpInput::new(request.username, request.email, request.password)
    }
}

impl From<SignInRequest> for SignInput {
    fn from(request: SignInRequest) -> Self {
        SignInput::new(request.username, request.password)
    }
}

impl From<ChangePasswordRequest> for ChangePasswordInput {
    fn from(request: ChangePasswordRequest) -> Self {
        ChangePasswordInput::new(request.username, request.old_password, request.new_password)
    }
}

impl From<DeleteAccountRequest> for DeleteInput {
    fn from(request: DeleteAccountRequest) -> Self {
        DeleteInput::new(request.username, request.password)
    }
}

/// Create authentication routes
pub fn create_auth_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/change-pass", post(change_password))
        .route("/delete-me", post(delete_me))
}

#[utoipa::path(
    post,
    path = "/auth/sign-up",
    tag = "Auth",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "Missing fields or malformed body", body = crate::error::ErrorResponse),
        (status = 409, description = "Username or email already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn sign_up(
    State(state): State<Arc<GatewayState>>,
    ApiJson(request): ApiJson<SignUpRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let ctx = state.request_context();
    state.auth.sign_up(&ctx, &request.into()).await?;
    Ok(MessageResponse::new("sign up succeeded"))
}

#[utoipa::path(
    post,
    path = "/auth/sign-in",
    tag = "Auth",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 401, description = "Unknown username or wrong password", body = crate::error::ErrorResponse)
    )
)]
pub async fn sign_in(
    State(state): State<Arc<GatewayState>>,
    ApiJson(request): ApiJson<SignInRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let ctx = state.request_context();
    let token = state.auth.sign_in(&ctx, &request.into()).await?;
    Ok(Json(TokenResponse { token }))
}

#[utoipa::path(
    post,
    path = "/auth/change-pass",
    tag = "Auth",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password replaced", body = MessageResponse),
        (status = 400, description = "Missing fields or unchanged password", body = crate::error::ErrorResponse),
        (status = 401, description = "Old credentials did not match", body = crate::error::ErrorResponse)
    )
)]
pub async fn change_password(
    State(state): State<Arc<GatewayState>>,
    ApiJson(request): ApiJson<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let ctx = state.request_context();
    state.auth.change_password(&ctx, &request.into()).await?;
    Ok(MessageResponse::new("password changed"))
}

#[utoipa::path(
    post,
    path = "/auth/delete-me",
    tag = "Auth",
    request_body = DeleteAccountRequest,
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 401, description = "Credentials did not match an account", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_me(
    State(state): State<Arc<GatewayState>>,
    ApiJson(request): ApiJson<DeleteAccountRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let ctx = state.request_context();
    state.auth.delete_account(&ctx, &request.into()).await?;
    Ok(MessageResponse::new("account deleted"))
}
