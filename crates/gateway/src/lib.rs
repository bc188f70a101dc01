//! # Tollgate Gateway Crate
//!
//! HTTP delivery layer for Tollgate. Translates JSON requests into calls on
//! the authentication use case and maps its errors onto status codes.
//!
//! ## Architecture
//!
//! - **REST**: `/auth/*` account endpoints, the bearer-guarded `/api` group, and health
//! - **State**: the shared use case plus the per-request timeout
//! - **Middleware**: bearer verification, request logging, CORS
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tollgate_config::AuthConfig;
//! use tollgate_gateway::{create_router, GatewayState};
//! use tollgate_users::{AuthUseCase, InMemoryUserStore};
//!
//! # async fn run() -> std::io::Result<()> {
//! let auth = AuthUseCase::new(Arc::new(InMemoryUserStore::new()), &AuthConfig::default());
//! let app = create_router(GatewayState::new(Arc::new(auth), Duration::from_secs(10)));
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:7070").await?;
//! axum::serve(listener, app).await
//! # }
//! ```

pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod util;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use middleware::auth_middleware;
pub use state::GatewayState;
pub use util::require_bearer;

use std::sync::Arc;

use axum::{middleware as axum_middleware, routing::get, Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        rest::auth::sign_up,
        rest::auth::sign_in,
        rest::auth::change_password,
        rest::auth::delete_me,
        rest::account::me,
        rest::health::health_check,
    ),
    components(
        schemas(
            rest::auth::SignUpRequest,
            rest::auth::SignInRequest,
            rest::auth::ChangePasswordRequest,
            rest::auth::DeleteAccountRequest,
            rest::auth::TokenResponse,
            rest::auth::MessageResponse,
            rest::account::UserResponse,
            rest::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Auth", description = "Account lifecycle"),
        (name = "Account", description = "Endpoints behind a bearer token"),
        (name = "Health", description = "Liveness probe"),
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

async fn openapi_document() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let state = Arc::new(state);

    rest::create_rest_routes(state.clone())
        .route("/api-docs/openapi.json", get(openapi_document))
        .with_state(state)
        .layer(middleware::create_cors_middleware())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
