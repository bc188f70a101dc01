//! REST API endpoints for the gateway

pub mod account;
pub mod auth;
pub mod health;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use crate::state::GatewayState;

/// Create all REST API routes
pub fn create_rest_routes(state: Arc<GatewayState>) -> Router<Arc<GatewayState>> {
    let protected = account::create_account_routes()
        .route_layer(middleware::from_fn_with_state(state, crate::middleware::auth_middleware));

    Router::new()
        .nest("/auth", auth::create_auth_routes())
        .nest("/api", protected)
        .route("/health", get(health::health_check))
}
