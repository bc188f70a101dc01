//! Liveness and store readiness

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` when the user store answered, `degraded` otherwise
    pub status: String,
    pub store: String,
    pub checked_at: String,
}

impl HealthResponse {
    fn from_probe(store_ok: bool) -> (StatusCode, Self) {
        let (code, status, store) = if store_ok {
            (StatusCode::OK, "ok", "reachable")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unreachable")
        };
        (
            code,
            Self {
                status: status.to_string(),
                store: store.to_string(),
                checked_at: Utc::now().to_rfc3339(),
            },
        )
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and user store are up", body = HealthResponse),
        (status = 503, description = "User store did not answer", body = HealthResponse)
    )
)]
pub async fn health_check(
    State(state): State<Arc<GatewayState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let ctx = state.request_context();
    let store_ok = state.auth.check_store(&ctx).await.is_ok();
    let (code, body) = HealthResponse::from_probe(store_ok);
    (code, Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_store_reports_degraded() {
        let (code, body) = HealthResponse::from_probe(false);
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
        assert_eq!(body.store, "unreachable");
    }

    #[test]
    fn reachable_store_reports_ok() {
        let (code, body) = HealthResponse::from_probe(true);
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.store, "reachable");
    }
}
