//! Error responses for the gateway layer

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tollgate_users::{AuthError, StoreError};
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::DataIncomplete | AuthError::PasswordSame => {
                Self::bad_request(error.to_string())
            }
            AuthError::UserDuplicate | AuthError::EmailDuplicate => Self::conflict(error.to_string()),
            AuthError::Store(StoreError::DuplicateKey(ref field)) => {
                let message = if field == "email" {
                    AuthError::EmailDuplicate.to_string()
                } else {
                    AuthError::UserDuplicate.to_string()
                };
                Self::conflict(message)
            }
            AuthError::UserNotFound
            | AuthError::InvalidCredentials
            | AuthError::InvalidAccessToken => Self::unauthorized(error.to_string()),
            AuthError::Store(StoreError::Cancelled | StoreError::DeadlineExceeded) => {
                error!(error = ?error, "request abandoned");
                Self::service_unavailable(error.to_string())
            }
            AuthError::Unknown | AuthError::Store(_) => {
                error!(error = ?error, "auth error");
                Self::internal_server_error(AuthError::Unknown.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: AuthError) -> StatusCode {
        ApiError::from(error).status
    }

    #[test]
    fn auth_errors_map_to_fixed_statuses() {
        assert_eq!(status_of(AuthError::DataIncomplete), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AuthError::PasswordSame), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AuthError::UserDuplicate), StatusCode::CONFLICT);
        assert_eq!(status_of(AuthError::EmailDuplicate), StatusCode::CONFLICT);
        assert_eq!(status_of(AuthError::UserNotFound), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::InvalidAccessToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::Unknown), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            status_of(AuthError::Store(StoreError::DeadlineExceeded)),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn storage_conflicts_name_the_field() {
        let error = ApiError::from(AuthError::Store(StoreError::DuplicateKey("email".into())));
        assert_eq!(error.status, StatusCode::CONFLICT);
        assert_eq!(error.message, AuthError::EmailDuplicate.to_string());
    }

    #[test]
    fn backend_detail_is_not_exposed() {
        let error = ApiError::from(AuthError::Store(StoreError::Backend(
            "disk I/O error at /var/lib/tollgate.db".into(),
        )));
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message, "unknown error");
    }
}
