// HTTP API Error Types
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::password::HashError;
use crate::auth::JwtError;
use crate::database::models::ValidationError;
use crate::database::DatabaseError;

/// Every way a request can end without reaching a successful resource operation.
///
/// Variants carrying a message are rendered as `{"error": message}`; the rest
/// produce an empty body.
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("{0}")]
    BadRequest(String),

    // 401 Unauthorized, optionally with a Basic challenge
    #[error("unauthorized")]
    Unauthorized { challenge: bool },

    // 403 Forbidden
    #[error("forbidden")]
    Forbidden,

    // 404 Not Found
    #[error("not found")]
    NotFound,

    // 405 Method Not Allowed
    #[error("method not allowed")]
    MethodNotAllowed,

    // 406 Not Acceptable
    #[error("not acceptable")]
    NotAcceptable,

    // 500 Internal Server Error
    #[error("{0}")]
    InternalServerError(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// 401 carrying `WWW-Authenticate: Basic`
    pub fn auth_challenge() -> Self {
        ApiError::Unauthorized { challenge: true }
    }

    /// 401 without a challenge, used when a bearer token was rejected
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized { challenge: false }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message, if this error carries one
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::BadRequest(msg) | ApiError::InternalServerError(msg) => Some(msg),
            _ => None,
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Duplicate(_) => ApiError::bad_request("email already in use"),
            other => {
                // Log the real error but return generic message
                tracing::error!("Store error: {}", other);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.0)
    }
}

impl From<HashError> for ApiError {
    fn from(err: HashError) -> Self {
        tracing::error!("Password hashing failed: {}", err);
        ApiError::internal_server_error("Internal server error")
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        tracing::error!("Token issuance failed: {}", err);
        ApiError::internal_server_error("Internal server error")
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut response = match self.message() {
            Some(message) => (status, Json(json!({ "error": message }))).into_response(),
            None => status.into_response(),
        };

        if let ApiError::Unauthorized { challenge: true } = self {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Basic"));
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::auth_challenge().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(ApiError::NotAcceptable.status_code(), StatusCode::NOT_ACCEPTABLE);
    }

    #[test]
    fn challenge_sets_www_authenticate() {
        let response = ApiError::auth_challenge().into_response();
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Basic");

        let response = ApiError::unauthorized().into_response();
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn duplicate_maps_to_email_in_use() {
        let err: ApiError = DatabaseError::Duplicate("users.email".into()).into();
        assert_eq!(err.message(), Some("email already in use"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_messages_pass_through() {
        let err: ApiError = ValidationError::new("name is required").into();
        assert!(matches!(err, ApiError::BadRequest(ref msg) if msg == "name is required"));
    }

    #[test]
    fn store_failures_hide_details() {
        let err: ApiError = DatabaseError::Corrupt("bad row".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), Some("Database error occurred"));
    }
}
