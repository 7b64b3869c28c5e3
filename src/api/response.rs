use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiError;

/// Successful resource operation result. The payload is written as the bare
/// JSON document; there is no envelope.
#[derive(Debug)]
pub struct ApiResponse {
    pub data: Option<Value>,
    pub status_code: StatusCode,
}

impl ApiResponse {
    /// 200 OK with a JSON body
    pub fn success<T: Serialize>(data: T) -> Self {
        Self::with_status(data, StatusCode::OK)
    }

    /// 201 Created with a JSON body
    pub fn created<T: Serialize>(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }

    /// 204 No Content
    pub fn no_content() -> Self {
        Self {
            data: None,
            status_code: StatusCode::NO_CONTENT,
        }
    }

    pub fn with_status<T: Serialize>(data: T, status_code: StatusCode) -> Self {
        match serde_json::to_value(&data) {
            Ok(value) => Self {
                data: Some(value),
                status_code,
            },
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                Self {
                    data: Some(json!({ "error": "Failed to serialize response data" })),
                    status_code: StatusCode::INTERNAL_SERVER_ERROR,
                }
            }
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        match self.data {
            Some(value) if self.status_code != StatusCode::NO_CONTENT => {
                (self.status_code, Json(value)).into_response()
            }
            _ => self.status_code.into_response(),
        }
    }
}

pub type ApiResult = Result<ApiResponse, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(ApiResponse::success(json!([])).status_code, StatusCode::OK);
        assert_eq!(ApiResponse::created(json!({})).status_code, StatusCode::CREATED);

        let empty = ApiResponse::no_content();
        assert!(empty.data.is_none());
        assert_eq!(empty.into_response().status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn body_is_not_enveloped() {
        let response = ApiResponse::success(json!({ "role": "admin" }));
        assert_eq!(response.data, Some(json!({ "role": "admin" })));
    }
}
