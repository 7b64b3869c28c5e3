use serde_json::json;

use crate::api::{ApiResponse, ApiResult};
use crate::auth::{generate_jwt, Claims};
use crate::config::SecurityConfig;
use crate::database::models::User;

/// GET /api/login - exchange Basic credentials for a bearer token
pub fn login(user: &User, password: &str, security: &SecurityConfig) -> ApiResult {
    let claims = Claims::new(
        user.email.clone(),
        password.to_string(),
        security.jwt_expiry_hours,
    );
    let token = generate_jwt(&claims, security)?;

    tracing::info!("Issued token for user {}", user.id);
    Ok(ApiResponse::success(json!({
        "token": token,
        "role": user.role,
    })))
}

/// GET /api/authorize - report the caller's role
pub fn authorize(user: &User) -> ApiResult {
    Ok(ApiResponse::success(json!({ "role": user.role })))
}
