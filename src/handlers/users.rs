use serde::Deserialize;
use serde_json::Value;

use crate::api::{ApiResponse, ApiResult};
use crate::auth::password::hash_password;
use crate::database::models::user::{validate_email, validate_name, validate_password};
use crate::database::models::{NewUser, Role, ValidationError};
use crate::database::Store;
use crate::error::ApiError;
use crate::handlers::parse_body;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RegisterPayload {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RolePayload {
    role: Option<Value>,
}

/// POST /api/register - create a customer account
///
/// Any `role` in the payload is ignored; self-registered users are always
/// customers.
pub async fn register(store: &dyn Store, body: Value) -> ApiResult {
    let payload: RegisterPayload = parse_body(body)?;

    let name = validate_name(payload.name.as_deref().unwrap_or_default())?;
    let email = validate_email(payload.email.as_deref().unwrap_or_default())?;
    let password = payload
        .password
        .ok_or_else(|| ValidationError::new("password is required"))?;
    validate_password(&password)?;

    let user = store
        .insert_user(NewUser {
            name,
            email,
            password_hash: hash_password(&password)?,
            role: Role::Customer,
        })
        .await?;

    tracing::info!("Registered user {}", user.id);
    Ok(ApiResponse::created(user))
}

/// GET /api/users
pub async fn list(store: &dyn Store) -> ApiResult {
    Ok(ApiResponse::success(store.list_users().await?))
}

/// GET /api/users/{id}
pub async fn view(store: &dyn Store, id: &str) -> ApiResult {
    let user = store.find_user(id).await?.ok_or(ApiError::NotFound)?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/users/{id} - change a user's role
pub async fn update_role(store: &dyn Store, id: &str, body: Value) -> ApiResult {
    let payload: RolePayload = parse_body(body)?;
    let role: Role = payload
        .role
        .as_ref()
        .and_then(Value::as_str)
        .unwrap_or_default()
        .parse()?;

    let user = store
        .update_user_role(id, role)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!("User {} is now {}", user.id, user.role);
    Ok(ApiResponse::success(user))
}

/// DELETE /api/users/{id}
pub async fn delete(store: &dyn Store, id: &str) -> ApiResult {
    let user = store.delete_user(id).await?.ok_or(ApiError::NotFound)?;

    tracing::info!("Deleted user {}", user.id);
    Ok(ApiResponse::success(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use axum::http::StatusCode;
    use serde_json::json;

    fn registration(email: &str) -> Value {
        json!({
            "name": "  Jane Doe ",
            "email": email,
            "password": "1234567890",
            "role": "admin",
        })
    }

    fn bad_request(err: ApiError) -> String {
        match err {
            ApiError::BadRequest(msg) => msg,
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn register_forces_customer_role() {
        let store = MemoryStore::new();
        let response = register(&store, registration("jane@shop.test")).await.unwrap();

        assert_eq!(response.status_code, StatusCode::CREATED);
        let data = response.data.unwrap();
        assert_eq!(data["role"], "customer");
        assert_eq!(data["name"], "Jane Doe");
        assert!(data.get("password").is_none());
        assert_eq!(data["_id"].as_str().unwrap().len(), 24);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        register(&store, registration("jane@shop.test")).await.unwrap();

        let err = register(&store, registration("jane@shop.test")).await.unwrap_err();
        assert_eq!(bad_request(err), "email already in use");
    }

    #[tokio::test]
    async fn register_validates_fields() {
        let store = MemoryStore::new();

        let err = register(&store, json!({ "email": "a@b.co", "password": "1234567890" }))
            .await
            .unwrap_err();
        assert_eq!(bad_request(err), "name is required");

        let err = register(&store, json!({ "name": "A", "email": "nope", "password": "1234567890" }))
            .await
            .unwrap_err();
        assert_eq!(bad_request(err), "email is not valid");

        let err = register(&store, json!({ "name": "A", "email": "a@b.co", "password": "short" }))
            .await
            .unwrap_err();
        assert!(bad_request(err).starts_with("password must be at least"));
    }

    #[tokio::test]
    async fn role_update_requires_known_role() {
        let store = MemoryStore::new();
        let created = register(&store, registration("jane@shop.test")).await.unwrap();
        let id = created.data.unwrap()["_id"].as_str().unwrap().to_string();

        for body in [json!({}), json!({ "role": "root" }), json!({ "role": 1 })] {
            let err = update_role(&store, &id, body).await.unwrap_err();
            assert_eq!(bad_request(err), "Role Missing or Not Valid");
        }

        let updated = update_role(&store, &id, json!({ "role": " ADMIN " })).await.unwrap();
        assert_eq!(updated.data.unwrap()["role"], "admin");
    }

    #[tokio::test]
    async fn missing_users_are_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(view(&store, "abcd1234").await, Err(ApiError::NotFound)));
        assert!(matches!(delete(&store, "abcd1234").await, Err(ApiError::NotFound)));
        assert!(matches!(
            update_role(&store, "abcd1234", json!({ "role": "admin" })).await,
            Err(ApiError::NotFound)
        ));
    }
}
