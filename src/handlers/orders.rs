use serde::Deserialize;
use serde_json::Value;

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{NewOrder, OrderItem, User};
use crate::database::Store;
use crate::error::ApiError;
use crate::handlers::parse_body;

/// Order as submitted. A client-supplied `customerId` is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrderPayload {
    items: Vec<OrderItem>,
}

/// GET /api/orders - admins see every order, customers their own
pub async fn list(store: &dyn Store, user: &User) -> ApiResult {
    let orders = if user.is_admin() {
        store.list_orders().await?
    } else {
        store.list_orders_for_customer(&user.id).await?
    };
    Ok(ApiResponse::success(orders))
}

/// POST /api/orders
pub async fn create(store: &dyn Store, user: &User, body: Value) -> ApiResult {
    let payload: OrderPayload = parse_body(body)?;
    let order = NewOrder::validate(user.id.clone(), payload.items)?;
    let order = store.insert_order(order).await?;

    tracing::info!("Customer {} placed order {}", user.id, order.id);
    Ok(ApiResponse::created(order))
}

/// GET /api/orders/{id} - another customer's order is reported as missing
pub async fn view(store: &dyn Store, user: &User, id: &str) -> ApiResult {
    let order = store
        .find_order(id)
        .await?
        .filter(|order| user.is_admin() || order.customer_id == user.id)
        .ok_or(ApiError::NotFound)?;
    Ok(ApiResponse::success(order))
}
