use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::product::{validate_image_url, validate_price, validate_product_name};
use crate::database::models::{NewProduct, ProductUpdate, ValidationError};
use crate::database::Store;
use crate::error::ApiError;
use crate::handlers::parse_body;

/// Product fields as sent by clients. Every field is optional here so that
/// creation and partial updates share one shape.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProductPayload {
    name: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    price: Option<Decimal>,
    image: Option<String>,
    description: Option<String>,
}

impl ProductPayload {
    fn into_new_product(self) -> Result<NewProduct, ValidationError> {
        let name = validate_product_name(self.name.as_deref().unwrap_or_default())?;
        let price = self
            .price
            .ok_or_else(|| ValidationError::new("price is required"))
            .and_then(validate_price)?;
        let image = self.image.as_deref().map(validate_image_url).transpose()?;

        Ok(NewProduct {
            name,
            price,
            image,
            description: self.description,
        })
    }

    fn into_update(self) -> Result<ProductUpdate, ValidationError> {
        Ok(ProductUpdate {
            name: self.name.as_deref().map(validate_product_name).transpose()?,
            price: self.price.map(validate_price).transpose()?,
            image: self.image.as_deref().map(validate_image_url).transpose()?,
            description: self.description,
        })
    }
}

/// GET /api/products
pub async fn list(store: &dyn Store) -> ApiResult {
    Ok(ApiResponse::success(store.list_products().await?))
}

/// POST /api/products
pub async fn create(store: &dyn Store, body: Value) -> ApiResult {
    let payload: ProductPayload = parse_body(body)?;
    let product = store.insert_product(payload.into_new_product()?).await?;

    tracing::info!("Created product {}", product.id);
    Ok(ApiResponse::created(product))
}

/// GET /api/products/{id}
pub async fn view(store: &dyn Store, id: &str) -> ApiResult {
    let product = store.find_product(id).await?.ok_or(ApiError::NotFound)?;
    Ok(ApiResponse::success(product))
}

/// PUT /api/products/{id} - partial update; absent fields keep their value
pub async fn update(store: &dyn Store, id: &str, body: Value) -> ApiResult {
    let payload: ProductPayload = parse_body(body)?;
    let update = payload.into_update()?;
    if update.is_empty() {
        return Err(ApiError::bad_request("Product update not Valid"));
    }

    let product = store
        .update_product(id, update)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!("Updated product {}", product.id);
    Ok(ApiResponse::success(product))
}

/// DELETE /api/products/{id}
pub async fn delete(store: &dyn Store, id: &str) -> ApiResult {
    let product = store.delete_product(id).await?.ok_or(ApiError::NotFound)?;

    tracing::info!("Deleted product {}", product.id);
    Ok(ApiResponse::success(product))
}
