use crate::api::{ApiResponse, ApiResult};

/// GET /api/cart - cart contents live in the client; the endpoint only
/// confirms the caller may use it
pub fn view() -> ApiResult {
    Ok(ApiResponse::no_content())
}
