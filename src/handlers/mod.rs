// Resource operations invoked by the dispatcher once routing, authentication
// and authorization have succeeded. Each operation returns the complete
// response; failures surface as `ApiError`.
pub mod cart;
pub mod orders;
pub mod products;
pub mod session;
pub mod users;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Decode an already-parsed JSON body into an operation payload
pub(crate) fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))
}
