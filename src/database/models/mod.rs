pub mod order;
pub mod product;
pub mod user;

pub use order::{NewOrder, Order, OrderItem, ProductSnapshot};
pub use product::{NewProduct, Product, ProductUpdate};
pub use user::{NewUser, Role, User};

use thiserror::Error;
use uuid::Uuid;

/// Input rejected by model validation before it reaches a store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Length of generated document identifiers
pub const ID_LENGTH: usize = 24;

/// Generate a document identifier: 24 lowercase hex characters.
///
/// Identifiers must stay inside the `[0-9a-z]{8,24}` shape recognised by the
/// route matcher.
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string().chars().take(ID_LENGTH).collect()
}

/// Prices serialize as JSON numbers rounded to two decimals
pub(crate) mod price {
    use rust_decimal::{Decimal, RoundingStrategy};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rust_decimal::serde::float::serialize(&rounded, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer)
    }
}
