use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Copy of the product as it was when the order was placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(with = "super::price")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: ProductSnapshot,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "customerId")]
    pub customer_id: String,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: String,
    pub items: Vec<OrderItem>,
}

impl NewOrder {
    /// Orders need at least one line, each with a positive quantity and a
    /// named product snapshot
    pub fn validate(customer_id: String, items: Vec<OrderItem>) -> Result<Self, ValidationError> {
        if items.is_empty() {
            return Err(ValidationError::new("order must contain at least one item"));
        }
        for item in &items {
            if item.quantity == 0 {
                return Err(ValidationError::new("quantity must be a positive integer"));
            }
            if item.product.id.trim().is_empty() || item.product.name.trim().is_empty() {
                return Err(ValidationError::new("ordered product requires _id and name"));
            }
        }
        Ok(Self { customer_id, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(quantity: u32) -> OrderItem {
        OrderItem {
            product: ProductSnapshot {
                id: "0123456789abcdef01234567".into(),
                name: "Lamp".into(),
                price: Decimal::new(1050, 2),
                description: None,
            },
            quantity,
        }
    }

    #[test]
    fn empty_orders_are_rejected() {
        let err = NewOrder::validate("c".into(), vec![]).unwrap_err();
        assert_eq!(err.0, "order must contain at least one item");
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert!(NewOrder::validate("c".into(), vec![item(0)]).is_err());
        assert!(NewOrder::validate("c".into(), vec![item(2)]).is_ok());
    }

    #[test]
    fn order_uses_wire_field_names() {
        let order = Order {
            id: "aaaaaaaabbbbbbbbcccccccc".into(),
            customer_id: "customer01".into(),
            items: vec![item(1)],
        };
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["customerId"], "customer01");
        assert_eq!(value["items"][0]["product"]["_id"], "0123456789abcdef01234567");
        assert_eq!(value["items"][0]["product"]["price"].as_f64(), Some(10.5));
        assert!(value.get("__v").is_none());
    }

    #[test]
    fn negative_quantity_fails_to_deserialize() {
        let raw = json!({
            "product": { "_id": "p1", "name": "Lamp", "price": 1.0 },
            "quantity": -1
        });
        assert!(serde_json::from_value::<OrderItem>(raw).is_err());
    }
}
