use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Unanchored: any value containing a host-like `name.tld` part is accepted
static IMAGE_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(https?://.)?(www\.)?[-a-zA-Z0-9@:%._+~#=]{2,256}\.[a-z]{2,6}\b([-a-zA-Z0-9@:%_+.~#?&/=]*)",
    )
    .expect("image url pattern compiles")
});

/// Smallest accepted price (one cent)
pub fn min_price() -> Decimal {
    Decimal::new(1, 2)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(with = "super::price")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Partial product modification; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub description: Option<String>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.image.is_none()
            && self.description.is_none()
    }

    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image) = self.image {
            product.image = Some(image);
        }
        if let Some(description) = self.description {
            product.description = Some(description);
        }
    }
}

pub fn validate_product_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::new("name is required"));
    }
    Ok(name.to_string())
}

pub fn validate_price(price: Decimal) -> Result<Decimal, ValidationError> {
    if price < min_price() {
        return Err(ValidationError::new("price must be at least 0.01"));
    }
    Ok(price)
}

pub fn validate_image_url(url: &str) -> Result<String, ValidationError> {
    if !IMAGE_URL_PATTERN.is_match(url) {
        return Err(ValidationError::new("image must be a valid URL"));
    }
    Ok(url.to_string())
}
