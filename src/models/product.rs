//! Product entity

use serde::{Deserialize, Serialize};

use crate::models::validate_name;
use crate::resource::Resource;

/// A sellable item belonging to one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    /// Id of the owning [`Category`](crate::models::Category)
    pub category: u64,
    pub price: f64,
    pub description: String,
}

/// Request body for POST and PUT on `/item/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub category: u64,
    pub price: f64,
    #[serde(default)]
    pub description: String,
}

/// Request body for PATCH on `/item/{id}/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<u64>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

impl Resource for Product {
    const NAME: &'static str = "product";
    const COLLECTION_KEY: &'static str = "products";
    const ITEM_PREFIX: &'static str = "product";

    type Payload = ProductPayload;
    type Patch = ProductPatch;

    fn id(&self) -> u64 {
        self.id
    }

    fn validate(payload: &ProductPayload) -> Option<String> {
        if let Some(msg) = validate_name(&payload.name) {
            return Some(msg);
        }
        if !payload.price.is_finite() || payload.price < 0.0 {
            return Some("price: Ensure this value is a non-negative number.".to_string());
        }
        None
    }

    fn merge(&self, patch: ProductPatch) -> ProductPayload {
        ProductPayload {
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            category: patch.category.unwrap_or(self.category),
            price: patch.price.unwrap_or(self.price),
            description: patch.description.unwrap_or_else(|| self.description.clone()),
        }
    }
}
