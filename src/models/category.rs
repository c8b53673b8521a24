//! Category entity

use serde::{Deserialize, Serialize};

use crate::models::validate_name;
use crate::resource::Resource;

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub description: String,
}

/// Request body for POST and PUT on `/categories/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Request body for PATCH on `/categories/{id}/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Resource for Category {
    const NAME: &'static str = "category";
    const COLLECTION_KEY: &'static str = "categories";
    const ITEM_PREFIX: &'static str = "category";

    type Payload = CategoryPayload;
    type Patch = CategoryPatch;

    fn id(&self) -> u64 {
        self.id
    }

    fn validate(payload: &CategoryPayload) -> Option<String> {
        validate_name(&payload.name)
    }

    fn merge(&self, patch: CategoryPatch) -> CategoryPayload {
        CategoryPayload {
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            description: patch.description.unwrap_or_else(|| self.description.clone()),
        }
    }
}
