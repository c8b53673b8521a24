//! Stock entity

use serde::{Deserialize, Serialize};

use crate::resource::Resource;

/// On-hand quantity of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub id: u64,
    /// Id of the stocked [`Product`](crate::models::Product)
    pub product: u64,
    pub quantity: u64,
}

/// Request body for POST and PUT on `/stock/`.
#[derive(Debug, Clone, Deserialize)]
pub struct StockPayload {
    pub product: u64,
    pub quantity: u64,
}

/// Request body for PATCH on `/stock/{id}/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockPatch {
    pub product: Option<u64>,
    pub quantity: Option<u64>,
}

impl Resource for Stock {
    const NAME: &'static str = "stock";
    const COLLECTION_KEY: &'static str = "stock";
    const ITEM_PREFIX: &'static str = "stock";

    type Payload = StockPayload;
    type Patch = StockPatch;

    fn id(&self) -> u64 {
        self.id
    }

    // Quantity is unsigned and the product reference is checked by the store
    fn validate(_payload: &StockPayload) -> Option<String> {
        None
    }

    fn merge(&self, patch: StockPatch) -> StockPayload {
        StockPayload {
            product: patch.product.unwrap_or(self.product),
            quantity: patch.quantity.unwrap_or(self.quantity),
        }
    }
}
