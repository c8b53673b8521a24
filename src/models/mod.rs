//! Inventory entities and HTTP DTOs
//!
//! Each entity module defines the stored record, its create/update payload,
//! its partial-update patch and the [`Resource`](crate::resource::Resource)
//! wiring that gives it cache keys.

pub mod category;
pub mod product;
pub mod responses;
pub mod stock;

// Re-export commonly used types
pub use category::{Category, CategoryPatch, CategoryPayload};
pub use product::{Product, ProductPatch, ProductPayload};
pub use responses::{CachedJson, ErrorResponse, HealthResponse, StatsResponse};
pub use stock::{Stock, StockPatch, StockPayload};

/// Maximum length of a `name` field, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Shared check for the `name` field of categories and products.
pub(crate) fn validate_name(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        return Some("name: This field may not be blank.".to_string());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Some(format!(
            "name: Ensure this field has no more than {} characters.",
            MAX_NAME_LENGTH
        ));
    }
    None
}
