//! Resource Module
//!
//! The per-entity description ([`Resource`]) and the generic read-through,
//! invalidate-on-write controller built on it ([`CachedResource`]).

mod controller;


pub use controller::CachedResource;

use serde::{de::DeserializeOwned, Serialize};

// == Resource Trait ==
/// An inventory entity served through a [`CachedResource`].
///
/// The cache key constants are shared with existing deployments and must not
/// change: a list lives under `COLLECTION_KEY`, a single record under
/// `<ITEM_PREFIX>_<id>`.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Singular name used in logs and error messages
    const NAME: &'static str;
    /// Cache key of the full collection
    const COLLECTION_KEY: &'static str;
    /// Prefix of per-record cache keys
    const ITEM_PREFIX: &'static str;

    /// Body accepted by create and full update
    type Payload: DeserializeOwned + Clone + Send + Sync + 'static;
    /// Body accepted by partial update; every field optional
    type Patch: DeserializeOwned + Send + Sync + 'static;

    fn id(&self) -> u64;

    /// Returns an error message if the payload is unacceptable, None if valid.
    fn validate(payload: &Self::Payload) -> Option<String>;

    /// Builds a full payload from this record with `patch` applied on top.
    fn merge(&self, patch: Self::Patch) -> Self::Payload;

    /// Cache key for the record with `id`.
    fn item_key(id: u64) -> String {
        format!("{}_{}", Self::ITEM_PREFIX, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Product, Stock};

    #[test]
    fn test_cache_key_namespace() {
        assert_eq!(Category::COLLECTION_KEY, "categories");
        assert_eq!(Category::item_key(1), "category_1");
        assert_eq!(Product::COLLECTION_KEY, "products");
        assert_eq!(Product::item_key(42), "product_42");
        assert_eq!(Stock::COLLECTION_KEY, "stock");
        assert_eq!(Stock::item_key(5), "stock_5");
    }
}
