//! Record Store Module
//!
//! Persistent collections of categories, products and stock. Controllers see
//! the store only through [`RecordStore`]; each call is atomic on its own.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::resource::Resource;

/// Result type for record store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Record Store Trait ==
/// CRUD access to the records of one resource type.
#[async_trait]
pub trait RecordStore<R: Resource>: Send + Sync + 'static {
    /// All records, ordered by id.
    async fn list(&self) -> StoreResult<Vec<R>>;

    async fn get(&self, id: u64) -> StoreResult<R>;

    /// Persists a new record and returns it with its assigned id.
    async fn insert(&self, payload: R::Payload) -> StoreResult<R>;

    /// Replaces every field of record `id`.
    async fn update(&self, id: u64, payload: R::Payload) -> StoreResult<R>;

    async fn delete(&self, id: u64) -> StoreResult<()>;
}
