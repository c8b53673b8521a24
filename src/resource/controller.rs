//! Cached Resource Controller
//!
//! Read-through caching for list/retrieve and invalidate-on-write for
//! create/update/delete, generic over the [`Resource`] type.
//!
//! # Consistency
//! The store write and the cache invalidation are two independent steps with
//! no lock spanning them, and concurrent misses are not coalesced:
//! - two concurrent list misses both query the store and both populate the
//!   collection entry; the last writer wins.
//! - a list miss that read the store before a concurrent write, but populates
//!   after that write's invalidation, leaves a stale collection entry alive
//!   until its TTL runs out.
//! - every miss after expiry goes to the store, however many arrive at once.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::cache::CacheBackend;
use crate::error::{ApiError, Result};
use crate::models::CachedJson;
use crate::resource::Resource;
use crate::store::RecordStore;

// == Cached Resource ==
/// Mediates between the record store and the response cache for one resource.
pub struct CachedResource<R: Resource> {
    store: Arc<dyn RecordStore<R>>,
    cache: Arc<dyn CacheBackend>,
    /// TTL in seconds for entries this controller populates
    ttl: u64,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for CachedResource<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            cache: self.cache.clone(),
            ttl: self.ttl,
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> fmt::Debug for CachedResource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedResource")
            .field("resource", &R::NAME)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl<R: Resource> CachedResource<R> {
    // == Constructor ==
    pub fn new(store: Arc<dyn RecordStore<R>>, cache: Arc<dyn CacheBackend>, ttl: u64) -> Self {
        Self {
            store,
            cache,
            ttl,
            _resource: PhantomData,
        }
    }

    // == List ==
    /// Returns the serialized collection, from cache when present.
    ///
    /// A cached collection is returned as-is; on a miss the store is read and
    /// the collection entry is (re)populated.
    pub async fn list(&self) -> Result<CachedJson> {
        self.list_inner()
            .await
            .map_err(|err| report::<R>("list", None, err))
    }

    async fn list_inner(&self) -> Result<CachedJson> {
        let key = R::COLLECTION_KEY;
        if let Some(cached) = self.cache.get(key).await? {
            info!(resource = R::NAME, key, "Returning cached list");
            return Ok(CachedJson(cached));
        }

        let records = self.store.list().await?;
        let body = to_json(&records)?;
        self.cache.set(key, body.clone(), self.ttl).await?;
        info!(resource = R::NAME, key, count = records.len(), "Caching list");

        Ok(CachedJson(body))
    }

    // == Retrieve ==
    /// Returns the serialized record `id`, from cache when present.
    pub async fn retrieve(&self, id: u64) -> Result<CachedJson> {
        self.retrieve_inner(id)
            .await
            .map_err(|err| report::<R>("retrieve", Some(id), err))
    }

    async fn retrieve_inner(&self, id: u64) -> Result<CachedJson> {
        let key = R::item_key(id);
        if let Some(cached) = self.cache.get(&key).await? {
            info!(resource = R::NAME, id, key = %key, "Returning cached record");
            return Ok(CachedJson(cached));
        }

        let record = self.store.get(id).await?;
        let body = to_json(&record)?;
        self.cache.set(&key, body.clone(), self.ttl).await?;
        info!(resource = R::NAME, id, key = %key, "Caching record");

        Ok(CachedJson(body))
    }

    // == Create ==
    /// Persists a new record and drops the cached collection.
    ///
    /// The new record's item entry is not populated.
    pub async fn create(&self, payload: R::Payload) -> Result<R> {
        self.create_inner(payload)
            .await
            .map_err(|err| report::<R>("create", None, err))
    }

    async fn create_inner(&self, payload: R::Payload) -> Result<R> {
        check::<R>(&payload)?;

        let record = self.store.insert(payload).await?;
        self.cache.delete(R::COLLECTION_KEY).await?;
        info!(
            resource = R::NAME,
            id = record.id(),
            "Created record and invalidated cached list"
        );

        Ok(record)
    }

    // == Update ==
    /// Replaces record `id` and drops both its item entry and the collection.
    pub async fn update(&self, id: u64, payload: R::Payload) -> Result<R> {
        self.update_inner(id, payload)
            .await
            .map_err(|err| report::<R>("update", Some(id), err))
    }

    // == Partial Update ==
    /// Applies `patch` over the stored record `id`, then follows [`Self::update`].
    pub async fn partial_update(&self, id: u64, patch: R::Patch) -> Result<R> {
        self.partial_update_inner(id, patch)
            .await
            .map_err(|err| report::<R>("partial_update", Some(id), err))
    }

    async fn partial_update_inner(&self, id: u64, patch: R::Patch) -> Result<R> {
        let current = self.store.get(id).await?;
        self.update_inner(id, current.merge(patch)).await
    }

    async fn update_inner(&self, id: u64, payload: R::Payload) -> Result<R> {
        check::<R>(&payload)?;

        let record = self.store.update(id, payload).await?;
        self.invalidate(id).await?;
        info!(resource = R::NAME, id, "Updated record and invalidated cache");

        Ok(record)
    }

    // == Delete ==
    /// Removes record `id` and drops both its item entry and the collection.
    ///
    /// A missing record fails before any cache mutation.
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.delete_inner(id)
            .await
            .map_err(|err| report::<R>("delete", Some(id), err))
    }

    async fn delete_inner(&self, id: u64) -> Result<()> {
        self.store.delete(id).await?;
        self.invalidate(id).await?;
        info!(resource = R::NAME, id, "Deleted record and invalidated cache");

        Ok(())
    }

    async fn invalidate(&self, id: u64) -> Result<()> {
        self.cache.delete(&R::item_key(id)).await?;
        self.cache.delete(R::COLLECTION_KEY).await?;
        Ok(())
    }
}

// == Helpers ==
fn check<R: Resource>(payload: &R::Payload) -> Result<()> {
    match R::validate(payload) {
        Some(msg) => Err(ApiError::Validation(msg)),
        None => Ok(()),
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| ApiError::Internal(format!("serialization: {}", e)))
}

/// Logs a failure at the controller boundary and passes it through.
fn report<R: Resource>(operation: &'static str, id: Option<u64>, err: ApiError) -> ApiError {
    match &err {
        ApiError::Internal(detail) => error!(
            resource = R::NAME,
            operation,
            id = ?id,
            error = %detail,
            "Resource operation failed"
        ),
        other => debug!(
            resource = R::NAME,
            operation,
            id = ?id,
            error = %other,
            "Resource operation rejected"
        ),
    }
    err
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheResult, MemoryCache};
    use crate::error::CacheError;
    use crate::models::{Category, CategoryPatch, CategoryPayload, Stock};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn payload(name: &str) -> CategoryPayload {
        CategoryPayload {
            name: name.to_string(),
            description: String::new(),
        }
    }

    fn categories(store: &MemoryStore, cache: &MemoryCache, ttl: u64) -> CachedResource<Category> {
        CachedResource::new(Arc::new(store.clone()), Arc::new(cache.clone()), ttl)
    }

    /// Cache that fails every operation.
    struct BrokenCache;

    #[async_trait]
    impl CacheBackend for BrokenCache {
        async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
            Err(CacheError::Unavailable("connection refused".into()))
        }
        async fn set(&self, _key: &str, _value: String, _ttl: u64) -> CacheResult<()> {
            Err(CacheError::Unavailable("connection refused".into()))
        }
        async fn delete(&self, _key: &str) -> CacheResult<()> {
            Err(CacheError::Unavailable("connection refused".into()))
        }
    }

    /// Store wrapper counting list calls, to tell hits from misses.
    struct CountingStore {
        inner: MemoryStore,
        lists: AtomicUsize,
    }

    #[async_trait]
    impl RecordStore<Category> for CountingStore {
        async fn list(&self) -> crate::store::StoreResult<Vec<Category>> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            RecordStore::<Category>::list(&self.inner).await
        }
        async fn get(&self, id: u64) -> crate::store::StoreResult<Category> {
            RecordStore::<Category>::get(&self.inner, id).await
        }
        async fn insert(&self, p: CategoryPayload) -> crate::store::StoreResult<Category> {
            RecordStore::<Category>::insert(&self.inner, p).await
        }
        async fn update(&self, id: u64, p: CategoryPayload) -> crate::store::StoreResult<Category> {
            RecordStore::<Category>::update(&self.inner, id, p).await
        }
        async fn delete(&self, id: u64) -> crate::store::StoreResult<()> {
            RecordStore::<Category>::delete(&self.inner, id).await
        }
    }

    #[tokio::test]
    async fn test_list_miss_populates_collection_entry() {
        let store = MemoryStore::new();
        let cache = MemoryCache::new();
        let ctrl = categories(&store, &cache, 900);

        ctrl.create(payload("Electronics")).await.unwrap();
        let body = ctrl.list().await.unwrap();

        let direct = RecordStore::<Category>::list(&store).await.unwrap();
        assert_eq!(body.0, serde_json::to_string(&direct).unwrap());
        assert_eq!(cache.get("categories").await.unwrap(), Some(body.0));
    }

    #[tokio::test]
    async fn test_list_hit_skips_store() {
        let counting = Arc::new(CountingStore {
            inner: MemoryStore::new(),
            lists: AtomicUsize::new(0),
        });
        let ctrl: CachedResource<Category> =
            CachedResource::new(counting.clone(), Arc::new(MemoryCache::new()), 900);

        let first = ctrl.list().await.unwrap();
        let second = ctrl.list().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(counting.lists.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cached_list_is_served_as_is() {
        let cache = MemoryCache::new();
        let ctrl = categories(&MemoryStore::new(), &cache, 900);

        cache
            .set("categories", r#"[{"id":77}]"#.to_string(), 900)
            .await
            .unwrap();
        assert_eq!(ctrl.list().await.unwrap().0, r#"[{"id":77}]"#);
    }

    #[tokio::test]
    async fn test_large_collection_is_listed_and_cached() {
        let store = MemoryStore::new();
        let cache = MemoryCache::new();
        let ctrl = categories(&store, &cache, 900);

        for i in 0..12_000 {
            ctrl.create(CategoryPayload {
                name: format!("Category {}", i),
                description: "Electronic items and accessories".into(),
            })
            .await
            .unwrap();
        }

        let first = ctrl.list().await.unwrap();
        assert!(first.0.len() > 1024 * 1024);
        let direct = RecordStore::<Category>::list(&store).await.unwrap();
        assert_eq!(first.0, serde_json::to_string(&direct).unwrap());
        assert!(cache.contains("categories").await);

        let second = ctrl.list().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_large_record_is_retrieved_and_cached() {
        let cache = MemoryCache::new();
        let ctrl = categories(&MemoryStore::new(), &cache, 900);

        let created = ctrl
            .create(CategoryPayload {
                name: "Bulky".into(),
                description: "x".repeat(2 * 1024 * 1024),
            })
            .await
            .unwrap();

        let body = ctrl.retrieve(created.id).await.unwrap();
        let parsed: Category = serde_json::from_str(&body.0).unwrap();
        assert_eq!(parsed, created);
        assert!(cache.contains("category_1").await);
    }

    #[tokio::test]
    async fn test_retrieve_miss_populates_item_entry() {
        let store = MemoryStore::new();
        let cache = MemoryCache::new();
        let ctrl = categories(&store, &cache, 900);

        let created = ctrl.create(payload("Electronics")).await.unwrap();
        assert!(!cache.contains("category_1").await, "create must not populate the item");

        let body = ctrl.retrieve(created.id).await.unwrap();
        let parsed: Category = serde_json::from_str(&body.0).unwrap();
        assert_eq!(parsed, created);
        assert!(cache.contains("category_1").await);
    }

    #[tokio::test]
    async fn test_retrieve_missing_is_not_found_and_not_cached() {
        let cache = MemoryCache::new();
        let ctrl = categories(&MemoryStore::new(), &cache, 900);

        let result = ctrl.retrieve(3).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert!(!cache.contains("category_3").await);
    }

    #[tokio::test]
    async fn test_create_invalidates_collection() {
        let cache = MemoryCache::new();
        let ctrl = categories(&MemoryStore::new(), &cache, 900);

        ctrl.list().await.unwrap();
        assert!(cache.contains("categories").await);

        ctrl.create(payload("Clothing")).await.unwrap();
        assert!(!cache.contains("categories").await);
    }

    #[tokio::test]
    async fn test_update_returns_fresh_value_not_stale_cache() {
        let cache = MemoryCache::new();
        let ctrl = categories(&MemoryStore::new(), &cache, 900);

        let created = ctrl.create(payload("Electronics")).await.unwrap();
        ctrl.retrieve(created.id).await.unwrap();
        ctrl.list().await.unwrap();

        let updated = ctrl.update(created.id, payload("Updated")).await.unwrap();
        assert_eq!(updated.name, "Updated");
        assert!(!cache.contains("category_1").await);
        assert!(!cache.contains("categories").await);

        let body = ctrl.retrieve(created.id).await.unwrap();
        let parsed: Category = serde_json::from_str(&body.0).unwrap();
        assert_eq!(parsed.name, "Updated");
    }

    #[tokio::test]
    async fn test_partial_update_merges_and_invalidates() {
        let cache = MemoryCache::new();
        let ctrl = categories(&MemoryStore::new(), &cache, 900);

        let created = ctrl
            .create(CategoryPayload {
                name: "Electronics".into(),
                description: "Electronic items".into(),
            })
            .await
            .unwrap();
        ctrl.retrieve(created.id).await.unwrap();

        let patched = ctrl
            .partial_update(
                created.id,
                CategoryPatch {
                    name: None,
                    description: Some("Gadgets".into()),
                },
            )
            .await
            .unwrap();

        assert_eq!(patched.name, "Electronics");
        assert_eq!(patched.description, "Gadgets");
        assert!(!cache.contains("category_1").await);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_rejected_before_store() {
        let store = MemoryStore::new();
        let ctrl = categories(&store, &MemoryCache::new(), 900);

        let result = ctrl.create(payload("")).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(RecordStore::<Category>::list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_invalidates_both_entries() {
        let cache = MemoryCache::new();
        let ctrl = categories(&MemoryStore::new(), &cache, 900);

        let created = ctrl.create(payload("Electronics")).await.unwrap();
        ctrl.retrieve(created.id).await.unwrap();
        ctrl.list().await.unwrap();

        ctrl.delete(created.id).await.unwrap();

        assert!(!cache.contains("category_1").await);
        assert!(!cache.contains("categories").await);
        assert!(matches!(
            ctrl.retrieve(created.id).await,
            Err(ApiError::NotFound(_))
        ));
        assert_eq!(ctrl.list().await.unwrap().0, "[]");
    }

    #[tokio::test]
    async fn test_delete_missing_leaves_cache_untouched() {
        let store = MemoryStore::new();
        let cache = MemoryCache::new();
        let ctrl: CachedResource<Stock> =
            CachedResource::new(Arc::new(store), Arc::new(cache.clone()), 900);

        ctrl.list().await.unwrap();

        let result = ctrl.delete(5).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert!(cache.contains("stock").await);
    }

    #[tokio::test]
    async fn test_cache_failure_is_internal() {
        let store = MemoryStore::new();
        let ctrl: CachedResource<Category> =
            CachedResource::new(Arc::new(store.clone()), Arc::new(BrokenCache), 900);

        assert!(matches!(ctrl.list().await, Err(ApiError::Internal(_))));
        assert!(matches!(ctrl.retrieve(1).await, Err(ApiError::Internal(_))));

        // The store write is not rolled back when invalidation fails
        assert!(matches!(
            ctrl.create(payload("Electronics")).await,
            Err(ApiError::Internal(_))
        ));
        assert_eq!(RecordStore::<Category>::list(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_not_found_wins_over_broken_cache_on_delete() {
        let ctrl: CachedResource<Category> =
            CachedResource::new(Arc::new(MemoryStore::new()), Arc::new(BrokenCache), 900);

        assert!(matches!(ctrl.delete(9).await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let counting = Arc::new(CountingStore {
            inner: MemoryStore::new(),
            lists: AtomicUsize::new(0),
        });
        let ctrl: CachedResource<Category> =
            CachedResource::new(counting.clone(), Arc::new(MemoryCache::new()), 1);

        ctrl.list().await.unwrap();
        ctrl.list().await.unwrap();
        assert_eq!(counting.lists.load(Ordering::SeqCst), 1);

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        ctrl.list().await.unwrap();
        assert_eq!(counting.lists.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stale_list_can_outlive_invalidation() {
        // A reader that fetched before a write but populates after it
        let store = MemoryStore::new();
        let cache = MemoryCache::new();
        let ctrl = categories(&store, &cache, 900);

        let before = RecordStore::<Category>::list(&store).await.unwrap();
        ctrl.create(payload("Electronics")).await.unwrap();
        cache
            .set("categories", serde_json::to_string(&before).unwrap(), 900)
            .await
            .unwrap();

        assert_eq!(ctrl.list().await.unwrap().0, "[]");
    }
}
