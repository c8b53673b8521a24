//! API Handlers
//!
//! HTTP request handlers. The resource handlers are generic over the entity
//! type and only unpack the request before delegating to [`CachedResource`].
//! Body extraction failures become [`ApiError`](crate::error::ApiError)s,
//! so malformed JSON gets the same `{"error": ...}` body as every other error.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::JwtKeys;
use crate::cache::MemoryCache;
use crate::config::Config;
use crate::error::Result;
use crate::models::{CachedJson, Category, HealthResponse, Product, StatsResponse, Stock};
use crate::resource::{CachedResource, Resource};
use crate::store::MemoryStore;

/// Application state shared across all handlers.
///
/// One controller per resource, all sharing the same cache and store.
#[derive(Clone, Debug)]
pub struct AppState {
    pub categories: CachedResource<Category>,
    pub products: CachedResource<Product>,
    pub stock: CachedResource<Stock>,
    /// Shared response cache, kept for statistics and the cleanup task
    pub cache: MemoryCache,
    pub auth: JwtKeys,
}

impl AppState {
    /// Wires the three controllers over the given store and cache.
    pub fn new(store: MemoryStore, cache: MemoryCache, auth: JwtKeys, cache_ttl: u64) -> Self {
        let shared = Arc::new(cache.clone());
        Self {
            categories: CachedResource::new(Arc::new(store.clone()), shared.clone(), cache_ttl),
            products: CachedResource::new(Arc::new(store.clone()), shared.clone(), cache_ttl),
            stock: CachedResource::new(Arc::new(store), shared, cache_ttl),
            cache,
            auth,
        }
    }

    /// Creates a new AppState from configuration with empty in-memory backends.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            MemoryStore::new(),
            MemoryCache::new(),
            JwtKeys::from_secret(config.jwt_secret.as_bytes()),
            config.cache_ttl,
        )
    }
}

// == Resource Handlers ==

/// Handler for `GET /<resource>/`
pub async fn list_handler<R: Resource>(
    State(controller): State<CachedResource<R>>,
) -> Result<CachedJson> {
    controller.list().await
}

/// Handler for `GET /<resource>/{id}/`
pub async fn retrieve_handler<R: Resource>(
    State(controller): State<CachedResource<R>>,
    Path(id): Path<u64>,
) -> Result<CachedJson> {
    controller.retrieve(id).await
}

/// Handler for `POST /<resource>/`
pub async fn create_handler<R: Resource>(
    State(controller): State<CachedResource<R>>,
    payload: std::result::Result<Json<R::Payload>, JsonRejection>,
) -> Result<(StatusCode, Json<R>)> {
    let Json(payload) = payload?;
    let record = controller.create(payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for `PUT /<resource>/{id}/`
pub async fn update_handler<R: Resource>(
    State(controller): State<CachedResource<R>>,
    Path(id): Path<u64>,
    payload: std::result::Result<Json<R::Payload>, JsonRejection>,
) -> Result<Json<R>> {
    let Json(payload) = payload?;
    controller.update(id, payload).await.map(Json)
}

/// Handler for `PATCH /<resource>/{id}/`
pub async fn partial_update_handler<R: Resource>(
    State(controller): State<CachedResource<R>>,
    Path(id): Path<u64>,
    patch: std::result::Result<Json<R::Patch>, JsonRejection>,
) -> Result<Json<R>> {
    let Json(patch) = patch?;
    controller.partial_update(id, patch).await.map(Json)
}

/// Handler for `DELETE /<resource>/{id}/`
pub async fn delete_handler<R: Resource>(
    State(controller): State<CachedResource<R>>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// == Operational Handlers ==

/// Handler for GET /stats
///
/// Returns response cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
