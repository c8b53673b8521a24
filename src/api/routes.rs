//! API Routes
//!
//! Configures the Axum router with the inventory resources and the
//! operational endpoints.

use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_handler, delete_handler, health_handler, list_handler, partial_update_handler,
    retrieve_handler, stats_handler, update_handler, AppState,
};
use crate::auth::require_bearer;
use crate::resource::{CachedResource, Resource};

/// Mount point of the resource routes.
pub const API_PREFIX: &str = "/api/v1";

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET|POST /api/v1/categories/`, `GET|PUT|PATCH|DELETE /api/v1/categories/:id/`
/// - the same for `/api/v1/item/` (products) and `/api/v1/stock/`
/// - `GET /stats` - Response cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Bearer JWT required on every `/api/v1/` route
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let resources = Router::new()
        .merge(resource_routes("categories", state.categories.clone()))
        .merge(resource_routes("item", state.products.clone()))
        .merge(resource_routes("stock", state.stock.clone()))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            require_bearer,
        ));

    Router::new()
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .merge(resources)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Collection and item routes for one resource, bound to its controller.
fn resource_routes<R: Resource>(segment: &str, controller: CachedResource<R>) -> Router {
    let collection = format!("{}/{}/", API_PREFIX, segment);
    let item = format!("{}/{}/:id/", API_PREFIX, segment);

    Router::new()
        .route(&collection, get(list_handler::<R>).post(create_handler::<R>))
        .route(
            &item,
            get(retrieve_handler::<R>)
                .put(update_handler::<R>)
                .patch(partial_update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(controller)
}
