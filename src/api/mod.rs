//! API Module
//!
//! HTTP handlers and routing for the inventory REST API.
//!
//! # Endpoints
//! - `/api/v1/categories/` - Categories (bearer token required)
//! - `/api/v1/item/` - Products (bearer token required)
//! - `/api/v1/stock/` - Stock levels (bearer token required)
//! - `GET /stats` - Response cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_router, API_PREFIX};
