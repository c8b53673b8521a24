//! Inventory Cache - inventory CRUD API with a read-through response cache
//!
//! Serves categories, products and stock behind JWT bearer authentication.
//! List and detail reads are cached for a fixed TTL; every write drops the
//! affected entries so the next read rebuilds them from the store.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod resource;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use resource::{CachedResource, Resource};
pub use tasks::spawn_cleanup_task;
