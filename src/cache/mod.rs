//! Cache Module
//!
//! Response cache used by the resource controllers: an injected
//! [`CacheBackend`] capability and its in-memory implementation.

mod backend;
mod entry;
mod stats;
mod store;

// Re-export public types
pub use backend::{CacheBackend, MemoryCache};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;

use crate::error::CacheError;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Result type for cache adapter operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
