//! Cache Module
//!
//! In-memory cache with a fixed capacity, LRU eviction and a fixed TTL.

mod entry;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use shared::SharedCache;
pub use stats::{hit_rate, CacheStats};
pub use store::CacheStore;
