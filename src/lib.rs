//! DevScope - GitHub profile status API
//!
//! Serves GitHub user profiles through a bounded TTL/LRU cache, fans batch
//! lookups out over concurrent tasks, and fronts a metered AI comparison
//! upstream with a per-client sliding-window rate limiter.

pub mod ai;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod github;
pub mod insights;
pub mod limiter;
pub mod models;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::{CacheStats, CacheStore, SharedCache};
pub use config::Config;
pub use error::{AppError, BatchError, FetchError};
pub use fetcher::{BatchResult, Fetched, UserFetcher};
pub use github::{GitHubClient, UserSource};
pub use insights::{ExtendedUser, StreakInfo, TechStack};
pub use limiter::RateLimiter;
pub use tasks::{spawn_cleanup_task, spawn_prune_task};
