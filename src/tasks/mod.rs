//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Cleanup: Removes expired cache entries at configured intervals
//! - Limiter Prune: Drops rate limiter state for clients gone quiet

mod cleanup;
mod prune;

pub use cleanup::spawn_cleanup_task;
pub use prune::spawn_prune_task;
