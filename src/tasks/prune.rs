//! Rate Limiter Prune Task
//!
//! Forgets client identities whose request history has aged out, so the
//! limiter's memory tracks active clients only.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::limiter::RateLimiter;

/// Spawns a background task that prunes `limiter` every `interval`.
pub fn spawn_prune_task(limiter: Arc<RateLimiter>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting rate limiter prune task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = limiter.prune().await;

            if removed > 0 {
                info!("Rate limiter prune: forgot {} idle clients", removed);
            } else {
                debug!("Rate limiter prune: no idle clients");
            }
        }
    })
}
