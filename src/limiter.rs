//! Sliding-Window Rate Limiter
//!
//! Caps how many requests each client identity (an IP address in practice)
//! may make within a trailing window. Guards the metered AI upstream.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Per-identity request log over a trailing window.
///
/// One lock covers every identity. Unknown identities behave as if they had
/// made no requests.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    events: RwLock<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            events: RwLock::new(HashMap::new()),
        }
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    // == Allow ==
    /// Records a request for `identity` if it is within its allowance.
    ///
    /// Stale timestamps are dropped either way. Returns `false` when the
    /// identity already has `max_requests` events inside the window; a
    /// rejected call is not recorded.
    pub async fn allow(&self, identity: &str) -> bool {
        let now = Instant::now();
        let mut events = self.events.write().await;
        let timestamps = events.entry(identity.to_string()).or_default();

        self.discard_stale(timestamps, now);

        if timestamps.len() >= self.max_requests {
            debug!(identity, "rate limit reached");
            return false;
        }

        timestamps.push_back(now);
        true
    }

    // == Remaining ==
    /// How many more requests `identity` may make right now. Read-only.
    pub async fn remaining(&self, identity: &str) -> usize {
        let now = Instant::now();
        let events = self.events.read().await;
        let in_window = events
            .get(identity)
            .map(|timestamps| {
                timestamps
                    .iter()
                    .filter(|t| self.in_window(**t, now))
                    .count()
            })
            .unwrap_or(0);

        self.max_requests.saturating_sub(in_window)
    }

    // == Prune ==
    /// Drops stale timestamps for every identity and forgets identities left
    /// with none. Returns how many identities were removed.
    pub async fn prune(&self) -> usize {
        let now = Instant::now();
        let mut events = self.events.write().await;
        let before = events.len();

        events.retain(|_, timestamps| {
            self.discard_stale(timestamps, now);
            !timestamps.is_empty()
        });

        before - events.len()
    }

    /// Number of identities currently tracked.
    pub async fn tracked_identities(&self) -> usize {
        self.events.read().await.len()
    }

    fn in_window(&self, timestamp: Instant, now: Instant) -> bool {
        // Strictly newer than now - window
        now.saturating_duration_since(timestamp) < self.window
    }

    fn discard_stale(&self, timestamps: &mut VecDeque<Instant>, now: Instant) {
        // Timestamps are appended in order, so stale ones sit at the front
        while let Some(oldest) = timestamps.front() {
            if self.in_window(*oldest, now) {
                break;
            }
            timestamps.pop_front();
        }
    }
}
