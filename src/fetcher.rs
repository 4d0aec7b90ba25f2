//! Concurrent Fan-Out Fetcher
//!
//! Resolves usernames through the cache, falling back to the upstream source,
//! one at a time or as a batch spread over concurrent tasks. The extended
//! lookup adds repos and events fetched side by side.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::SharedCache;
use crate::config::Config;
use crate::error::{BatchError, FetchError};
use crate::github::UserSource;
use crate::insights::{self, ExtendedUser};
use crate::models::{validate_username, GitHubUser};

/// A resolved profile and whether it came out of the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub user: GitHubUser,
    pub cached: bool,
}

/// One slot per distinct submitted key, exactly as it was submitted.
pub type BatchResult = HashMap<String, Result<Fetched, FetchError>>;

/// Cache-then-upstream lookup of GitHub users.
///
/// Concurrent lookups of the same cold key may each reach upstream; there is
/// no request coalescing.
#[derive(Clone)]
pub struct UserFetcher {
    source: Arc<dyn UserSource>,
    cache: SharedCache<GitHubUser>,
    timeout: Duration,
    max_batch_size: usize,
}

impl UserFetcher {
    pub fn new(
        source: Arc<dyn UserSource>,
        cache: SharedCache<GitHubUser>,
        timeout: Duration,
        max_batch_size: usize,
    ) -> Self {
        Self {
            source,
            cache,
            timeout,
            max_batch_size,
        }
    }

    pub fn from_config(
        config: &Config,
        source: Arc<dyn UserSource>,
        cache: SharedCache<GitHubUser>,
    ) -> Self {
        Self::new(source, cache, config.upstream_timeout, config.max_batch_size)
    }

    pub fn cache(&self) -> &SharedCache<GitHubUser> {
        &self.cache
    }

    // == Fetch One ==
    /// Looks up one user.
    ///
    /// With `use_cache`, a valid cache entry is returned as `cached: true` and
    /// a successful upstream answer is stored. Without it the cache is neither
    /// read nor written. Failures are never cached.
    pub async fn fetch_one(&self, username: &str, use_cache: bool) -> Result<Fetched, FetchError> {
        if use_cache {
            if let Some(user) = self.cache.get(username).await {
                debug!(username, "cache hit");
                return Ok(Fetched { user, cached: true });
            }
        }

        let user = match tokio::time::timeout(self.timeout, self.source.fetch_user(username)).await
        {
            Ok(outcome) => outcome?,
            Err(_) => return Err(FetchError::Timeout(self.timeout)),
        };

        if use_cache {
            self.cache.set(username, user.clone()).await;
        }

        Ok(Fetched {
            user,
            cached: false,
        })
    }

    // == Fetch Extended ==
    /// Looks up one user, then their repos and events concurrently, and
    /// derives the tech stack and activity streak.
    ///
    /// The profile lookup decides success. A failed or slow repos or events
    /// call only logs and leaves its part at the empty default.
    pub async fn fetch_extended(
        &self,
        username: &str,
        use_cache: bool,
    ) -> Result<ExtendedUser, FetchError> {
        let fetched = self.fetch_one(username, use_cache).await?;

        let (repos, events) = tokio::join!(
            self.bounded(self.source.fetch_repos(username)),
            self.bounded(self.source.fetch_events(username)),
        );
        let repos = repos.unwrap_or_else(|err| {
            warn!(username, error = %err, "repos lookup failed, tech stack left empty");
            Vec::new()
        });
        let events = events.unwrap_or_else(|err| {
            warn!(username, error = %err, "events lookup failed, streak left empty");
            Vec::new()
        });

        Ok(ExtendedUser {
            user: fetched.user,
            tech_stack: insights::tech_stack(&repos),
            streak: insights::streak(&events, Utc::now().date_naive()),
        })
    }

    /// Applies the upstream timeout to one call.
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or(Err(FetchError::Timeout(self.timeout)))
    }

    // == Fetch Batch ==
    /// Looks up several users concurrently and waits for all of them.
    ///
    /// Rejects an empty list or one longer than the configured maximum before
    /// doing any work. Otherwise every distinct non-empty key gets its own
    /// slot under the exact key submitted, holding either the profile or the
    /// error; individual failures never fail the call. Names are trimmed only
    /// for the lookup itself, so a blank key gets an
    /// [`FetchError::InvalidUsername`] slot without reaching upstream.
    pub async fn fetch_batch(&self, usernames: &[String]) -> Result<BatchResult, BatchError> {
        self.fetch_batch_with_cancel(usernames, CancellationToken::new())
            .await
    }

    /// [`fetch_batch`](Self::fetch_batch) that stops outstanding lookups once
    /// `cancel` fires, filling their slots with [`FetchError::Cancelled`].
    pub async fn fetch_batch_with_cancel(
        &self,
        usernames: &[String],
        cancel: CancellationToken,
    ) -> Result<BatchResult, BatchError> {
        self.validate_batch(usernames)?;

        let keys = distinct_usernames(usernames);
        info!(requested = usernames.len(), distinct = keys.len(), "fetching batch");

        let handles = keys.iter().map(|key| {
            let fetcher = self.clone();
            let key = key.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let username = match validate_username(&key) {
                    Ok(username) => username,
                    Err(message) => return Err(FetchError::InvalidUsername(message)),
                };
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(FetchError::Cancelled),
                    outcome = fetcher.fetch_one(username, true) => outcome,
                }
            })
        });
        let outcomes = join_all(handles).await;

        let results = keys
            .into_iter()
            .zip(outcomes)
            .map(|(key, joined)| {
                let outcome =
                    joined.unwrap_or_else(|e| Err(FetchError::Internal(e.to_string())));
                match &outcome {
                    Ok(fetched) => debug!(%key, cached = fetched.cached, "batch slot filled"),
                    Err(err) => warn!(%key, error = %err, "batch lookup failed"),
                }
                (key, outcome)
            })
            .collect();

        Ok(results)
    }

    fn validate_batch(&self, usernames: &[String]) -> Result<(), BatchError> {
        if usernames.is_empty() {
            return Err(BatchError::Empty);
        }
        if usernames.len() > self.max_batch_size {
            return Err(BatchError::TooLarge {
                max: self.max_batch_size,
                got: usernames.len(),
            });
        }
        Ok(())
    }
}

/// Non-empty keys in first-seen order, each once. Keys are compared exactly.
fn distinct_usernames(usernames: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    usernames
        .iter()
        .filter(|name| !name.is_empty() && seen.insert(name.as_str()))
        .cloned()
        .collect()
}
