//! GitHub Upstream Module
//!
//! The seam between the fetcher and the GitHub REST API.

mod client;

pub use client::{GitHubClient, DEFAULT_API_URL, USER_AGENT};

use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::{GitHubEvent, GitHubRepo, GitHubUser};

/// Anything that can resolve a username to a profile.
///
/// Implemented by [`GitHubClient`] for the real API; tests plug in stubs.
#[async_trait]
pub trait UserSource: Send + Sync + 'static {
    async fn fetch_user(&self, username: &str) -> Result<GitHubUser, FetchError>;

    /// Public repositories, most recently updated first.
    ///
    /// Sources without repository data report none.
    async fn fetch_repos(&self, _username: &str) -> Result<Vec<GitHubRepo>, FetchError> {
        Ok(Vec::new())
    }

    /// Recent public activity, newest first.
    async fn fetch_events(&self, _username: &str) -> Result<Vec<GitHubEvent>, FetchError> {
        Ok(Vec::new())
    }
}
