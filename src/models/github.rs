//! GitHub records as fetched from `/users/{username}` and its `repos` and
//! `events` sub-resources.

use serde::{Deserialize, Serialize};

/// Public profile fields of a GitHub account.
///
/// Nullable upstream fields stay `Option` so they round-trip as `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub public_gists: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub blog: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub twitter_username: Option<String>,
}

impl GitHubUser {
    /// Display name, falling back to the login.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.login)
    }
}

/// Repository entry from `/users/{username}/repos`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GitHubRepo {
    #[serde(default)]
    pub name: String,
    /// Primary language; `null` for repos GitHub could not classify
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: String,
}

/// Public activity entry from `/users/{username}/events`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GitHubEvent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub created_at: String,
}
