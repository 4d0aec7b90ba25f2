//! Request DTOs for the status API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::models::GitHubUser;

/// Longest username GitHub allows
pub const MAX_USERNAME_LENGTH: usize = 39;

/// Request body for `POST /api/status`
#[derive(Debug, Clone, Deserialize)]
pub struct UsernameRequest {
    pub username: String,
}

/// Request body for `POST /api/batch`
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub usernames: Vec<String>,
}

/// Request body for `POST /api/ai/compare`
#[derive(Debug, Clone, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub users: Vec<GitHubUser>,
}

/// Query string accepted by the single-user routes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub no_cache: Option<String>,
}

impl StatusQuery {
    /// Cache is used unless `no_cache=true` was passed.
    pub fn use_cache(&self) -> bool {
        self.no_cache.as_deref() != Some("true")
    }
}

/// Trims a username and checks it is usable as a lookup key.
///
/// Returns the error message on failure.
pub fn validate_username(raw: &str) -> Result<&str, String> {
    let username = raw.trim();
    if username.is_empty() {
        return Err("Username cannot be empty".to_string());
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(format!(
            "Username exceeds maximum length of {} characters",
            MAX_USERNAME_LENGTH
        ));
    }
    Ok(username)
}
