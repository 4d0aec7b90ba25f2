//! reqwest-backed client for the GitHub users endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::github::UserSource;
use crate::models::{GitHubEvent, GitHubRepo, GitHubUser};

/// Public GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub rejects requests without a User-Agent
pub const USER_AGENT: &str = "DevScope-API";

/// Page size for the repos and events listings
const PAGE_SIZE: &str = "100";

/// Client for the GitHub users endpoints.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl GitHubClient {
    // == Constructor ==
    /// Builds a client for `base_url`, sending `token` as a bearer token when
    /// present. Every call is bounded by `timeout`.
    ///
    /// A token that cannot be sent as a header value is logged and ignored.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(token) = token {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!(
                    "GITHUB_TOKEN contains characters not allowed in a header, \
                     sending GitHub requests unauthenticated"
                ),
            }
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(
            config.github_api_url.clone(),
            config.github_token.as_deref(),
            config.upstream_timeout,
        )
    }

    /// `{base}/users/{username}[/{resource}]`, each segment escaped.
    fn users_url(&self, username: &str, resource: Option<&str>) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FetchError::Internal(format!("invalid GitHub API URL: {e}")))?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                FetchError::Internal("GitHub API URL cannot take a path".to_string())
            })?;
            segments.pop_if_empty().push("users").push(username);
            if let Some(resource) = resource {
                segments.push(resource);
            }
        }
        Ok(url)
    }

    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(err.to_string())
        }
    }

    // == Get JSON ==
    /// Issues one GET and maps the answer onto [`FetchError`].
    async fn get_json<T: DeserializeOwned>(&self, url: Url, username: &str) -> Result<T, FetchError> {
        debug!(%url, "requesting GitHub resource");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        match status {
            StatusCode::OK => {
                serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))
            }
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(username.to_string())),
            StatusCode::UNAUTHORIZED => {
                warn!(username, "GitHub rejected the configured token");
                Err(FetchError::Unauthorized(body))
            }
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                warn!(username, status = status.as_u16(), "GitHub rate limit hit");
                Err(FetchError::RateLimited(body))
            }
            _ => Err(FetchError::Upstream {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

#[async_trait]
impl UserSource for GitHubClient {
    async fn fetch_user(&self, username: &str) -> Result<GitHubUser, FetchError> {
        let url = self.users_url(username, None)?;
        self.get_json(url, username).await
    }

    async fn fetch_repos(&self, username: &str) -> Result<Vec<GitHubRepo>, FetchError> {
        let mut url = self.users_url(username, Some("repos"))?;
        url.query_pairs_mut()
            .append_pair("per_page", PAGE_SIZE)
            .append_pair("sort", "updated");
        self.get_json(url, username).await
    }

    async fn fetch_events(&self, username: &str) -> Result<Vec<GitHubEvent>, FetchError> {
        let mut url = self.users_url(username, Some("events"))?;
        url.query_pairs_mut().append_pair("per_page", PAGE_SIZE);
        self.get_json(url, username).await
    }
}
