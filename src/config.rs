//! Configuration Module
//!
//! Loads server configuration from environment variables (and a `.env` file
//! when one exists).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::github::DEFAULT_API_URL;

/// Value some deployments leave in `GITHUB_TOKEN`; treated as unset.
const PLACEHOLDER_TOKEN: &str = "YOUR_FINE_GRAINED_TOKEN_HERE";

/// Default chat-completions endpoint for the AI comparison
pub const DEFAULT_AI_API_URL: &str = "https://integrate.api.nvidia.com/v1";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of cached users
    pub cache_capacity: usize,
    /// Lifespan of every cache entry
    pub cache_ttl: Duration,
    /// Interval between background sweeps of expired cache entries
    pub cache_cleanup_interval: Duration,
    /// Maximum usernames accepted by one batch request
    pub max_batch_size: usize,
    /// Bound on every GitHub call
    pub upstream_timeout: Duration,
    pub github_api_url: String,
    pub github_token: Option<String>,
    /// AI requests allowed per client per window
    pub ai_max_requests: usize,
    pub ai_window: Duration,
    /// Interval between background prunes of the AI rate limiter
    pub limiter_prune_interval: Duration,
    pub ai_api_url: String,
    pub ai_api_key: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 8080)
    /// - `MAX_CACHE_SIZE` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_SECS` - Cache entry lifespan (default: 300)
    /// - `CACHE_CLEANUP_SECS` - Expired entry sweep interval (default: 60)
    /// - `MAX_BATCH_SIZE` - Usernames per batch (default: 10)
    /// - `UPSTREAM_TIMEOUT_SECS` - GitHub call timeout (default: 10)
    /// - `GITHUB_API_URL` - GitHub API base (default: https://api.github.com)
    /// - `GITHUB_TOKEN` - Optional bearer token for GitHub
    /// - `AI_RATE_LIMIT` - AI requests per window per client (default: 10)
    /// - `AI_RATE_WINDOW_SECS` - AI rate limit window (default: 60)
    /// - `RATE_LIMIT_PRUNE_SECS` - Limiter prune interval (default: 300)
    /// - `AI_API_URL` - Chat-completions base URL
    /// - `NVIDIA_API_KEY` - Optional AI API key; comparison is disabled without it
    pub fn from_env() -> Self {
        // Missing .env is the normal case in production
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        Self {
            server_port: parse_env("PORT", defaults.server_port),
            cache_capacity: parse_env("MAX_CACHE_SIZE", defaults.cache_capacity),
            cache_ttl: secs_env("CACHE_TTL_SECS", defaults.cache_ttl),
            cache_cleanup_interval: secs_env("CACHE_CLEANUP_SECS", defaults.cache_cleanup_interval),
            max_batch_size: parse_env("MAX_BATCH_SIZE", defaults.max_batch_size),
            upstream_timeout: secs_env("UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout),
            github_api_url: string_env("GITHUB_API_URL").unwrap_or(defaults.github_api_url),
            github_token: string_env("GITHUB_TOKEN").filter(|t| t != PLACEHOLDER_TOKEN),
            ai_max_requests: parse_env("AI_RATE_LIMIT", defaults.ai_max_requests),
            ai_window: secs_env("AI_RATE_WINDOW_SECS", defaults.ai_window),
            limiter_prune_interval: secs_env("RATE_LIMIT_PRUNE_SECS", defaults.limiter_prune_interval),
            ai_api_url: string_env("AI_API_URL").unwrap_or(defaults.ai_api_url),
            ai_api_key: string_env("NVIDIA_API_KEY"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            cache_capacity: 1000,
            cache_ttl: Duration::from_secs(300),
            cache_cleanup_interval: Duration::from_secs(60),
            max_batch_size: 10,
            upstream_timeout: Duration::from_secs(10),
            github_api_url: DEFAULT_API_URL.to_string(),
            github_token: None,
            ai_max_requests: 10,
            ai_window: Duration::from_secs(60),
            limiter_prune_interval: Duration::from_secs(300),
            ai_api_url: DEFAULT_AI_API_URL.to_string(),
            ai_api_key: None,
        }
    }
}

fn parse_env<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn secs_env(name: &str, default: Duration) -> Duration {
    Duration::from_secs(parse_env(name, default.as_secs()))
}

/// Non-blank string variable.
fn string_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
