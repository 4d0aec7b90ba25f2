//! API Handlers
//!
//! HTTP request handlers for each status API endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, Path, Query, State},
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ai::ComparisonClient;
use crate::api::identity::client_identity;
use crate::cache::{CacheStats, SharedCache};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::fetcher::UserFetcher;
use crate::github::GitHubClient;
use crate::limiter::RateLimiter;
use crate::models::{
    validate_username, ApiResponse, BatchRequest, BatchResponse, CompareRequest,
    CompareResponse, ExtendedResponse, GitHubUser, HealthResponse, MessageResponse, StatusQuery,
    UsernameRequest,
};

/// Comparison text returned when no AI key is configured
pub const AI_UNAVAILABLE: &str = "AI comparison unavailable. NVIDIA API key not configured.";

/// Application state shared across all handlers.
///
/// Built once at startup; every component is injected, nothing is global.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: UserFetcher,
    /// Same cache the fetcher reads through
    pub cache: SharedCache<GitHubUser>,
    /// Gate in front of the AI upstream
    pub limiter: Arc<RateLimiter>,
    /// `None` when no AI key is configured
    pub ai: Option<ComparisonClient>,
    pub started_at: Instant,
}

impl AppState {
    /// Creates a new AppState around an already wired fetcher.
    pub fn new(
        fetcher: UserFetcher,
        limiter: Arc<RateLimiter>,
        ai: Option<ComparisonClient>,
    ) -> Self {
        Self {
            cache: fetcher.cache().clone(),
            fetcher,
            limiter,
            ai,
            started_at: Instant::now(),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the cache, the GitHub client, the limiter and (with a key) the
    /// AI client. Fails only if an HTTP client cannot be constructed.
    pub fn from_config(config: &Config) -> std::result::Result<Self, reqwest::Error> {
        let cache = SharedCache::new(config.cache_capacity, config.cache_ttl);
        let github = Arc::new(GitHubClient::from_config(config)?);
        let fetcher = UserFetcher::from_config(config, github, cache);
        let limiter = Arc::new(RateLimiter::new(config.ai_max_requests, config.ai_window));
        let ai = ComparisonClient::from_config(config)?;

        Ok(Self::new(fetcher, limiter, ai))
    }
}

/// Unwraps a JSON body, turning axum's rejection into our JSON error shape.
fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        debug!(error = %rejection.body_text(), "rejected request body");
        AppError::InvalidRequest("Invalid request body".to_string())
    })
}

async fn lookup(state: &AppState, raw_username: &str, use_cache: bool) -> Result<Json<ApiResponse>> {
    let username = validate_username(raw_username).map_err(AppError::InvalidRequest)?;
    let fetched = state.fetcher.fetch_one(username, use_cache).await?;

    Ok(Json(fetched.into()))
}

/// Handler for GET /
pub async fn home_handler() -> Json<Value> {
    Json(json!({
        "service": "DevScope GitHub Status API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /api/health": "Service health",
            "GET /api/cache/stats": "Cache statistics",
            "POST /api/cache/clear": "Empty the cache",
            "GET /api/status/:username": "Look up one user (?no_cache=true bypasses the cache)",
            "POST /api/status": "Look up one user from {\"username\": ...}",
            "GET /api/user/:username": "Profile with tech stack and activity streak",
            "POST /api/batch": "Look up several users from {\"usernames\": [...]}",
            "POST /api/ai/compare": "AI comparison of {\"users\": [...]}"
        }
    }))
}

/// Handler for GET /api/health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache_size = state.cache.len().await;
    Json(HealthResponse::healthy(
        cache_size,
        state.started_at.elapsed().as_secs_f64(),
    ))
}

/// Handler for GET /api/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats().await)
}

/// Handler for POST /api/cache/clear
pub async fn cache_clear_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.cache.clear().await;
    info!("cache cleared on request");
    Json(MessageResponse::new("Cache cleared successfully"))
}

/// Handler for GET /api/status/:username
pub async fn status_by_path_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<ApiResponse>> {
    lookup(&state, &username, query.use_cache()).await
}

/// Handler for POST /api/status
pub async fn status_by_body_handler(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
    payload: std::result::Result<Json<UsernameRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>> {
    let req = json_body(payload)?;
    lookup(&state, &req.username, query.use_cache()).await
}

/// Handler for GET /api/user/:username and GET /api/user/:username/extended
pub async fn user_extended_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<ExtendedResponse>> {
    let username = validate_username(&username).map_err(AppError::InvalidRequest)?;
    let extended = state
        .fetcher
        .fetch_extended(username, query.use_cache())
        .await?;

    Ok(Json(extended.into()))
}

/// Handler for POST /api/batch
///
/// Individual lookup failures come back inside `results`; only an empty or
/// oversized list fails the request. Outstanding lookups stop when the
/// request is dropped, e.g. because the client disconnected.
pub async fn batch_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>> {
    let req = json_body(payload)?;

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    let results = state
        .fetcher
        .fetch_batch_with_cancel(&req.usernames, cancel)
        .await?;

    Ok(Json(results.into()))
}

/// Handler for POST /api/ai/compare
///
/// Every call counts against the caller's allowance before the body is even
/// looked at.
pub async fn ai_compare_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    payload: std::result::Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Response> {
    let identity = client_identity(&headers, peer.map(|ConnectInfo(addr)| addr));
    let limit = state.limiter.max_requests();

    if !state.limiter.allow(&identity).await {
        warn!(client = %identity, "AI rate limit exceeded");
        return Err(AppError::RateLimited {
            limit,
            remaining: state.limiter.remaining(&identity).await,
            window: state.limiter.window(),
        });
    }
    let remaining = state.limiter.remaining(&identity).await;

    let req = json_body(payload)?;
    info!(client = %identity, users = req.users.len(), "AI comparison requested");

    let comparison = match &state.ai {
        Some(client) => client.compare(&req.users).await?,
        None => {
            warn!("AI API key not configured");
            AI_UNAVAILABLE.to_string()
        }
    };

    let mut response = Json(CompareResponse::new(comparison)).into_response();
    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));

    Ok(response)
}
