//! Error types for the status API
//!
//! Three layers, all built on thiserror:
//! - [`FetchError`]: the outcome of one upstream lookup, reported per key
//! - [`BatchError`]: a batch rejected before any work was dispatched
//! - [`AppError`]: what a handler returns; renders as a JSON error body

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ApiResponse;

// == Fetch Error ==
/// Failure of a single upstream user lookup. Never cached.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Name rejected before any lookup, e.g. blank after trimming
    #[error("{0}")]
    InvalidUsername(String),

    /// Upstream answered 404
    #[error("GitHub user not found: {0}")]
    NotFound(String),

    /// Upstream answered 403 or 429
    #[error("GitHub API rate limit exceeded: {0}")]
    RateLimited(String),

    /// Upstream answered 401
    #[error("GitHub API rejected credentials: {0}")]
    Unauthorized(String),

    /// Any other non-200 answer
    #[error("GitHub API returned status: {status}")]
    Upstream { status: u16, body: String },

    /// Connection-level failure
    #[error("Error making request: {0}")]
    Network(String),

    /// The call did not finish within the configured bound
    #[error("GitHub API request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// 200 with a body that is not a user record
    #[error("Error parsing JSON: {0}")]
    Malformed(String),

    /// The caller gave up before the lookup finished
    #[error("Request cancelled")]
    Cancelled,

    /// The worker running the lookup died
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FetchError {
    // == Status Code ==
    /// HTTP status a handler answers with when this is the only outcome.
    pub fn status_code(&self) -> StatusCode {
        match self {
            FetchError::InvalidUsername(_) => StatusCode::BAD_REQUEST,
            FetchError::NotFound(_) => StatusCode::NOT_FOUND,
            FetchError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            FetchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            FetchError::Unauthorized(_)
            | FetchError::Upstream { .. }
            | FetchError::Network(_)
            | FetchError::Malformed(_)
            | FetchError::Cancelled
            | FetchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == Batch Error ==
/// Call-level rejection of a batch lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("Usernames array cannot be empty")]
    Empty,

    #[error("Maximum {max} usernames allowed per batch, got {got}")]
    TooLarge { max: usize, got: usize },
}

// == App Error ==
/// Unified handler error.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or invalid request data
    #[error("{0}")]
    InvalidRequest(String),

    /// Lookup against GitHub failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Batch rejected upfront
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// Client exceeded its AI request allowance
    #[error("Rate limit exceeded. Maximum {limit} AI requests per {}s. Please try again later.", .window.as_secs())]
    RateLimited {
        limit: usize,
        remaining: usize,
        window: Duration,
    },

    /// AI upstream failed
    #[error("{0}")]
    Ai(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) | AppError::Batch(_) => StatusCode::BAD_REQUEST,
            AppError::Fetch(err) => err.status_code(),
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Ai(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ApiResponse::failure(self.to_string()));
        let mut response = (status, body).into_response();

        if let AppError::RateLimited {
            limit,
            remaining,
            window,
        } = self
        {
            let headers = response.headers_mut();
            headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
            headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
            headers.insert(header::RETRY_AFTER, HeaderValue::from(window.as_secs()));
        }

        response
    }
}

// == Result Type Alias ==
/// Convenience Result type for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
