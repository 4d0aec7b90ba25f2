//! Response DTOs for the status API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::FetchError;
use crate::fetcher::{BatchResult, Fetched};
use crate::insights::ExtendedUser;
use crate::models::GitHubUser;

/// Envelope for single-user answers and for every error body.
///
/// `{"error": false, "cached": true, "data": {...}}` on success,
/// `{"error": true, "message": "..."}` on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub error: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<GitHubUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    pub fn success(user: GitHubUser, cached: bool) -> Self {
        Self {
            error: false,
            cached,
            data: Some(user),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            cached: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

impl From<Fetched> for ApiResponse {
    fn from(fetched: Fetched) -> Self {
        Self::success(fetched.user, fetched.cached)
    }
}

impl From<Result<Fetched, FetchError>> for ApiResponse {
    fn from(outcome: Result<Fetched, FetchError>) -> Self {
        match outcome {
            Ok(fetched) => fetched.into(),
            Err(err) => Self::failure(err.to_string()),
        }
    }
}

/// Response body for `POST /api/batch`
#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub error: bool,
    pub results: HashMap<String, ApiResponse>,
}

impl From<BatchResult> for BatchResponse {
    fn from(results: BatchResult) -> Self {
        Self {
            error: false,
            results: results
                .into_iter()
                .map(|(username, outcome)| (username, outcome.into()))
                .collect(),
        }
    }
}

/// Response body for `GET /api/user/:username`
#[derive(Debug, Clone, Serialize)]
pub struct ExtendedResponse {
    pub error: bool,
    pub data: ExtendedUser,
}

impl From<ExtendedUser> for ExtendedResponse {
    fn from(data: ExtendedUser) -> Self {
        Self { error: false, data }
    }
}

/// Response body for `POST /api/ai/compare`
#[derive(Debug, Clone, Serialize)]
pub struct CompareResponse {
    pub error: bool,
    pub comparison: String,
}

impl CompareResponse {
    pub fn new(comparison: impl Into<String>) -> Self {
        Self {
            error: false,
            comparison: comparison.into(),
        }
    }
}

/// Response body for `GET /api/health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    pub server: String,
    pub cache_enabled: bool,
    pub cache_size: usize,
    /// Seconds since startup, two decimals
    pub uptime_seconds: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy(cache_size: usize, uptime_secs: f64) -> Self {
        Self {
            status: "healthy".to_string(),
            server: "running".to_string(),
            cache_enabled: true,
            cache_size,
            uptime_seconds: format!("{:.2}", uptime_secs),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Plain acknowledgement body, e.g. for `POST /api/cache/clear`
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn octocat() -> GitHubUser {
        GitHubUser {
            login: "octocat".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_success_omits_message_and_false_cached() {
        let json = serde_json::to_value(ApiResponse::success(octocat(), false)).unwrap();

        assert_eq!(json["error"], false);
        assert_eq!(json["data"]["login"], "octocat");
        assert!(json.get("cached").is_none());
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_cached_flag_serialized_when_true() {
        let json = serde_json::to_value(ApiResponse::success(octocat(), true)).unwrap();
        assert_eq!(json["cached"], true);
    }

    #[test]
    fn test_failure_from_fetch_error() {
        let outcome: Result<Fetched, FetchError> = Err(FetchError::NotFound("ghost".into()));
        let json = serde_json::to_value(ApiResponse::from(outcome)).unwrap();

        assert_eq!(json["error"], true);
        assert_eq!(json["message"], "GitHub user not found: ghost");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_batch_response_keeps_every_key() {
        let mut results = BatchResult::new();
        results.insert(
            "octocat".into(),
            Ok(Fetched {
                user: octocat(),
                cached: true,
            }),
        );
        results.insert("ghost".into(), Err(FetchError::NotFound("ghost".into())));

        let json = serde_json::to_value(BatchResponse::from(results)).unwrap();
        assert_eq!(json["error"], false);
        assert_eq!(json["results"].as_object().unwrap().len(), 2);
        assert_eq!(json["results"]["octocat"]["cached"], true);
        assert_eq!(json["results"]["ghost"]["error"], true);
    }

    #[test]
    fn test_extended_response_shape() {
        let extended = ExtendedUser {
            user: octocat(),
            tech_stack: Default::default(),
            streak: Default::default(),
        };

        let json = serde_json::to_value(ExtendedResponse::from(extended)).unwrap();
        assert_eq!(json["error"], false);
        assert_eq!(json["data"]["user"]["login"], "octocat");
        assert_eq!(json["data"]["tech_stack"]["top_language"], "");
        assert_eq!(json["data"]["streak"]["last_active"], "");
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_value(HealthResponse::healthy(3, 12.3456)).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["cache_size"], 3);
        assert_eq!(json["uptime_seconds"], "12.35");
        assert!(json.get("timestamp").is_some());
    }
}
