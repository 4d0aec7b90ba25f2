//! Integration Tests for API Endpoints
//!
//! Runs the full router, built from a `Config`, against wiremock stand-ins for
//! the GitHub and AI upstreams.

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use devscope::{api::create_router, AppState, Config};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// == Helper Functions ==

fn test_config(github: &MockServer) -> Config {
    Config {
        github_api_url: github.uri(),
        upstream_timeout: Duration::from_secs(2),
        max_batch_size: 3,
        ai_max_requests: 2,
        ai_window: Duration::from_secs(60),
        ..Config::default()
    }
}

fn create_test_app(config: &Config) -> Router {
    create_router(AppState::from_config(config).unwrap())
}

async fn mount_user(server: &MockServer, login: &str, followers: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/users/{login}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": login,
            "name": login.to_uppercase(),
            "followers": followers,
            "public_repos": 4,
            "created_at": "2018-04-10T08:00:00Z"
        })))
        .mount(server)
        .await;
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value, axum::http::HeaderMap) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap(), headers)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// == Status Endpoint Tests ==

#[tokio::test]
async fn test_status_miss_then_hit() {
    let github = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"login": "octocat"})))
        .expect(1)
        .mount(&github)
        .await;
    let app = create_test_app(&test_config(&github));

    let (status, first, _) = send(&app, get("/api/status/octocat")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["login"], "octocat");
    assert!(first.get("cached").is_none());

    let (_, second, _) = send(&app, post("/api/status", json!({"username": "octocat"}))).await;
    assert_eq!(second["cached"], true);

    let (_, stats, _) = send(&app, get("/api/cache/stats")).await;
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["size"], 1);
    assert_eq!(stats["hit_rate"], 50.0);
}

#[tokio::test]
async fn test_status_no_cache_always_hits_upstream() {
    let github = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"login": "octocat"})))
        .expect(2)
        .mount(&github)
        .await;
    let app = create_test_app(&test_config(&github));

    for _ in 0..2 {
        let (status, body, _) = send(&app, get("/api/status/octocat?no_cache=true")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("cached").is_none());
    }

    let (_, health, _) = send(&app, get("/api/health")).await;
    assert_eq!(health["cache_size"], 0);
}

#[tokio::test]
async fn test_status_upstream_failures() {
    let github = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&github)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/busy"))
        .respond_with(ResponseTemplate::new(403).set_body_string("rate limit"))
        .mount(&github)
        .await;
    let app = create_test_app(&test_config(&github));

    // Failures are not cached, so both calls reach upstream
    for _ in 0..2 {
        let (status, body, _) = send(&app, get("/api/status/ghost")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "GitHub user not found: ghost");
    }

    let (status, _, _) = send(&app, get("/api/status/busy")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_status_rejects_overlong_username() {
    let github = MockServer::start().await;
    let app = create_test_app(&test_config(&github));

    let (status, body, _) = send(
        &app,
        post("/api/status", json!({"username": "x".repeat(40)})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
}

// == Extended User Endpoint Tests ==

#[tokio::test]
async fn test_user_extended_aggregates_repos_and_events() {
    let github = MockServer::start().await;
    mount_user(&github, "alice", 10).await;
    Mock::given(method("GET"))
        .and(path("/users/alice/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "a", "language": "Rust"},
            {"name": "b", "language": "TypeScript"},
            {"name": "c", "language": "Rust"},
            {"name": "d", "language": null}
        ])))
        .expect(1)
        .mount(&github)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/alice/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"type": "PushEvent", "created_at": "2023-03-02T10:00:00Z"},
            {"type": "PushEvent", "created_at": "2023-03-01T18:00:00Z"},
            {"type": "IssuesEvent", "created_at": "2023-03-01T09:00:00Z"}
        ])))
        .expect(1)
        .mount(&github)
        .await;
    let app = create_test_app(&test_config(&github));

    let (status, body, _) = send(&app, get("/api/user/alice")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], false);
    let data = &body["data"];
    assert_eq!(data["user"]["followers"], 10);
    assert_eq!(data["tech_stack"]["total_repos"], 4);
    assert_eq!(data["tech_stack"]["languages"]["Rust"], 2);
    assert_eq!(data["tech_stack"]["top_language"], "Rust");
    assert_eq!(data["streak"]["longest_streak"], 2);
    assert_eq!(data["streak"]["total_days"], 2);
    assert_eq!(data["streak"]["last_active"], "2023-03-02");
}

#[tokio::test]
async fn test_user_extended_side_call_failure_falls_back() {
    let github = MockServer::start().await;
    mount_user(&github, "alice", 10).await;
    Mock::given(method("GET"))
        .and(path("/users/alice/repos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&github)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/alice/events"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&github)
        .await;
    let app = create_test_app(&test_config(&github));

    let (status, body, _) = send(&app, get("/api/user/alice")).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["user"]["login"], "alice");
    assert_eq!(data["tech_stack"]["total_repos"], 0);
    assert_eq!(data["tech_stack"]["top_language"], "");
    assert_eq!(data["streak"]["current_streak"], 0);
    assert_eq!(data["streak"]["last_active"], "");

    // The profile itself was cached by the extended lookup
    let (_, again, _) = send(&app, get("/api/status/alice")).await;
    assert_eq!(again["cached"], true);
}

// == Batch Endpoint Tests ==

#[tokio::test]
async fn test_batch_mixed_outcomes() {
    let github = MockServer::start().await;
    mount_user(&github, "alice", 10).await;
    mount_user(&github, "bob", 20).await;
    Mock::given(method("GET"))
        .and(path("/users/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&github)
        .await;
    let app = create_test_app(&test_config(&github));

    let (status, body, _) = send(
        &app,
        post("/api/batch", json!({"usernames": ["alice", "bob", "ghost"]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], false);
    let results = body["results"].as_object().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results["alice"]["data"]["followers"], 10);
    assert_eq!(results["bob"]["data"]["followers"], 20);
    assert_eq!(results["ghost"]["error"], true);

    // Successful batch members land in the cache
    let (_, again, _) = send(&app, get("/api/status/alice")).await;
    assert_eq!(again["cached"], true);
}

#[tokio::test]
async fn test_batch_results_keyed_by_submitted_names() {
    let github = MockServer::start().await;
    mount_user(&github, "alice", 10).await;
    mount_user(&github, "bob", 20).await;
    let app = create_test_app(&test_config(&github));

    let (status, body, _) = send(
        &app,
        post("/api/batch", json!({"usernames": [" alice", "   ", "bob"]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_object().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[" alice"]["data"]["followers"], 10);
    assert_eq!(results["   "]["error"], true);
    assert_eq!(results["bob"]["data"]["followers"], 20);
    assert_eq!(github.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_batch_guards() {
    let github = MockServer::start().await;
    let app = create_test_app(&test_config(&github));

    let (status, body, _) = send(&app, post("/api/batch", json!({"usernames": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Usernames array cannot be empty");

    let (status, body, _) = send(
        &app,
        post("/api/batch", json!({"usernames": ["a", "b", "c", "d"]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Maximum 3 usernames allowed per batch, got 4");

    // Nothing was dispatched upstream
    assert!(github.received_requests().await.unwrap().is_empty());
}

// == Cache Endpoint Tests ==

#[tokio::test]
async fn test_cache_clear_resets_stats() {
    let github = MockServer::start().await;
    mount_user(&github, "alice", 1).await;
    let app = create_test_app(&test_config(&github));

    send(&app, get("/api/status/alice")).await;
    send(&app, get("/api/status/alice")).await;

    let (status, body, _) = send(&app, post("/api/cache/clear", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cache cleared successfully");

    let (_, stats, _) = send(&app, get("/api/cache/stats")).await;
    assert_eq!(stats["size"], 0);
    assert_eq!(stats["hits"], 0);
    assert_eq!(stats["misses"], 0);
    assert_eq!(stats["evictions"], 0);
}

#[tokio::test]
async fn test_cache_evicts_at_capacity() {
    let github = MockServer::start().await;
    for login in ["a", "b", "c"] {
        mount_user(&github, login, 1).await;
    }
    let config = Config {
        cache_capacity: 2,
        ..test_config(&github)
    };
    let app = create_test_app(&config);

    for login in ["a", "b", "c"] {
        send(&app, get(&format!("/api/status/{login}"))).await;
    }

    let (_, stats, _) = send(&app, get("/api/cache/stats")).await;
    assert_eq!(stats["size"], 2);
    assert_eq!(stats["evictions"], 1);
}

// == AI Endpoint Tests ==

#[tokio::test]
async fn test_ai_compare_rate_limited_per_client() {
    let github = MockServer::start().await;
    let ai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "Both are great."}}]
        })))
        .expect(3)
        .mount(&ai)
        .await;
    let config = Config {
        ai_api_url: ai.uri(),
        ai_api_key: Some("test-key".into()),
        ..test_config(&github)
    };
    let app = create_test_app(&config);

    let compare = |ip: &str| {
        Request::builder()
            .method("POST")
            .uri("/api/ai/compare")
            .header("content-type", "application/json")
            .header("x-forwarded-for", ip)
            .body(Body::from(
                json!({"users": [{"login": "alice"}, {"login": "bob"}]}).to_string(),
            ))
            .unwrap()
    };

    let (status, body, headers) = send(&app, compare("203.0.113.1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comparison"], "Both are great.");
    assert_eq!(headers["x-ratelimit-limit"], "2");
    assert_eq!(headers["x-ratelimit-remaining"], "1");

    let (status, _, _) = send(&app, compare("203.0.113.1")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body, headers) = send(&app, compare("203.0.113.1")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], true);
    assert_eq!(headers["retry-after"], "60");
    assert_eq!(headers["x-ratelimit-remaining"], "0");

    // The rejected call never reached the AI upstream; another client has
    // its own allowance
    let (status, _, _) = send(&app, compare("198.51.100.9")).await;
    assert_eq!(status, StatusCode::OK);
}
