//! API Routes
//!
//! Configures the Axum router with all status API endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    ai_compare_handler, batch_handler, cache_clear_handler, cache_stats_handler,
    health_handler, home_handler, status_by_body_handler, status_by_path_handler,
    user_extended_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Service banner
/// - `GET /api/health` - Health check endpoint
/// - `GET /api/cache/stats` - Cache statistics
/// - `POST /api/cache/clear` - Empty the cache
/// - `GET /api/status/:username` - Look up one user
/// - `POST /api/status` - Look up one user from a JSON body
/// - `GET /api/user/:username` - Profile plus tech stack and activity streak
///   (also served under `/extended`)
/// - `POST /api/batch` - Look up several users concurrently
/// - `POST /api/ai/compare` - Rate-limited AI comparison
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home_handler))
        .route("/api/health", get(health_handler))
        .route("/api/cache/stats", get(cache_stats_handler))
        .route("/api/cache/clear", post(cache_clear_handler))
        .route("/api/status/:username", get(status_by_path_handler))
        .route("/api/status", post(status_by_body_handler))
        .route("/api/user/:username", get(user_extended_handler))
        .route("/api/user/:username/extended", get(user_extended_handler))
        .route("/api/batch", post(batch_handler))
        .route("/api/ai/compare", post(ai_compare_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
