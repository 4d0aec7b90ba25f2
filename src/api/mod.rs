//! API Module
//!
//! HTTP handlers and routing for the status API.
//!
//! # Endpoints
//! - `GET /api/status/:username` and `POST /api/status` - Single user lookup
//! - `POST /api/batch` - Concurrent multi-user lookup
//! - `POST /api/ai/compare` - Rate-limited AI comparison
//! - `GET /api/cache/stats`, `POST /api/cache/clear` - Cache introspection
//! - `GET /api/health` - Health check endpoint

pub mod handlers;
pub mod identity;
pub mod routes;

pub use handlers::*;
pub use identity::client_identity;
pub use routes::create_router;
