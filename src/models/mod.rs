//! Request and Response models for the status API
//!
//! DTOs used for serializing/deserializing HTTP bodies, plus the GitHub
//! user record shared by the fetcher and the AI comparison.

pub mod github;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use github::{GitHubEvent, GitHubRepo, GitHubUser};
pub use requests::{
    validate_username, BatchRequest, CompareRequest, StatusQuery, UsernameRequest,
    MAX_USERNAME_LENGTH,
};
pub use responses::{
    ApiResponse, BatchResponse, CompareResponse, ExtendedResponse, HealthResponse,
    MessageResponse,
};
