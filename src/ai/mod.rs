//! AI Comparison Module
//!
//! Turns a set of GitHub profiles into a chat-completions prompt and asks a
//! hosted model for a short comparison. Calls are metered, so the HTTP layer
//! gates them through the rate limiter.

mod client;
mod prompt;

pub use client::{ComparisonClient, DEFAULT_TIMEOUT, MODEL};
pub use prompt::{build_comparison_prompt, SYSTEM_PROMPT};
