//! Rate limiting port, used to throttle sign-up and login attempts.

use async_trait::async_trait;
use std::time::Duration;

/// Per-client request budget.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Consume one request from the budget of `key` (usually the client IP).
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError>;
}

/// Outcome of a budget check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Time until the next request would be accepted.
    pub retry_after: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}
