//! Middleware and extractors.

pub mod auth;
pub mod error;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;
