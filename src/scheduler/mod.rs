//! Outbound request scheduling.
//!
//! One rate limiter per target service, shared by every scenario in flight.

mod rate_limit;

pub use rate_limit::RateLimiter;
