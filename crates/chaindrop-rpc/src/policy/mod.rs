//! Client-side policies applied by transports before a request hits the wire.
//!
//! ```text
//! Request → [RateLimiter] → [RetryPolicy] → endpoint
//! ```

pub mod rate_limiter;
pub mod retry;

pub use rate_limiter::{RateLimiter, RateLimiterConfig};
pub use retry::{RetryConfig, RetryPolicy};
