//! Token bucket rate limiter.
//!
//! Tokens accrue at `refill_rate` per second up to `capacity`. Each request
//! consumes the cost of its method (1.0 unless overridden). [`RateLimiter::acquire`]
//! sleeps until enough tokens are available, so concurrent workers sharing one
//! limiter are smoothed to the endpoint's budget instead of being rejected.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum tokens in the bucket.
    pub capacity: f64,
    /// Token refill rate (tokens per second).
    pub refill_rate: f64,
    /// Per-method cost overrides, e.g. heavier indexer queries.
    pub method_costs: HashMap<String, f64>,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            capacity: 10.0,
            refill_rate: 10.0,
            method_costs: HashMap::new(),
        }
    }
}

impl RateLimiterConfig {
    /// A bucket of `rps` tokens refilling at `rps` per second.
    pub fn per_second(rps: f64) -> Self {
        Self {
            capacity: rps,
            refill_rate: rps,
            method_costs: HashMap::new(),
        }
    }

    pub fn with_cost(mut self, method: impl Into<String>, cost: f64) -> Self {
        self.method_costs.insert(method.into(), cost);
        self
    }
}

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Thread-safe token bucket shared by all callers of one endpoint.
pub struct RateLimiter {
    config: RateLimiterConfig,
    state: Mutex<BucketState>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            state: Mutex::new(BucketState {
                tokens: config.capacity,
                last_refill: Instant::now(),
            }),
            config,
        }
    }

    /// Cost charged for `method`.
    pub fn cost_of(&self, method: &str) -> f64 {
        self.config.method_costs.get(method).copied().unwrap_or(1.0)
    }

    /// Take `cost` tokens if available, otherwise return how long to wait.
    pub fn try_acquire(&self, cost: f64) -> Result<(), Duration> {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        refill(&self.config, &mut state);

        if state.tokens >= cost {
            state.tokens -= cost;
            Ok(())
        } else if self.config.refill_rate <= 0.0 {
            Err(Duration::MAX)
        } else {
            let deficit = cost - state.tokens;
            Err(Duration::from_secs_f64(deficit / self.config.refill_rate))
        }
    }

    /// Wait until `method`'s cost can be paid, then pay it.
    pub async fn acquire(&self, method: &str) {
        let cost = self.cost_of(method).min(self.config.capacity);
        loop {
            match self.try_acquire(cost) {
                Ok(()) => return,
                Err(wait) => {
                    tracing::debug!(method, wait_ms = wait.as_millis() as u64, "rate limited, waiting");
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Currently available tokens.
    pub fn available(&self) -> f64 {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        refill(&self.config, &mut state);
        state.tokens
    }
}

fn refill(config: &RateLimiterConfig, state: &mut BucketState) {
    let now = Instant::now();
    let elapsed = now.duration_since(state.last_refill).as_secs_f64();
    state.tokens = (state.tokens + elapsed * config.refill_rate).min(config.capacity);
    state.last_refill = now;
}
