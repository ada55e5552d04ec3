//! Client-side request throttling
//!
//! A token bucket from `governor` shared by every request of one client, so
//! long aggregations stay under the service's per-token request budget.

use governor::{DefaultDirectRateLimiter, Quota};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Token bucket settings
///
/// ```yaml
/// rate_limit:
///   requests_per_second: 5
///   burst_size: 10   # optional, defaults to requests_per_second
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Sustained request rate
    pub requests_per_second: u32,
    /// Requests allowed back to back before throttling starts
    #[serde(default)]
    pub burst_size: Option<u32>,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::new(10, 10)
    }
}

impl RateLimiterConfig {
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size: Some(burst_size),
        }
    }

    /// Bucket size, falling back to the sustained rate
    pub fn effective_burst(&self) -> u32 {
        self.burst_size.unwrap_or(self.requests_per_second)
    }
}

/// Shared token bucket; clones draw from the same bucket
#[derive(Clone)]
pub struct RateLimiter {
    bucket: Arc<DefaultDirectRateLimiter>,
}

impl RateLimiter {
    /// Build a bucket from `config`; zero values clamp to 1
    pub fn new(config: &RateLimiterConfig) -> Self {
        let rate = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.effective_burst()).unwrap_or(NonZeroU32::MIN);

        Self {
            bucket: Arc::new(DefaultDirectRateLimiter::direct(
                Quota::per_second(rate).allow_burst(burst),
            )),
        }
    }

    /// Wait for a permit
    pub async fn wait(&self) {
        self.bucket.until_ready().await;
    }

    /// Take a permit if one is free right now
    pub fn try_acquire(&self) -> bool {
        self.bucket.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}
