//! HTTP transport module
//!
//! Provides the `Transport` seam the page fetcher depends on, and the
//! reqwest-backed client that implements it.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Credential Headers**: Developer token and music user token on every request

mod client;
mod rate_limit;
mod transport;

pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig, MUSIC_USER_TOKEN_HEADER,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{Transport, TransportResponse};
