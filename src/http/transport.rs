//! Transport seam used by the page fetcher
//!
//! The fetcher only needs `GET(url) -> (status, body)`. Keeping that behind a
//! trait lets tests drive pagination with scripted responses.

use super::client::{HttpClient, RequestConfig};
use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;

/// Raw response of a GET against a resource endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Create a 200 response with the given body
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(200, body)
    }

    /// Check for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into [`Error::HttpStatus`] carrying the body
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        Err(Error::http_status(
            self.status,
            String::from_utf8_lossy(&self.body).into_owned(),
        ))
    }
}

/// Something that can reach resource endpoints
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url`, failing on network errors and non-2xx statuses
    async fn get(&self, url: &str) -> Result<TransportResponse>;

    /// POST to `url` without a body, with the same failure rules as `get`
    async fn post(&self, url: &str) -> Result<TransportResponse>;

    /// Resolve a request path against the transport's base URL
    fn resolve(&self, path: &str) -> String {
        path.to_string()
    }
}

async fn into_transport_response(response: reqwest::Response) -> Result<TransportResponse> {
    let status = response.status().as_u16();
    let body = response.bytes().await?;

    TransportResponse { status, body }.error_for_status()
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &str) -> Result<TransportResponse> {
        into_transport_response(HttpClient::get(self, url).await?).await
    }

    async fn post(&self, url: &str) -> Result<TransportResponse> {
        let response = self.post_with_config(url, RequestConfig::new()).await?;
        into_transport_response(response).await
    }

    fn resolve(&self, path: &str) -> String {
        self.build_url(path)
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get(&self, url: &str) -> Result<TransportResponse> {
        (**self).get(url).await
    }

    async fn post(&self, url: &str) -> Result<TransportResponse> {
        (**self).post(url).await
    }

    fn resolve(&self, path: &str) -> String {
        (**self).resolve(path)
    }
}
