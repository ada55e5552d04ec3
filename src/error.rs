//! Error types for tunefetch
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for tunefetch
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Aggregation Errors
    // ============================================================================
    #[error("Transport failure on page {page} ({url}): {source}")]
    Transport {
        url: String,
        page: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to decode page {page} ({url}): {message}")]
    Decode {
        url: String,
        page: usize,
        message: String,
    },

    #[error("Cancelled while fetching page {page} ({url})")]
    Cancelled { url: String, page: usize },

    #[error("Pagination exceeded {max_pages} pages, last continuation: {url}")]
    TooManyPages { max_pages: usize, url: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Undefined variable in template: {variable}")]
    UndefinedVariable { variable: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Library Errors
    // ============================================================================
    #[error("No item found for identifier '{id}'")]
    NotFound { id: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Wrap a transport failure with the page it happened on
    pub fn transport(url: impl Into<String>, page: usize, source: Error) -> Self {
        Self::Transport {
            url: url.into(),
            page,
            source: Box::new(source),
        }
    }

    /// Create a decode error for a page
    pub fn decode(url: impl Into<String>, page: usize, message: impl Into<String>) -> Self {
        Self::Decode {
            url: url.into(),
            page,
            message: message.into(),
        }
    }

    /// Create a cancellation error
    pub fn cancelled(url: impl Into<String>, page: usize) -> Self {
        Self::Cancelled {
            url: url.into(),
            page,
        }
    }

    /// Create a not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }

    /// Check if this error came from the transport layer
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Transport { .. }
                | Error::Http(_)
                | Error::HttpStatus { .. }
                | Error::RateLimited { .. }
                | Error::Timeout { .. }
        )
    }

    /// Check if this error is a page decode failure
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. })
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            Error::Transport { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504 | 520..=524)
}

/// Result type alias for tunefetch
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");

        let err = Error::not_found("p.abc");
        assert_eq!(err.to_string(), "No item found for identifier 'p.abc'");
    }

    #[test]
    fn test_page_errors_carry_url_and_page() {
        let err = Error::transport(
            "https://x/page2",
            2,
            Error::http_status(503, "unavailable"),
        );
        let msg = err.to_string();
        assert!(msg.contains("page 2"));
        assert!(msg.contains("https://x/page2"));
        assert!(msg.contains("HTTP 503"));

        let err = Error::decode("https://x/page3", 3, "expected array");
        assert_eq!(
            err.to_string(),
            "Failed to decode page 3 (https://x/page3): expected array"
        );

        let err = Error::cancelled("https://x/page1", 1);
        assert_eq!(
            err.to_string(),
            "Cancelled while fetching page 1 (https://x/page1)"
        );

        let err = Error::TooManyPages {
            max_pages: 3,
            url: "https://x/loop".to_string(),
        };
        assert!(err.to_string().contains("exceeded 3 pages"));
    }

    #[test]
    fn test_classification() {
        let transport = Error::transport("u", 1, Error::Timeout { timeout_ms: 10 });
        assert!(transport.is_transport());
        assert!(transport.is_retryable());
        assert!(!transport.is_decode());

        let decode = Error::decode("u", 1, "bad");
        assert!(decode.is_decode());
        assert!(!decode.is_transport());
        assert!(!decode.is_retryable());

        assert!(!Error::cancelled("u", 1).is_retryable());
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::RateLimited {
            retry_after_seconds: 60
        }
        .is_retryable());
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(Error::http_status(429, "").is_retryable());
        assert!(Error::http_status(500, "").is_retryable());
        assert!(Error::http_status(503, "").is_retryable());

        assert!(!Error::http_status(400, "").is_retryable());
        assert!(!Error::http_status(401, "").is_retryable());
        assert!(!Error::http_status(404, "").is_retryable());
        assert!(!Error::config("test").is_retryable());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
