//! Client configuration
//!
//! `ClientConfig` is read from YAML. String values may reference environment
//! variables as `{{ env.NAME }}` so tokens can stay out of config files:
//!
//! ```yaml
//! storefront: gb
//! developer_token: "{{ env.TUNEFETCH_DEVELOPER_TOKEN }}"
//! user_token: "{{ env.TUNEFETCH_USER_TOKEN }}"
//! max_pages: 200
//! rate_limit:
//!   requests_per_second: 5
//!   burst_size: 5
//! ```

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::{FetchConfig, DEFAULT_MAX_PAGES};
use crate::template::{self, TemplateContext};
use crate::types::{BackoffType, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default service root
pub const DEFAULT_BASE_URL: &str = "https://api.music.apple.com";

/// Environment variable overriding the developer token
pub const ENV_DEVELOPER_TOKEN: &str = "TUNEFETCH_DEVELOPER_TOKEN";
/// Environment variable overriding the music user token
pub const ENV_USER_TOKEN: &str = "TUNEFETCH_USER_TOKEN";
/// Environment variable overriding the storefront
pub const ENV_STOREFRONT: &str = "TUNEFETCH_STOREFRONT";
/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "TUNEFETCH_BASE_URL";

/// Settings for talking to the music service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service root, e.g. `https://api.music.apple.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Catalog storefront (two-letter country code)
    #[serde(default = "default_storefront")]
    pub storefront: String,

    /// Developer token, sent as `Authorization: Bearer ...`
    #[serde(default)]
    pub developer_token: Option<String>,

    /// Music user token, required for library endpoints
    #[serde(default)]
    pub user_token: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Transport retries per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Transport backoff between retries
    #[serde(default)]
    pub backoff: BackoffType,

    /// Client-side rate limit; `null` disables it
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Page ceiling for one aggregation
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Allow search types served only by newer API revisions
    /// (music videos, curators, radio shows)
    #[serde(default = "default_true")]
    pub extended_search_types: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_storefront() -> String {
    "us".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

fn default_true() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            storefront: default_storefront(),
            developer_token: None,
            user_token: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            rate_limit: default_rate_limit(),
            max_pages: default_max_pages(),
            extended_search_types: true,
        }
    }
}

impl ClientConfig {
    /// Load a config file, rendering `{{ env.* }}` from the process environment
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_yaml_str(&content, &TemplateContext::from_env())
    }

    /// Parse YAML, rendering templates against `ctx`
    pub fn from_yaml_str(yaml: &str, ctx: &TemplateContext) -> Result<Self> {
        // An empty document means all defaults
        let raw: serde_json::Value = if yaml.trim().is_empty() {
            serde_json::json!({})
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))?
        };
        let raw = if raw.is_null() {
            serde_json::json!({})
        } else {
            raw
        };

        let rendered = template::render_value(&raw, ctx)?;
        let config: Self = serde_json::from_value(rendered)
            .map_err(|e| Error::config(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok());
        config
    }

    /// Override fields from environment variables that are set and non-empty
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(ENV_DEVELOPER_TOKEN).none_if_empty() {
            self.developer_token = Some(token);
        }
        if let Some(token) = lookup(ENV_USER_TOKEN).none_if_empty() {
            self.user_token = Some(token);
        }
        if let Some(storefront) = lookup(ENV_STOREFRONT).none_if_empty() {
            self.storefront = storefront;
        }
        if let Some(base_url) = lookup(ENV_BASE_URL).none_if_empty() {
            self.base_url = base_url;
        }
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("Invalid base_url '{}': {e}", self.base_url)))?;

        if self.storefront.is_empty() {
            return Err(Error::config("storefront cannot be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be at least 1"));
        }
        self.fetch_config().validate()
    }

    /// Transport settings
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff,
                Duration::from_millis(100),
                Duration::from_secs(60),
            );

        builder = match &self.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };
        if let Some(token) = self.developer_token.clone().none_if_empty() {
            builder = builder.bearer_token(token);
        }
        if let Some(token) = self.user_token.clone().none_if_empty() {
            builder = builder.music_user_token(token);
        }
        builder.build()
    }

    /// Aggregation settings
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig::new().with_max_pages(self.max_pages)
    }
}
