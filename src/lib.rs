// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # tunefetch
//!
//! Fetch complete, ordered collections from paginated Apple Music API
//! endpoints.
//!
//! ## Features
//!
//! - **Exhaustive Pagination**: Follow `next` continuations until the server stops sending them
//! - **Safety Ceiling**: A configurable page limit stops chains that never end
//! - **Cancellation**: Abandon an aggregation mid-flight with a `CancellationToken`
//! - **Library & Catalog**: Playlists, library resources, catalog and library search
//! - **Resilient HTTP**: Retry with backoff and client-side rate limiting
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tunefetch::{ClientConfig, MusicClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = MusicClient::from_config(&ClientConfig::from_env())?;
//!
//!     let playlists = client.library_playlists().await?;
//!     println!("{} playlists", playlists.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    MusicClient                       │
//! │  playlists · resources · search · add · raw fetch    │
//! └──────────────────────────────────────────────────────┘
//!                           │
//! ┌─────────────────────────┴────────────────────────────┐
//! │                 CollectionFetcher                    │
//! │   PageCursor → JsonPageDecoder → continuation        │
//! └──────────────────────────────────────────────────────┘
//!                           │
//! ┌─────────────┬───────────┴──────────┬─────────────────┐
//! │  Transport  │      HttpClient      │   RateLimiter   │
//! │  (trait)    │  retry · backoff     │   (governor)    │
//! └─────────────┴──────────────────────┴─────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// Page decoding
pub mod decode;

/// Paginated collection fetching
pub mod pagination;

/// Library and catalog endpoints
pub mod library;

/// Client configuration
pub mod config;

/// Template interpolation
pub mod template;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ClientConfig;
pub use decode::PageLayout;
pub use http::{HttpClient, Transport};
pub use library::{LibraryPlaylist, LibraryResource, MusicClient, Resource, SearchKind};
pub use pagination::{CollectionFetcher, FetchConfig, Page, PageCursor};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
