//! Pagination module
//!
//! # Overview
//!
//! Resource listings arrive in pages, each carrying an optional continuation
//! token. [`PageCursor`] walks such a chain lazily, one fetch per page, and
//! [`CollectionFetcher`] folds the whole chain into one ordered `Vec`.
//!
//! Token presence is the only continuation signal: an empty page that still
//! links onward is followed. A configurable page ceiling stops chains that
//! never end.

mod cursor;
mod fetcher;
mod types;

pub use cursor::{resolve_continuation, PageCursor};
pub use fetcher::CollectionFetcher;
pub use types::{FetchConfig, Page, PaginationState, DEFAULT_MAX_PAGES};
