//! Pagination types
//!
//! Defines the page model and the knobs of the aggregation loop.

use crate::decode::PageLayout;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Page ceiling used when none is configured
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// One response's worth of items plus its continuation token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in server order
    pub items: Vec<T>,
    /// Where the next page lives; `None` on the last page
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// Create a page that links to another
    pub fn new(items: Vec<T>, next: impl Into<String>) -> Self {
        Self {
            items,
            next: Some(next.into()),
        }
    }

    /// Create a final page
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }

    /// Check if no continuation follows this page
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page carries no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Configuration for one aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Fetches allowed before a still-continuing chain is rejected
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    /// Where items and continuation live in each page
    #[serde(default)]
    pub layout: PageLayout,
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            layout: PageLayout::default(),
        }
    }
}

impl FetchConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page ceiling
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the page layout
    #[must_use]
    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Reject settings the fetch loop cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.max_pages == 0 {
            return Err(Error::config("max_pages must be at least 1"));
        }
        if self.layout.items_path.is_empty() || self.layout.next_path.is_empty() {
            return Err(Error::config("page layout paths cannot be empty"));
        }
        Ok(())
    }
}

/// Tracks progress through a continuation chain
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// URL of the page to fetch next
    pub next_url: Option<String>,
    /// Pages fetched so far
    pub pages_fetched: usize,
    /// Items fetched so far
    pub items_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create state pointing at the first page
    pub fn starting_at(url: impl Into<String>) -> Self {
        Self {
            next_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Record a fetched page
    pub fn record_page(&mut self, items: usize) {
        self.pages_fetched += 1;
        self.items_fetched += items as u64;
    }

    /// Point at the next page, or finish when there is none
    pub fn advance(&mut self, next_url: Option<String>) {
        self.done = next_url.is_none();
        self.next_url = next_url;
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
        self.next_url = None;
    }
}
