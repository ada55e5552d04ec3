//! Paginated collection fetcher
//!
//! Follows a continuation chain to exhaustion and concatenates every page's
//! items, in fetch order, into one collection. The call either returns the
//! complete collection or fails; partial results are never surfaced.

use super::cursor::PageCursor;
use super::types::{FetchConfig, Page};
use crate::decode::{JsonPageDecoder, PageLayout};
use crate::error::Result;
use crate::http::Transport;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Aggregates paginated resource listings over a [`Transport`]
#[derive(Debug, Clone)]
pub struct CollectionFetcher<C> {
    transport: C,
    config: FetchConfig,
}

impl<C: Transport> CollectionFetcher<C> {
    /// Create a fetcher with the default page ceiling and layout
    pub fn new(transport: C) -> Self {
        Self {
            transport,
            config: FetchConfig::default(),
        }
    }

    /// Create a fetcher with a custom configuration
    pub fn with_config(transport: C, config: FetchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { transport, config })
    }

    /// The underlying transport
    pub fn transport(&self) -> &C {
        &self.transport
    }

    /// The fetch configuration
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Lazily walk the pages starting at `url`
    pub fn pages<T: DeserializeOwned>(&self, url: &str) -> PageCursor<'_, T> {
        self.pages_with_layout(url, self.config.layout.clone())
    }

    /// Lazily walk the pages starting at `url`, reading them with `layout`
    pub fn pages_with_layout<T: DeserializeOwned>(
        &self,
        url: &str,
        layout: PageLayout,
    ) -> PageCursor<'_, T> {
        PageCursor::new(
            &self.transport,
            JsonPageDecoder::with_layout(layout),
            self.config.max_pages,
            self.transport.resolve(url),
        )
    }

    /// Fetch a single page without following its continuation
    pub async fn fetch_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>> {
        let mut cursor = self.pages(url);
        match cursor.next_page().await {
            Some(page) => page,
            None => Ok(Page::last(Vec::new())),
        }
    }

    /// Fetch every page starting at `url` and concatenate their items
    pub async fn fetch_all<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        Self::collect(url, self.pages(url)).await
    }

    /// [`fetch_all`](Self::fetch_all) with a per-call page layout
    pub async fn fetch_all_with_layout<T: DeserializeOwned>(
        &self,
        url: &str,
        layout: PageLayout,
    ) -> Result<Vec<T>> {
        Self::collect(url, self.pages_with_layout(url, layout)).await
    }

    /// [`fetch_all`](Self::fetch_all) that fails with `Cancelled` once `token` fires
    pub async fn fetch_all_cancellable<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &CancellationToken,
    ) -> Result<Vec<T>> {
        let cursor = self.pages(url).with_cancellation(token.clone());
        Self::collect(url, cursor).await
    }

    /// [`fetch_all_cancellable`](Self::fetch_all_cancellable) with a per-call page layout
    pub async fn fetch_all_with_layout_cancellable<T: DeserializeOwned>(
        &self,
        url: &str,
        layout: PageLayout,
        token: &CancellationToken,
    ) -> Result<Vec<T>> {
        let cursor = self
            .pages_with_layout(url, layout)
            .with_cancellation(token.clone());
        Self::collect(url, cursor).await
    }

    async fn collect<T: DeserializeOwned>(
        url: &str,
        mut cursor: PageCursor<'_, T>,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(page) = cursor.next_page().await {
            items.extend(page?.items);
        }

        let state = cursor.state();
        info!(
            pages = state.pages_fetched,
            items = state.items_fetched,
            "Aggregated {url}"
        );
        Ok(items)
    }
}
