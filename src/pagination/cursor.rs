//! Lazy page sequence
//!
//! `PageCursor` fetches one page per call and follows continuation tokens
//! until the server stops sending them. It is finite and not restartable:
//! after the last page, or after any error, it yields nothing more.

use super::types::{Page, PaginationState};
use crate::decode::JsonPageDecoder;
use crate::error::{Error, Result};
use crate::http::{Transport, TransportResponse};
use futures::stream::{self, Stream};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// Cursor over the pages of one continuation chain
pub struct PageCursor<'a, T> {
    transport: &'a dyn Transport,
    decoder: JsonPageDecoder,
    max_pages: usize,
    cancel: Option<CancellationToken>,
    state: PaginationState,
    _items: PhantomData<fn() -> T>,
}

impl<'a, T: DeserializeOwned> PageCursor<'a, T> {
    /// Create a cursor starting at `url`
    pub fn new(
        transport: &'a dyn Transport,
        decoder: JsonPageDecoder,
        max_pages: usize,
        url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            decoder,
            max_pages,
            cancel: None,
            state: PaginationState::starting_at(url),
            _items: PhantomData,
        }
    }

    /// Abandon in-flight and future fetches once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Progress so far
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Fetch the next page, or `None` once the chain is exhausted
    ///
    /// The returned page's `next` is the continuation resolved to an
    /// absolute URL.
    pub async fn next_page(&mut self) -> Option<Result<Page<T>>> {
        if self.state.done {
            return None;
        }
        let url = self.state.next_url.clone()?;
        let page_number = self.state.pages_fetched + 1;

        if self.state.pages_fetched >= self.max_pages {
            self.state.mark_done();
            return Some(Err(Error::TooManyPages {
                max_pages: self.max_pages,
                url,
            }));
        }

        let result = self.fetch(&url, page_number).await;
        if result.is_err() {
            self.state.mark_done();
        }
        Some(result)
    }

    async fn fetch(&mut self, url: &str, page_number: usize) -> Result<Page<T>> {
        let response = match &self.cancel {
            Some(token) if token.is_cancelled() => {
                return Err(Error::cancelled(url, page_number));
            }
            Some(token) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => return Err(Error::cancelled(url, page_number)),
                    response = self.transport.get(url) => response,
                }
            }
            None => self.transport.get(url).await,
        }
        .and_then(TransportResponse::error_for_status)
        .map_err(|e| Error::transport(url, page_number, e))?;

        let mut page: Page<T> = self
            .decoder
            .decode(&response.body)
            .map_err(|e| Error::decode(url, page_number, e.0))?;

        let next = match page.next.take() {
            Some(token) => Some(
                resolve_continuation(url, &token)
                    .map_err(|message| Error::decode(url, page_number, message))?,
            ),
            None => None,
        };

        debug!(
            page = page_number,
            items = page.items.len(),
            has_next = next.is_some(),
            "Fetched page {url}"
        );

        self.state.record_page(page.items.len());
        self.state.advance(next.clone());
        page.next = next;
        Ok(page)
    }

    /// Expose the cursor as a stream of pages
    pub fn into_stream(self) -> impl Stream<Item = Result<Page<T>>> + 'a
    where
        T: 'a,
    {
        stream::unfold(self, |mut cursor| async move {
            let page = cursor.next_page().await?;
            Some((page, cursor))
        })
    }
}

/// Turn a continuation token into an absolute URL
///
/// Absolute tokens are used as-is; relative ones (`/v1/...?offset=25`)
/// resolve against the page that returned them.
pub fn resolve_continuation(current_url: &str, token: &str) -> std::result::Result<String, String> {
    match Url::parse(token) {
        Ok(absolute) => Ok(absolute.into()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(current_url).map_err(|e| {
                format!("Cannot resolve relative continuation '{token}' against '{current_url}': {e}")
            })?;
            base.join(token)
                .map(Into::into)
                .map_err(|e| format!("Invalid continuation '{token}': {e}"))
        }
        Err(e) => Err(format!("Invalid continuation '{token}': {e}")),
    }
}
