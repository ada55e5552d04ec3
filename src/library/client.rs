//! Music library and catalog client
//!
//! Thin endpoint layer over [`CollectionFetcher`]: builds resource URLs,
//! picks page layouts and applies the few list operations callers need
//! (sorting, slicing, lookups by id).

use super::types::{
    LibraryPlaylist, LibraryResource, Resource, SearchKind, SearchResults, SearchSuggestions,
};
use crate::config::ClientConfig;
use crate::decode::PageLayout;
use crate::error::{Error, Result};
use crate::http::{HttpClient, Transport, TransportResponse};
use crate::pagination::CollectionFetcher;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

/// API version prefix of every endpoint
const API_VERSION: &str = "v1";

/// Client for the user's library and the catalog
#[derive(Debug)]
pub struct MusicClient<C = HttpClient> {
    fetcher: CollectionFetcher<C>,
    storefront: String,
    extended_search_types: bool,
}

impl MusicClient<HttpClient> {
    /// Create a client backed by an [`HttpClient`] built from `config`
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_config(config.http_config())?;
        Self::with_transport(http, config)
    }
}

impl<C: Transport> MusicClient<C> {
    /// Create a client over an existing transport
    pub fn with_transport(transport: C, config: &ClientConfig) -> Result<Self> {
        if config.storefront.is_empty() {
            return Err(Error::config("storefront cannot be empty"));
        }
        Ok(Self {
            fetcher: CollectionFetcher::with_config(transport, config.fetch_config())?,
            storefront: config.storefront.clone(),
            extended_search_types: config.extended_search_types,
        })
    }

    /// The underlying page aggregator
    pub fn fetcher(&self) -> &CollectionFetcher<C> {
        &self.fetcher
    }

    /// Catalog storefront used for searches
    pub fn storefront(&self) -> &str {
        &self.storefront
    }

    // ========================================================================
    // Library Playlists
    // ========================================================================

    /// Every playlist in the user's library
    pub async fn library_playlists(&self) -> Result<Vec<LibraryPlaylist>> {
        let url = self.endpoint(&["me", "library", "playlists"], &[])?;
        self.fetcher.fetch_all(&url).await
    }

    /// The first `limit` playlists, from a single page
    pub async fn library_playlists_limited(&self, limit: usize) -> Result<Vec<LibraryPlaylist>> {
        if limit == 0 {
            return Err(Error::config("limit must be at least 1"));
        }
        let url = self.endpoint(
            &["me", "library", "playlists"],
            &[("limit", limit.to_string())],
        )?;
        let page = self.fetcher.fetch_page(&url).await?;
        Ok(page.items)
    }

    /// One library playlist by id
    pub async fn library_playlist(&self, id: &str) -> Result<LibraryPlaylist> {
        let url = self.endpoint(&["me", "library", "playlists", id], &[])?;
        let page = self
            .fetcher
            .fetch_page::<LibraryPlaylist>(&url)
            .await
            .map_err(|e| not_found_on_404(e, id))?;

        page.items
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(id))
    }

    /// Library playlists matching `ids`, in server order
    pub async fn library_playlists_by_ids<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<Vec<LibraryPlaylist>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.endpoint(&["me", "library", "playlists"], &[("ids", join_ids(ids))])?;
        self.fetcher.fetch_all(&url).await
    }

    /// Number of playlists in the library
    pub async fn library_playlists_count(&self) -> Result<usize> {
        Ok(self.library_playlists().await?.len())
    }

    /// Playlists ordered newest first by date added, then sliced
    ///
    /// Playlists without a date sort after dated ones and keep their
    /// relative server order.
    pub async fn recently_added_playlists(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<LibraryPlaylist>> {
        self.newest_first(LibraryPlaylist::date_added, limit, offset)
            .await
    }

    /// Playlists ordered by when they were last played, most recent first
    ///
    /// Never-played playlists sort last, in server order.
    pub async fn recently_played_playlists(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<LibraryPlaylist>> {
        self.newest_first(LibraryPlaylist::last_played_date, limit, offset)
            .await
    }

    async fn newest_first(
        &self,
        date: fn(&LibraryPlaylist) -> Option<DateTime<Utc>>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<LibraryPlaylist>> {
        let mut playlists = self.library_playlists().await?;
        // Stable, and None orders below any date
        playlists.sort_by(|a, b| date(b).cmp(&date(a)));
        Ok(playlists.into_iter().skip(offset).take(limit).collect())
    }

    /// Add catalog playlists to the library
    ///
    /// Returns `true` once the service accepts the request; any non-2xx
    /// answer is a `Transport` error instead.
    pub async fn add_playlists_to_library<S: AsRef<str>>(&self, ids: &[S]) -> Result<bool> {
        if ids.is_empty() {
            return Err(Error::config("No playlist ids to add"));
        }
        let url = self.endpoint(&["me", "library"], &[("ids[playlists]", join_ids(ids))])?;
        let response = self
            .fetcher
            .transport()
            .post(&url)
            .await
            .and_then(TransportResponse::error_for_status)
            .map_err(|e| Error::transport(&url, 1, e))?;

        info!(count = ids.len(), status = response.status, "Added playlists to library");
        Ok(true)
    }

    // ========================================================================
    // Other Library Resources
    // ========================================================================

    /// Every resource of `kind` in the user's library
    pub async fn library_resources(&self, kind: LibraryResource) -> Result<Vec<Resource>> {
        let url = self.endpoint(&["me", "library", kind.as_str()], &[])?;
        self.fetcher.fetch_all(&url).await
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// One page of catalog search results, grouped by kind
    pub async fn catalog_search(
        &self,
        term: &str,
        kinds: &[SearchKind],
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<SearchResults> {
        for kind in kinds {
            self.check_search_kind(*kind)?;
        }
        let types: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
        let segments = ["catalog", self.storefront.as_str(), "search"];
        self.search(&segments, term, &types, limit, offset).await
    }

    /// Every catalog search result of one kind, across pages
    pub async fn catalog_search_all(&self, term: &str, kind: SearchKind) -> Result<Vec<Resource>> {
        self.check_search_kind(kind)?;
        let term = check_term(term)?;
        let url = self.endpoint(
            &["catalog", self.storefront.as_str(), "search"],
            &[("term", term.to_string()), ("types", kind.to_string())],
        )?;
        self.fetcher
            .fetch_all_with_layout(&url, PageLayout::search_group(kind.as_str()))
            .await
    }

    /// Suggested search terms for a partial `term`
    ///
    /// With `kinds` non-empty, top catalog results of those kinds are
    /// suggested as well.
    pub async fn catalog_search_suggestions(
        &self,
        term: &str,
        kinds: &[SearchKind],
        limit: Option<usize>,
    ) -> Result<SearchSuggestions> {
        let term = check_term(term)?;
        for kind in kinds {
            self.check_search_kind(*kind)?;
        }

        let mut query = vec![("term", term.to_string())];
        if kinds.is_empty() {
            query.push(("kinds", "terms".to_string()));
        } else {
            query.push(("kinds", "terms,topResults".to_string()));
            let types: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
            query.push(("types", types.join(",")));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        let url = self.endpoint(
            &["catalog", self.storefront.as_str(), "search", "suggestions"],
            &query,
        )?;

        let response = self
            .fetcher
            .transport()
            .get(&url)
            .await
            .and_then(TransportResponse::error_for_status)
            .map_err(|e| Error::transport(&url, 1, e))?;
        let suggestions = SearchSuggestions::from_slice(&response.body)
            .map_err(|e| Error::decode(&url, 1, e.0))?;

        debug!(suggestions = suggestions.suggestions.len(), "Suggested {url}");
        Ok(suggestions)
    }

    /// One page of library search results, grouped by kind
    pub async fn library_search(
        &self,
        term: &str,
        kinds: &[LibraryResource],
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<SearchResults> {
        let types: Vec<&str> = kinds.iter().map(|k| k.search_type()).collect();
        self.search(&["me", "library", "search"], term, &types, limit, offset)
            .await
    }

    async fn search(
        &self,
        segments: &[&str],
        term: &str,
        types: &[&str],
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<SearchResults> {
        let term = check_term(term)?;
        if types.is_empty() {
            return Err(Error::config("At least one search type is required"));
        }

        let mut query = vec![("term", term.to_string()), ("types", types.join(","))];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }
        let url = self.endpoint(segments, &query)?;

        let response = self
            .fetcher
            .transport()
            .get(&url)
            .await
            .and_then(TransportResponse::error_for_status)
            .map_err(|e| Error::transport(&url, 1, e))?;
        let results =
            SearchResults::from_slice(&response.body).map_err(|e| Error::decode(&url, 1, e.0))?;

        debug!(
            groups = results.groups.len(),
            items = results.total_items(),
            "Searched {url}"
        );
        Ok(results)
    }

    fn check_search_kind(&self, kind: SearchKind) -> Result<()> {
        if kind.is_extended() && !self.extended_search_types {
            return Err(Error::config(format!(
                "Search type '{kind}' is disabled (extended_search_types: false)"
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Raw Aggregation
    // ========================================================================

    /// Aggregate any paginated endpoint, given as a URL or a base-relative path
    pub async fn fetch_all_url<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        self.fetcher.fetch_all(url).await
    }

    /// [`fetch_all_url`](Self::fetch_all_url) with a custom page layout
    pub async fn fetch_all_url_with_layout<T: DeserializeOwned>(
        &self,
        url: &str,
        layout: PageLayout,
    ) -> Result<Vec<T>> {
        self.fetcher.fetch_all_with_layout(url, layout).await
    }

    /// [`fetch_all_url_with_layout`](Self::fetch_all_url_with_layout) that
    /// stops once `token` fires
    pub async fn fetch_all_url_cancellable<T: DeserializeOwned>(
        &self,
        url: &str,
        layout: PageLayout,
        token: &CancellationToken,
    ) -> Result<Vec<T>> {
        self.fetcher
            .fetch_all_with_layout_cancellable(url, layout, token)
            .await
    }

    /// Absolute URL of `/v1/<segments>?<query>`, segments percent-encoded
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<String> {
        let base = self.fetcher.transport().resolve(&format!("/{API_VERSION}"));
        let mut url = Url::parse(&base)?;

        url.path_segments_mut()
            .map_err(|()| Error::config(format!("Base URL cannot carry a path: {base}")))?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url.into())
    }
}

fn check_term(term: &str) -> Result<&str> {
    let term = term.trim();
    if term.is_empty() {
        return Err(Error::config("Search term cannot be empty"));
    }
    Ok(term)
}

fn join_ids<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",")
}

/// Map a 404 on a single-resource lookup to `NotFound`
fn not_found_on_404(error: Error, id: &str) -> Error {
    match &error {
        Error::Transport { source, .. }
            if matches!(**source, Error::HttpStatus { status: 404, .. }) =>
        {
            Error::not_found(id)
        }
        _ => error,
    }
}
