//! Library and catalog module
//!
//! # Overview
//!
//! [`MusicClient`] exposes the user's library (playlists and other resource
//! kinds), catalog/library search and search suggestions on top of the pagination engine. Every
//! list operation aggregates the complete continuation chain unless it says
//! otherwise.
//!
//! # Example
//!
//! ```no_run
//! use tunefetch::{ClientConfig, MusicClient};
//!
//! # async fn run() -> tunefetch::Result<()> {
//! let client = MusicClient::from_config(&ClientConfig::from_env())?;
//! for playlist in client.library_playlists().await? {
//!     println!("{} {:?}", playlist.id, playlist.name());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod types;

pub use client::MusicClient;
pub use types::{
    Description, LibraryPlaylist, LibraryResource, PlaylistAttributes, Resource, SearchKind,
    SearchResults, SearchSuggestions, Suggestion,
};
