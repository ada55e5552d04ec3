//! CLI module
//!
//! Command-line interface over [`MusicClient`](crate::library::MusicClient).
//!
//! # Commands
//!
//! - `playlists` - List library playlists
//! - `playlist` - Show one library playlist
//! - `count` - Count library playlists
//! - `recent` - Playlists by date added
//! - `library` - List a library resource kind
//! - `add` - Add catalog playlists to the library
//! - `search` / `library-search` - Catalog and library search
//! - `fetch` - Aggregate any paginated endpoint

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
