//! CLI commands and argument parsing

use crate::library::{LibraryResource, SearchKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fetch complete collections from the Apple Music API
#[derive(Parser, Debug)]
#[command(name = "tunefetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Page ceiling for one aggregation (overrides the config file)
    #[arg(long, global = true)]
    pub max_pages: Option<usize>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List library playlists
    Playlists {
        /// Only read the first page, with this page size
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one library playlist
    Playlist {
        /// Library playlist id (e.g. p.abc123)
        id: String,
    },

    /// Count library playlists
    Count,

    /// List playlists by date added, newest first
    Recent {
        /// Number of playlists to show
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Number of playlists to skip
        #[arg(long, default_value = "0")]
        offset: usize,
    },

    /// List playlists by when they were last played, most recent first
    Played {
        /// Number of playlists to show
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Number of playlists to skip
        #[arg(long, default_value = "0")]
        offset: usize,
    },

    /// List every library resource of one kind
    Library {
        /// playlists, songs, albums, artists or music-videos
        kind: LibraryResource,
    },

    /// Add catalog playlists to the library
    Add {
        /// Catalog playlist ids
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Search the catalog
    Search {
        /// Search term
        term: String,

        /// Result types (comma-separated)
        #[arg(long, value_delimiter = ',', default_value = "songs")]
        types: Vec<SearchKind>,

        /// Results per type
        #[arg(long)]
        limit: Option<usize>,

        /// Results to skip per type
        #[arg(long)]
        offset: Option<usize>,

        /// Follow every result page of each type
        #[arg(long, conflicts_with_all = ["limit", "offset"])]
        all: bool,
    },

    /// Suggest search terms and top results for a partial term
    Suggest {
        /// Partial search term
        term: String,

        /// Also suggest top results of these types (comma-separated)
        #[arg(long, value_delimiter = ',')]
        types: Vec<SearchKind>,

        /// Number of suggestions
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search the user's library
    LibrarySearch {
        /// Search term
        term: String,

        /// Result types (comma-separated)
        #[arg(long, value_delimiter = ',', default_value = "songs")]
        types: Vec<LibraryResource>,

        /// Results per type
        #[arg(long)]
        limit: Option<usize>,

        /// Results to skip per type
        #[arg(long)]
        offset: Option<usize>,
    },

    /// Aggregate any paginated endpoint
    Fetch {
        /// Absolute URL or path relative to the base URL
        url: String,

        /// Dot path of the item array
        #[arg(long, default_value = "data")]
        items_path: String,

        /// Dot path of the continuation token
        #[arg(long, default_value = "next")]
        next_path: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}
