//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::decode::PageLayout;
use crate::error::Result;
use crate::library::{LibraryResource, MusicClient, SearchKind};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = MusicClient::from_config(&self.load_config()?)?;

        match &self.cli.command {
            Commands::Playlists { limit } => {
                let playlists = match limit {
                    Some(limit) => client.library_playlists_limited(*limit).await?,
                    None => client.library_playlists().await?,
                };
                self.output(&playlists)
            }
            Commands::Playlist { id } => self.output(&client.library_playlist(id).await?),
            Commands::Count => {
                let count = client.library_playlists_count().await?;
                self.output(&json!({ "count": count }))
            }
            Commands::Recent { limit, offset } => {
                self.output(&client.recently_added_playlists(*limit, *offset).await?)
            }
            Commands::Played { limit, offset } => {
                self.output(&client.recently_played_playlists(*limit, *offset).await?)
            }
            Commands::Library { kind } => self.output(&client.library_resources(*kind).await?),
            Commands::Add { ids } => {
                let added = client.add_playlists_to_library(ids).await?;
                self.output(&json!({ "added": added, "ids": ids }))
            }
            Commands::Search {
                term,
                types,
                limit,
                offset,
                all,
            } => {
                if *all {
                    self.search_all(&client, term, types).await
                } else {
                    let results = client.catalog_search(term, types, *limit, *offset).await?;
                    self.output(&results)
                }
            }
            Commands::Suggest { term, types, limit } => {
                let suggestions = client.catalog_search_suggestions(term, types, *limit).await?;
                self.output(&suggestions)
            }
            Commands::LibrarySearch {
                term,
                types,
                limit,
                offset,
            } => self.library_search(&client, term, types, *limit, *offset).await,
            Commands::Fetch {
                url,
                items_path,
                next_path,
            } => {
                self.fetch(&client, url, PageLayout::new(items_path, next_path))
                    .await
            }
        }
    }

    /// Config file (or defaults), then environment, then CLI overrides
    fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());

        if let Some(max_pages) = self.cli.max_pages {
            config.max_pages = max_pages;
        }
        if config.developer_token.is_none() {
            warn!("No developer token configured; requests will likely be rejected");
        }
        config.validate()?;
        Ok(config)
    }

    /// Every result page of each requested kind
    async fn search_all(&self, client: &MusicClient, term: &str, kinds: &[SearchKind]) -> Result<()> {
        let mut groups = BTreeMap::new();
        for kind in kinds {
            let items = client.catalog_search_all(term, *kind).await?;
            groups.insert(kind.as_str(), items);
        }
        self.output(&json!({ "results": groups }))
    }

    async fn library_search(
        &self,
        client: &MusicClient,
        term: &str,
        kinds: &[LibraryResource],
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<()> {
        let results = client.library_search(term, kinds, limit, offset).await?;
        self.output(&results)
    }

    /// Raw aggregation, cancelled on Ctrl-C
    async fn fetch(&self, client: &MusicClient, url: &str, layout: PageLayout) -> Result<()> {
        let token = CancellationToken::new();
        let watcher = {
            let token = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    debug!("Interrupted, cancelling fetch");
                    token.cancel();
                }
            })
        };

        let result = client
            .fetch_all_url_cancellable::<Value>(url, layout, &token)
            .await;
        watcher.abort();

        self.output(&result?)
    }

    /// Print a value to stdout in the selected format
    fn output<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{rendered}");
        Ok(())
    }
}
