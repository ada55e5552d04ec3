//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → HTTP requests → aggregated collections

use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::Write;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tunefetch::cli::{Cli, Commands, OutputFormat};
use tunefetch::http::{HttpClient, HttpClientConfig};
use tunefetch::template::TemplateContext;
use tunefetch::{
    ClientConfig, CollectionFetcher, Error, FetchConfig, LibraryResource, MusicClient, SearchKind,
};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn plain_http(server: &MockServer, max_retries: u32) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .no_rate_limit()
        .max_retries(max_retries)
        .backoff(
            tunefetch::BackoffType::Constant,
            Duration::from_millis(1),
            Duration::from_millis(5),
        )
        .build();
    HttpClient::with_config(config).unwrap()
}

async fn mount_page(server: &MockServer, page_path: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Aggregation over HTTP
// ============================================================================

#[tokio::test]
async fn test_fetch_all_concatenates_pages_in_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/page1",
        json!({"items": ["a", "b"], "next": format!("{base}/page2")}),
    )
    .await;
    mount_page(&server, "/page2", json!({"items": ["c"], "next": null})).await;

    let config = FetchConfig::new().with_layout(tunefetch::PageLayout::items_next());
    let fetcher = CollectionFetcher::with_config(plain_http(&server, 0), config).unwrap();

    let items: Vec<String> = fetcher.fetch_all(&format!("{base}/page1")).await.unwrap();
    assert_eq!(items, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_empty_middle_page_is_followed() {
    let server = MockServer::start().await;

    mount_page(&server, "/p1", json!({"data": [1], "next": "/p2"})).await;
    mount_page(&server, "/p2", json!({"data": [], "next": "/p3"})).await;
    mount_page(&server, "/p3", json!({"data": [2, 3]})).await;

    let fetcher = CollectionFetcher::new(plain_http(&server, 0));
    let items: Vec<u32> = fetcher.fetch_all("/p1").await.unwrap();
    assert_eq!(items, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_malformed_second_page_fails_whole_call() {
    let server = MockServer::start().await;

    mount_page(&server, "/p1", json!({"data": [1, 2], "next": "/p2"})).await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = CollectionFetcher::new(plain_http(&server, 0));
    let err = fetcher.fetch_all::<u32>("/p1").await.unwrap_err();

    assert!(matches!(err, Error::Decode { page: 2, .. }));
    assert!(err.to_string().contains("/p2"));
}

#[tokio::test]
async fn test_server_error_after_retries_is_transport_failure() {
    let server = MockServer::start().await;

    mount_page(&server, "/p1", json!({"data": [1], "next": "/p2"})).await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let fetcher = CollectionFetcher::new(plain_http(&server, 2));
    let err = fetcher.fetch_all::<u32>("/p1").await.unwrap_err();

    assert!(matches!(err, Error::Transport { page: 2, .. }));
    assert!(err.is_transport());
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_self_referencing_chain_hits_ceiling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": ["x"],
            "next": "/loop",
        })))
        .expect(5)
        .mount(&server)
        .await;

    let fetcher =
        CollectionFetcher::with_config(plain_http(&server, 0), FetchConfig::new().with_max_pages(5))
            .unwrap();
    let err = fetcher.fetch_all::<String>("/loop").await.unwrap_err();

    assert!(matches!(err, Error::TooManyPages { max_pages: 5, ref url } if url.ends_with("/loop")));
}

#[tokio::test]
async fn test_cancel_during_slow_page() {
    let server = MockServer::start().await;

    mount_page(&server, "/p1", json!({"data": [1], "next": "/p2"})).await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [2]}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let fetcher = CollectionFetcher::new(plain_http(&server, 0));
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let err = fetcher
        .fetch_all_cancellable::<u32>("/p1", &token)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled { page: 2, .. }));
}

#[tokio::test]
async fn test_page_stream_yields_pages_lazily() {
    let server = MockServer::start().await;

    mount_page(&server, "/p1", json!({"data": ["a"], "next": "/p2"})).await;
    mount_page(&server, "/p2", json!({"data": ["b", "c"]})).await;

    let fetcher = CollectionFetcher::new(plain_http(&server, 0));
    let pages: Vec<_> = fetcher.pages::<String>("/p1").into_stream().collect().await;

    assert_eq!(pages.len(), 2);
    let first = pages[0].as_ref().unwrap();
    assert_eq!(first.items, vec!["a"]);
    assert_eq!(first.next, Some(format!("{}/p2", server.uri())));
    assert!(pages[1].as_ref().unwrap().is_last());
}

// ============================================================================
// Music Client End-to-End
// ============================================================================

#[tokio::test]
async fn test_config_file_to_library_playlists() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me/library/playlists"))
        .and(query_param_is_missing("offset"))
        .and(header("Authorization", "Bearer dev-from-env"))
        .and(header("Music-User-Token", "user-from-env"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "p.1", "type": "library-playlists", "attributes": {"name": "One"}}],
            "next": "/v1/me/library/playlists?offset=1",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/library/playlists"))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "p.2", "type": "library-playlists", "attributes": {"name": "Two"}}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let yaml = format!(
        r#"
base_url: {}
developer_token: "{{{{ env.DEV }}}}"
user_token: "{{{{ env.MUT }}}}"
rate_limit: null
max_retries: 0
"#,
        server.uri()
    );
    let ctx = TemplateContext::with_env([
        ("DEV".to_string(), "dev-from-env".to_string()),
        ("MUT".to_string(), "user-from-env".to_string()),
    ]);
    let config = ClientConfig::from_yaml_str(&yaml, &ctx).unwrap();
    let client = MusicClient::from_config(&config).unwrap();

    let playlists = client.library_playlists().await.unwrap();
    let names: Vec<_> = playlists.iter().filter_map(|p| p.name()).collect();
    assert_eq!(names, vec!["One", "Two"]);
}

#[tokio::test]
async fn test_config_file_on_disk() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/library/artists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "r.1", "type": "library-artists", "attributes": {"name": "Björk"}}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "base_url: {}\nstorefront: is\nrate_limit: null",
        server.uri()
    )
    .unwrap();

    let config = ClientConfig::from_file(file.path()).unwrap();
    let client = MusicClient::from_config(&config).unwrap();
    assert_eq!(client.storefront(), "is");

    let artists = client
        .library_resources(LibraryResource::Artists)
        .await
        .unwrap();
    assert_eq!(artists[0].name(), Some("Björk"));
}

#[tokio::test]
async fn test_search_then_add_to_library() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/catalog/us/search"))
        .and(query_param("types", "playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": {"playlists": {"data": [
                {"id": "pl.a", "type": "playlists", "attributes": {"name": "Focus"}},
                {"id": "pl.b", "type": "playlists", "attributes": {"name": "Chill"}},
            ]}},
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/me/library"))
        .and(query_param("ids[playlists]", "pl.a,pl.b"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig {
        base_url: server.uri(),
        rate_limit: None,
        ..Default::default()
    };
    let client = MusicClient::from_config(&config).unwrap();

    let results = client
        .catalog_search("focus", &[SearchKind::Playlists], Some(5), None)
        .await
        .unwrap();
    let ids: Vec<String> = results.get("playlists").unwrap().items.iter().map(|r| r.id.clone()).collect();

    assert!(client.add_playlists_to_library(&ids).await.unwrap());

    let serialized = serde_json::to_value(&results).unwrap();
    assert_eq!(serialized["results"]["playlists"]["items"][1]["id"], "pl.b");
}

// ============================================================================
// CLI Parsing
// ============================================================================

#[test]
fn test_cli_parses_search() {
    use clap::Parser;

    let cli = Cli::try_parse_from([
        "tunefetch",
        "--format",
        "pretty",
        "--max-pages",
        "20",
        "search",
        "daft punk",
        "--types",
        "songs,record-labels",
        "--limit",
        "5",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Pretty);
    assert_eq!(cli.max_pages, Some(20));
    match cli.command {
        Commands::Search {
            term, types, limit, all, ..
        } => {
            assert_eq!(term, "daft punk");
            assert_eq!(types, vec![SearchKind::Songs, SearchKind::RecordLabels]);
            assert_eq!(limit, Some(5));
            assert!(!all);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_cli_parses_library_and_fetch() {
    use clap::Parser;

    let cli = Cli::try_parse_from(["tunefetch", "library", "music-videos"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Library {
            kind: LibraryResource::MusicVideos
        }
    ));

    let cli = Cli::try_parse_from([
        "tunefetch",
        "-v",
        "fetch",
        "/v1/me/library/songs",
        "--items-path",
        "results.songs.data",
    ])
    .unwrap();
    assert!(cli.verbose);
    match cli.command {
        Commands::Fetch {
            url,
            items_path,
            next_path,
        } => {
            assert_eq!(url, "/v1/me/library/songs");
            assert_eq!(items_path, "results.songs.data");
            assert_eq!(next_path, "next");
        }
        other => panic!("unexpected command: {other:?}"),
    }

    let cli = Cli::try_parse_from(["tunefetch", "played", "--limit", "3"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Played {
            limit: 3,
            offset: 0
        }
    ));

    let cli = Cli::try_parse_from(["tunefetch", "suggest", "daf"]).unwrap();
    match cli.command {
        Commands::Suggest { term, types, limit } => {
            assert_eq!(term, "daf");
            assert!(types.is_empty());
            assert_eq!(limit, None);
        }
        other => panic!("unexpected command: {other:?}"),
    }

    let cli =
        Cli::try_parse_from(["tunefetch", "suggest", "daf", "--types", "songs,albums"]).unwrap();
    match cli.command {
        Commands::Suggest { types, .. } => {
            assert_eq!(types, vec![SearchKind::Songs, SearchKind::Albums]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_cli_rejects_bad_input() {
    use clap::Parser;

    assert!(Cli::try_parse_from(["tunefetch", "library", "podcasts"]).is_err());
    assert!(Cli::try_parse_from(["tunefetch", "add"]).is_err());
    assert!(Cli::try_parse_from(["tunefetch", "search", "x", "--all", "--limit", "3"]).is_err());
}
