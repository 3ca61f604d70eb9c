//! Integration tests for the crawler
//!
//! These tests use wiremock to serve documentation pages and drive the
//! static HTTP loader through a full crawl, from configuration file to the
//! files left in the output folder.

use docs_harvest::config::load_config;
use docs_harvest::crawler::CrawlCoordinator;
use docs_harvest::loader::loader_factory;
use docs_harvest::output::FsDocumentStore;
use docs_harvest::url::output_filename;
use docs_harvest::Config;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRODUCT: &str = "Mule Runtime";
const FOLDER: &str = "Mule_Runtime";

/// Paths carry the real documentation host so pages classify as developer docs
fn doc_path(page: &str) -> String {
    format!("/docs.mulesoft.com/mule-runtime/{}", page)
}

/// Writes a configuration file pointing at the mock server and loads it
fn create_test_config(dir: &Path, server_uri: &str, max_depth: u32) -> Config {
    let config_path = dir.join("docs-harvest.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[crawler]
max-depth = {max_depth}
max-pages-per-product = 100
loader = "http"
page-load-timeout-ms = 5000

[output]
base-folder = "{base}"

[filter]
allowed-domains = ["{server}"]

[[product]]
name = "{product}"
prefixes = ["/mule-runtime/"]
seeds = ["{server}{seed}"]
"#,
            max_depth = max_depth,
            base = dir.join("corpus").display(),
            server = server_uri,
            product = PRODUCT,
            seed = doc_path("index"),
        ),
    )
    .unwrap();

    load_config(&config_path).unwrap()
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_unreachable(server: &MockServer, page_path: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_product() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        &doc_path("index"),
        r#"<html><head><title>Mule Runtime</title></head><body>
            <h1>Mule Runtime</h1>
            <p>Mule is a lightweight integration engine.</p>
            <a href="about">About Mule</a>
            <a href="missing">Missing page</a>
            <a href="broken">Broken page</a>
            <a href="/docs.mulesoft.com/general/intro">General</a>
            <a href="https://docs.mulesoft.com/mule-runtime/external">Live site</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        &server,
        &doc_path("about"),
        r#"<html><head><title>About Mule</title></head><body>
            <h1>About Mule</h1>
            <h2>Components</h2>
            <p>Connectors and scopes.</p>
            <a href="index">Back</a>
            <a href="deep">Deeper</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        &server,
        &doc_path("missing"),
        "<html><head><title>404 - Page Not Found</title></head><body>Gone</body></html>".to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path(doc_path("broken")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    // filtered out by prefix, and one level past the depth cap
    mount_unreachable(&server, "/docs.mulesoft.com/general/intro").await;
    mount_unreachable(&server, &doc_path("deep")).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), &base_url, 1);
    let coordinator = CrawlCoordinator::new(
        config.clone(),
        loader_factory(&config.crawler),
        Arc::new(FsDocumentStore),
    );

    let metrics = coordinator.run(config.targets()).await;
    let product = &metrics[PRODUCT];

    assert_eq!(product.links_processed, 2);
    assert_eq!(product.links_found, 7);
    assert_eq!(product.links_skipped_filter, 2);
    assert_eq!(product.links_skipped_error, 2);
    assert_eq!(product.links_skipped_duplicate, 1);
    assert_eq!(product.max_depth_reached, 1);
    assert!(product.reached_max_depth);
    assert!(!product.reached_max_pages);

    let index_url = format!("{}{}", base_url, doc_path("index"));
    let about_url = format!("{}{}", base_url, doc_path("about"));
    let missing_url = format!("{}{}", base_url, doc_path("missing"));
    let corpus = dir.path().join("corpus");

    let index_doc =
        std::fs::read_to_string(corpus.join(FOLDER).join(output_filename(&index_url))).unwrap();
    assert!(index_doc.starts_with("---\n"));
    assert!(index_doc.contains("title: \"Mule Runtime\""));
    assert!(index_doc.contains("tag: \"Mule Runtime\""));
    assert!(index_doc.contains("depth_level: 0"));
    assert!(index_doc.contains("## Table of Contents"));
    assert!(index_doc.contains("lightweight integration engine"));

    let about_doc =
        std::fs::read_to_string(corpus.join(FOLDER).join(output_filename(&about_url))).unwrap();
    assert!(about_doc.contains("depth_level: 1"));
    assert!(about_doc.contains(&format!("source_url: \"{}\"", index_url)));
    assert!(about_doc.contains("- [Components](#components)"));

    let skipped = std::fs::read_to_string(corpus.join("skipped_404.log")).unwrap();
    assert_eq!(skipped.lines().collect::<Vec<_>>(), vec![missing_url.as_str()]);

    let summary = std::fs::read_to_string(corpus.join("summary.log")).unwrap();
    assert_eq!(summary, "Mule_Runtime: 2 markdown files\n");

    let graph: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(corpus.join("link_graph.json")).unwrap())
            .unwrap();
    let nodes: Vec<&str> = graph["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|n| n.as_str())
        .collect();
    assert!(nodes.contains(&format!("{}{}", base_url, doc_path("deep")).as_str()));
    assert_eq!(graph["edges"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_seed_failure_leaves_empty_corpus() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(doc_path("index")))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), &server.uri(), 3);
    let coordinator = CrawlCoordinator::new(
        config.clone(),
        loader_factory(&config.crawler),
        Arc::new(FsDocumentStore),
    );

    let metrics = coordinator.run(config.targets()).await;
    let product = &metrics[PRODUCT];

    assert_eq!(product.links_processed, 0);
    assert_eq!(product.links_skipped_error, 1);
    assert_eq!(product.max_depth_reached, 0);
    assert!(!product.reached_max_depth);

    let corpus = dir.path().join("corpus");
    assert!(!corpus.join(FOLDER).exists());
    assert_eq!(std::fs::read_to_string(corpus.join("summary.log")).unwrap(), "");
    assert!(!corpus.join("skipped_404.log").exists());
}

#[tokio::test]
async fn test_page_cap_over_http() {
    let server = MockServer::start().await;
    let links: String = (0..5)
        .map(|i| format!("<a href=\"child-{}\">Child {}</a>", i, i))
        .collect();

    mount_page(
        &server,
        &doc_path("index"),
        format!("<html><head><title>Index</title></head><body><h1>Index</h1>{}</body></html>", links),
    )
    .await;
    for i in 0..5 {
        mount_page(
            &server,
            &doc_path(&format!("child-{}", i)),
            format!("<html><head><title>Child {}</title></head><body><p>Child</p></body></html>", i),
        )
        .await;
    }

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path(), &server.uri(), 3);
    config.crawler.max_pages_per_product = 3;

    let coordinator = CrawlCoordinator::new(
        config.clone(),
        loader_factory(&config.crawler),
        Arc::new(FsDocumentStore),
    );
    let metrics = coordinator.run(config.targets()).await;
    let product = &metrics[PRODUCT];

    assert_eq!(product.links_processed, 3);
    assert!(product.reached_max_pages);
    assert_eq!(product.outcome().label(), "page_capped");

    let summary = std::fs::read_to_string(dir.path().join("corpus").join("summary.log")).unwrap();
    assert_eq!(summary, "Mule_Runtime: 3 markdown files\n");
}

#[tokio::test]
async fn test_not_found_status_goes_to_skip_log() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        &doc_path("index"),
        r#"<html><head><title>Index</title></head><body><h1>Index</h1><a href="gone">Gone</a></body></html>"#
            .to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path(doc_path("gone")))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string("<html><head><title>404 Not Found</title></head><body></body></html>")
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), &server.uri(), 1);
    let coordinator = CrawlCoordinator::new(
        config.clone(),
        loader_factory(&config.crawler),
        Arc::new(FsDocumentStore),
    );

    let metrics = coordinator.run(config.targets()).await;
    let product = &metrics[PRODUCT];

    assert_eq!(product.links_processed, 1);
    assert_eq!(product.links_skipped_error, 1);

    let gone_url = format!("{}{}", server.uri(), doc_path("gone"));
    let skipped = std::fs::read_to_string(dir.path().join("corpus").join("skipped_404.log")).unwrap();
    assert_eq!(skipped.lines().collect::<Vec<_>>(), vec![gone_url.as_str()]);
    assert!(!dir
        .path()
        .join("corpus")
        .join(FOLDER)
        .join(output_filename(&gone_url))
        .exists());
}
