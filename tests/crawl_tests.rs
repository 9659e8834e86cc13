//! Integration tests for the archiver
//!
//! These tests use wiremock to stand in for the forum and run the full
//! batch/termination cycle end-to-end into a temporary directory.

use bbs_archive::config::Config;
use bbs_archive::crawler::{Coordinator, NOT_FOUND_MARKER};
use bbs_archive::{PageRecord, RecordKind, Serializer};
use std::collections::BTreeSet;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn article_page(id: u64) -> String {
    format!(
        r#"<html><head>
<meta name="keywords" content="rust,archive">
</head><body>
<div class="main-content">
  <div class="main-box">
    <div class="fs14"><a href="/">Home</a> » <a href="/n/4">Rust</a></div>
    <div class="topic-title-main"><h1>Topic {id}</h1></div>
    <div class="topic-title-date">By <a href="/member/11">carol</a> at 2020-01-02 09:30</div>
    <div class="topic-content">
      <div class="p">Body of <b>topic {id}</b></div>
      <div class="mytag"><a href="/tag/rust">rust</a></div>
      <div class="c"></div>
    </div>
  </div>
  <div class="main-box">
    <div class="commont-item">
      <div class="commont-data-date"><div class="float-left"><a href="/member/12">dave</a> 2020-01-03</div></div>
      <div class="commont-content"><i>agreed</i></div>
    </div>
  </div>
</div>
</body></html>"#,
        id = id
    )
}

fn category_page(name: &str) -> String {
    format!(
        r#"<html><head><meta name="keywords" content="{name}"></head><body>
<div class="main-content"><div class="post-list grey"><p>About {name}</p></div></div>
</body></html>"#,
        name = name
    )
}

async fn mount_page(server: &MockServer, page: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_not_found(server: &MockServer, page: &str) {
    mount_page(server, page, 200, NOT_FOUND_MARKER.to_string()).await;
}

fn create_test_config(server: &MockServer, dir: &TempDir, kind: RecordKind) -> Config {
    let mut config = Config::new(server.uri(), dir.path());
    config.kinds = vec![kind];
    config.http.timeout_secs = 2;
    config
}

fn files_in(dir: &Path) -> BTreeSet<String> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default()
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    let mut paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    paths.sort();
    paths
}

#[tokio::test]
async fn test_articles_until_range_exhausted() {
    let server = MockServer::start().await;
    mount_page(&server, "/t/1", 200, article_page(1)).await;
    mount_page(&server, "/t/2", 200, article_page(2)).await;
    mount_not_found(&server, "/t/3").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir, RecordKind::Article);
    config.start_id = 1;
    config.max_id = Some(3);
    config.max_concurrent = 2;

    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    let article_dir = dir.path().join("article");
    assert_eq!(
        files_in(&article_dir),
        BTreeSet::from(["1.json".to_string(), "2.json".to_string()])
    );

    let text = std::fs::read_to_string(article_dir.join("2.json")).unwrap();
    let record: PageRecord = serde_json::from_str(&text).unwrap();
    match record {
        PageRecord::Article(article) => {
            assert_eq!(article.article_id, 2);
            assert_eq!(article.category_id, 4);
            assert_eq!(article.author_id, 11);
            assert_eq!(article.title, "Topic 2");
            assert_eq!(article.tags, vec!["rust".to_string(), "archive".to_string()]);
            assert_eq!(article.comments.len(), 1);
            assert_eq!(article.publish_time.to_rfc3339(), "2020-01-01T16:00:00+00:00");
        }
        other => panic!("expected an article, got {:?}", other),
    }

    let kind = summary.kind(RecordKind::Article).unwrap();
    assert_eq!(kind.written, 2);
    assert_eq!(kind.exhausted_at, Some(3));
    assert_eq!(kind.batches, 2);
}

#[tokio::test]
async fn test_restricted_page_is_skipped() {
    let server = MockServer::start().await;
    mount_page(&server, "/n/1", 200, category_page("News")).await;
    mount_page(&server, "/n/2", 403, "forbidden".to_string()).await;
    mount_page(&server, "/n/3", 200, category_page("Help")).await;
    mount_not_found(&server, "/n/4").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir, RecordKind::Category);
    config.max_concurrent = 1;

    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(
        files_in(&dir.path().join("category")),
        BTreeSet::from(["1.json".to_string(), "3.json".to_string()])
    );
    assert_eq!(
        requested_paths(&server).await,
        vec!["/n/1", "/n/2", "/n/3", "/n/4"]
    );

    let kind = summary.kind(RecordKind::Category).unwrap();
    assert_eq!(kind.written, 2);
    assert_eq!(kind.exhausted_at, Some(4));
}

#[tokio::test]
async fn test_nothing_requested_past_exhausting_batch() {
    let server = MockServer::start().await;
    mount_page(&server, "/n/1", 200, category_page("News")).await;
    mount_not_found(&server, "/n/2").await;
    mount_page(&server, "/n/3", 200, category_page("Late")).await;
    mount_page(&server, "/n/4", 200, category_page("Later")).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir, RecordKind::Category);
    config.max_concurrent = 3;

    Coordinator::new(config).unwrap().run().await.unwrap();

    // ID 3 shares the batch with the exhausting ID and keeps its output
    assert_eq!(requested_paths(&server).await, vec!["/n/1", "/n/2", "/n/3"]);
    assert_eq!(
        files_in(&dir.path().join("category")),
        BTreeSet::from(["1.json".to_string(), "3.json".to_string()])
    );
}

#[tokio::test]
async fn test_markdown_output() {
    let server = MockServer::start().await;
    mount_page(&server, "/t/5", 200, article_page(5)).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir, RecordKind::Article);
    config.serializer = Serializer::Markdown;
    config.start_id = 5;
    config.max_id = Some(5);

    let summary = Coordinator::new(config).unwrap().run().await.unwrap();
    assert_eq!(summary.total_written(), 1);

    let text = std::fs::read_to_string(dir.path().join("article").join("5.md")).unwrap();
    let (header, body) = text
        .strip_prefix("---\n")
        .and_then(|rest| rest.split_once("---\n"))
        .unwrap();

    let header: serde_yaml::Value = serde_yaml::from_str(header).unwrap();
    assert_eq!(header["aid"].as_u64(), Some(5));
    assert_eq!(header["title"].as_str(), Some("Topic 5"));
    assert!(header.get("content").is_none());
    assert!(!header["comments"][0]["content"]
        .as_str()
        .unwrap()
        .contains("<i>"));

    assert!(body.starts_with('\n'));
    assert!(body.contains("**topic 5**"));
    assert!(body.ends_with('\n'));
}

#[tokio::test]
async fn test_start_after_max_makes_no_requests() {
    let server = MockServer::start().await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir, RecordKind::Category);
    config.start_id = 10;
    config.max_id = Some(2);

    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    assert!(requested_paths(&server).await.is_empty());
    assert_eq!(summary.total_started(), 0);
    assert!(files_in(&dir.path().join("category")).is_empty());
}
