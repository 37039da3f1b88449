//! Integration tests for the crawler
//!
//! These tests use wiremock to stand up a mock Moodle server and drive the
//! authenticated HTTP source through the full pagination cycle end-to-end.

use moodle_forum_export::config::{OutputConfig, SessionConfig};
use moodle_forum_export::crawler::{ForumCrawler, HttpPageSource, NoDelay, StopReason};
use moodle_forum_export::model::DiscussionUrl;
use moodle_forum_export::output::{read_export_file, write_export};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "abc";

/// Forum index URL on the mock server
fn forum_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/mod/forum/view.php?id=7", server.uri()))
        .expect("Failed to parse forum URL")
}

fn create_test_source(token: &str) -> HttpPageSource {
    HttpPageSource::with_session(&SessionConfig::default(), token)
        .expect("Failed to build HTTP source")
}

fn index_html(ids: &[u32]) -> String {
    let rows: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<tr class="discussion"><th class="topic"><div class="d-flex">
                <a class="w-100 h-100 d-block" href="discuss.php?d={}">Topic {}</a>
                </div></th></tr>"#,
                id, id
            )
        })
        .collect();
    format!("<html><body><table>{}</table></body></html>", rows)
}

fn discussion_html(posts: &[(&str, &str, &str)]) -> String {
    let articles: String = posts
        .iter()
        .map(|(title, author, content)| {
            format!(
                r#"<article class="forum-post-container">
                <header>
                  <h3 data-region-content="forum-post-core-subject">{}</h3>
                  <a href="/user/view.php?id=3&amp;course=2">{}</a>
                  <time datetime="2024-03-01T10:00:00+01:00">1 March</time>
                </header>
                <div class="post-content-container"><p>{}</p></div>
                </article>"#,
                title, author, content
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", articles)
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

/// Mounts an index page that only answers requests carrying the session cookie
async fn mount_index(server: &MockServer, page: &str, ids: &[u32]) {
    Mock::given(method("GET"))
        .and(path("/mod/forum/view.php"))
        .and(query_param("id", "7"))
        .and(query_param("page", page))
        .and(header("cookie", "MoodleSession=abc"))
        .respond_with(html(index_html(ids)))
        .mount(server)
        .await;
}

async fn mount_discussion(server: &MockServer, id: &str, posts: &[(&str, &str, &str)]) {
    Mock::given(method("GET"))
        .and(path("/mod/forum/discuss.php"))
        .and(query_param("d", id))
        .respond_with(html(discussion_html(posts)))
        .mount(server)
        .await;
}

fn discussion(server: &MockServer, id: u32) -> DiscussionUrl {
    DiscussionUrl::new(format!("{}/mod/forum/discuss.php?d={}", server.uri(), id))
}

#[tokio::test]
async fn test_full_forum_pagination() {
    let mock_server = MockServer::start().await;

    mount_index(&mock_server, "0", &[1, 2]).await;
    mount_index(&mock_server, "1", &[3]).await;
    mount_index(&mock_server, "2", &[]).await;
    mount_discussion(
        &mock_server,
        "1",
        &[("Welcome", "Ana", "Hello class"), ("Re: Welcome", "Luis", "Thanks")],
    )
    .await;
    mount_discussion(&mock_server, "2", &[("Exam dates", "Ana", "Friday")]).await;
    mount_discussion(&mock_server, "3", &[("Old news", "Ana", "Archived")]).await;

    let source = create_test_source(TOKEN);
    let report = ForumCrawler::new(forum_url(&mock_server), &source, &NoDelay)
        .expect("Failed to create crawler")
        .run()
        .await;

    assert!(matches!(report.stop_reason, StopReason::EmptyPage { page: 2 }));
    assert_eq!(report.index_requests, 3);
    assert_eq!(report.result.len(), 3);
    assert_eq!(report.result.total_posts(), 4);

    let order: Vec<_> = report.result.iter().map(|(url, _)| url.clone()).collect();
    assert_eq!(
        order,
        vec![
            discussion(&mock_server, 1),
            discussion(&mock_server, 2),
            discussion(&mock_server, 3)
        ]
    );

    let posts = report.result.get(&discussion(&mock_server, 1)).unwrap();
    assert_eq!(posts[0].title, "Welcome");
    assert_eq!(posts[0].author, "Ana");
    assert_eq!(posts[0].date, "2024-03-01T10:00:00+01:00");
    assert_eq!(posts[0].content, "Hello class");
    assert_eq!(posts[1].author, "Luis");
}

#[tokio::test]
async fn test_login_redirect_stops_pagination() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mod/forum/view.php"))
        .respond_with(
            ResponseTemplate::new(303).insert_header("location", "/login/index.php"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/login/index.php"))
        .respond_with(html("<html><body><form id=\"login\"></form></body></html>".to_string()))
        .mount(&mock_server)
        .await;

    let source = create_test_source("expired");
    let report = ForumCrawler::new(forum_url(&mock_server), &source, &NoDelay)
        .expect("Failed to create crawler")
        .run()
        .await;

    assert!(report.result.is_empty());
    match report.stop_reason {
        StopReason::FetchFailed { page, error } => {
            assert_eq!(page, 0);
            assert!(error.is_session_invalid());
        }
        other => panic!("unexpected stop reason: {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_on_index_page() {
    let mock_server = MockServer::start().await;

    mount_index(&mock_server, "0", &[1]).await;
    mount_discussion(&mock_server, "1", &[("Only", "Ana", "Body")]).await;
    Mock::given(method("GET"))
        .and(path("/mod/forum/view.php"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let source = create_test_source(TOKEN);
    let report = ForumCrawler::new(forum_url(&mock_server), &source, &NoDelay)
        .expect("Failed to create crawler")
        .run()
        .await;

    assert_eq!(report.result.len(), 1);
    match report.stop_reason {
        StopReason::FetchFailed { page, error } => {
            assert_eq!(page, 1);
            assert!(!error.is_session_invalid());
        }
        other => panic!("unexpected stop reason: {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_discussion_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_index(&mock_server, "0", &[1, 2]).await;
    mount_index(&mock_server, "1", &[]).await;
    Mock::given(method("GET"))
        .and(path("/mod/forum/discuss.php"))
        .and(query_param("d", "1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;
    mount_discussion(&mock_server, "2", &[("Kept", "Ana", "Body")]).await;

    let source = create_test_source(TOKEN);
    let report = ForumCrawler::new(forum_url(&mock_server), &source, &NoDelay)
        .expect("Failed to create crawler")
        .run()
        .await;

    assert_eq!(report.discussions_failed, 1);
    assert_eq!(report.result.len(), 1);
    assert!(report.result.get(&discussion(&mock_server, 2)).is_some());
}

#[tokio::test]
async fn test_session_cookie_is_sent() {
    let mock_server = MockServer::start().await;

    mount_index(&mock_server, "0", &[1]).await;
    mount_index(&mock_server, "1", &[]).await;
    mount_discussion(&mock_server, "1", &[("Private", "Ana", "Members only")]).await;

    // Without the expected cookie the index mocks do not match and the
    // server answers 404.
    let wrong = create_test_source("someone-else");
    let report = ForumCrawler::new(forum_url(&mock_server), &wrong, &NoDelay)
        .expect("Failed to create crawler")
        .run()
        .await;
    assert!(report.result.is_empty());
    assert_eq!(report.index_requests, 1);

    let right = create_test_source(TOKEN);
    let report = ForumCrawler::new(forum_url(&mock_server), &right, &NoDelay)
        .expect("Failed to create crawler")
        .run()
        .await;
    assert_eq!(report.result.len(), 1);
}

#[tokio::test]
async fn test_scraped_forum_survives_export() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    mount_index(&mock_server, "0", &[1, 2]).await;
    mount_index(&mock_server, "1", &[]).await;
    mount_discussion(
        &mock_server,
        "1",
        &[("Syllabus", "Ana", "Week 1"), ("Re: Syllabus", "Luis", "Got it")],
    )
    .await;
    mount_discussion(&mock_server, "2", &[("Grades", "Ana", "Posted")]).await;

    let source = create_test_source(TOKEN);
    let report = ForumCrawler::new(forum_url(&mock_server), &source, &NoDelay)
        .expect("Failed to create crawler")
        .run()
        .await;

    let output = OutputConfig {
        directory: Some(temp_dir.path().join("outputdata")),
        file_name: "forum.txt".to_string(),
    };
    let written = write_export(&report.result, &output).expect("Failed to write export");
    assert_eq!(written, temp_dir.path().join("outputdata").join("forum.txt"));

    let read_back = read_export_file(&written).expect("Failed to read export");
    assert_eq!(read_back, report.result);
}
