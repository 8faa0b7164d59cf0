//! Fetch lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port and drives `PostFeed` over real
//! HTTP through `ReqwestTransport`, switching the server's behaviour between
//! fetches to cover success, HTTP failures, decode failures and a dead host.

use std::sync::Arc;
use std::time::Duration;

use mock_server::{Behavior, MockHandle};
use posts_core::{
    ApiError, ErrorKind, FetchOutcome, FetchPhase, FetchScope, PostFeed, PostsClient,
    ReqwestTransport, TransportConfig,
};
use tokio::io::AsyncReadExt;
use tokio::sync::oneshot;

async fn start_server(handle: MockHandle) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run_with(listener, handle));
    format!("http://{addr}")
}

fn feed_for(base_url: &str) -> PostFeed<ReqwestTransport> {
    let config = TransportConfig::with_timeout(Duration::from_secs(5));
    let transport = ReqwestTransport::new(&config).unwrap();
    PostFeed::new(PostsClient::new(base_url), transport)
}

fn failure_kind(outcome: &FetchOutcome) -> Option<ErrorKind> {
    match outcome {
        FetchOutcome::Failed(err) => Some(err.kind()),
        _ => None,
    }
}

#[tokio::test]
async fn fetch_lifecycle() {
    let handle = MockHandle::seeded();
    let base_url = start_server(handle.clone()).await;
    let feed = feed_for(&base_url);
    let scope = FetchScope::new();

    // Step 1: seeded list loads in order.
    assert_eq!(feed.fetch_posts(&scope).await, FetchOutcome::Loaded(100));
    let state = feed.snapshot();
    assert_eq!(state.phase(), FetchPhase::Loaded);
    let expected: Vec<(i32, i32, String)> = mock_server::seed_posts()
        .into_iter()
        .map(|p| (p.id, p.user_id, p.title))
        .collect();
    let actual: Vec<(i32, i32, String)> = state
        .posts()
        .iter()
        .map(|p| (p.id, p.user_id, p.title.clone()))
        .collect();
    assert_eq!(actual, expected);

    // Step 2: server error keeps the cached list.
    handle.set(Behavior::Status(500)).await;
    let outcome = feed.fetch_posts(&scope).await;
    assert!(matches!(outcome, FetchOutcome::Failed(ApiError::HttpStatus { status: 500, .. })));
    let state = feed.snapshot();
    assert_eq!(state.error(), Some("HTTP 500"));
    assert_eq!(state.posts().len(), 100);
    assert!(!state.is_loading());

    // Step 3: a non-array body is a decode failure.
    handle
        .set(Behavior::Raw {
            status: 200,
            body: r#"{"id":1}"#.to_string(),
        })
        .await;
    let outcome = feed.fetch_posts(&scope).await;
    assert_eq!(failure_kind(&outcome), Some(ErrorKind::Decode));
    assert_eq!(feed.snapshot().posts().len(), 100);

    // Step 4: 404 is an HTTP status failure.
    handle.set(Behavior::Status(404)).await;
    let outcome = feed.fetch_posts(&scope).await;
    assert!(matches!(outcome, FetchOutcome::Failed(ApiError::HttpStatus { status: 404, .. })));
    assert_eq!(feed.snapshot().posts().len(), 100);

    // Step 5: duplicated keys decode, and the error from step 4 is cleared.
    handle
        .set(Behavior::Raw {
            status: 200,
            body: r#"[{"id":1,"userId":1,"title":"a","title":"a","body":"b"}]"#.to_string(),
        })
        .await;
    assert_eq!(feed.fetch_posts(&scope).await, FetchOutcome::Loaded(1));
    let state = feed.snapshot();
    assert!(state.error().is_none());
    let post = &state.posts()[0];
    assert_eq!((post.id, post.user_id, post.title.as_str(), post.body.as_str()), (1, 1, "a", "b"));

    // Step 6: empty array is a valid empty list.
    handle
        .set(Behavior::Raw {
            status: 200,
            body: "[]".to_string(),
        })
        .await;
    assert_eq!(feed.fetch_posts(&scope).await, FetchOutcome::Loaded(0));
    assert!(feed.snapshot().posts().is_empty());

    assert_eq!(handle.hits(), 6);
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let feed = feed_for(&format!("http://{addr}"));
    let outcome = feed.fetch_posts(&FetchScope::new()).await;
    assert_eq!(failure_kind(&outcome), Some(ErrorKind::Network));

    let state = feed.snapshot();
    assert!(state.error().unwrap().starts_with("network error:"));
    assert!(state.posts().is_empty());
    assert_eq!(state.phase(), FetchPhase::Failed);
}

#[tokio::test]
async fn closed_feed_does_not_reach_the_server() {
    let handle = MockHandle::seeded();
    let base_url = start_server(handle.clone()).await;
    let feed = feed_for(&base_url);

    feed.close();
    assert_eq!(feed.fetch_posts(&FetchScope::new()).await, FetchOutcome::Cancelled);
    assert_eq!(handle.hits(), 0);
}

#[tokio::test]
async fn closing_the_feed_drops_the_open_connection() {
    // A server that reads the request and never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (received_tx, received_rx) = oneshot::channel();
    let (closed_tx, closed_rx) = oneshot::channel();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;
        let _ = received_tx.send(());
        // Read until the client hangs up.
        while matches!(socket.read(&mut buf).await, Ok(n) if n > 0) {}
        let _ = closed_tx.send(());
    });

    let feed = Arc::new(feed_for(&format!("http://{addr}")));
    let task = feed.spawn_fetch(FetchScope::new());
    received_rx.await.unwrap();

    feed.close();
    assert_eq!(task.await.unwrap(), FetchOutcome::Cancelled);
    assert!(!feed.snapshot().is_loading());

    tokio::time::timeout(Duration::from_secs(2), closed_rx)
        .await
        .expect("connection should be closed after the feed closes")
        .unwrap();
}
