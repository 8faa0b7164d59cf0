use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub body: String,
}

/// What `GET /posts` answers with.
#[derive(Clone, Debug)]
pub enum Behavior {
    /// 200 with the posts as a JSON array.
    Posts(Vec<Post>),
    /// The given status with an empty JSON object, like the public API's 404.
    Status(u16),
    /// Arbitrary status and body, served as `application/json`.
    Raw { status: u16, body: String },
}

/// Shared, switchable behaviour of a running mock. Clones share state.
#[derive(Clone, Debug)]
pub struct MockHandle {
    behavior: Arc<RwLock<Behavior>>,
    hits: Arc<AtomicUsize>,
}

impl MockHandle {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior: Arc::new(RwLock::new(behavior)),
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(Behavior::Posts(seed_posts()))
    }

    pub async fn set(&self, behavior: Behavior) {
        *self.behavior.write().await = behavior;
    }

    /// Number of `GET /posts` requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// 100 posts, ten per user, in the shape of the public endpoint.
pub fn seed_posts() -> Vec<Post> {
    (1..=100)
        .map(|id| Post {
            id,
            user_id: (id - 1) / 10 + 1,
            title: format!("post {id}"),
            body: format!("body of post {id}"),
        })
        .collect()
}

pub fn app() -> Router {
    app_with(MockHandle::seeded())
}

pub fn app_with(handle: MockHandle) -> Router {
    Router::new()
        .route("/posts", get(list_posts))
        .with_state(handle)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, handle: MockHandle) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(handle)).await
}

async fn list_posts(State(handle): State<MockHandle>) -> Response {
    handle.hits.fetch_add(1, Ordering::SeqCst);
    let behavior = handle.behavior.read().await.clone();
    tracing::debug!(?behavior, "serving /posts");
    match behavior {
        Behavior::Posts(posts) => Json(posts).into_response(),
        Behavior::Status(status) => {
            (status_code(status), Json(serde_json::json!({}))).into_response()
        }
        Behavior::Raw { status, body } => (
            status_code(status),
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
