//! The fetch state container.
//!
//! # Design
//! `PostFeed` owns a `tokio::sync::watch` channel holding the current
//! [`FetchState`]. Presentation code subscribes to it and re-renders on every
//! change. `fetch_posts` is the only network operation: it marks the feed as
//! loading, performs one GET through the transport, and publishes either the
//! decoded posts or an error message in a single update.
//!
//! Overlapping fetches are not serialized. Each call publishes its own result
//! when it completes, so the last one to finish wins.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::PostsClient;
use crate::error::ApiError;
use crate::scope::FetchScope;
use crate::state::FetchState;
use crate::transport::Transport;

/// How a single `fetch_posts` call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Posts were replaced with this many entries.
    Loaded(usize),
    /// The error was recorded in `FetchState::error`.
    Failed(ApiError),
    /// The scope was cancelled or the feed closed. Posts and error were not
    /// written; only the loading flag was cleared.
    Cancelled,
}

pub struct PostFeed<T: Transport> {
    client: PostsClient,
    transport: T,
    state: watch::Sender<FetchState>,
    /// Cancelled by `close()`; aborts every in-flight fetch.
    lifetime: FetchScope,
}

impl<T: Transport> PostFeed<T> {
    pub fn new(client: PostsClient, transport: T) -> Self {
        Self {
            client,
            transport,
            state: watch::Sender::new(FetchState::default()),
            lifetime: FetchScope::new(),
        }
    }

    /// A receiver that observes every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> FetchState {
        self.state.borrow().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    /// Fetch the post list once and publish the result.
    ///
    /// Errors are recorded in the state and returned as
    /// `FetchOutcome::Failed`; they are never raised to the caller.
    /// `is_loading` is false again whenever this returns after starting.
    pub async fn fetch_posts(&self, scope: &FetchScope) -> FetchOutcome {
        if self.is_closed() || scope.is_cancelled() {
            return FetchOutcome::Cancelled;
        }

        self.state.send_modify(FetchState::begin_fetch);
        debug!(base_url = self.client.base_url(), "fetching posts");

        let request = self.client.build_list_posts();
        // Losing the race drops the transport future, which aborts the request.
        let result = tokio::select! {
            biased;
            _ = scope.cancelled() => None,
            _ = self.lifetime.cancelled() => None,
            response = self.transport.execute(request) => {
                Some(response.and_then(|response| self.client.parse_list_posts(response)))
            }
        };

        let result = match result {
            Some(result) if !self.is_closed() && !scope.is_cancelled() => result,
            _ => {
                debug!("fetch cancelled, discarding result");
                self.state.send_modify(FetchState::finish_cancelled);
                return FetchOutcome::Cancelled;
            }
        };

        match result {
            Ok(posts) => {
                let count = posts.len();
                info!(count, "posts loaded");
                self.state.send_modify(|state| state.finish_success(posts));
                FetchOutcome::Loaded(count)
            }
            Err(err) => {
                warn!(kind = ?err.kind(), error = %err, "fetching posts failed");
                let message = err.to_string();
                self.state.send_modify(|state| state.finish_failure(message));
                FetchOutcome::Failed(err)
            }
        }
    }

    /// Store the post with `id` from the current list as the selection.
    /// Returns false, leaving the selection alone, if no such post exists.
    pub fn select_post(&self, id: i32) -> bool {
        self.state.send_if_modified(|state| state.select(id))
    }

    pub fn clear_selection(&self) {
        self.state.send_if_modified(|state| {
            let had_selection = state.selected_post().is_some();
            state.clear_selection();
            had_selection
        });
    }

    /// Tear the feed down: in-flight fetches are aborted, later fetches are
    /// skipped, and the transport releases its network resources.
    pub fn close(&self) {
        if self.lifetime.cancel() {
            self.transport.close();
            debug!("post feed closed");
        }
    }
}

impl<T: Transport + 'static> PostFeed<T> {
    /// Run `fetch_posts` on the tokio runtime without blocking the caller.
    pub fn spawn_fetch(self: &Arc<Self>, scope: FetchScope) -> JoinHandle<FetchOutcome> {
        let feed = Arc::clone(self);
        tokio::spawn(async move { feed.fetch_posts(&scope).await })
    }
}

impl<T: Transport> Drop for PostFeed<T> {
    fn drop(&mut self) {
        self.close();
    }
}
