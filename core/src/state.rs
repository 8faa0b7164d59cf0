//! Observable state of the post feed.
//!
//! # Design
//! Fields are read-only outside the crate. Each `begin_*`/`finish_*` method
//! is one complete transition, so a single `watch::Sender::send_modify` call
//! never publishes a half-updated state.

use crate::types::Post;

/// Phase derived from the state fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Snapshot of what the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchState {
    posts: Vec<Post>,
    selected_post: Option<Post>,
    is_loading: bool,
    error: Option<String>,
    has_loaded: bool,
}

impl FetchState {
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn selected_post(&self) -> Option<&Post> {
        self.selected_post.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> FetchPhase {
        if self.is_loading {
            FetchPhase::Loading
        } else if self.error.is_some() {
            FetchPhase::Failed
        } else if self.has_loaded {
            FetchPhase::Loaded
        } else {
            FetchPhase::Idle
        }
    }

    pub(crate) fn begin_fetch(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Replace the list. A selection whose id disappeared is cleared; one
    /// that survived is refreshed to the new record.
    pub(crate) fn finish_success(&mut self, posts: Vec<Post>) {
        self.selected_post = self
            .selected_post
            .as_ref()
            .and_then(|selected| posts.iter().find(|p| p.id == selected.id).cloned());
        self.posts = posts;
        self.error = None;
        self.has_loaded = true;
        self.is_loading = false;
    }

    pub(crate) fn finish_failure(&mut self, message: String) {
        self.error = Some(message);
        self.is_loading = false;
    }

    /// End a fetch whose result was discarded. Posts and error are untouched.
    pub(crate) fn finish_cancelled(&mut self) {
        self.is_loading = false;
    }

    /// Returns false when no post with `id` is in the current list.
    pub(crate) fn select(&mut self, id: i32) -> bool {
        match self.posts.iter().find(|p| p.id == id) {
            Some(post) => {
                self.selected_post = Some(post.clone());
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected_post = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: i32, title: &str) -> Post {
        Post {
            id,
            user_id: 1,
            title: title.to_string(),
            body: String::new(),
        }
    }

    #[test]
    fn initial_state_is_idle_and_empty() {
        let state = FetchState::default();
        assert!(state.posts().is_empty());
        assert!(state.selected_post().is_none());
        assert!(!state.is_loading());
        assert!(state.error().is_none());
        assert_eq!(state.phase(), FetchPhase::Idle);
    }

    #[test]
    fn begin_fetch_clears_error() {
        let mut state = FetchState::default();
        state.finish_failure("boom".to_string());
        assert_eq!(state.phase(), FetchPhase::Failed);

        state.begin_fetch();
        assert!(state.error().is_none());
        assert_eq!(state.phase(), FetchPhase::Loading);
    }

    #[test]
    fn failure_keeps_previous_posts() {
        let mut state = FetchState::default();
        state.begin_fetch();
        state.finish_success(vec![post(1, "a")]);
        assert_eq!(state.phase(), FetchPhase::Loaded);

        state.begin_fetch();
        state.finish_failure("HTTP 500".to_string());
        assert_eq!(state.posts(), &[post(1, "a")]);
        assert_eq!(state.error(), Some("HTTP 500"));
        assert!(!state.is_loading());
    }

    #[test]
    fn cancelled_fetch_stops_loading_and_keeps_data() {
        let mut state = FetchState::default();
        state.finish_success(vec![post(1, "a")]);
        state.begin_fetch();
        state.finish_cancelled();
        assert!(!state.is_loading());
        assert!(state.error().is_none());
        assert_eq!(state.posts(), &[post(1, "a")]);
        assert_eq!(state.phase(), FetchPhase::Loaded);

        let mut state = FetchState::default();
        state.begin_fetch();
        state.finish_cancelled();
        assert_eq!(state.phase(), FetchPhase::Idle);
    }

    #[test]
    fn empty_success_is_loaded_not_idle() {
        let mut state = FetchState::default();
        state.begin_fetch();
        state.finish_success(Vec::new());
        assert_eq!(state.phase(), FetchPhase::Loaded);
    }

    #[test]
    fn select_only_accepts_known_ids() {
        let mut state = FetchState::default();
        state.finish_success(vec![post(1, "a"), post(2, "b")]);
        assert!(!state.select(3));
        assert!(state.selected_post().is_none());
        assert!(state.select(2));
        assert_eq!(state.selected_post().map(|p| p.id), Some(2));
        state.clear_selection();
        assert!(state.selected_post().is_none());
    }

    #[test]
    fn reload_refreshes_or_drops_selection() {
        let mut state = FetchState::default();
        state.finish_success(vec![post(1, "a"), post(2, "b")]);
        assert!(state.select(1));

        state.finish_success(vec![post(1, "a v2")]);
        assert_eq!(state.selected_post().map(|p| p.title.as_str()), Some("a v2"));

        state.finish_success(vec![post(2, "b")]);
        assert!(state.selected_post().is_none());
    }
}
