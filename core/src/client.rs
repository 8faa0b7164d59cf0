//! Stateless request builder and response parser for the posts API.
//!
//! # Design
//! `PostsClient` holds only a `base_url`. `build_list_posts` produces an
//! `HttpRequest` and `parse_list_posts` consumes an `HttpResponse`; the
//! round trip in between belongs to a transport or to the FFI host.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{decode_posts, Post};

/// Base URL of the public posts endpoint.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Synchronous, stateless client for the posts API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostsClient {
    base_url: String,
}

impl PostsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_posts(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/posts", self.base_url),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }

    pub fn parse_list_posts(&self, response: HttpResponse) -> Result<Vec<Post>, ApiError> {
        check_status(&response)?;
        decode_posts(&response.body)
    }
}

impl Default for PostsClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Map any status outside 200..=299 to `ApiError::HttpStatus`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpStatus {
        status: response.status,
        body: response.body.clone(),
    })
}
