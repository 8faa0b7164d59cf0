//! Error types for the posts client.
//!
//! # Design
//! Three failure classes cover a single GET-and-decode round trip: the
//! transport never produced a response, the server answered with a non-2xx
//! status, or the body did not decode into posts. The fetch container folds
//! all three into one display string, so `Display` output is kept short.

use thiserror::Error;

/// Errors produced while fetching and decoding the post list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Connectivity failure, timeout, unreadable body, or a closed client.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a status outside 200..=299.
    #[error("HTTP {status}")]
    HttpStatus { status: u16, body: String },

    /// The body was not a JSON array of well-formed posts.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Coarse classification of an [`ApiError`], used for logging and the C ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    HttpStatus,
    Decode,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::HttpStatus { .. } => ErrorKind::HttpStatus,
            ApiError::Decode(_) => ErrorKind::Decode,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}
