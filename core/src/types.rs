//! The post record and its decoding contract.
//!
//! # Design
//! Field names follow the remote schema (`userId` on the wire). Unknown keys
//! are ignored so the endpoint can grow without breaking clients. Any element
//! that is missing a required field, or carries the wrong type, rejects the
//! whole batch: callers never see a partial list.
//!
//! Bodies are first parsed into a generic `serde_json::Value`. A derived
//! deserializer rejects repeated keys inside an object, but the generic map
//! keeps the last occurrence, which is what lenient JSON clients do.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A single post returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub body: String,
}

/// Decode a response body into posts, preserving array order.
pub fn decode_posts(body: &str) -> Result<Vec<Post>, ApiError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let posts = serde_json::from_value(value)?;
    Ok(posts)
}
