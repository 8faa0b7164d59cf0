//! Client core for the posts feed.
//!
//! # Overview
//! Fetches the post list from a JSON endpoint and exposes loading, error and
//! data state for a presentation layer to observe. Rendering is not part of
//! this crate.
//!
//! # Design
//! - `PostsClient` is stateless. It builds the `HttpRequest` and parses the
//!   `HttpResponse` (host-does-IO), so the FFI crate can hand the round trip
//!   to a native host.
//! - `Transport` is the seam where I/O happens; `ReqwestTransport` is the
//!   default implementation.
//! - `PostFeed` owns the observable `FetchState` and performs `fetch_posts`,
//!   cancelled through a `FetchScope` owned by the caller.

pub mod client;
pub mod error;
pub mod feed;
pub mod http;
pub mod scope;
pub mod state;
pub mod transport;
pub mod types;

pub use client::{PostsClient, DEFAULT_BASE_URL};
pub use error::{ApiError, ErrorKind};
pub use feed::{FetchOutcome, PostFeed};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use scope::FetchScope;
pub use state::{FetchPhase, FetchState};
pub use transport::{ReqwestTransport, Transport, TransportConfig};
pub use types::{decode_posts, Post};
