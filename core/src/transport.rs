//! The seam between request building and the network.
//!
//! # Design
//! `Transport` takes an `HttpRequest` and returns an `HttpResponse` and
//! nothing else. Status interpretation stays in `PostsClient`, so transports
//! report 4xx/5xx as data. `ReqwestTransport` is fully async: dropping an
//! `execute` future mid-request drops the connection with it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round trip.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send;

    /// Release held network resources. Later `execute` calls fail with
    /// `ApiError::Network`.
    fn close(&self) {}
}

impl<T: Transport> Transport for Arc<T> {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send {
        (**self).execute(request)
    }

    fn close(&self) {
        (**self).close();
    }
}

/// Settings for [`ReqwestTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Upper bound on a whole request, connect through body read.
    pub timeout: Duration,
}

impl TransportConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Production transport backed by a `reqwest::Client`.
///
/// `close()` drops the client and its idle connection pool. Requests that
/// are still running hold their own client handle; the feed aborts them on
/// close by dropping their futures.
pub struct ReqwestTransport {
    client: Mutex<Option<reqwest::Client>>,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client: Mutex::new(Some(client)),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.client.lock().is_none()
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let client = self
            .client
            .lock()
            .clone()
            .ok_or_else(|| ApiError::Network("client closed".to_string()))?;
        debug!(method = request.method.as_str(), path = %request.path, "sending request");

        let mut builder = match request.method {
            HttpMethod::Get => client.get(&request.path),
        };
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn close(&self) {
        if self.client.lock().take().is_some() {
            debug!("http client released");
        }
    }
}
