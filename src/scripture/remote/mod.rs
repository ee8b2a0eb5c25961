//! # Remote Layer
//!
//! Everything that touches the scripture API lives here.
//!
//! - [`Transport`]: sends one HTTP GET and hands back status and body. This is
//!   the only seam between the library and the network, so tests swap in
//!   [`MockTransport`](crate::testing::MockTransport).
//! - [`http::HttpTransport`]: the production transport, backed by `reqwest`.
//! - [`executor::RequestExecutor`]: one logical call. Adds the API key header,
//!   retries rate limits and network failures with linear backoff, maps
//!   statuses to [`ContentError`](crate::error::ContentError) and unwraps the
//!   `{ "data": ... }` envelope.
//! - [`wire`]: the JSON shapes the API returns and their mapping into
//!   [`model`](crate::model) types.

use crate::error::Result;
use async_trait::async_trait;

pub mod executor;
pub mod http;
pub mod wire;

pub use executor::{RequestExecutor, RetryPolicy, API_KEY_HEADER};
pub use http::HttpTransport;

/// A fully composed GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl RemoteRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of a completed exchange, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends requests over some network.
///
/// Implementations return `Err` only for connection-level failures
/// ([`ContentError::NetworkFailure`](crate::error::ContentError::NetworkFailure)).
/// Any HTTP status, including errors, comes back as `Ok(RawResponse)`.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: &RemoteRequest) -> Result<RawResponse>;
}
