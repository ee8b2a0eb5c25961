use super::{RawResponse, RemoteRequest, Transport};
use crate::error::{ContentError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("scripture/", env!("CARGO_PKG_VERSION"));

/// `reqwest`-backed transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// `timeout` bounds each attempt; the executor's retries sit on top of it.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(network_failure)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RemoteRequest) -> Result<RawResponse> {
        let mut builder = self
            .client
            .get(&request.url)
            .header(ACCEPT, "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(network_failure)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(network_failure)?;
        Ok(RawResponse { status, body })
    }
}

fn network_failure(err: reqwest::Error) -> ContentError {
    ContentError::NetworkFailure(describe(&err))
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("could not connect: {}", err)
    } else if err.is_body() || err.is_decode() {
        format!("response body could not be read: {}", err)
    } else {
        err.to_string()
    }
}
