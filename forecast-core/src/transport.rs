use async_trait::async_trait;
use reqwest::{Client, header::HeaderMap};
use std::fmt::Debug;

use crate::error::BoxError;

/// A fully-read HTTP response.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the single GET a forecast fetch needs.
///
/// Timeouts, proxies and TLS settings belong to the implementation; the
/// connection never retries or cancels a call.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, url: &str) -> Result<HttpResponse, BoxError>;
}

/// Default transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client, e.g. one built with a request timeout.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, BoxError> {
        let res = self.http.get(url).send().await?;

        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let body = res.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
