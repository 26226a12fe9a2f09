//! Network fetching for the offline mirror
//!
//! Requests and responses are plain data so the worker can be driven by a
//! real HTTP client in production and by scripted fakes in tests. The
//! `Fetcher` trait is the only seam that touches the network.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Errors that can occur when fetching an asset
///
/// These are transport failures only. A server that answers — with any
/// status, success or not — produces an `AssetResponse`, never an error;
/// callers that care about the status inspect the response.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The network is unreachable (used by test fakes and offline checks)
    #[error("network unreachable: {0}")]
    Offline(String),
}

/// How a request reached the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// A top-level page load
    Navigate,
    /// A subresource request (stylesheet, script, manifest, ...)
    Asset,
}

/// A request observed by the cache worker
#[derive(Debug, Clone)]
pub struct AssetRequest {
    /// HTTP method; only GET requests are ever intercepted
    pub method: Method,
    /// Absolute request URL
    pub url: Url,
    /// Navigation vs. subresource
    pub mode: RequestMode,
}

impl AssetRequest {
    /// Creates a GET subresource request
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            mode: RequestMode::Asset,
        }
    }

    /// Creates a navigation (top-level page load) request
    pub fn navigate(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            mode: RequestMode::Navigate,
        }
    }

    /// Returns true when the request targets the given origin
    pub fn same_origin(&self, origin: &Url) -> bool {
        self.url.origin() == origin.origin()
    }
}

/// A fetched (or cached) response: the value stored per URL in a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetResponse {
    /// URL the response was fetched from
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header, when present
    pub content_type: Option<String>,
    /// Response body bytes
    pub body: Vec<u8>,
}

impl AssetResponse {
    /// Returns true for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs network fetches on behalf of the cache worker
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the given request from the network
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, FetchError>;
}

/// Fetcher backed by a real HTTP client
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    /// HTTP client for making requests
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a default client
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, FetchError> {
        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(AssetResponse {
            url: request.url.to_string(),
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
