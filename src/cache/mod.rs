//! Offline asset caching
//!
//! This module keeps the hosted logbook page available without network
//! access: a versioned disk cache of request/response pairs, a fetcher seam
//! over the HTTP client, and a worker that applies the install / activate /
//! fetch-interception lifecycle (navigation fallback to the cached shell,
//! stale-while-revalidate for same-origin assets, passthrough for anything
//! else).

pub mod fetcher;
pub mod store;
pub mod worker;

pub use fetcher::{AssetRequest, AssetResponse, FetchError, Fetcher, HttpFetcher, RequestMode};
pub use store::AssetCache;
pub use worker::{CacheWorker, WorkerError};

/// Test support: an in-process fetcher with scripted responses
///
/// Kept out of `#[cfg(test)]` so integration tests can drive the worker
/// without a network.
#[doc(hidden)]
pub mod testing {
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::fetcher::{AssetRequest, AssetResponse, FetchError, Fetcher};

    /// Fetcher serving a fixed URL -> body table, or failing when offline
    ///
    /// Unscripted URLs resolve as 404 responses, the way a live server
    /// answers for a missing path; only `offline` produces fetch errors.
    #[derive(Debug, Default)]
    pub struct ScriptedFetcher {
        /// Body served per URL
        responses: HashMap<String, Vec<u8>>,
        /// When true, every fetch fails as unreachable
        offline: bool,
        /// URLs fetched, in order
        requests: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        /// Creates a fetcher with no scripted responses
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates a fetcher whose every request fails
        pub fn offline() -> Self {
            Self {
                offline: true,
                ..Self::default()
            }
        }

        /// Scripts a 200 response body for a URL
        pub fn serve(mut self, url: &str, body: &[u8]) -> Self {
            self.responses.insert(url.to_string(), body.to_vec());
            self
        }

        /// Returns the URLs fetched so far
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().expect("requests lock").clone()
        }
    }

    #[async_trait]
    impl Fetcher for ScriptedFetcher {
        async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, FetchError> {
            self.requests
                .lock()
                .expect("requests lock")
                .push(request.url.to_string());

            if self.offline {
                return Err(FetchError::Offline(request.url.to_string()));
            }
            match self.responses.get(request.url.as_str()) {
                Some(body) => Ok(AssetResponse {
                    url: request.url.to_string(),
                    status: 200,
                    content_type: None,
                    body: body.clone(),
                }),
                None => Ok(AssetResponse {
                    url: request.url.to_string(),
                    status: 404,
                    content_type: None,
                    body: b"not found".to_vec(),
                }),
            }
        }
    }
}
