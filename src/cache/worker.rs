//! Offline cache worker
//!
//! A dispatcher mirroring the lifecycle of the hosted page's service
//! worker: install populates the current version bucket with the shell
//! asset manifest, activate purges every older-tagged bucket, and fetch
//! interception applies one strategy per request class:
//!
//! - non-GET and cross-origin subresources are not intercepted;
//! - navigations go network-first with the cached shell as fallback;
//! - same-origin GETs are served stale-while-revalidate.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use super::fetcher::{AssetRequest, AssetResponse, FetchError, Fetcher, RequestMode};
use super::store::AssetCache;

/// Shell asset paths precached at install time, relative to the origin
const SHELL_MANIFEST: [&str; 5] = ["", "index.html", "styles.css", "app.js", "manifest.json"];

/// Path of the shell page served when an offline navigation fails
const SHELL_PAGE: &str = "index.html";

/// Errors from worker lifecycle steps
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Fetching a manifest asset failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A manifest asset resolved with a non-success status
    #[error("unexpected status {status} precaching {url}")]
    Status { status: u16, url: String },

    /// Writing a manifest asset to the cache failed
    #[error("failed to cache asset: {0}")]
    Cache(#[from] std::io::Error),
}

/// The cache worker: version tag, origin, manifest, cache handle, fetcher
#[derive(Clone)]
pub struct CacheWorker {
    /// Version tag naming the current cache bucket
    version_tag: String,
    /// Origin whose requests this worker intercepts
    origin: Url,
    /// Asset paths (relative to the origin) precached at install
    manifest: Vec<String>,
    /// Disk cache holding the version buckets
    cache: AssetCache,
    /// Network access
    fetcher: Arc<dyn Fetcher>,
}

impl CacheWorker {
    /// Creates a worker with the default shell manifest
    pub fn new(
        origin: Url,
        version_tag: impl Into<String>,
        cache: AssetCache,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            version_tag: version_tag.into(),
            origin,
            manifest: SHELL_MANIFEST.iter().map(|s| s.to_string()).collect(),
            cache,
            fetcher,
        }
    }

    /// Replaces the asset manifest (for tests)
    pub fn with_manifest(mut self, manifest: Vec<String>) -> Self {
        self.manifest = manifest;
        self
    }

    /// Returns the current version tag
    pub fn version_tag(&self) -> &str {
        &self.version_tag
    }

    /// Returns the absolute URLs of the manifest assets
    pub fn manifest_urls(&self) -> Vec<Url> {
        self.manifest
            .iter()
            .filter_map(|path| self.origin.join(path).ok())
            .collect()
    }

    /// Install step: populate the current bucket with the shell manifest
    ///
    /// Assets are fetched concurrently; the first failure (fetch error,
    /// non-success status, or cache write) aborts the install with an
    /// error. No partial-success result is reported — a bucket is only
    /// trusted after install and activation both complete.
    pub async fn on_install(&self) -> Result<(), WorkerError> {
        let fetches = self
            .manifest_urls()
            .into_iter()
            .map(|url| async move { self.fetcher.fetch(&AssetRequest::get(url)).await });
        let results = futures::future::join_all(fetches).await;

        for result in results {
            let response = result?;
            if !response.is_success() {
                return Err(WorkerError::Status {
                    status: response.status,
                    url: response.url,
                });
            }
            self.cache.put(&self.version_tag, &response)?;
        }
        info!(
            "installed cache bucket {} ({} assets)",
            self.version_tag,
            self.manifest.len()
        );
        Ok(())
    }

    /// Activate step: purge every bucket not matching the current tag
    ///
    /// After this returns, the current tag's bucket is the only one left
    /// and the worker handles all subsequent requests.
    pub fn on_activate(&self) -> usize {
        let removed = self.cache.purge_except(&self.version_tag);
        if removed > 0 {
            info!("purged {removed} stale cache bucket(s)");
        }
        removed
    }

    /// Fetch interception
    ///
    /// Returns `Ok(None)` for requests the worker does not intercept
    /// (non-GET, cross-origin subresources), which fall through to default
    /// network handling. For intercepted requests the strategy is:
    ///
    /// - navigation: network first; any resolved response passes through,
    ///   whatever its status. Only a transport failure falls back to the
    ///   cached shell page; if the shell is not cached either, the error
    ///   propagates;
    /// - same-origin GET: the cached response when present, with a
    ///   fire-and-forget background refresh of the bucket; otherwise the
    ///   network response (a copy is stored, write failures dropped);
    ///   transport failure with an empty cache propagates.
    pub async fn on_fetch(
        &self,
        request: &AssetRequest,
    ) -> Result<Option<AssetResponse>, FetchError> {
        if request.method != reqwest::Method::GET {
            return Ok(None);
        }

        if request.mode == RequestMode::Navigate {
            return match self.fetcher.fetch(request).await {
                Ok(response) => Ok(Some(response)),
                Err(err) => match self.cached_shell() {
                    Some(shell) => Ok(Some(shell)),
                    None => Err(err),
                },
            };
        }

        if !request.same_origin(&self.origin) {
            return Ok(None);
        }

        if let Some(cached) = self.cache.get(&self.version_tag, request.url.as_str()) {
            self.revalidate_in_background(request.clone());
            return Ok(Some(cached));
        }

        let response = self.fetcher.fetch(request).await?;
        if let Err(e) = self.cache.put(&self.version_tag, &response) {
            debug!("dropping cache write for {}: {e}", response.url);
        }
        Ok(Some(response))
    }

    /// Looks up the cached shell page used as navigation fallback
    fn cached_shell(&self) -> Option<AssetResponse> {
        let shell_url = self.origin.join(SHELL_PAGE).ok()?;
        self.cache.get(&self.version_tag, shell_url.as_str())
    }

    /// Refreshes the cached copy of a request without blocking the caller
    ///
    /// Both fetch and cache-write failures are deliberately discarded; the
    /// current response was already served from cache.
    fn revalidate_in_background(&self, request: AssetRequest) {
        let fetcher = Arc::clone(&self.fetcher);
        let cache = self.cache.clone();
        let tag = self.version_tag.clone();
        tokio::spawn(async move {
            match fetcher.fetch(&request).await {
                Ok(fresh) => {
                    if let Err(e) = cache.put(&tag, &fresh) {
                        debug!("dropping revalidation write for {}: {e}", fresh.url);
                    }
                }
                Err(e) => debug!("revalidation fetch failed for {}: {e}", request.url),
            }
        });
    }
}
