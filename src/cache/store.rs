//! Versioned on-disk asset cache
//!
//! Assets live in one bucket (subdirectory) per version tag under an
//! XDG-compliant cache root. Within a bucket each response is a JSON file
//! named by the SHA-256 of its request URL, so any URL maps to exactly one
//! file. Activation keeps at most one bucket: the current tag's.

use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use super::fetcher::AssetResponse;

/// Disk-backed cache of request/response pairs, grouped by version tag
#[derive(Debug, Clone)]
pub struct AssetCache {
    /// Directory holding one subdirectory per version tag
    root: PathBuf,
}

impl AssetCache {
    /// Creates a cache rooted in the XDG cache directory
    ///
    /// Uses `~/.cache/shiplog/assets/` on Linux, or the equivalent path on
    /// other platforms. Returns `None` if the cache directory cannot be
    /// determined.
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "shiplog")?;
        Some(Self {
            root: project_dirs.cache_dir().join("assets"),
        })
    }

    /// Creates a cache with a custom root directory (for tests)
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Returns the directory of a version tag's bucket
    fn bucket_dir(&self, tag: &str) -> PathBuf {
        self.root.join(tag)
    }

    /// Returns the file path for a URL inside a bucket
    fn asset_path(&self, tag: &str, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        self.bucket_dir(tag).join(format!("{}.json", hex::encode(digest)))
    }

    /// Stores a response in the given tag's bucket, keyed by its URL
    pub fn put(&self, tag: &str, response: &AssetResponse) -> std::io::Result<()> {
        fs::create_dir_all(self.bucket_dir(tag))?;
        let json = serde_json::to_string(response)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(self.asset_path(tag, &response.url), json)
    }

    /// Reads the cached response for a URL from the given tag's bucket
    ///
    /// Returns `None` when the entry is missing or cannot be parsed.
    pub fn get(&self, tag: &str, url: &str) -> Option<AssetResponse> {
        let content = fs::read_to_string(self.asset_path(tag, url)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Lists the names of all existing buckets
    pub fn buckets(&self) -> Vec<String> {
        let Ok(read_dir) = fs::read_dir(&self.root) else {
            return Vec::new();
        };
        read_dir
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect()
    }

    /// Deletes every bucket whose name differs from the given tag
    ///
    /// Returns the number of buckets removed. Individual deletions that
    /// fail are logged and skipped.
    pub fn purge_except(&self, tag: &str) -> usize {
        let mut removed = 0;
        for bucket in self.buckets() {
            if bucket == tag {
                continue;
            }
            match fs::remove_dir_all(self.bucket_dir(&bucket)) {
                Ok(()) => removed += 1,
                Err(e) => warn!("failed to remove stale cache bucket {bucket}: {e}"),
            }
        }
        removed
    }
}
