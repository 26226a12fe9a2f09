//! Background offline mirror
//!
//! Runs the cache worker lifecycle off the UI thread: install and activate
//! once at startup, then periodically revalidate the shell assets through
//! the worker's fetch path so the cached copy stays fresh. Progress is
//! reported to the app over a tokio channel; nothing here is ever fatal.

use std::time::Duration;
use tokio::sync::mpsc;

use crate::cache::{AssetRequest, CacheWorker};

/// Messages sent from the mirror task to the main app
#[derive(Debug, Clone)]
pub enum MirrorMessage {
    /// The shell manifest was fetched and cached
    InstallComplete {
        /// Number of manifest assets cached
        assets: usize,
    },
    /// Old version buckets were purged; the mirror is serving requests
    Activated {
        /// Number of stale buckets removed
        purged: usize,
    },
    /// A revalidation cycle started
    RefreshStarted,
    /// One asset was served (and its cached copy refreshed)
    AssetRefreshed {
        /// URL of the refreshed asset
        url: String,
    },
    /// A revalidation cycle finished
    RefreshCompleted,
    /// An error occurred during install or refresh
    MirrorError(String),
}

/// Configuration for the mirror task
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Interval between revalidation cycles
    pub refresh_interval: Duration,
    /// Whether the mirror runs at all
    pub enabled: bool,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(300), // 5 minutes
            enabled: true,
        }
    }
}

/// Handle for the background mirror task
pub struct MirrorHandle {
    /// Channel for receiving mirror messages
    pub receiver: mpsc::Receiver<MirrorMessage>,
    /// Flag to signal shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl MirrorHandle {
    /// Spawns the mirror task
    ///
    /// The task installs and activates the worker, then revalidates the
    /// manifest each interval. A failed install is retried on the next
    /// interval (the page simply is not offline-ready until then).
    pub fn spawn(config: MirrorConfig, worker: CacheWorker) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        if config.enabled {
            let tx = msg_tx.clone();
            tokio::spawn(async move {
                let mut installed = install_and_activate(&worker, &tx).await;

                let mut interval = tokio::time::interval(config.refresh_interval);
                // Skip the first tick (immediate)
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            if !installed {
                                installed = install_and_activate(&worker, &tx).await;
                                continue;
                            }
                            revalidate_manifest(&worker, &tx).await;
                        }
                        _ = shutdown_rx.recv() => {
                            break;
                        }
                    }
                }
            });
        }

        Self {
            receiver: msg_rx,
            shutdown_tx,
        }
    }

    /// Shuts down the background mirror task
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Runs install then activate, reporting the outcome
async fn install_and_activate(worker: &CacheWorker, tx: &mpsc::Sender<MirrorMessage>) -> bool {
    match worker.on_install().await {
        Ok(()) => {
            let _ = tx
                .send(MirrorMessage::InstallComplete {
                    assets: worker.manifest_urls().len(),
                })
                .await;
            let purged = worker.on_activate();
            let _ = tx.send(MirrorMessage::Activated { purged }).await;
            true
        }
        Err(e) => {
            let _ = tx.send(MirrorMessage::MirrorError(e.to_string())).await;
            false
        }
    }
}

/// Re-fetches each manifest asset through the worker's fetch path
async fn revalidate_manifest(worker: &CacheWorker, tx: &mpsc::Sender<MirrorMessage>) {
    let _ = tx.send(MirrorMessage::RefreshStarted).await;
    for url in worker.manifest_urls() {
        let request = AssetRequest::get(url.clone());
        match worker.on_fetch(&request).await {
            Ok(Some(_)) => {
                let _ = tx
                    .send(MirrorMessage::AssetRefreshed {
                        url: url.to_string(),
                    })
                    .await;
            }
            Ok(None) => {}
            Err(e) => {
                let _ = tx.send(MirrorMessage::MirrorError(e.to_string())).await;
            }
        }
    }
    let _ = tx.send(MirrorMessage::RefreshCompleted).await;
}

/// Checks for pending mirror messages without blocking
pub fn try_recv(handle: &mut MirrorHandle) -> Option<MirrorMessage> {
    handle.receiver.try_recv().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::testing::ScriptedFetcher;
    use crate::cache::AssetCache;
    use std::sync::Arc;
    use tempfile::TempDir;
    use url::Url;

    fn worker(fetcher: ScriptedFetcher, temp_dir: &TempDir) -> CacheWorker {
        let cache = AssetCache::with_root(temp_dir.path().to_path_buf());
        CacheWorker::new(
            Url::parse("https://logbook.example/").unwrap(),
            "shiplog-v1",
            cache,
            Arc::new(fetcher),
        )
        .with_manifest(vec!["index.html".to_string()])
    }

    #[test]
    fn test_mirror_config_default() {
        let config = MirrorConfig::default();
        assert_eq!(config.refresh_interval, Duration::from_secs(300));
        assert!(config.enabled);
    }

    #[tokio::test]
    async fn test_mirror_disabled_sends_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let config = MirrorConfig {
            enabled: false,
            ..Default::default()
        };

        let mut handle = MirrorHandle::spawn(config, worker(ScriptedFetcher::offline(), &temp_dir));
        assert!(try_recv(&mut handle).is_none());
    }

    #[tokio::test]
    async fn test_mirror_reports_install_then_activation() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher =
            ScriptedFetcher::new().serve("https://logbook.example/index.html", b"shell");

        let mut handle = MirrorHandle::spawn(MirrorConfig::default(), worker(fetcher, &temp_dir));

        let first = tokio::time::timeout(Duration::from_secs(5), handle.receiver.recv())
            .await
            .expect("Mirror should report in time")
            .expect("Channel should be open");
        assert!(matches!(first, MirrorMessage::InstallComplete { assets: 1 }));

        let second = tokio::time::timeout(Duration::from_secs(5), handle.receiver.recv())
            .await
            .expect("Mirror should report in time")
            .expect("Channel should be open");
        assert!(matches!(second, MirrorMessage::Activated { .. }));
    }

    #[tokio::test]
    async fn test_mirror_reports_error_when_offline() {
        let temp_dir = TempDir::new().unwrap();
        let mut handle = MirrorHandle::spawn(
            MirrorConfig::default(),
            worker(ScriptedFetcher::offline(), &temp_dir),
        );

        let first = tokio::time::timeout(Duration::from_secs(5), handle.receiver.recv())
            .await
            .expect("Mirror should report in time")
            .expect("Channel should be open");
        assert!(matches!(first, MirrorMessage::MirrorError(_)));
    }
}
