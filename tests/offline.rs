//! Integration tests for the offline mirror lifecycle
//!
//! Drives a full install / activate / fetch cycle through the public cache
//! API with a scripted in-process fetcher, including the upgrade path where
//! a new version tag replaces an old bucket.

use std::sync::Arc;
use std::time::Duration;

use shiplog::cache::testing::ScriptedFetcher;
use shiplog::cache::{AssetCache, AssetRequest, CacheWorker};
use tempfile::TempDir;
use url::Url;

const ORIGIN: &str = "https://logbook.example/";

fn origin() -> Url {
    Url::parse(ORIGIN).unwrap()
}

fn asset_url(path: &str) -> Url {
    origin().join(path).unwrap()
}

fn online_fetcher() -> ScriptedFetcher {
    ScriptedFetcher::new()
        .serve("https://logbook.example/", b"<html>shell</html>")
        .serve("https://logbook.example/index.html", b"<html>shell</html>")
        .serve("https://logbook.example/styles.css", b"body { margin: 0 }")
        .serve("https://logbook.example/app.js", b"console.log('logbook')")
        .serve("https://logbook.example/manifest.json", b"{}")
}

fn worker(tag: &str, cache: AssetCache, fetcher: ScriptedFetcher) -> CacheWorker {
    CacheWorker::new(origin(), tag, cache, Arc::new(fetcher))
}

#[tokio::test]
async fn test_installed_worker_serves_every_shell_asset_offline() {
    let temp_dir = TempDir::new().unwrap();
    let cache = AssetCache::with_root(temp_dir.path().to_path_buf());

    worker("shiplog-v1", cache.clone(), online_fetcher())
        .on_install()
        .await
        .unwrap();

    // The network disappears; a fresh worker over the same cache still
    // serves the whole shell
    let offline = worker("shiplog-v1", cache, ScriptedFetcher::offline());
    for path in ["index.html", "styles.css", "app.js", "manifest.json"] {
        let request = AssetRequest::get(asset_url(path));
        let served = offline
            .on_fetch(&request)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("expected cached response for {path}"));
        assert_eq!(served.status, 200, "cached response for {path}");
    }
}

#[tokio::test]
async fn test_offline_navigation_falls_back_to_cached_shell() {
    let temp_dir = TempDir::new().unwrap();
    let cache = AssetCache::with_root(temp_dir.path().to_path_buf());

    worker("shiplog-v1", cache.clone(), online_fetcher())
        .on_install()
        .await
        .unwrap();

    let offline = worker("shiplog-v1", cache, ScriptedFetcher::offline());
    let request = AssetRequest::navigate(asset_url("some/deep/link"));
    let served = offline.on_fetch(&request).await.unwrap().unwrap();
    assert_eq!(served.body, b"<html>shell</html>");
}

#[tokio::test]
async fn test_reachable_server_404_is_not_masked_by_the_shell() {
    let temp_dir = TempDir::new().unwrap();
    let cache = AssetCache::with_root(temp_dir.path().to_path_buf());

    worker("shiplog-v1", cache.clone(), online_fetcher())
        .on_install()
        .await
        .unwrap();

    // The server is up but has no such page; its answer passes through
    let live = worker("shiplog-v1", cache, online_fetcher());
    let request = AssetRequest::navigate(asset_url("missing-page"));
    let served = live.on_fetch(&request).await.unwrap().unwrap();
    assert_eq!(served.status, 404);
    assert_ne!(served.body, b"<html>shell</html>");
}

#[tokio::test]
async fn test_version_upgrade_purges_the_old_bucket() {
    let temp_dir = TempDir::new().unwrap();
    let cache = AssetCache::with_root(temp_dir.path().to_path_buf());

    let old = worker("shiplog-v1", cache.clone(), online_fetcher());
    old.on_install().await.unwrap();
    assert_eq!(old.on_activate(), 0);

    let new = worker("shiplog-v2", cache.clone(), online_fetcher());
    new.on_install().await.unwrap();
    let removed = new.on_activate();

    assert_eq!(removed, 1);
    assert_eq!(cache.buckets(), vec!["shiplog-v2"]);

    // The new bucket keeps serving after the purge
    let offline = worker("shiplog-v2", cache, ScriptedFetcher::offline());
    let request = AssetRequest::get(asset_url("app.js"));
    assert!(offline.on_fetch(&request).await.unwrap().is_some());
}

#[tokio::test]
async fn test_stale_response_is_served_then_revalidated() {
    let temp_dir = TempDir::new().unwrap();
    let cache = AssetCache::with_root(temp_dir.path().to_path_buf());

    worker("shiplog-v1", cache.clone(), online_fetcher())
        .on_install()
        .await
        .unwrap();

    // The asset changed upstream since install
    let updated = ScriptedFetcher::new()
        .serve("https://logbook.example/app.js", b"console.log('v2')");
    let swr = worker("shiplog-v1", cache.clone(), updated);

    let request = AssetRequest::get(asset_url("app.js"));
    let served = swr.on_fetch(&request).await.unwrap().unwrap();
    assert_eq!(
        served.body, b"console.log('logbook')",
        "the stale copy is served immediately"
    );

    // The background refresh lands in the bucket shortly after
    let mut refreshed = false;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let cached = cache
            .get("shiplog-v1", "https://logbook.example/app.js")
            .unwrap();
        if cached.body == b"console.log('v2')" {
            refreshed = true;
            break;
        }
    }
    assert!(refreshed, "revalidation should update the cached copy");
}

#[tokio::test]
async fn test_failed_revalidation_keeps_the_cached_copy() {
    let temp_dir = TempDir::new().unwrap();
    let cache = AssetCache::with_root(temp_dir.path().to_path_buf());

    worker("shiplog-v1", cache.clone(), online_fetcher())
        .on_install()
        .await
        .unwrap();

    let offline = worker("shiplog-v1", cache.clone(), ScriptedFetcher::offline());
    let request = AssetRequest::get(asset_url("styles.css"));
    let served = offline.on_fetch(&request).await.unwrap().unwrap();
    assert_eq!(served.body, b"body { margin: 0 }");

    // Give the doomed revalidation a chance to run, then confirm the
    // bucket was left alone
    tokio::time::sleep(Duration::from_millis(50)).await;
    let cached = cache
        .get("shiplog-v1", "https://logbook.example/styles.css")
        .unwrap();
    assert_eq!(cached.body, b"body { margin: 0 }");
}
