//! Asset cache behavior: retry budget, hit short-circuit, in-flight
//! de-duplication and per-subscriber cancellation.
//!
//! All tests run with a paused clock so the fixed retry delay elapses
//! instantly and deterministically.

mod common;

use std::time::Duration;

use aniscope::{AssetCache, AssetCacheConfig, AssetStatus};
use common::{MockTransport, Scripted};

const IMG: &str = "https://img.example.com/poster1.jpg";

fn cache_with(transport: std::sync::Arc<MockTransport>) -> AssetCache {
    AssetCache::new(transport, AssetCacheConfig::default())
}

#[tokio::test(start_paused = true)]
async fn resolved_entry_is_never_refetched() {
    let transport = MockTransport::new();
    transport.script(IMG, Scripted::Body(b"poster-bytes".to_vec()));
    let cache = cache_with(transport.clone());

    let first = cache.resolve(IMG).wait().await;
    assert!(matches!(&first, AssetStatus::Resolved(b) if b.as_ref() == b"poster-bytes"));

    // Second resolve is a synchronous hit with zero network activity
    let second = cache.resolve(IMG).wait().await;
    assert!(matches!(second, AssetStatus::Resolved(_)));
    assert_eq!(transport.call_count(IMG), 1);
}

#[tokio::test(start_paused = true)]
async fn success_on_second_attempt_resolves() {
    let transport = MockTransport::new();
    transport.script(IMG, Scripted::Status(500));
    transport.script(IMG, Scripted::Body(b"eventually".to_vec()));
    let cache = cache_with(transport.clone());

    let status = cache.resolve(IMG).wait().await;
    assert!(matches!(&status, AssetStatus::Resolved(b) if b.as_ref() == b"eventually"));
    assert_eq!(transport.call_count(IMG), 2);

    // And the resolved entry sticks
    let again = cache.resolve(IMG).wait().await;
    assert!(matches!(again, AssetStatus::Resolved(_)));
    assert_eq!(transport.call_count(IMG), 2);
}

#[tokio::test(start_paused = true)]
async fn three_failures_reach_failed_with_no_fourth_attempt() {
    let transport = MockTransport::new();
    for _ in 0..3 {
        transport.script(IMG, Scripted::Status(503));
    }
    // A fourth response is scripted but must never be consumed
    transport.script(IMG, Scripted::Body(b"unreached".to_vec()));
    let cache = cache_with(transport.clone());

    let status = cache.resolve(IMG).wait().await;
    assert!(matches!(status, AssetStatus::Failed { attempts: 3 }));
    assert_eq!(transport.call_count(IMG), 3);

    // Failed is terminal: no background retry happens later
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(transport.call_count(IMG), 3);
    assert!(matches!(
        cache.snapshot(IMG),
        Some(AssetStatus::Failed { attempts: 3 })
    ));
}

#[tokio::test(start_paused = true)]
async fn re_resolving_a_failed_key_restarts_the_cycle() {
    let transport = MockTransport::new();
    for _ in 0..3 {
        transport.script(IMG, Scripted::Status(500));
    }
    transport.script(IMG, Scripted::Body(b"second-cycle".to_vec()));
    let cache = cache_with(transport.clone());

    let failed = cache.resolve(IMG).wait().await;
    assert!(matches!(failed, AssetStatus::Failed { .. }));

    // Deliberate re-invocation resets the attempt budget
    let retried = cache.resolve(IMG).wait().await;
    assert!(matches!(&retried, AssetStatus::Resolved(b) if b.as_ref() == b"second-cycle"));
    assert_eq!(transport.call_count(IMG), 4);
}

#[tokio::test(start_paused = true)]
async fn concurrent_resolves_share_one_inflight_fetch() {
    let transport = MockTransport::new();
    transport.script(
        IMG,
        Scripted::DelayedBody(Duration::from_secs(1), b"shared".to_vec()),
    );
    let cache = cache_with(transport.clone());

    let first = cache.resolve(IMG);
    let second = cache.resolve(IMG);

    let (a, b) = tokio::join!(first.wait(), second.wait());
    assert!(matches!(&a, AssetStatus::Resolved(bytes) if bytes.as_ref() == b"shared"));
    assert!(matches!(&b, AssetStatus::Resolved(bytes) if bytes.as_ref() == b"shared"));
    assert_eq!(transport.call_count(IMG), 1);
}

#[tokio::test(start_paused = true)]
async fn cancellation_is_per_subscriber() {
    let transport = MockTransport::new();
    transport.script(
        IMG,
        Scripted::DelayedBody(Duration::from_secs(5), b"survives".to_vec()),
    );
    let cache = cache_with(transport.clone());

    let first = cache.resolve(IMG);
    let second = cache.resolve(IMG);

    // One subscriber bails; the fetch keeps going for the other
    first.cancel();
    let status = second.wait().await;
    assert!(matches!(&status, AssetStatus::Resolved(b) if b.as_ref() == b"survives"));
    assert_eq!(transport.call_count(IMG), 1);
}

#[tokio::test(start_paused = true)]
async fn last_subscriber_cancel_aborts_the_fetch() {
    let transport = MockTransport::new();
    transport.script(
        IMG,
        Scripted::DelayedBody(Duration::from_secs(5), b"orphaned".to_vec()),
    );
    let cache = cache_with(transport.clone());

    let only = cache.resolve(IMG);
    // Let the fetch task reach the transport
    tokio::time::sleep(Duration::from_millis(1)).await;
    only.cancel();

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(cache.snapshot(IMG).is_none());
    assert_eq!(transport.call_count(IMG), 1);

    // A later resolve starts fresh
    transport.script(IMG, Scripted::Body(b"fresh".to_vec()));
    let status = cache.resolve(IMG).wait().await;
    assert!(matches!(&status, AssetStatus::Resolved(b) if b.as_ref() == b"fresh"));
}

#[tokio::test(start_paused = true)]
async fn pending_attempt_counter_is_observable() {
    let transport = MockTransport::new();
    transport.script(IMG, Scripted::Status(500));
    transport.script(
        IMG,
        Scripted::DelayedBody(Duration::from_secs(5), b"late".to_vec()),
    );
    let cache = cache_with(transport.clone());

    let sub = cache.resolve(IMG);
    // First attempt fails immediately; we are now inside the fixed backoff
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(matches!(
        cache.snapshot(IMG),
        Some(AssetStatus::Pending { attempt: 1 })
    ));

    let status = sub.wait().await;
    assert!(matches!(status, AssetStatus::Resolved(_)));
}

#[tokio::test(start_paused = true)]
async fn clear_drops_entries_and_aborts_inflight_fetches() {
    let transport = MockTransport::new();
    transport.script("a", Scripted::Body(b"a-bytes".to_vec()));
    transport.script(
        "b",
        Scripted::DelayedBody(Duration::from_secs(5), b"b-bytes".to_vec()),
    );
    let cache = cache_with(transport.clone());

    let resolved = cache.resolve("a").wait().await;
    assert!(matches!(resolved, AssetStatus::Resolved(_)));

    let pending = cache.resolve("b");
    tokio::time::sleep(Duration::from_millis(1)).await;

    cache.clear();
    assert!(cache.is_empty());
    assert!(cache.snapshot("a").is_none());

    // The abandoned waiter observes its last non-terminal state
    let last = pending.wait().await;
    assert!(!last.is_terminal());
}

#[tokio::test(start_paused = true)]
async fn distinct_keys_fetch_independently() {
    let transport = MockTransport::new();
    transport.script("x", Scripted::Body(b"x1".to_vec()));
    transport.script("y", Scripted::Status(500));
    transport.script("y", Scripted::Body(b"y2".to_vec()));
    let cache = cache_with(transport.clone());

    let x = cache.resolve("x");
    let y = cache.resolve("y");
    let (rx, ry) = tokio::join!(x.wait(), y.wait());

    assert!(matches!(&rx, AssetStatus::Resolved(b) if b.as_ref() == b"x1"));
    assert!(matches!(&ry, AssetStatus::Resolved(b) if b.as_ref() == b"y2"));
    assert_eq!(transport.call_count("x"), 1);
    assert_eq!(transport.call_count("y"), 2);
}

#[tokio::test(start_paused = true)]
async fn capacity_evicts_oldest_resolved_first() {
    let transport = MockTransport::new();
    for key in ["k1", "k2", "k3"] {
        transport.script(key, Scripted::Body(key.as_bytes().to_vec()));
    }
    let config = AssetCacheConfig {
        capacity: 2,
        ..AssetCacheConfig::default()
    };
    let cache = AssetCache::new(transport.clone(), config);

    for key in ["k1", "k2", "k3"] {
        let status = cache.resolve(key).wait().await;
        assert!(matches!(status, AssetStatus::Resolved(_)));
    }

    // Oldest resolved entry made way for the newest
    assert!(cache.snapshot("k1").is_none());
    assert!(matches!(cache.snapshot("k2"), Some(AssetStatus::Resolved(_))));
    assert!(matches!(cache.snapshot("k3"), Some(AssetStatus::Resolved(_))));
}
