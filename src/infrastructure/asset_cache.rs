//! Bounded, retrying in-memory cache for binary assets (poster images).
//!
//! One single-writer fetch task per key: concurrent `resolve` calls for
//! the same pending key multiplex onto the in-flight fetch through a
//! watch channel instead of racing to populate the entry. Retries for a
//! key are strictly sequential with a fixed delay between attempts.
//!
//! The cache is explicitly constructed and passed around; there is no
//! process-wide singleton. Entries live for the lifetime of the cache,
//! except that resolved payloads beyond the capacity bound are evicted
//! oldest-first.

#![allow(clippy::uninlined_format_args)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::config::defaults;
use super::http_client::Transport;

/// Asset cache configuration
#[derive(Debug, Clone)]
pub struct AssetCacheConfig {
    /// Automatic attempts per fetch cycle before the key is marked failed
    pub max_retries: u32,

    /// Fixed delay between attempts, deliberately not exponential
    pub retry_delay: Duration,

    /// Resolved payloads kept before oldest-first eviction kicks in
    pub capacity: usize,
}

impl Default for AssetCacheConfig {
    fn default() -> Self {
        Self {
            max_retries: defaults::MAX_ASSET_RETRIES,
            retry_delay: defaults::ASSET_RETRY_DELAY,
            capacity: defaults::ASSET_CACHE_CAPACITY,
        }
    }
}

/// Read-only snapshot of a cache entry's state.
#[derive(Debug, Clone)]
pub enum AssetStatus {
    /// A fetch is in flight; `attempt` counts failures so far.
    Pending { attempt: u32 },
    /// Terminal: the payload is cached and will not be re-fetched.
    Resolved(Bytes),
    /// Terminal until the caller deliberately re-invokes `resolve`.
    Failed { attempts: u32 },
}

impl AssetStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending { .. })
    }

    pub fn bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Resolved(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Bookkeeping for one in-flight fetch.
struct PendingFetch {
    status_tx: watch::Sender<AssetStatus>,
    token: CancellationToken,
    subscribers: usize,
    /// Distinguishes fetch cycles for the same key, so a stale
    /// subscription from an earlier cycle cannot cancel a later one.
    generation: u64,
}

enum Slot {
    Pending(PendingFetch),
    Resolved(Bytes),
    Failed { attempts: u32 },
}

struct CacheMap {
    slots: HashMap<String, Slot>,
    /// Keys of resolved entries in insertion order, oldest first.
    resolved_order: VecDeque<String>,
}

struct Inner {
    map: Mutex<CacheMap>,
    transport: Arc<dyn Transport>,
    config: AssetCacheConfig,
    generation_counter: AtomicU64,
}

/// Key-value cache for binary assets with a retrying fetch pipeline.
#[derive(Clone)]
pub struct AssetCache {
    inner: Arc<Inner>,
}

impl AssetCache {
    pub fn new(transport: Arc<dyn Transport>, config: AssetCacheConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                map: Mutex::new(CacheMap {
                    slots: HashMap::new(),
                    resolved_order: VecDeque::new(),
                }),
                transport,
                config,
                generation_counter: AtomicU64::new(1),
            }),
        }
    }

    /// Resolve an asset by key (its URL, used verbatim).
    ///
    /// A resolved entry is returned synchronously with no network
    /// activity. A pending entry attaches this caller to the in-flight
    /// fetch. An absent or failed entry starts a fresh fetch cycle —
    /// re-resolving a failed key is the deliberate reset.
    pub fn resolve(&self, key: &str) -> AssetSubscription {
        let mut map = self.inner.map.lock().expect("asset cache lock poisoned");

        match map.slots.get_mut(key) {
            Some(Slot::Resolved(bytes)) => {
                debug!("Asset cache hit: {}", key);
                return AssetSubscription::settled(
                    self.inner.clone(),
                    key,
                    AssetStatus::Resolved(bytes.clone()),
                );
            }
            Some(Slot::Pending(pending)) => {
                pending.subscribers += 1;
                let rx = pending.status_tx.subscribe();
                let generation = pending.generation;
                debug!(
                    "Attaching to in-flight fetch for {} ({} subscribers)",
                    key, pending.subscribers
                );
                return AssetSubscription::attached(self.inner.clone(), key, rx, generation);
            }
            Some(Slot::Failed { attempts }) => {
                debug!("Re-resolving failed asset {} ({} prior attempts)", key, attempts);
            }
            None => {}
        }

        // Start the single-writer fetch task for this key
        let (tx, rx) = watch::channel(AssetStatus::Pending { attempt: 0 });
        let token = CancellationToken::new();
        let generation = self.inner.generation_counter.fetch_add(1, Ordering::Relaxed);
        map.slots.insert(
            key.to_string(),
            Slot::Pending(PendingFetch {
                status_tx: tx,
                token: token.clone(),
                subscribers: 1,
                generation,
            }),
        );
        drop(map);

        tokio::spawn(run_fetch(self.inner.clone(), key.to_string(), token));

        AssetSubscription::attached(self.inner.clone(), key, rx, generation)
    }

    /// Current state of a key without touching the network.
    pub fn snapshot(&self, key: &str) -> Option<AssetStatus> {
        let map = self.inner.map.lock().expect("asset cache lock poisoned");
        map.slots.get(key).map(|slot| match slot {
            Slot::Pending(pending) => AssetStatus::Pending {
                attempt: pending.status_tx.borrow().attempt_count(),
            },
            Slot::Resolved(bytes) => AssetStatus::Resolved(bytes.clone()),
            Slot::Failed { attempts } => AssetStatus::Failed {
                attempts: *attempts,
            },
        })
    }

    /// Number of tracked keys, in any state.
    pub fn len(&self) -> usize {
        self.inner
            .map
            .lock()
            .expect("asset cache lock poisoned")
            .slots
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry and abort all in-flight fetches. The only way to
    /// evict pending or failed bookkeeping.
    pub fn clear(&self) {
        let mut map = self.inner.map.lock().expect("asset cache lock poisoned");
        for (key, slot) in map.slots.drain() {
            if let Slot::Pending(pending) = slot {
                debug!("Cancelling in-flight fetch for {} on cache clear", key);
                pending.token.cancel();
            }
        }
        map.resolved_order.clear();
    }
}

impl AssetStatus {
    fn attempt_count(&self) -> u32 {
        match self {
            Self::Pending { attempt } => *attempt,
            Self::Failed { attempts } => *attempts,
            Self::Resolved(_) => 0,
        }
    }
}

impl Inner {
    /// Publish an intermediate status to the waiters of a pending key.
    fn publish(&self, key: &str, status: AssetStatus) {
        let map = self.map.lock().expect("asset cache lock poisoned");
        if let Some(Slot::Pending(pending)) = map.slots.get(key) {
            let _ = pending.status_tx.send(status);
        }
    }

    /// Transition a pending key to resolved, evicting the oldest
    /// resolved payloads past capacity.
    fn complete_resolved(&self, key: &str, bytes: Bytes) {
        let mut map = self.map.lock().expect("asset cache lock poisoned");
        if let Some(Slot::Pending(pending)) = map.slots.get(key) {
            let _ = pending.status_tx.send(AssetStatus::Resolved(bytes.clone()));
        }
        map.slots.insert(key.to_string(), Slot::Resolved(bytes));
        map.resolved_order.push_back(key.to_string());

        while map.resolved_order.len() > self.config.capacity {
            if let Some(oldest) = map.resolved_order.pop_front() {
                if matches!(map.slots.get(&oldest), Some(Slot::Resolved(_))) {
                    debug!("Evicting oldest resolved asset: {}", oldest);
                    map.slots.remove(&oldest);
                }
            }
        }
    }

    /// Transition a pending key to failed after the attempt budget is
    /// exhausted.
    fn complete_failed(&self, key: &str, attempts: u32) {
        let mut map = self.map.lock().expect("asset cache lock poisoned");
        if let Some(Slot::Pending(pending)) = map.slots.get(key) {
            let _ = pending.status_tx.send(AssetStatus::Failed { attempts });
        }
        map.slots.insert(key.to_string(), Slot::Failed { attempts });
    }

    /// Remove a pending slot whose fetch was cancelled, unless a newer
    /// fetch cycle already replaced it.
    fn remove_cancelled(&self, key: &str) {
        let mut map = self.map.lock().expect("asset cache lock poisoned");
        if let Some(Slot::Pending(pending)) = map.slots.get(key) {
            if pending.token.is_cancelled() {
                map.slots.remove(key);
            }
        }
    }
}

/// Single-writer fetch loop for one key. Retries are strictly
/// sequential: attempt N+1 starts only after attempt N's outcome and
/// the fixed backoff delay.
async fn run_fetch(inner: Arc<Inner>, key: String, token: CancellationToken) {
    let max_attempts = inner.config.max_retries.max(1);

    for attempt in 1..=max_attempts {
        match inner.transport.fetch(&key, token.clone()).await {
            Ok(bytes) => {
                debug!(
                    "Asset {} resolved on attempt {} ({} bytes)",
                    key,
                    attempt,
                    bytes.len()
                );
                inner.complete_resolved(&key, bytes);
                return;
            }
            Err(e) => {
                if token.is_cancelled() {
                    debug!("Asset fetch for {} cancelled", key);
                    inner.remove_cancelled(&key);
                    return;
                }

                warn!(
                    "Asset fetch attempt {}/{} for {} failed: {}",
                    attempt, max_attempts, key, e
                );

                if attempt < max_attempts {
                    inner.publish(&key, AssetStatus::Pending { attempt });
                    tokio::select! {
                        _ = tokio::time::sleep(inner.config.retry_delay) => {}
                        _ = token.cancelled() => {
                            debug!("Asset fetch for {} cancelled during backoff", key);
                            inner.remove_cancelled(&key);
                            return;
                        }
                    }
                }
            }
        }
    }

    warn!(
        "Asset {} failed after {} attempts, no further automatic retries",
        key, max_attempts
    );
    inner.complete_failed(&key, max_attempts);
}

/// One caller's handle onto an asset request.
///
/// Dropping (or `cancel`ing) the subscription detaches this waiter
/// only; the underlying fetch is aborted when its last waiter goes.
/// Cache state for other keys and other subscribers is unaffected.
pub struct AssetSubscription {
    inner: Arc<Inner>,
    key: String,
    rx: watch::Receiver<AssetStatus>,
    generation: u64,
    tracks_pending: bool,
}

impl AssetSubscription {
    fn attached(
        inner: Arc<Inner>,
        key: &str,
        rx: watch::Receiver<AssetStatus>,
        generation: u64,
    ) -> Self {
        Self {
            inner,
            key: key.to_string(),
            rx,
            generation,
            tracks_pending: true,
        }
    }

    fn settled(inner: Arc<Inner>, key: &str, status: AssetStatus) -> Self {
        let (_tx, rx) = watch::channel(status);
        Self {
            inner,
            key: key.to_string(),
            rx,
            generation: 0,
            tracks_pending: false,
        }
    }

    /// Current state without waiting.
    pub fn status(&self) -> AssetStatus {
        self.rx.borrow().clone()
    }

    /// Wait for a terminal state. Returns the last observed status if
    /// the cache abandoned the request (cleared or cancelled).
    pub async fn wait(mut self) -> AssetStatus {
        loop {
            let current = self.rx.borrow_and_update().clone();
            if current.is_terminal() {
                return current;
            }
            if self.rx.changed().await.is_err() {
                let last = self.rx.borrow().clone();
                return last;
            }
        }
    }

    /// Abandon this caller's interest in the request.
    pub fn cancel(self) {
        // Drop handles the bookkeeping
    }
}

impl Drop for AssetSubscription {
    fn drop(&mut self) {
        if !self.tracks_pending {
            return;
        }
        let Ok(mut map) = self.inner.map.lock() else {
            return;
        };
        if let Some(Slot::Pending(pending)) = map.slots.get_mut(&self.key) {
            if pending.generation != self.generation {
                return;
            }
            pending.subscribers = pending.subscribers.saturating_sub(1);
            if pending.subscribers == 0 {
                debug!("Last subscriber gone, aborting fetch for {}", self.key);
                pending.token.cancel();
                map.slots.remove(&self.key);
            }
        }
    }
}
