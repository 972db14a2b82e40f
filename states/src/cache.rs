//! Tag-indexed query cache.
//!
//! # Design
//!
//! - Every cached read *provides* a set of [`Tag`]s; every write *invalidates*
//!   a set of tags.
//! - Invalidation only flips the stale flag of the entries indexed under the
//!   invalidated tags. It never fetches anything; the next read of a stale
//!   entry refetches. Invalidating the same tag twice before that read still
//!   costs a single refetch.
//! - A read that was in flight while a write invalidated one of its tags still
//!   hands its result to its caller, but the stored entry starts out stale.
//!   This is tracked with an invalidation epoch captured by [`FetchTicket`].
//! - Entries with no [`Subscription`] are evicted once they have been idle for
//!   the retention window.
//! - Concurrent reads of the same key can serialize on [`QueryCache::fetch_gate`]
//!   so only the first one hits the network.
//!
//! The store sits behind a `std::sync::Mutex`; it is never held across an
//! `.await`.
//!
//! # Usage
//!
//! ```rust,ignore
//! let cache = QueryCache::new(Duration::from_secs(5));
//!
//! let ticket = cache.begin_fetch();
//! let users = fetch_users().await?;
//! cache.insert(key, users, [Tag::list("Users")], ticket);
//!
//! // after a successful write
//! cache.invalidate(&[Tag::list("Users")]);
//! ```

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::debug;
use tokio::time::Instant;

use crate::{Error, QueryKey, Tag};

/// Default idle retention window for unsubscribed entries.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(5);

type Value = Arc<dyn Any + Send + Sync>;

struct CacheEntry {
    value: Value,
    stale: bool,
    tags: Vec<Tag>,
    /// `None` while at least one subscription references the key.
    idle_since: Option<Instant>,
}

#[derive(Default)]
struct CacheInner {
    entries: BTreeMap<QueryKey, CacheEntry>,
    tag_index: BTreeMap<Tag, BTreeSet<QueryKey>>,
    subscribers: HashMap<QueryKey, usize>,
    gates: HashMap<QueryKey, Arc<tokio::sync::Mutex<()>>>,
    epoch: u64,
    invalidated_at: HashMap<Tag, u64>,
    in_flight: usize,
}

impl CacheInner {
    fn unindex(&mut self, key: &QueryKey, tags: &[Tag]) {
        for tag in tags {
            if let Some(keys) = self.tag_index.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.tag_index.remove(tag);
                }
            }
        }
    }

    fn evict_expired(&mut self, now: Instant, retention: Duration) -> usize {
        let expired: Vec<QueryKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| {
                entry
                    .idle_since
                    .is_some_and(|since| now.saturating_duration_since(since) >= retention)
            })
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            if let Some(entry) = self.entries.remove(key) {
                self.unindex(key, &entry.tags);
                debug!("Evicted idle cache entry {key}");
            }
        }

        // Gates of evicted keys nobody is waiting on.
        let entries = &self.entries;
        self.gates
            .retain(|key, gate| entries.contains_key(key) || Arc::strong_count(gate) > 1);

        expired.len()
    }

    fn fresh_value(&self, key: &QueryKey) -> Option<&Value> {
        self.entries
            .get(key)
            .filter(|entry| !entry.stale)
            .map(|entry| &entry.value)
    }
}

struct Shared {
    inner: Mutex<CacheInner>,
    retention: Duration,
}

/// Cheaply cloneable handle to a shared tag-indexed cache.
#[derive(Clone)]
pub struct QueryCache {
    shared: Arc<Shared>,
}

impl QueryCache {
    /// Create a cache that evicts unsubscribed entries after `retention`.
    pub fn new(retention: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(CacheInner::default()),
                retention,
            }),
        }
    }

    pub fn retention(&self) -> Duration {
        self.shared.retention
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.shared
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the store and drop whatever outlived the retention window.
    fn lock_swept(&self) -> MutexGuard<'_, CacheInner> {
        let mut inner = self.lock();
        inner.evict_expired(Instant::now(), self.shared.retention);
        inner
    }

    /// Returns the cached value for `key` if it is present and not stale.
    pub fn get<T>(&self, key: &QueryKey) -> Result<Option<T>, Error>
    where
        T: Clone + 'static,
    {
        let inner = self.lock_swept();
        match inner.fresh_value(key) {
            Some(value) => match value.downcast_ref::<T>() {
                Some(value) => {
                    debug!("Cache hit for {key}");
                    Ok(Some(value.clone()))
                }
                None => Err(Error::type_mismatch::<T>(key.clone())),
            },
            None => {
                debug!("Cache miss for {key}");
                Ok(None)
            }
        }
    }

    /// Returns the cached value for `key` even when it is stale.
    pub fn peek<T>(&self, key: &QueryKey) -> Result<Option<T>, Error>
    where
        T: Clone + 'static,
    {
        let inner = self.lock_swept();
        let Some(entry) = inner.entries.get(key) else {
            return Ok(None);
        };
        entry
            .value
            .downcast_ref::<T>()
            .cloned()
            .map(Some)
            .ok_or_else(|| Error::type_mismatch::<T>(key.clone()))
    }

    /// `Some(true)` if `key` is cached but stale, `None` if it is not cached.
    pub fn is_stale(&self, key: &QueryKey) -> Option<bool> {
        self.lock_swept().entries.get(key).map(|entry| entry.stale)
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock_swept().entries.contains_key(key)
    }

    /// Mark the start of a read. Hand the ticket back to [`Self::insert`].
    pub fn begin_fetch(&self) -> FetchTicket {
        let mut inner = self.lock();
        inner.in_flight += 1;
        FetchTicket {
            cache: self.clone(),
            epoch: inner.epoch,
        }
    }

    /// Store a fetched value under `key`, indexed by `tags`.
    ///
    /// Returns `false` when one of `tags` was invalidated after `ticket` was
    /// taken; the entry is then stored stale and the next read refetches.
    pub fn insert<T>(
        &self,
        key: QueryKey,
        value: T,
        tags: impl IntoIterator<Item = Tag>,
        ticket: FetchTicket,
    ) -> bool
    where
        T: Send + Sync + 'static,
    {
        let mut tags: Vec<Tag> = tags.into_iter().collect();
        tags.sort_unstable();
        tags.dedup();

        let fresh = {
            let mut inner = self.lock_swept();

            let stale = tags.iter().any(|tag| {
                inner
                    .invalidated_at
                    .get(tag)
                    .is_some_and(|&at| at > ticket.epoch)
            });

            if let Some(previous) = inner.entries.remove(&key) {
                inner.unindex(&key, &previous.tags);
            }
            for tag in &tags {
                inner
                    .tag_index
                    .entry(tag.clone())
                    .or_default()
                    .insert(key.clone());
            }

            let idle_since = if inner.subscribers.get(&key).copied().unwrap_or(0) > 0 {
                None
            } else {
                Some(Instant::now())
            };

            if stale {
                debug!("Stored {key} as stale: invalidated while in flight");
            }

            inner.entries.insert(
                key,
                CacheEntry {
                    value: Arc::new(value),
                    stale,
                    tags,
                    idle_since,
                },
            );
            !stale
        };

        drop(ticket);
        fresh
    }

    /// Mark every entry providing one of `tags` as stale.
    ///
    /// Returns how many entries went from fresh to stale.
    pub fn invalidate(&self, tags: &[Tag]) -> usize {
        let mut inner = self.lock();
        inner.epoch += 1;
        let epoch = inner.epoch;

        let mut keys = BTreeSet::new();
        for tag in tags {
            if inner.in_flight > 0 {
                inner.invalidated_at.insert(tag.clone(), epoch);
            }
            if let Some(indexed) = inner.tag_index.get(tag) {
                keys.extend(indexed.iter().cloned());
            }
        }

        let mut flipped = 0;
        for key in keys {
            if let Some(entry) = inner.entries.get_mut(&key)
                && !entry.stale
            {
                entry.stale = true;
                flipped += 1;
            }
        }

        debug!(
            "Invalidated {} ({flipped} entries marked stale)",
            tags.iter()
                .map(Tag::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        flipped
    }

    /// Register a consumer of `key`. The entry is kept alive until the
    /// returned guard is dropped and the retention window has passed.
    pub fn subscribe(&self, key: QueryKey) -> Subscription {
        let mut inner = self.lock();
        *inner.subscribers.entry(key.clone()).or_default() += 1;
        if let Some(entry) = inner.entries.get_mut(&key) {
            entry.idle_since = None;
        }
        Subscription {
            cache: self.clone(),
            key,
        }
    }

    pub fn subscriber_count(&self, key: &QueryKey) -> usize {
        self.lock().subscribers.get(key).copied().unwrap_or(0)
    }

    fn unsubscribe(&self, key: &QueryKey) {
        let mut inner = self.lock();
        let remaining = match inner.subscribers.get_mut(key) {
            Some(count) => {
                *count = count.saturating_sub(1);
                *count
            }
            None => return,
        };
        if remaining == 0 {
            inner.subscribers.remove(key);
            if let Some(entry) = inner.entries.get_mut(key) {
                entry.idle_since = Some(Instant::now());
            }
        }
    }

    /// Evict unsubscribed entries idle for at least the retention window.
    pub fn evict_idle(&self) -> usize {
        self.lock()
            .evict_expired(Instant::now(), self.shared.retention)
    }

    /// Per-key async gate. Readers holding it while fetching make concurrent
    /// readers of the same key wait and then find the stored value.
    pub fn fetch_gate(&self, key: &QueryKey) -> Arc<tokio::sync::Mutex<()>> {
        self.lock().gates.entry(key.clone()).or_default().clone()
    }

    /// Keys currently indexed under `tag`.
    pub fn keys_for_tag(&self, tag: &Tag) -> Vec<QueryKey> {
        self.lock_swept()
            .tag_index
            .get(tag)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lock_swept().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("QueryCache")
            .field("entries", &inner.entries.len())
            .field("tags", &inner.tag_index.len())
            .field("epoch", &inner.epoch)
            .field("retention", &self.shared.retention)
            .finish()
    }
}

/// Marks a read in flight. Dropping it without inserting abandons the read.
#[must_use = "pass the ticket to QueryCache::insert once the fetch completes"]
pub struct FetchTicket {
    cache: QueryCache,
    epoch: u64,
}

impl FetchTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

impl Drop for FetchTicket {
    fn drop(&mut self) {
        let mut inner = self.cache.lock();
        inner.in_flight = inner.in_flight.saturating_sub(1);
        if inner.in_flight == 0 {
            inner.invalidated_at.clear();
        }
    }
}

/// A presentation consumer's hold on a cache key.
#[must_use = "the key is only retained while the subscription is alive"]
pub struct Subscription {
    cache: QueryCache,
    key: QueryKey,
}

impl Subscription {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("key", &self.key).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cache.unsubscribe(&self.key);
    }
}
