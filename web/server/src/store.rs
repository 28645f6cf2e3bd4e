//! Session storage.
//!
//! Games are kept as opaque serialized payloads with a deadline. Expired
//! entries read as absent. [`KeyLocks`] hands out one async mutex per key so
//! a load-mutate-store cycle on a game is never interleaved with another.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Key-value store with per-entry time to live.
pub trait SessionStore: Send + Sync {
    /// Stores `payload` under `key`, replacing any previous value, until `ttl` elapses.
    fn put(&self, key: &str, payload: String, ttl: Duration);

    /// Returns the payload stored under `key` if it has not expired.
    fn get(&self, key: &str) -> Option<String>;

    /// Drops expired entries, returning how many were removed.
    fn purge_expired(&self) -> usize;
}

#[derive(Debug, Clone)]
struct Entry {
    payload: String,
    expires_at: Instant,
}

/// In-process [`SessionStore`] backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn put(&self, key: &str, payload: String, ttl: Duration) {
        let entry = Entry {
            payload,
            expires_at: Instant::now() + ttl,
        };
        self.entries.insert(key.to_owned(), entry);
    }

    fn get(&self, key: &str) -> Option<String> {
        let entry = self.entries.get(key)?;
        if entry.expires_at <= Instant::now() {
            drop(entry);
            self.entries
                .remove_if(key, |_, entry| entry.expires_at <= Instant::now());
            return None;
        }
        Some(entry.payload.clone())
    }

    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }
}

/// Per-key async mutexes.
#[derive(Debug, Default)]
pub struct KeyLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`.
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(key.to_owned())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        lock.lock_owned().await
    }

    /// Forgets locks nobody holds or waits on.
    pub fn prune(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_returns_payload() {
        let store = MemoryStore::new();
        store.put("a", "payload".into(), Duration::from_secs(60));
        assert_eq!(store.get("a").as_deref(), Some("payload"));
        assert!(store.get("b").is_none());
    }

    #[test]
    fn expired_entries_read_as_absent() {
        let store = MemoryStore::new();
        store.put("a", "payload".into(), Duration::ZERO);
        assert!(store.get("a").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn put_refreshes_deadline() {
        let store = MemoryStore::new();
        store.put("a", "old".into(), Duration::ZERO);
        store.put("a", "new".into(), Duration::from_secs(60));
        assert_eq!(store.get("a").as_deref(), Some("new"));
    }

    #[test]
    fn purge_drops_only_expired() {
        let store = MemoryStore::new();
        store.put("live", "x".into(), Duration::from_secs(60));
        store.put("dead", "y".into(), Duration::ZERO);
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn key_lock_is_exclusive_per_key() {
        let locks = Arc::new(KeyLocks::new());
        let guard = locks.lock("game").await;

        let other = locks.lock("other").await;
        drop(other);

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.lock("game").await;
            })
        };
        tokio::task::yield_now().await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.expect("contender completes");

        locks.prune();
        assert!(locks.is_empty());
    }
}
