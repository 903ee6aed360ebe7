//! Bounded, time-expiring cache for resolved signing keys.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::error::JwksError;
use crate::jwk::SigningKey;
use crate::resolver::SigningKeyLookup;

struct CacheEntry {
    key: SigningKey,
    expires_at: Instant,
}

/// Insertion-ordered bounded map. Not an LRU: reads do not refresh an
/// entry's position, only (re-)insertion does.
struct KeyStore {
    entries: HashMap<String, CacheEntry>,
    insertion_order: VecDeque<String>,
    max_entries: usize,
}

impl KeyStore {
    fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
            max_entries: max_entries.max(1),
        }
    }

    fn get(&mut self, kid: &str, now: Instant) -> Option<SigningKey> {
        match self.entries.get(kid) {
            Some(entry) if now < entry.expires_at => Some(entry.key.clone()),
            Some(_) => {
                self.remove(kid);
                None
            }
            None => None,
        }
    }

    fn insert(&mut self, kid: String, key: SigningKey, expires_at: Instant) {
        if self
            .entries
            .insert(kid.clone(), CacheEntry { key, expires_at })
            .is_some()
        {
            // re-insertion refreshes the eviction position
            self.insertion_order.retain(|stored| stored != &kid);
        }
        self.insertion_order.push_back(kid);

        while self.entries.len() > self.max_entries {
            if let Some(oldest) = self.insertion_order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    fn remove(&mut self, kid: &str) {
        self.entries.remove(kid);
        self.insertion_order.retain(|stored| stored != kid);
    }
}

/// Decorates a lookup with a per-`kid` response cache.
///
/// Hits are served without touching the inner lookup, so when the rate
/// limiter sits beneath the cache a hit consumes no rate-limit budget.
/// Misses and expired entries invoke the inner lookup; only successful
/// results are stored, with a fresh `now + max_age` expiry. Failures are
/// never cached.
///
/// Concurrent misses for one `kid` are not deduplicated: each invokes the
/// inner lookup and the last result to arrive wins the cache slot.
pub struct CachedLookup<L> {
    inner: L,
    max_age: Duration,
    store: Mutex<KeyStore>,
}

impl<L> std::fmt::Debug for CachedLookup<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedLookup")
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

impl<L> CachedLookup<L> {
    /// Wrap `inner` with a cache holding at most `max_entries` keys for up
    /// to `max_age` each.
    pub fn new(inner: L, max_entries: usize, max_age: Duration) -> Self {
        Self {
            inner,
            max_age,
            store: Mutex::new(KeyStore::new(max_entries)),
        }
    }
}

#[async_trait]
impl<L: SigningKeyLookup> SigningKeyLookup for CachedLookup<L> {
    async fn get_signing_key(&self, kid: &str) -> Result<SigningKey, JwksError> {
        if let Some(key) = self.store.lock().get(kid, Instant::now()) {
            debug!(%kid, "signing key cache hit");
            return Ok(key);
        }

        let key = self.inner.get_signing_key(kid).await?;
        self.store
            .lock()
            .insert(kid.to_string(), key.clone(), Instant::now() + self.max_age);
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwk::KeyMaterial;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(kid: &str) -> SigningKey {
        SigningKey::new(
            kid.to_string(),
            None,
            KeyMaterial::Certificate(format!("-----BEGIN CERTIFICATE-----\n{kid}\n-----END CERTIFICATE-----\n")),
        )
    }

    /// Inner lookup that counts calls and can be switched to fail.
    struct CountingLookup {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingLookup {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SigningKeyLookup for CountingLookup {
        async fn get_signing_key(&self, kid: &str) -> Result<SigningKey, JwksError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(JwksError::NoKeys)
            } else {
                Ok(key(kid))
            }
        }
    }

    #[tokio::test]
    async fn hit_skips_the_inner_lookup() {
        let cached = CachedLookup::new(CountingLookup::new(), 5, Duration::from_secs(600));

        let first = cached.get_signing_key("k1").await.unwrap();
        let second = cached.get_signing_key("k1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_triggers_a_fresh_inner_lookup() {
        let cached = CachedLookup::new(CountingLookup::new(), 5, Duration::from_secs(60));

        cached.get_signing_key("k1").await.unwrap();
        tokio::time::advance(Duration::from_secs(59)).await;
        cached.get_signing_key("k1").await.unwrap();
        assert_eq!(cached.inner.calls(), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        cached.get_signing_key("k1").await.unwrap();
        assert_eq!(cached.inner.calls(), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cached = CachedLookup::new(CountingLookup::failing(), 5, Duration::from_secs(600));

        assert!(cached.get_signing_key("k1").await.is_err());
        assert!(cached.get_signing_key("k1").await.is_err());
        assert_eq!(cached.inner.calls(), 2);
    }

    #[tokio::test]
    async fn overflow_evicts_the_oldest_insertion() {
        let cached = CachedLookup::new(CountingLookup::new(), 2, Duration::from_secs(600));

        cached.get_signing_key("k1").await.unwrap();
        cached.get_signing_key("k2").await.unwrap();
        cached.get_signing_key("k3").await.unwrap(); // evicts k1

        cached.get_signing_key("k2").await.unwrap(); // still cached
        cached.get_signing_key("k3").await.unwrap(); // still cached
        assert_eq!(cached.inner.calls(), 3);

        cached.get_signing_key("k1").await.unwrap(); // refetched
        assert_eq!(cached.inner.calls(), 4);
    }

    #[tokio::test]
    async fn reinsertion_refreshes_the_eviction_position() {
        let cached = CachedLookup::new(CountingLookup::new(), 2, Duration::from_secs(600));

        cached.get_signing_key("k1").await.unwrap();
        cached.get_signing_key("k2").await.unwrap();

        // force k1 to miss and re-insert, moving it behind k2 in
        // insertion order
        cached.store.lock().remove("k1");
        cached.get_signing_key("k1").await.unwrap();

        cached.get_signing_key("k3").await.unwrap(); // evicts k2, not k1
        cached.get_signing_key("k1").await.unwrap();
        assert_eq!(cached.inner.calls(), 4);

        cached.get_signing_key("k2").await.unwrap(); // refetched
        assert_eq!(cached.inner.calls(), 5);
    }
}
