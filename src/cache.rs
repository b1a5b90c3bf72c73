use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Bounds and lifetime for one memoized store.
#[derive(Debug, Clone, Copy)]
pub struct MemoPolicy {
    /// Maximum number of live entries before least-recently-accessed
    /// eviction kicks in.
    pub capacity: usize,
    /// Sliding time-to-live: the expiry deadline resets on every access.
    pub ttl: Duration,
    /// Whether settled failures are cached and replayed, or recomputed on
    /// the next call.
    pub cache_failures: bool,
}

/// Derives a stable cache key from an ordered argument list.
///
/// Order-sensitive: equal lists yield equal keys, reordered lists do not.
pub fn cache_key<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut key = String::new();
    for (index, part) in parts.into_iter().enumerate() {
        if index > 0 {
            key.push('\u{1f}');
        }
        key.push_str(part.as_ref());
    }
    key
}

struct Entry<T, E> {
    settled: Result<T, E>,
    last_access: Instant,
    seq: u64,
}

struct State<T, E> {
    entries: HashMap<String, Entry<T, E>>,
    next_seq: u64,
}

/// Sliding-expiration, bounded memoization over an asynchronous producer.
///
/// Each store holds settled results keyed by [`cache_key`]. A lookup within
/// `ttl` of the entry's last access is a hit and pushes the deadline forward;
/// anything else runs the producer again. Once the store grows past
/// `capacity`, the least-recently-accessed entry is dropped, ties broken by
/// earliest insertion.
///
/// Duplicate calls issued for the same key before either has settled are not
/// coalesced: both run the producer. Callers that need in-flight
/// de-duplication must layer their own.
#[derive(Clone)]
pub struct MemoCache<T, E> {
    policy: MemoPolicy,
    state: Arc<Mutex<State<T, E>>>,
}

impl<T: Clone, E: Clone> MemoCache<T, E> {
    pub fn new(policy: MemoPolicy) -> Self {
        Self {
            policy,
            state: Arc::new(Mutex::new(State {
                entries: HashMap::new(),
                next_seq: 0,
            })),
        }
    }

    /// Returns the cached result for `key`, or runs `compute` and settles
    /// its outcome into the store.
    ///
    /// Successes are always stored. Failures are stored only under a
    /// `cache_failures` policy; otherwise the key is left vacant so the next
    /// call recomputes.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        {
            let now = Instant::now();
            let mut state = self.state.lock().await;
            if let Some(entry) = state.entries.get_mut(key) {
                if now < entry.last_access + self.policy.ttl {
                    match &entry.settled {
                        Ok(value) => {
                            tracing::debug!("Cache hit for {key}");
                            entry.last_access = now;
                            return Ok(value.clone());
                        }
                        Err(failure) if self.policy.cache_failures => {
                            tracing::debug!("Cache hit (settled failure) for {key}");
                            entry.last_access = now;
                            return Err(failure.clone());
                        }
                        // A settled failure under a no-failure policy is a miss.
                        Err(_) => {}
                    }
                }
            }
        }

        tracing::debug!("Cache miss for {key}");
        let result = compute().await;
        self.settle(key, &result).await;
        result
    }

    async fn settle(&self, key: &str, result: &Result<T, E>) {
        let mut state = self.state.lock().await;
        match result {
            Ok(value) => state.insert(key, Ok(value.clone()), self.policy.capacity),
            Err(failure) if self.policy.cache_failures => {
                state.insert(key, Err(failure.clone()), self.policy.capacity);
            }
            Err(_) => {
                // Guarantee the next call with this key recomputes.
                state.entries.remove(key);
            }
        }
    }

    /// Number of live entries. Expired entries are only reaped lazily on
    /// lookup, so this counts them until their key is next touched.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.entries.is_empty()
    }
}

impl<T, E> State<T, E> {
    fn insert(&mut self, key: &str, settled: Result<T, E>, capacity: usize) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            key.to_string(),
            Entry {
                settled,
                last_access: Instant::now(),
                seq,
            },
        );

        while self.entries.len() > capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| (entry.last_access, entry.seq))
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    tracing::debug!("Evicting least-recently-accessed entry {key}");
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}
