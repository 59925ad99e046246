//! Bounded key → value store.

use crate::error::{CacheError, CacheResult};
use crate::policy::{EvictionPolicy, InsertionOrder};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Counters for one cache instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache (0 before the first lookup).
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// Memoization cache holding at most `capacity` entries.
///
/// When a new key arrives at capacity, the policy's victim is evicted first.
/// Overwriting an existing key never evicts.
#[derive(Debug)]
pub struct Cache<K, V, P = InsertionOrder<K>> {
    name: &'static str,
    capacity: usize,
    entries: HashMap<K, V>,
    policy: P,
    stats: CacheStats,
}

impl<K, V> Cache<K, V, InsertionOrder<K>>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Cache with insertion-order eviction.
    pub fn new(name: &'static str, capacity: usize) -> CacheResult<Self> {
        Self::with_policy(name, capacity, InsertionOrder::default())
    }
}

impl<K, V, P> Cache<K, V, P>
where
    K: Eq + Hash + Clone + Debug,
    P: EvictionPolicy<K>,
{
    pub fn with_policy(name: &'static str, capacity: usize, policy: P) -> CacheResult<Self> {
        if capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        Ok(Self {
            name,
            capacity,
            entries: HashMap::with_capacity(capacity),
            policy,
            stats: CacheStats {
                capacity,
                ..CacheStats::default()
            },
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Look up `key`, counting the hit or miss.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.entries.contains_key(key) {
            self.stats.hits += 1;
            self.policy.on_access(key);
            tracing::debug!(cache = self.name, ?key, "cache hit");
            self.entries.get(key)
        } else {
            self.stats.misses += 1;
            tracing::debug!(cache = self.name, ?key, "cache miss");
            None
        }
    }

    /// Store `value` under `key`, evicting one entry if a new key finds the cache full.
    pub fn set(&mut self, key: K, value: V) {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            self.policy.on_access(&key);
            return;
        }

        if self.entries.len() >= self.capacity {
            self.evict_one();
        }
        self.policy.on_insert(&key);
        self.entries.insert(key, value);
    }

    /// Drop `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.entries.remove(key)?;
        self.policy.on_remove(key);
        Some(value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.policy.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            len: self.entries.len(),
            ..self.stats
        }
    }

    fn evict_one(&mut self) {
        while let Some(victim) = self.policy.victim() {
            if self.entries.remove(&victim).is_some() {
                self.stats.evictions += 1;
                tracing::trace!(cache = self.name, key = ?victim, "evicted");
                return;
            }
        }
    }
}
