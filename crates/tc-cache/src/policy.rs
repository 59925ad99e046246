//! Eviction strategies.

use std::collections::VecDeque;

/// Decides which entry leaves a full cache.
///
/// The cache reports every key it stores, reads and drops; the policy only keeps
/// whatever ordering it needs to answer [`victim`](EvictionPolicy::victim).
pub trait EvictionPolicy<K> {
    /// A new key was stored.
    fn on_insert(&mut self, key: &K);
    /// An existing key was read or overwritten.
    fn on_access(&mut self, key: &K);
    /// A key left the cache for a reason other than eviction.
    fn on_remove(&mut self, key: &K);
    /// Remove and return the key to evict next.
    fn victim(&mut self) -> Option<K>;
    fn clear(&mut self);
}

/// FIFO: the oldest inserted key goes first. Reads never protect an entry, and
/// overwriting a key keeps its original position.
#[derive(Debug, Clone)]
pub struct InsertionOrder<K> {
    order: VecDeque<K>,
}

impl<K> Default for InsertionOrder<K> {
    fn default() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }
}

impl<K: Clone + PartialEq> EvictionPolicy<K> for InsertionOrder<K> {
    fn on_insert(&mut self, key: &K) {
        self.order.push_back(key.clone());
    }

    fn on_access(&mut self, _key: &K) {}

    fn on_remove(&mut self, key: &K) {
        self.order.retain(|k| k != key);
    }

    fn victim(&mut self) -> Option<K> {
        self.order.pop_front()
    }

    fn clear(&mut self) {
        self.order.clear();
    }
}

/// The key read or written longest ago goes first.
#[derive(Debug, Clone)]
pub struct LeastRecentlyUsed<K> {
    recency: VecDeque<K>,
}

impl<K> Default for LeastRecentlyUsed<K> {
    fn default() -> Self {
        Self {
            recency: VecDeque::new(),
        }
    }
}

impl<K: Clone + PartialEq> EvictionPolicy<K> for LeastRecentlyUsed<K> {
    fn on_insert(&mut self, key: &K) {
        self.recency.push_back(key.clone());
    }

    fn on_access(&mut self, key: &K) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            if let Some(k) = self.recency.remove(pos) {
                self.recency.push_back(k);
            }
        }
    }

    fn on_remove(&mut self, key: &K) {
        self.recency.retain(|k| k != key);
    }

    fn victim(&mut self) -> Option<K> {
        self.recency.pop_front()
    }

    fn clear(&mut self) {
        self.recency.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_ignores_access() {
        let mut policy = InsertionOrder::default();
        policy.on_insert(&1);
        policy.on_insert(&2);
        policy.on_access(&1);
        assert_eq!(policy.victim(), Some(1));
        assert_eq!(policy.victim(), Some(2));
        assert_eq!(policy.victim(), None);
    }

    #[test]
    fn lru_moves_accessed_key_to_back() {
        let mut policy = LeastRecentlyUsed::default();
        policy.on_insert(&"a");
        policy.on_insert(&"b");
        policy.on_access(&"a");
        assert_eq!(policy.victim(), Some("b"));
    }

    #[test]
    fn removed_keys_are_never_victims() {
        let mut policy = InsertionOrder::default();
        policy.on_insert(&1);
        policy.on_insert(&2);
        policy.on_remove(&1);
        assert_eq!(policy.victim(), Some(2));
    }
}
