//! Bounded memo of rendered avatars.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::render::{clamp_size, generate_svg};

/// Default number of rendered avatars kept.
pub const DEFAULT_CAPACITY: usize = 5000;

type Key = (String, u32);

/// Insertion-ordered cache of SVG documents keyed by `(identity, size)`.
///
/// When full, the oldest insertion is evicted. Hits do not refresh an
/// entry's position.
#[derive(Debug)]
pub struct AvatarCache {
    capacity: usize,
    order: VecDeque<Key>,
    entries: HashMap<Key, Arc<str>>,
}

impl AvatarCache {
    /// An empty cache holding at most `capacity` avatars (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Number of cached avatars.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached avatars.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether `(identity, size)` is cached.
    pub fn contains(&self, identity: &str, size: u32) -> bool {
        self.entries
            .contains_key(&(identity.to_owned(), clamp_size(size)))
    }

    /// Return the SVG for `(identity, size)`, rendering it on a miss.
    pub fn svg(&mut self, identity: &str, size: u32) -> Arc<str> {
        let key = (identity.to_owned(), clamp_size(size));
        if let Some(hit) = self.entries.get(&key) {
            return Arc::clone(hit);
        }

        let svg: Arc<str> = Arc::from(generate_svg(&key.0, key.1));
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                tracing::debug!(identity = %oldest.0, size = oldest.1, "avatar cache eviction");
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, Arc::clone(&svg));
        svg
    }
}

impl Default for AvatarCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_returns_same_document() {
        let mut cache = AvatarCache::new(4);
        let a = cache.svg("ada", 16);
        let b = cache.svg("ada", 16);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn sizes_are_clamped_before_keying() {
        let mut cache = AvatarCache::new(4);
        let _ = cache.svg("ada", 1);
        assert!(cache.contains("ada", 8));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn oldest_entry_is_evicted() {
        let mut cache = AvatarCache::new(2);
        let _ = cache.svg("a", 8);
        let _ = cache.svg("b", 8);
        let _ = cache.svg("a", 8);
        let _ = cache.svg("c", 8);
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("a", 8));
        assert!(cache.contains("b", 8));
        assert!(cache.contains("c", 8));
    }

    #[test]
    fn zero_capacity_still_caches_one() {
        let cache = AvatarCache::new(0);
        assert_eq!(cache.capacity(), 1);
        assert!(cache.is_empty());
    }
}
