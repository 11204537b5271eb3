//! Sharded concurrent map for parallel relevance aggregation.
//!
//! A parallel query accumulates relevance for many document ids from many
//! worker tasks at once. A single lock around one map would serialize every
//! worker; instead the key space is split across a fixed number of buckets,
//! each guarding its own map with its own mutex. Two workers contend only
//! when their keys land in the same bucket, bounding contention to roughly
//! `1/B` of the key space.
//!
//! Locking discipline: every operation except [`ConcurrentMap::export_ordered`]
//! touches exactly one bucket lock. `export_ordered` visits buckets in
//! ascending index order holding one lock at a time, so no execution ever
//! holds two locks and lock ordering is trivially deadlock-free.

use crate::types::DocumentId;
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;

/// Fixed-bucket concurrent map keyed by document id.
pub struct ConcurrentMap<V> {
    buckets: Vec<Mutex<BTreeMap<DocumentId, V>>>,
}

impl<V: Default> ConcurrentMap<V> {
    /// Create a map with `bucket_count` independently locked buckets.
    ///
    /// # Panics
    ///
    /// Panics if `bucket_count` is zero.
    pub fn new(bucket_count: usize) -> Self {
        assert!(bucket_count > 0, "bucket count must be positive");
        Self {
            buckets: (0..bucket_count).map(|_| Mutex::new(BTreeMap::new())).collect(),
        }
    }

    fn bucket_index(&self, key: DocumentId) -> usize {
        key.rem_euclid(self.buckets.len() as DocumentId) as usize
    }

    /// Exclusive, scoped access to the value slot for `key`.
    ///
    /// Only the owning bucket's lock is held, and it is released when the
    /// returned guard drops — early returns and panics included. A slot that
    /// does not exist yet is default-inserted.
    pub fn access(&self, key: DocumentId) -> MappedMutexGuard<'_, V> {
        let bucket = self.buckets[self.bucket_index(key)].lock();
        MutexGuard::map(bucket, |slots| slots.entry(key).or_default())
    }

    /// Remove `key` if present, locking only its bucket.
    pub fn erase(&self, key: DocumentId) {
        self.buckets[self.bucket_index(key)].lock().remove(&key);
    }

    /// Total number of entries.
    ///
    /// Buckets are locked one at a time, so the count can be momentarily
    /// stale under concurrent mutation; callers aggregate only between the
    /// mutation phases of a single query, where the map is quiescent.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|bucket| bucket.lock().is_empty())
    }

    /// Merge all buckets into one globally key-ordered map.
    ///
    /// Bucket locks are taken in ascending bucket order, one at a time.
    /// The result's iteration order is ascending document id regardless of
    /// which bucket each key lived in, which is what lets the parallel query
    /// path materialize candidates in the same order as the sequential one.
    pub fn export_ordered(&self) -> BTreeMap<DocumentId, V>
    where
        V: Clone,
    {
        let mut merged = BTreeMap::new();
        for bucket in &self.buckets {
            let slots = bucket.lock();
            merged.extend(slots.iter().map(|(&key, value)| (key, value.clone())));
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_default_inserts_and_accumulates() {
        let map = ConcurrentMap::<f64>::new(4);
        *map.access(7) += 0.5;
        *map.access(7) += 0.25;
        assert_eq!(*map.access(7), 0.75);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn keys_spread_over_buckets_but_export_is_ordered() {
        let map = ConcurrentMap::<i32>::new(3);
        for key in [9, 2, 14, 0, 5] {
            *map.access(key) = key * 10;
        }
        let ordered: Vec<DocumentId> = map.export_ordered().into_keys().collect();
        assert_eq!(ordered, [0, 2, 5, 9, 14]);
    }

    #[test]
    fn erase_removes_only_its_key() {
        let map = ConcurrentMap::<i32>::new(2);
        *map.access(1) = 10;
        *map.access(3) = 30;
        map.erase(1);
        map.erase(99); // absent key is a no-op
        assert_eq!(map.len(), 1);
        assert_eq!(*map.access(3), 30);
    }

    #[test]
    fn guard_releases_on_drop() {
        let map = ConcurrentMap::<i32>::new(1);
        {
            let mut slot = map.access(0);
            *slot = 1;
        }
        // Same bucket; would deadlock if the guard above were still held.
        assert_eq!(*map.access(42), 0);
    }

    #[test]
    fn concurrent_accumulation_is_race_free() {
        let map = ConcurrentMap::<u64>::new(8);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for key in 0..64 {
                        *map.access(key) += 1;
                    }
                });
            }
        });
        let merged = map.export_ordered();
        assert_eq!(merged.len(), 64);
        assert!(merged.values().all(|&count| count == 4));
    }
}
