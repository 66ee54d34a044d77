use rustc_hash::FxHashMap;

use crate::score::Score;
use crate::structures::ElementId;

/// A cached marginal keyed by the extension vector that produced it.
#[derive(Clone, Debug)]
struct CacheEntry<SF: Score> {
    key: Vec<ElementId>,
    score_improvement: SF,
}

/// A cached pair gain keyed by the ordered pair that produced it.
#[derive(Copy, Clone, Debug)]
struct CacheEntry2D<SF: Score> {
    x1: ElementId,
    x2: ElementId,
    score_improvement: SF,
}

/// Depth-local memoization of score improvements.
///
/// Two forms: the 1-D form keys on the whole extension vector `S ++ [c]`,
/// the 2-D form on an ordered pair at the current prefix. Keys are reduced to
/// a 64-bit XOR-mix; the original key is kept and compared on lookup, so a
/// hash collision reads as a miss rather than a wrong value.
///
/// The cache is insert-only within a depth and cleared wholesale whenever
/// the search descends.
#[derive(Debug, Default)]
pub struct SiCache<SF: Score> {
    hash_map: FxHashMap<u64, CacheEntry<SF>>,
    hash_map_2d: FxHashMap<u64, CacheEntry2D<SF>>,
}

impl<SF: Score> SiCache<SF> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            hash_map: FxHashMap::default(),
            hash_map_2d: FxHashMap::default(),
        }
    }

    pub fn clear(&mut self) {
        self.hash_map.clear();
        self.hash_map_2d.clear();
    }

    /// The prefix changed; everything cached against it is void.
    pub fn visit_new_depth(&mut self) {
        self.clear();
    }

    #[must_use]
    pub fn get_entry(&self, hash: u64, key: &[ElementId]) -> Option<SF> {
        let entry = self.hash_map.get(&hash)?;
        if entry.key == key {
            Some(entry.score_improvement)
        } else {
            None
        }
    }

    pub fn insert_entry(&mut self, hash: u64, key: &[ElementId], si: SF) {
        self.hash_map.entry(hash).or_insert_with(|| CacheEntry {
            key: key.to_vec(),
            score_improvement: si,
        });
    }

    #[must_use]
    pub fn get_entry_2d(&self, hash: u64, x1: ElementId, x2: ElementId) -> Option<SF> {
        let entry = self.hash_map_2d.get(&hash)?;
        if entry.x1 == x1 && entry.x2 == x2 {
            Some(entry.score_improvement)
        } else {
            None
        }
    }

    pub fn insert_entry_2d(&mut self, hash: u64, x1: ElementId, x2: ElementId, si: SF) {
        self.hash_map_2d
            .entry(hash)
            .or_insert(CacheEntry2D {
                x1,
                x2,
                score_improvement: si,
            });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hash_map.len() + self.hash_map_2d.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hash_map.is_empty() && self.hash_map_2d.is_empty()
    }

    /// XOR-mix over the key vector, seeded with its length.
    #[must_use]
    pub fn vector_hash(key: &[ElementId]) -> u64 {
        let mut seed = key.len() as u64;
        for &x in key {
            seed ^= (x as u64)
                .wrapping_add(0x9e37_79b9)
                .wrapping_add(seed << 6)
                .wrapping_add(seed >> 2);
        }
        seed
    }

    /// The pair variant of [`vector_hash`](Self::vector_hash). Order matters:
    /// `(a, b)` and `(b, a)` hash differently and compare differently.
    #[must_use]
    pub fn hash_2d(x1: ElementId, x2: ElementId) -> u64 {
        let mut seed = 2u64;
        seed ^= (x1 as u64)
            .wrapping_add(0x9e37_79b9)
            .wrapping_add(seed << 6)
            .wrapping_add(seed >> 2);
        seed ^= (x2 as u64)
            .wrapping_add(0x9e37_79b9)
            .wrapping_add(seed << 6)
            .wrapping_add(seed >> 2);
        seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_returns_inserted_value() {
        let mut cache = SiCache::<i64>::new();
        let key = [2u32, 5, 9];
        let h = SiCache::<i64>::vector_hash(&key);

        assert_eq!(cache.get_entry(h, &key), None);
        cache.insert_entry(h, &key, -7);
        assert_eq!(cache.get_entry(h, &key), Some(-7));
    }

    #[test]
    fn collision_with_different_key_is_a_miss() {
        let mut cache = SiCache::<i64>::new();
        let key = [1u32, 2];
        let other = [9u32, 9];
        let h = SiCache::<i64>::vector_hash(&key);

        // force both keys onto the same hash slot
        cache.insert_entry(h, &key, 3);
        assert_eq!(cache.get_entry(h, &other), None);
    }

    #[test]
    fn pairs_are_ordered() {
        let mut cache = SiCache::<i64>::new();
        let h_ab = SiCache::<i64>::hash_2d(3, 8);
        cache.insert_entry_2d(h_ab, 3, 8, 11);

        assert_eq!(cache.get_entry_2d(h_ab, 3, 8), Some(11));
        let h_ba = SiCache::<i64>::hash_2d(8, 3);
        assert_eq!(cache.get_entry_2d(h_ba, 8, 3), None);
    }

    #[test]
    fn descent_clears_everything() {
        let mut cache = SiCache::<i64>::new();
        let key = [4u32];
        let h = SiCache::<i64>::vector_hash(&key);
        cache.insert_entry(h, &key, 1);
        cache.insert_entry_2d(SiCache::<i64>::hash_2d(0, 1), 0, 1, 2);
        assert_eq!(cache.len(), 2);

        cache.visit_new_depth();
        assert!(cache.is_empty());
        assert_eq!(cache.get_entry(h, &key), None);
    }

    #[test]
    fn insert_only_within_a_depth() {
        let mut cache = SiCache::<i64>::new();
        let key = [7u32];
        let h = SiCache::<i64>::vector_hash(&key);
        cache.insert_entry(h, &key, 5);
        cache.insert_entry(h, &key, 99);
        assert_eq!(cache.get_entry(h, &key), Some(5));
    }
}
