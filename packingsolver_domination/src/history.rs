//! Per-depth domination history.
//!
//! `node_hasher()` gives a branching scheme's frontier an `(equal, hash)`
//! pair computed over the node's *geometric frontier only* -- parent
//! pointers, ids, and accumulators derivable from the frontier are ignored.
//! [`History`] is the hash map keyed by that hash, used to reject a
//! candidate node when an equivalent one already present has priority at
//! least as good.

use hashbrown::HashMap;
use smallvec::SmallVec;

/// Computes the domination key for a node: a hash plus an equality test,
/// both over the node's geometric frontier only. Implemented once per
/// branching scheme (the rectangle scheme hashes its skyline segments, the
/// box scheme hashes its three projected rectangle lists, etc).
pub trait NodeHasher<N> {
    /// Hash of the node's frontier. Two nodes with equal frontiers must
    /// hash equally; this is allowed to collide for non-equal frontiers
    /// (the hash is used only to bucket candidates for [`Self::frontier_eq`]).
    fn frontier_hash(&self, node: &N) -> u64;

    /// Whether two nodes have an equal geometric frontier (ignoring parent
    /// pointer, id, and derived accumulators).
    fn frontier_eq(&self, a: &N, b: &N) -> bool;
}

/// Per-depth-layer table of candidate nodes, deduplicated by
/// [`NodeHasher::frontier_eq`] and ranked by a caller-supplied priority
/// predicate.
///
/// Kept generic over a lightweight handle `K` (the frontier's arena key)
/// rather than owning nodes directly, so the same history can be reused
/// across depth layers by draining and reinserting.
pub struct History<K> {
    buckets: HashMap<u64, SmallVec<[K; 4]>>,
}

impl<K> Default for History<K> {
    fn default() -> Self {
        Self {
            buckets: HashMap::new(),
        }
    }
}

impl<K: Copy + PartialEq> History<K> {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every bucket, retaining allocated capacity for the next depth
    /// layer.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Attempts to insert `candidate` (hashed/compared via `hasher` against
    /// `resolve`) into the history.
    ///
    /// Returns `Some(evicted)` with the key of a dominated entry that was
    /// replaced, `None` if the candidate was inserted without evicting
    /// anything, or rejects (returning `Err(())`) if an equivalent node
    /// already present has priority at least as good as the candidate's
    /// (`is_better(candidate, existing) == false`).
    ///
    /// `is_better(a, b)` must return `true` iff `a` strictly dominates (is
    /// strictly preferred to) `b`.
    pub fn insert_unique<N>(
        &mut self,
        candidate: K,
        hasher: &impl NodeHasher<N>,
        resolve: &impl Fn(K) -> N,
        is_better: &impl Fn(&N, &N) -> bool,
    ) -> Result<Option<K>, ()>
    where
        N: Sized,
    {
        let candidate_node = resolve(candidate);
        let hash = hasher.frontier_hash(&candidate_node);
        let bucket = self.buckets.entry(hash).or_default();

        for existing in bucket.iter() {
            let existing_node = resolve(*existing);
            if hasher.frontier_eq(&candidate_node, &existing_node) {
                if is_better(&candidate_node, &existing_node) {
                    let evicted = *existing;
                    let pos = bucket.iter().position(|k| *k == evicted).unwrap();
                    bucket[pos] = candidate;
                    return Ok(Some(evicted));
                }
                return Err(());
            }
        }
        bucket.push(candidate);
        Ok(None)
    }

    /// Total number of entries across every bucket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(SmallVec::len).sum()
    }

    /// Whether the history holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two values are "the same frontier" iff they fall in the same
    /// tens-bucket; `is_better` then ranks within that bucket by raw value.
    struct EqByTensBucket;

    impl NodeHasher<i32> for EqByTensBucket {
        fn frontier_hash(&self, node: &i32) -> u64 {
            (*node / 10) as u64
        }

        fn frontier_eq(&self, a: &i32, b: &i32) -> bool {
            a / 10 == b / 10
        }
    }

    #[test]
    fn dominated_duplicate_is_rejected() {
        let mut history: History<usize> = History::new();
        let values = [15_i32, 12, 25];
        let hasher = EqByTensBucket;
        let resolve = |k: usize| values[k];
        let is_better = |a: &i32, b: &i32| a > b;

        assert_eq!(history.insert_unique(0, &hasher, &resolve, &is_better), Ok(None));
        // 12 is in the same bucket as 15 but not strictly better -> rejected.
        assert_eq!(history.insert_unique(1, &hasher, &resolve, &is_better), Err(()));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn strictly_better_duplicate_evicts_existing() {
        let mut history: History<usize> = History::new();
        let values = [12_i32, 18];
        let hasher = EqByTensBucket;
        let resolve = |k: usize| values[k];
        let is_better = |a: &i32, b: &i32| a > b;

        assert_eq!(history.insert_unique(0, &hasher, &resolve, &is_better), Ok(None));
        assert_eq!(history.insert_unique(1, &hasher, &resolve, &is_better), Ok(Some(0)));
        assert_eq!(history.len(), 1);
    }
}
