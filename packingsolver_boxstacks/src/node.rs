//! Box-stacks frontier: a rectangle skyline (spec.md §4.C) whose segments
//! each optionally carry the vertical stack sitting on their footprint.

use packingsolver_instance::{BinTypeId, ItemTypeId};
use packingsolver_solution::NodeCommon;
use smallvec::SmallVec;

/// The stack sitting on one skyline segment's footprint.
#[derive(Clone, Debug, PartialEq)]
pub struct StackState {
    /// Item types in the stack, bottom to top.
    pub item_type_ids: SmallVec<[ItemTypeId; 4]>,
    /// Total weight of the stack so far.
    pub weight: f64,
    /// Height of the stack's top face above the bin floor.
    pub ze: f64,
    /// Weight the stack may still take before its own
    /// `maximum_weight_above` cap (of the topmost item) is reached.
    pub remaining_weight: f64,
    /// How many more items the stack may take (the topmost item's
    /// `maximum_stackability`, decremented per `Above` insertion).
    pub maximum_number_of_items: u32,
}

/// One maximal y-interval along which the rightmost filled x, and the
/// stack sitting there (if any), are constant.
#[derive(Clone, Debug, PartialEq)]
pub struct UncoveredItem {
    /// The item type occupying this segment's edge, or `None` for the
    /// bin's own left wall.
    pub item_type_id: Option<ItemTypeId>,
    pub xs: f64,
    pub xe: f64,
    pub xe_dominance: f64,
    pub ys: f64,
    pub ye: f64,
    /// The stack resting on this segment's footprint, if a `Base`/`Left`
    /// insertion has started one.
    pub stack: Option<StackState>,
}

/// A box-stacks partial-placement node.
#[derive(Clone, Debug)]
pub struct BoxStacksNode {
    pub common: NodeCommon,
    pub uncovered_items: SmallVec<[UncoveredItem; 8]>,
    pub bin_type_id: BinTypeId,
    pub bin_x: f64,
    pub bin_y: f64,
    pub bin_z: f64,
}

impl BoxStacksNode {
    /// A fresh bin's skyline: one segment spanning the whole width, no
    /// stack yet.
    #[must_use]
    pub fn new_bin(common: NodeCommon, bin_type_id: BinTypeId, bin_x: f64, bin_y: f64, bin_z: f64) -> Self {
        let mut uncovered_items = SmallVec::new();
        uncovered_items.push(UncoveredItem {
            item_type_id: None,
            xs: 0.0,
            xe: 0.0,
            xe_dominance: 0.0,
            ys: 0.0,
            ye: bin_y,
            stack: None,
        });
        Self {
            common,
            uncovered_items,
            bin_type_id,
            bin_x,
            bin_y,
            bin_z,
        }
    }

    /// Splices a new stack's base `{item_type_id, xs, xe}` occupying `[ys,
    /// ye]` into the skyline (the `Base`/`Left` insertion modes): same
    /// mechanics as the rectangle scheme's skyline splice, except the new
    /// segment also starts a [`StackState`].
    pub fn splice_base(&mut self, item_type_id: ItemTypeId, xs: f64, xe: f64, ys: f64, ye: f64, stack: StackState) {
        let mut next: SmallVec<[UncoveredItem; 8]> = SmallVec::new();
        for seg in &self.uncovered_items {
            if seg.ye <= ys {
                next.push(seg.clone());
            } else if seg.ys < ys && seg.ye > ys {
                next.push(UncoveredItem { ys: seg.ys, ye: ys, ..seg.clone() });
            }
        }
        next.push(UncoveredItem {
            item_type_id: Some(item_type_id),
            xs,
            xe,
            xe_dominance: xe,
            ys,
            ye,
            stack: Some(stack),
        });
        for seg in &self.uncovered_items {
            if seg.ys >= ye {
                next.push(seg.clone());
            } else if seg.ys < ye && seg.ye > ye {
                next.push(UncoveredItem { ys: ye, ye: seg.ye, ..seg.clone() });
            }
        }
        self.uncovered_items = next;
        self.propagate_dominance();
    }

    /// Extends an existing stack in place (the `Above` insertion mode): the
    /// segment's footprint and `xe` are unchanged, only its [`StackState`]
    /// grows.
    pub fn splice_above(&mut self, segment_index: usize, item_type_id: ItemTypeId, height: f64, weight: f64, remaining_weight: f64, maximum_number_of_items: u32) {
        let seg = &mut self.uncovered_items[segment_index];
        let stack = seg.stack.as_mut().expect("Above insertion targets an existing stack");
        stack.item_type_ids.push(item_type_id);
        stack.weight += weight;
        stack.ze += height;
        stack.remaining_weight = remaining_weight;
        stack.maximum_number_of_items = maximum_number_of_items;
    }

    fn propagate_dominance(&mut self) {
        for seg in &mut self.uncovered_items {
            seg.xe_dominance = seg.xe;
        }
        let n = self.uncovered_items.len();
        for i in 0..n {
            let xe = self.uncovered_items[i].xe;
            if i > 0 {
                self.uncovered_items[i - 1].xe_dominance = self.uncovered_items[i - 1].xe_dominance.max(xe);
            }
            if i + 1 < n {
                self.uncovered_items[i + 1].xe_dominance = self.uncovered_items[i + 1].xe_dominance.max(xe);
            }
        }
    }

    /// The x-extent actually filled so far (max `xe` over segments).
    #[must_use]
    pub fn filled_x_extent(&self) -> f64 {
        self.uncovered_items.iter().map(|s| s.xe).fold(0.0_f64, f64::max)
    }
}

/// Frontier-equality hasher over the skyline and its stacks.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoxStacksHasher;

impl packingsolver_domination::NodeHasher<BoxStacksNode> for BoxStacksHasher {
    fn frontier_hash(&self, node: &BoxStacksNode) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        node.common.number_of_bins.hash(&mut hasher);
        for seg in &node.uncovered_items {
            seg.item_type_id.hash(&mut hasher);
            seg.xe.to_bits().hash(&mut hasher);
            seg.ys.to_bits().hash(&mut hasher);
            seg.ye.to_bits().hash(&mut hasher);
            if let Some(stack) = &seg.stack {
                stack.item_type_ids.hash(&mut hasher);
                stack.ze.to_bits().hash(&mut hasher);
            }
        }
        hasher.finish()
    }

    fn frontier_eq(&self, a: &BoxStacksNode, b: &BoxStacksNode) -> bool {
        let eq = |x: f64, y: f64| (x - y).abs() < packingsolver_instance::PSTOL;
        a.common.number_of_bins == b.common.number_of_bins
            && a.uncovered_items.len() == b.uncovered_items.len()
            && a.uncovered_items.iter().zip(b.uncovered_items.iter()).all(|(x, y)| {
                x.item_type_id == y.item_type_id
                    && eq(x.xe, y.xe)
                    && eq(x.ys, y.ys)
                    && eq(x.ye, y.ye)
                    && match (&x.stack, &y.stack) {
                        (None, None) => true,
                        (Some(sx), Some(sy)) => sx.item_type_ids == sy.item_type_ids && eq(sx.ze, sy.ze),
                        _ => false,
                    }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> BoxStacksNode {
        BoxStacksNode::new_bin(NodeCommon::root(1, 1), 0, 10.0, 10.0, 10.0)
    }

    #[test]
    fn splice_base_starts_a_stack() {
        let mut n = root();
        n.splice_base(0, 0.0, 4.0, 2.0, 6.0, StackState { item_type_ids: SmallVec::from_slice(&[0]), weight: 1.0, ze: 2.0, remaining_weight: 10.0, maximum_number_of_items: 3 });
        assert_eq!(n.uncovered_items.len(), 3);
        assert!(n.uncovered_items[1].stack.is_some());
    }

    #[test]
    fn splice_above_grows_existing_stack() {
        let mut n = root();
        n.splice_base(0, 0.0, 4.0, 2.0, 6.0, StackState { item_type_ids: SmallVec::from_slice(&[0]), weight: 1.0, ze: 2.0, remaining_weight: 10.0, maximum_number_of_items: 3 });
        n.splice_above(1, 1, 1.5, 0.5, 9.5, 2);
        let stack = n.uncovered_items[1].stack.as_ref().unwrap();
        assert_eq!(stack.item_type_ids.len(), 2);
        assert!((stack.ze - 3.5).abs() < 1e-9);
    }
}
