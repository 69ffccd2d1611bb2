//! Skyline frontier: a staircase decomposition of the top of the currently
//! placed region, partitioning `[0, bin.y]` bottom-to-top.

use packingsolver_instance::{BinTypeId, ItemTypeId};
use packingsolver_solution::{Direction, NodeCommon};
use smallvec::SmallVec;

/// One maximal y-interval along which the rightmost filled x is constant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UncoveredItem {
    /// The item type occupying this segment's edge, or `None` for the
    /// bin's own left wall (the initial, single segment of a fresh bin).
    pub item_type_id: Option<ItemTypeId>,
    /// Left x this segment's item starts at.
    pub xs: f64,
    /// Rightmost filled x along this segment.
    pub xe: f64,
    /// x-right dominance value, propagated through adjacent segments whose
    /// height is smaller than the smallest remaining item's side.
    pub xe_dominance: f64,
    /// Bottom of the y-interval.
    pub ys: f64,
    /// Top of the y-interval.
    pub ye: f64,
}

impl UncoveredItem {
    fn height(&self) -> f64 {
        self.ye - self.ys
    }
}

/// A rectangle-scheme partial-placement node: the shared [`NodeCommon`]
/// accumulators plus the skyline frontier of the bin currently being
/// filled.
#[derive(Clone, Debug)]
pub struct RectangleNode {
    /// Shared accumulators (area, waste, profit, per-group totals, ...).
    pub common: NodeCommon,
    /// Skyline segments of the current bin, sorted bottom-to-top.
    pub uncovered_items: SmallVec<[UncoveredItem; 8]>,
    /// Bin type of the bin currently being filled.
    pub bin_type_id: BinTypeId,
    /// Packable width/height of the current bin, in strip-growth
    /// coordinates (i.e. already swapped if `common.last_bin_direction ==
    /// Direction::Y`).
    pub bin_x: f64,
    pub bin_y: f64,
}

impl RectangleNode {
    /// A fresh bin's skyline: one segment spanning the whole height, flush
    /// against the left wall.
    #[must_use]
    pub fn new_bin(common: NodeCommon, bin_type_id: BinTypeId, bin_x: f64, bin_y: f64) -> Self {
        let mut uncovered_items = SmallVec::new();
        uncovered_items.push(UncoveredItem {
            item_type_id: None,
            xs: 0.0,
            xe: 0.0,
            xe_dominance: 0.0,
            ys: 0.0,
            ye: bin_y,
        });
        Self {
            common,
            uncovered_items,
            bin_type_id,
            bin_x,
            bin_y,
        }
    }

    /// Splices a new placement `{item_type_id, xs, xe}` occupying `[ys,
    /// ye]` into the skyline, keeping segments strictly below `ys` and
    /// strictly above `ye`, splitting the segment(s) that straddle the new
    /// one.
    pub fn splice(&mut self, item_type_id: ItemTypeId, xs: f64, xe: f64, ys: f64, ye: f64) {
        let mut next: SmallVec<[UncoveredItem; 8]> = SmallVec::new();
        for seg in &self.uncovered_items {
            if seg.ye <= ys {
                next.push(*seg);
            } else if seg.ys < ys && seg.ye > ys {
                next.push(UncoveredItem {
                    ys: seg.ys,
                    ye: ys,
                    ..*seg
                });
            }
        }
        next.push(UncoveredItem {
            item_type_id: Some(item_type_id),
            xs,
            xe,
            xe_dominance: xe,
            ys,
            ye,
        });
        for seg in &self.uncovered_items {
            if seg.ys >= ye {
                next.push(*seg);
            } else if seg.ys < ye && seg.ye > ye {
                next.push(UncoveredItem {
                    ys: ye,
                    ye: seg.ye,
                    ..*seg
                });
            }
        }
        self.uncovered_items = next;
        self.propagate_dominance();
    }

    /// Propagates an x-right dominance value through adjacent segments
    /// whose height is smaller than `smallest_item_side`: a short segment's
    /// dominance value is raised to the max of its neighbors' `xe`, so a
    /// later insertion test can tell whether squeezing into the short
    /// segment could ever beat using a taller neighbor instead.
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

    /// The x-extent actually filled so far in this bin (max `xe` over
    /// segments), used to derive `current_area_or_volume` when a new bin is
    /// opened or the node is turned into a solution.
    #[must_use]
    pub fn filled_x_extent(&self) -> f64 {
        self.uncovered_items.iter().map(|s| s.xe).fold(0.0_f64, f64::max)
    }
}

/// Frontier-equality hasher over the skyline only (ignores parent pointer,
/// id, and every accumulator derivable from it).
#[derive(Clone, Copy, Debug, Default)]
pub struct RectangleHasher;

impl packingsolver_domination::NodeHasher<RectangleNode> for RectangleHasher {
    fn frontier_hash(&self, node: &RectangleNode) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        node.common.number_of_bins.hash(&mut hasher);
        for seg in &node.uncovered_items {
            seg.item_type_id.hash(&mut hasher);
            seg.xe.to_bits().hash(&mut hasher);
            seg.ys.to_bits().hash(&mut hasher);
            seg.ye.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }

    fn frontier_eq(&self, a: &RectangleNode, b: &RectangleNode) -> bool {
        a.common.number_of_bins == b.common.number_of_bins
            && a.uncovered_items.len() == b.uncovered_items.len()
            && a.uncovered_items.iter().zip(b.uncovered_items.iter()).all(|(x, y)| {
                x.item_type_id == y.item_type_id
                    && (x.xe - y.xe).abs() < packingsolver_instance::PSTOL
                    && (x.ys - y.ys).abs() < packingsolver_instance::PSTOL
                    && (x.ye - y.ye).abs() < packingsolver_instance::PSTOL
            })
    }
}

/// Resolves a packable `(width, height)` in strip-growth coordinates for a
/// given bin-opening direction.
#[must_use]
pub fn oriented_bin_size(size: kurbo::Size, direction: Direction) -> (f64, f64) {
    match direction {
        Direction::Y => (size.height, size.width),
        _ => (size.width, size.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> RectangleNode {
        RectangleNode::new_bin(NodeCommon::root(1, 1), 0, 10.0, 10.0)
    }

    #[test]
    fn splice_splits_straddling_segment() {
        let mut n = root();
        n.splice(0, 0.0, 4.0, 2.0, 6.0);
        assert_eq!(n.uncovered_items.len(), 3);
        assert!((n.uncovered_items[0].ys - 0.0).abs() < 1e-9);
        assert!((n.uncovered_items[0].ye - 2.0).abs() < 1e-9);
        assert_eq!(n.uncovered_items[1].item_type_id, Some(0));
        assert!((n.uncovered_items[2].ye - 10.0).abs() < 1e-9);
    }

    #[test]
    fn frontier_eq_ignores_item_id_when_unneeded_but_checks_geometry() {
        let a = root();
        let b = root();
        let hasher = RectangleHasher;
        assert!(hasher.frontier_eq(&a, &b));
    }
}
