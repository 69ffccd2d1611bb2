//! The box scheme's frontier: three linked 2D staircase structures, one per
//! projection plane.

use packingsolver_instance::{BinTypeId, ItemTypeId};
use packingsolver_solution::NodeCommon;

/// A rectangle of one projection plane: its footprint `(x0..x1, y0..y1)` in
/// that plane, plus the frontier's current extent (`value`) along the axis
/// perpendicular to the plane over that footprint (e.g. for the x-plane,
/// the rightmost filled `x`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UncoveredRect {
    pub item_type_id: Option<ItemTypeId>,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub value: f64,
}

impl UncoveredRect {
    fn intersects(&self, c: &Self) -> bool {
        self.x0 < c.x1 && self.x1 > c.x0 && self.y0 < c.y1 && self.y1 > c.y0
    }

    /// The parts of `self` lying outside `c` (assumes `self` and `c`
    /// overlap), split into up to four axis-aligned rectangles, keeping
    /// `self`'s original frontier `value`.
    fn minus(&self, c: &Self) -> smallvec::SmallVec<[Self; 4]> {
        let mut out = smallvec::SmallVec::new();
        if self.y0 < c.y0 {
            out.push(Self { x0: self.x0, x1: self.x1, y0: self.y0, y1: c.y0, ..*self });
        }
        if self.y1 > c.y1 {
            out.push(Self { x0: self.x0, x1: self.x1, y0: c.y1, y1: self.y1, ..*self });
        }
        let oy0 = self.y0.max(c.y0);
        let oy1 = self.y1.min(c.y1);
        if self.x0 < c.x0 {
            out.push(Self { x0: self.x0, x1: c.x0, y0: oy0, y1: oy1, ..*self });
        }
        if self.x1 > c.x1 {
            out.push(Self { x0: c.x1, x1: self.x1, y0: oy0, y1: oy1, ..*self });
        }
        out
    }
}

/// Replaces every rectangle of `plane` that overlaps `covering`'s footprint
/// with the parts of itself lying outside it, then appends `covering`
/// (whose `value` is the new frontier extent over its footprint). Keeps
/// `plane` a non-overlapping partition of the projection plane.
fn splice_plane(plane: &mut smallvec::SmallVec<[UncoveredRect; 8]>, covering: UncoveredRect) {
    let mut next = smallvec::SmallVec::new();
    for r in plane.iter() {
        if r.intersects(&covering) {
            next.extend(r.minus(&covering));
        } else {
            next.push(*r);
        }
    }
    next.push(covering);
    *plane = next;
}

/// A box-scheme partial-placement node.
#[derive(Clone, Debug)]
pub struct BoxNode {
    pub common: NodeCommon,
    pub bin_type_id: BinTypeId,
    pub bin_x: f64,
    pub bin_y: f64,
    pub bin_z: f64,
    /// Frontier along the x growth axis: rectangles in the `(y, z)` plane,
    /// `value` is the rightmost filled `x`.
    pub x_uncovered: smallvec::SmallVec<[UncoveredRect; 8]>,
    /// Projection onto the `(x, z)` plane; `value` is the y-frontier.
    pub y_uncovered: smallvec::SmallVec<[UncoveredRect; 8]>,
    /// Projection onto the `(x, y)` plane; `value` is the z-frontier.
    pub z_uncovered: smallvec::SmallVec<[UncoveredRect; 8]>,
}

impl BoxNode {
    /// A fresh bin: each plane starts as a single rectangle spanning the
    /// other two axes, with the frontier at the bin's origin.
    #[must_use]
    pub fn new_bin(common: NodeCommon, bin_type_id: BinTypeId, bin_x: f64, bin_y: f64, bin_z: f64) -> Self {
        let mut x_uncovered = smallvec::SmallVec::new();
        x_uncovered.push(UncoveredRect { item_type_id: None, x0: 0.0, x1: bin_y, y0: 0.0, y1: bin_z, value: 0.0 });
        let mut y_uncovered = smallvec::SmallVec::new();
        y_uncovered.push(UncoveredRect { item_type_id: None, x0: 0.0, x1: bin_x, y0: 0.0, y1: bin_z, value: 0.0 });
        let mut z_uncovered = smallvec::SmallVec::new();
        z_uncovered.push(UncoveredRect { item_type_id: None, x0: 0.0, x1: bin_x, y0: 0.0, y1: bin_y, value: 0.0 });
        Self {
            common,
            bin_type_id,
            bin_x,
            bin_y,
            bin_z,
            x_uncovered,
            y_uncovered,
            z_uncovered,
        }
    }

    /// Places a box at `(xs, ys, zs)` with size `(w, h, d)`, updating all
    /// three projection planes' frontier.
    pub fn splice(&mut self, item_type_id: ItemTypeId, xs: f64, ys: f64, zs: f64, w: f64, h: f64, d: f64) {
        splice_plane(
            &mut self.x_uncovered,
            UncoveredRect { item_type_id: Some(item_type_id), x0: ys, x1: ys + h, y0: zs, y1: zs + d, value: xs + w },
        );
        splice_plane(
            &mut self.y_uncovered,
            UncoveredRect { item_type_id: Some(item_type_id), x0: xs, x1: xs + w, y0: zs, y1: zs + d, value: ys + h },
        );
        splice_plane(
            &mut self.z_uncovered,
            UncoveredRect { item_type_id: Some(item_type_id), x0: xs, x1: xs + w, y0: ys, y1: ys + h, value: zs + d },
        );
    }

    /// The bounding x-extent of everything placed so far (the x-uncovered
    /// plane's maximum frontier value).
    #[must_use]
    pub fn filled_x_extent(&self) -> f64 {
        self.x_uncovered.iter().map(|r| r.value).fold(0.0_f64, f64::max)
    }
}

/// Frontier-equality hasher: compares the three projection planes only.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoxHasher;

impl packingsolver_domination::NodeHasher<BoxNode> for BoxHasher {
    fn frontier_hash(&self, node: &BoxNode) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        node.common.number_of_bins.hash(&mut hasher);
        for plane in [&node.x_uncovered, &node.y_uncovered, &node.z_uncovered] {
            plane.len().hash(&mut hasher);
            for r in plane {
                r.x0.to_bits().hash(&mut hasher);
                r.x1.to_bits().hash(&mut hasher);
                r.y0.to_bits().hash(&mut hasher);
                r.y1.to_bits().hash(&mut hasher);
                r.value.to_bits().hash(&mut hasher);
            }
        }
        hasher.finish()
    }

    fn frontier_eq(&self, a: &BoxNode, b: &BoxNode) -> bool {
        let eq = |x: f64, y: f64| (x - y).abs() < packingsolver_instance::PSTOL;
        let planes_eq = |pa: &[UncoveredRect], pb: &[UncoveredRect]| {
            pa.len() == pb.len()
                && pa.iter().zip(pb.iter()).all(|(a, b)| {
                    eq(a.x0, b.x0) && eq(a.x1, b.x1) && eq(a.y0, b.y0) && eq(a.y1, b.y1) && eq(a.value, b.value)
                })
        };
        a.common.number_of_bins == b.common.number_of_bins
            && planes_eq(&a.x_uncovered, &b.x_uncovered)
            && planes_eq(&a.y_uncovered, &b.y_uncovered)
            && planes_eq(&a.z_uncovered, &b.z_uncovered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bin_planes_span_full_extent() {
        let node = BoxNode::new_bin(NodeCommon::root(1, 1), 0, 10.0, 8.0, 6.0);
        assert_eq!(node.x_uncovered.len(), 1);
        assert_eq!(node.x_uncovered[0].x1, 8.0);
        assert_eq!(node.x_uncovered[0].y1, 6.0);
        assert_eq!(node.filled_x_extent(), 0.0);
    }

    #[test]
    fn splice_updates_x_frontier() {
        let mut node = BoxNode::new_bin(NodeCommon::root(1, 1), 0, 10.0, 10.0, 10.0);
        node.splice(0, 0.0, 0.0, 0.0, 4.0, 3.0, 2.0);
        assert_eq!(node.filled_x_extent(), 4.0);
        assert!(node.z_uncovered.len() >= 2);
        assert!(node.z_uncovered.iter().any(|r| r.item_type_id == Some(0)));
    }
}
