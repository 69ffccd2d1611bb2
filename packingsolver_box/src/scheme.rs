//! The box (3D) branching scheme: three linked 2D staircase frontiers
//! (x/y/z projections) enumerated jointly, wired into
//! [`packingsolver_search::BranchingScheme`].

use std::cmp::Ordering;

use packingsolver_domination::{Arena, NodeKey};
use packingsolver_instance::{Instance, ItemTypeId, Objective, Rotation, Size3};
use packingsolver_search::BranchingScheme;
use packingsolver_solution::{Direction, InsertionRecord, NodeCommon, Placement, Solution, SolutionBuilder};

use crate::node::{BoxHasher, BoxNode, UncoveredRect};

/// Tuning knobs for one box-scheme search.
#[derive(Clone, Copy, Debug)]
pub struct BoxParameters {
    /// Whether predecessor-based dominance filtering is applied to
    /// candidate insertions (spec'd in the insertion-enumeration rule;
    /// disabling it only widens the search, it never changes feasibility).
    pub use_dominance: bool,
}

impl Default for BoxParameters {
    fn default() -> Self {
        Self { use_dominance: true }
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    item_type_id: ItemTypeId,
    rotation: Rotation,
    xs: f64,
    ys: f64,
    zs: f64,
    w: f64,
    h: f64,
    d: f64,
    new_bin: bool,
}

/// The box (3D) branching scheme.
pub struct BoxScheme<'i> {
    instance: &'i Instance,
    arena: Arena<BoxNode>,
    next_id: u64,
    objective: Objective,
    params: BoxParameters,
    root_key: Option<NodeKey>,
}

const MAX_DEFECT_SLIDES: u32 = 16;

impl<'i> BoxScheme<'i> {
    #[must_use]
    pub fn new(instance: &'i Instance, params: BoxParameters) -> Self {
        Self {
            instance,
            arena: Arena::new(),
            next_id: 1,
            objective: instance.objective(),
            params,
            root_key: None,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn remaining(&self, node: &BoxNode, t: ItemTypeId) -> bool {
        let it = self.instance.item_type(t);
        it.has_unlimited_copies() || (node.common.item_number_of_copies[t] as i64) < it.copies()
    }

    /// Slides a floor-level footprint past any bin defect it overlaps in
    /// the `(x, y)` plane, returning `false` if it can't be freed within
    /// [`MAX_DEFECT_SLIDES`] tries.
    fn defect_slide_floor(&self, bin_type_id: usize, rect: &mut kurbo::Rect, xs: &mut f64) -> bool {
        for _ in 0..MAX_DEFECT_SLIDES {
            let overlap = self.instance.defects_of_bin_type(bin_type_id).find(|d| d.rect_intersects(*rect));
            let Some(d) = overlap else { return true };
            let shift = d.rect().x1 - rect.x0;
            *xs += shift;
            *rect = kurbo::Rect::new(rect.x0 + shift, rect.y0, rect.x1 + shift, rect.y1);
        }
        false
    }

    /// Enumerates feasible insertions from `node`. If the current bin
    /// admits none and bin capacity remains, re-enumerates against a fresh
    /// bin (the insertion's `new_bin` flag is then set).
    fn insertions(&self, node: &BoxNode) -> Vec<Candidate> {
        if node.common.all_items_packed(self.instance.item_types()) {
            return Vec::new();
        }
        let direct = self.insertions_in_bin(node, node.bin_type_id, node, false);
        if !direct.is_empty() {
            return direct;
        }

        let bin_pos = node.common.number_of_bins as usize;
        let expanded = self.instance.bin_type_ids_expanded();
        let next_bin_type_id = if bin_pos < expanded.len() {
            Some(expanded[bin_pos])
        } else {
            expanded.last().copied().filter(|&id| self.instance.bin_type(id).has_unlimited_copies())
        };
        let Some(bin_type_id) = next_bin_type_id else { return Vec::new() };
        let Some(size) = self.instance.bin_type(bin_type_id).shape().as_box() else { return Vec::new() };
        let fresh = BoxNode::new_bin(node.common.clone(), bin_type_id, size.x, size.y, size.z);
        self.insertions_in_bin(node, bin_type_id, &fresh, true)
    }

    /// The insertion-enumeration rule: for every remaining item type, every
    /// allowed rotation, every pair `(y-uncovered rectangle, z-uncovered
    /// rectangle)` whose footprints share an `x` range, anchor `(ys, zs)`
    /// from the two rectangles and slide `xs` past any overlap in the
    /// x-uncovered plane.
    fn insertions_in_bin(&self, node: &BoxNode, bin_type_id: usize, frontier: &BoxNode, new_bin: bool) -> Vec<Candidate> {
        let mut out = Vec::new();
        let bin_type = self.instance.bin_type(bin_type_id);
        let (bin_x, bin_y, bin_z) = (frontier.bin_x, frontier.bin_y, frontier.bin_z);

        for item_type in self.instance.item_types() {
            let t = item_type.id();
            if !self.remaining(node, t) {
                continue;
            }
            let Some(size) = item_type.shape().as_box() else { continue };

            for rotation in item_type.rotations().allowed() {
                let Size3 { x: w, y: h, z: d } = size.rotated(rotation);
                if w - packingsolver_instance::PSTOL > bin_x || h - packingsolver_instance::PSTOL > bin_y || d - packingsolver_instance::PSTOL > bin_z {
                    continue;
                }

                for y_rect in &frontier.y_uncovered {
                    let ys = y_rect.value;
                    if ys + h - packingsolver_instance::PSTOL > bin_y {
                        continue;
                    }
                    for z_rect in &frontier.z_uncovered {
                        let zs = z_rect.value;
                        if zs + d - packingsolver_instance::PSTOL > bin_z {
                            continue;
                        }
                        // Contact: the item must actually rest against both
                        // anchors, not merely float past them.
                        if ys + h <= z_rect.y0 + packingsolver_instance::PSTOL || ys >= z_rect.y1 - packingsolver_instance::PSTOL {
                            continue;
                        }
                        if zs + d <= y_rect.y0 + packingsolver_instance::PSTOL || zs >= y_rect.y1 - packingsolver_instance::PSTOL {
                            continue;
                        }
                        let x0 = y_rect.x0.max(z_rect.x0);
                        let x1 = y_rect.x1.min(z_rect.x1);
                        if x1 - x0 <= packingsolver_instance::PSTOL {
                            continue;
                        }

                        let xs = frontier
                            .x_uncovered
                            .iter()
                            .filter(|r| r.x0 < ys + h && r.x1 > ys && r.y0 < zs + d && r.y1 > zs)
                            .map(|r| r.value)
                            .fold(x0, f64::max);

                        let mut xs = xs;
                        if zs < packingsolver_instance::PSTOL && !bin_type.cut_through_defects() {
                            let mut floor = kurbo::Rect::new(xs, ys, xs + w, ys + h);
                            if !self.defect_slide_floor(bin_type_id, &mut floor, &mut xs) {
                                continue;
                            }
                        }

                        if xs + w - packingsolver_instance::PSTOL > bin_x {
                            continue;
                        }

                        if bin_type.maximum_weight() > 0.0 {
                            let group = node.common.group(item_type.group_id());
                            if group.last_bin_weight + item_type.weight() > bin_type.maximum_weight() * (1.0 + packingsolver_instance::PSTOL) {
                                continue;
                            }
                        }

                        out.push(Candidate { item_type_id: t, rotation, xs, ys, zs, w, h, d, new_bin });
                    }
                }
            }
        }

        if self.params.use_dominance { filter_dominated(out) } else { out }
    }

    fn apply(&mut self, parent_key: NodeKey, candidate: Candidate) -> NodeKey {
        let parent = self.arena.get(parent_key).expect("parent key must resolve").clone();
        let item_type = self.instance.item_type(candidate.item_type_id);

        let mut child = if candidate.new_bin {
            let bin_type_id = self.next_bin_type_for(&parent);
            let size = self.instance.bin_type(bin_type_id).shape().as_box().expect("box scheme only opens box bins");
            let mut common = parent.common.clone();
            common.number_of_bins += 1;
            BoxNode::new_bin(common, bin_type_id, size.x, size.y, size.z)
        } else {
            parent.clone()
        };

        child.splice(candidate.item_type_id, candidate.xs, candidate.ys, candidate.zs, candidate.w, candidate.h, candidate.d);

        child.common.parent = Some(parent_key);
        child.common.id = self.next_id();
        child.common.number_of_items += 1;
        child.common.item_number_of_copies[candidate.item_type_id] += 1;
        child.common.item_area_or_volume += item_type.area_or_volume();
        child.common.profit += item_type.profit();

        let bin_pos = child.common.number_of_bins.saturating_sub(1) as usize;
        let previous_volume = self.instance.previous_bin_area_or_volume(bin_pos);
        child.common.current_area_or_volume = previous_volume + child.filled_x_extent() * child.bin_y * child.bin_z;
        child.common.waste = (child.common.current_area_or_volume - child.common.item_area_or_volume).max(0.0);

        {
            let group_id = item_type.group_id();
            let weight = item_type.weight();
            let x_centroid = candidate.xs + candidate.w / 2.0;
            let group = child.common.group_mut(group_id);
            group.last_bin_weight += weight;
            group.last_bin_weight_weighted_sum += x_centroid * weight;
            group.coordinate_min = if group.number_of_items == 0 { candidate.xs } else { group.coordinate_min.min(candidate.xs) };
            group.coordinate_max = group.coordinate_max.max(candidate.xs + candidate.w);
            group.number_of_items += 1;
        }

        child.common.insertion = Some(InsertionRecord {
            item_type_id: Some(candidate.item_type_id),
            rotation: candidate.rotation,
            x: candidate.xs,
            y: candidate.ys,
            z: candidate.zs,
            new_bin: candidate.new_bin,
        });

        self.arena.insert(child)
    }

    fn next_bin_type_for(&self, parent: &BoxNode) -> usize {
        let bin_pos = parent.common.number_of_bins as usize;
        let expanded = self.instance.bin_type_ids_expanded();
        if bin_pos < expanded.len() {
            expanded[bin_pos]
        } else {
            expanded.last().copied().unwrap_or(parent.bin_type_id)
        }
    }
}

/// Drops any candidate dominated by another targeting the same item type
/// and rotation: component-wise `<=` on `(xs, ys, zs)`, strictly less on at
/// least one axis.
fn filter_dominated(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut keep = vec![true; candidates.len()];
    for i in 0..candidates.len() {
        if !keep[i] {
            continue;
        }
        for j in 0..candidates.len() {
            if i == j || !keep[j] {
                continue;
            }
            let a = &candidates[j];
            let b = &candidates[i];
            if a.item_type_id != b.item_type_id || a.rotation != b.rotation {
                continue;
            }
            let dominates = a.xs <= b.xs
                && a.ys <= b.ys
                && a.zs <= b.zs
                && (a.xs < b.xs || a.ys < b.ys || a.zs < b.zs);
            if dominates {
                keep[i] = false;
                break;
            }
        }
    }
    candidates = candidates.into_iter().zip(keep).filter(|(_, k)| *k).map(|(c, _)| c).collect();
    candidates
}

impl<'i> BranchingScheme<'i> for BoxScheme<'i> {
    type Node = BoxNode;
    type Hasher = BoxHasher;

    fn root(&mut self) -> NodeKey {
        if let Some(key) = self.root_key {
            return key;
        }
        let bin_type_id = self.instance.bin_type_ids_expanded().first().copied().unwrap_or(0);
        let size = self.instance.bin_type(bin_type_id).shape().as_box().expect("box scheme requires box bins");
        let mut common = NodeCommon::root(self.instance.number_of_item_types(), self.instance.number_of_groups());
        common.number_of_bins = 1;
        common.current_area_or_volume = size.volume();
        common.last_bin_direction = Direction::X;
        let root = BoxNode::new_bin(common, bin_type_id, size.x, size.y, size.z);
        let key = self.arena.insert(root);
        self.root_key = Some(key);
        key
    }

    fn node(&self, key: NodeKey) -> &Self::Node {
        self.arena.get(key).expect("node key must resolve within this scheme's arena")
    }

    fn depth(&self, key: NodeKey) -> u32 {
        self.node(key).common.number_of_items as u32
    }

    fn children(&mut self, key: NodeKey) -> Vec<NodeKey> {
        let node = self.node(key).clone();
        let candidates = self.insertions(&node);
        tracing::trace!(parent = ?key, candidates = candidates.len(), "expanding box node");
        candidates.into_iter().map(|c| self.apply(key, c)).collect()
    }

    fn leaf(&self, key: NodeKey) -> bool {
        let node = self.node(key);
        node.common.all_items_packed(self.instance.item_types()) || self.insertions(node).is_empty()
    }

    fn bound(&self, candidate: NodeKey, incumbent: Option<&Solution<'_>>) -> bool {
        let Some(incumbent) = incumbent else { return false };
        let node = self.node(candidate);
        match self.objective {
            Objective::Default | Objective::Knapsack | Objective::SequentialOneDimensionalRectangleSubproblem => {
                let remaining_volume = self.instance.item_area_or_volume() - node.common.item_area_or_volume;
                let efficiency = self
                    .instance
                    .largest_efficiency_item_type()
                    .map(|t| self.instance.item_type(t).efficiency())
                    .unwrap_or(0.0);
                node.common.profit + remaining_volume.max(0.0) * efficiency < incumbent.profit()
            }
            Objective::BinPacking | Objective::VariableSizedBinPacking => {
                let remaining_volume = self.instance.item_area_or_volume() - node.common.item_area_or_volume;
                let bin_volume = self.instance.bin_type(node.bin_type_id).shape().area_or_volume();
                let extra_bins = if bin_volume > 0.0 { (remaining_volume / bin_volume).ceil().max(0.0) } else { 0.0 };
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let min_bins = node.common.number_of_bins + extra_bins as u64;
                min_bins > incumbent.number_of_bins() as u64
            }
            Objective::BinPackingWithLeftovers => node.common.waste >= incumbent.waste() && node.common.number_of_bins >= incumbent.number_of_bins() as u64,
            Objective::OpenDimensionX | Objective::OpenDimensionY | Objective::OpenDimensionZ => {
                node.filled_x_extent() >= incumbent.x_extent()
            }
        }
    }

    fn compare(&self, a: NodeKey, b: NodeKey) -> Ordering {
        let a = self.node(a);
        let b = self.node(b);
        match self.objective {
            Objective::Default => b
                .common
                .profit
                .partial_cmp(&a.common.profit)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.common.waste.partial_cmp(&b.common.waste).unwrap_or(Ordering::Equal)),
            Objective::Knapsack | Objective::SequentialOneDimensionalRectangleSubproblem => {
                b.common.profit.partial_cmp(&a.common.profit).unwrap_or(Ordering::Equal)
            }
            Objective::BinPacking | Objective::VariableSizedBinPacking | Objective::BinPackingWithLeftovers => a
                .common
                .number_of_bins
                .cmp(&b.common.number_of_bins)
                .then_with(|| a.common.waste.partial_cmp(&b.common.waste).unwrap_or(Ordering::Equal)),
            Objective::OpenDimensionX | Objective::OpenDimensionY | Objective::OpenDimensionZ => {
                a.filled_x_extent().partial_cmp(&b.filled_x_extent()).unwrap_or(Ordering::Equal)
            }
        }
    }

    fn node_better(&self, a: &Self::Node, b: &Self::Node) -> bool {
        if (a.common.profit - b.common.profit).abs() > packingsolver_instance::PSTOL {
            a.common.profit > b.common.profit
        } else {
            a.common.waste < b.common.waste
        }
    }

    fn to_solution(&self, key: NodeKey) -> Solution<'i> {
        let mut chain = Vec::new();
        let mut cursor = Some(key);
        while let Some(k) = cursor {
            chain.push(k);
            cursor = self.node(k).common.parent;
        }
        chain.reverse();

        let mut sb = SolutionBuilder::new(self.instance);
        let mut bin_pos = None;
        for k in chain {
            let n = self.node(k);
            let Some(insertion) = n.common.insertion else { continue };
            if insertion.new_bin || bin_pos.is_none() {
                bin_pos = Some(sb.add_bin(n.bin_type_id, n.common.last_bin_direction));
            }
            if let Some(item_type_id) = insertion.item_type_id {
                sb.add_item(
                    bin_pos.expect("bin opened before first item"),
                    item_type_id,
                    Placement::Box { x: insertion.x, y: insertion.y, z: insertion.z },
                    insertion.rotation,
                    None,
                );
            }
        }
        let node = self.node(key);
        sb.set_current_area_or_volume(node.common.current_area_or_volume);
        sb.finish()
    }

    fn node_hasher(&self) -> Self::Hasher {
        BoxHasher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packingsolver_instance::{InstanceBuilder, RotationMask};

    fn two_cube_instance() -> Instance {
        let mut b = InstanceBuilder::new();
        b.add_box_item_type(Size3::new(4.0, 4.0, 4.0), RotationMask::CANONICAL_ONLY, 2, None, 0.0, 0, 0, u32::MAX, f64::MAX, 0.0).unwrap();
        b.add_box_bin_type(Size3::new(10.0, 10.0, 10.0), None, packingsolver_instance::UNLIMITED_COPIES, 0, 0.0, 0.0, None).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn root_opens_first_bin() {
        let inst = two_cube_instance();
        let mut scheme = BoxScheme::new(&inst, BoxParameters::default());
        let root = scheme.root();
        assert_eq!(scheme.node(root).common.number_of_bins, 1);
        assert!(!scheme.leaf(root));
    }

    #[test]
    fn children_enumerates_first_cube() {
        let inst = two_cube_instance();
        let mut scheme = BoxScheme::new(&inst, BoxParameters::default());
        let root = scheme.root();
        let kids = scheme.children(root);
        assert!(!kids.is_empty());
        for k in &kids {
            assert_eq!(scheme.depth(*k), 1);
        }
    }
}
