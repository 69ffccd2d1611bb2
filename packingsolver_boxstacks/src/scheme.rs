//! The box-stacks branching scheme: a rectangle skyline over the bin floor,
//! each segment optionally carrying a vertical stack, wired into
//! [`packingsolver_search::BranchingScheme`].

use std::cmp::Ordering;

use packingsolver_domination::{Arena, NodeKey};
use packingsolver_instance::{Instance, ItemTypeId, Objective, Rotation};
use packingsolver_search::BranchingScheme;
use packingsolver_solution::{Direction, NodeCommon, Placement, Solution, SolutionBuilder};

use crate::dominance::StackDominance;
use crate::node::{BoxStacksHasher, BoxStacksNode, StackState, UncoveredItem};
use crate::trajectory::ExpectedTrajectory;

/// Tuning knobs for one box-stacks search.
#[derive(Clone, Debug)]
pub struct BoxStacksParameters {
    /// Whether the pre-search stack-composition dominance filter is
    /// applied to candidate base insertions.
    pub use_dominance: bool,
}

impl Default for BoxStacksParameters {
    fn default() -> Self {
        Self { use_dominance: true }
    }
}

const MAX_DEFECT_SLIDES: u32 = 16;

#[derive(Clone, Copy, Debug)]
enum Kind {
    Base,
    Left,
    Above { segment_index: usize },
}

#[derive(Clone, Debug)]
struct Candidate {
    kind: Kind,
    item_type_id: ItemTypeId,
    rotation: Rotation,
    xs: f64,
    ys: f64,
    w: f64,
    h: f64,
    height: f64,
    weight: f64,
    new_bin: bool,
}

/// The box-stacks branching scheme.
pub struct BoxStacksScheme<'i> {
    instance: &'i Instance,
    arena: Arena<BoxStacksNode>,
    next_id: u64,
    dominance: StackDominance,
    trajectory: ExpectedTrajectory,
    objective: Objective,
    params: BoxStacksParameters,
    root_key: Option<NodeKey>,
}

impl<'i> BoxStacksScheme<'i> {
    #[must_use]
    pub fn new(instance: &'i Instance, params: BoxStacksParameters) -> Self {
        Self {
            instance,
            arena: Arena::new(),
            next_id: 1,
            dominance: StackDominance::build(instance),
            trajectory: ExpectedTrajectory::build(instance),
            objective: instance.objective(),
            params,
            root_key: None,
        }
    }

    /// The expected-trajectory model computed for this instance,
    /// informational only (used by heuristics outside the core search).
    #[must_use]
    pub fn trajectory(&self) -> &ExpectedTrajectory {
        &self.trajectory
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn remaining(&self, node: &BoxStacksNode, t: ItemTypeId) -> bool {
        let it = self.instance.item_type(t);
        it.has_unlimited_copies() || (node.common.item_number_of_copies[t] as i64) < it.copies()
    }

    fn first_overlapping_defect_right(&self, bin_type_id: usize, rect: kurbo::Rect) -> Option<f64> {
        self.instance.defects_of_bin_type(bin_type_id).find(|d| d.rect_intersects(rect)).map(|d| d.rect().x1)
    }

    /// Whether starting a new stack of `group_id` at `[xs, xs+w) x [ys,
    /// ys+h)` would violate `instance.unloading_constraint()`: the same
    /// per-group ordering rule the rectangle scheme enforces (a later
    /// group's footprint may not sit in front of an earlier group's along
    /// the constrained axis). Groups with no items placed yet never block.
    fn unloading_constraint_violated(&self, node: &BoxStacksNode, uncovered: &[UncoveredItem], group_id: usize, ys: f64, ye: f64, xs: f64) -> bool {
        match self.instance.unloading_constraint() {
            packingsolver_instance::UnloadingConstraint::None => false,
            packingsolver_instance::UnloadingConstraint::OnlyXMovements | packingsolver_instance::UnloadingConstraint::OnlyYMovements => {
                uncovered.iter().any(|seg| {
                    seg.ye > ys
                        && seg.ys < ye
                        && seg.item_type_id.is_some_and(|pred_id| self.instance.item_type(pred_id).group_id() < group_id)
                })
            }
            packingsolver_instance::UnloadingConstraint::IncreasingX | packingsolver_instance::UnloadingConstraint::IncreasingY => {
                for later in (group_id + 1)..self.instance.number_of_groups() {
                    let acc = node.common.group(later);
                    if acc.number_of_items > 0 && xs < acc.coordinate_max {
                        return true;
                    }
                }
                for earlier in 0..group_id {
                    let acc = node.common.group(earlier);
                    if acc.number_of_items > 0 && xs > acc.coordinate_min {
                        return true;
                    }
                }
                false
            }
        }
    }

    fn insertions(&self, node: &BoxStacksNode) -> Vec<Candidate> {
        if node.common.all_items_packed(self.instance.item_types()) {
            return Vec::new();
        }
        let direct = self.insertions_in_bin(node, node.bin_type_id, &node.uncovered_items, node.bin_x, node.bin_y, node.bin_z, false);
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
        let fresh = BoxStacksNode::new_bin(node.common.clone(), bin_type_id, size.x, size.y, size.z);
        self.insertions_in_bin(node, bin_type_id, &fresh.uncovered_items, size.x, size.y, size.z, true)
    }

    #[allow(clippy::too_many_arguments)]
    fn insertions_in_bin(
        &self,
        node: &BoxStacksNode,
        bin_type_id: usize,
        uncovered: &[UncoveredItem],
        bin_x: f64,
        bin_y: f64,
        bin_z: f64,
        new_bin: bool,
    ) -> Vec<Candidate> {
        let mut out = Vec::new();
        let bin_type = self.instance.bin_type(bin_type_id);

        // Above: extend an existing stack in place.
        for (idx, seg) in uncovered.iter().enumerate() {
            let Some(stack) = &seg.stack else { continue };
            let Some(&top) = stack.item_type_ids.last() else { continue };
            let top_type = self.instance.item_type(top);
            let footprint_w = seg.xe - seg.xs;
            let footprint_h = seg.ye - seg.ys;
            let footprint_area = footprint_w * footprint_h;

            for item_type in self.instance.item_types() {
                let t = item_type.id();
                if !self.remaining(node, t) || t == top && !self.remaining(node, t) {
                    continue;
                }
                if item_type.stackability_id() != top_type.stackability_id() || item_type.group_id() != top_type.group_id() {
                    continue;
                }
                let Some(size) = item_type.shape().as_box() else { continue };
                for rotation in item_type.rotations().allowed() {
                    let rotated = size.rotated(rotation);
                    let matches_plain = (rotated.x - footprint_w).abs() < packingsolver_instance::PSTOL && (rotated.y - footprint_h).abs() < packingsolver_instance::PSTOL;
                    let matches_swap = (rotated.x - footprint_h).abs() < packingsolver_instance::PSTOL && (rotated.y - footprint_w).abs() < packingsolver_instance::PSTOL;
                    if !matches_plain && !matches_swap {
                        continue;
                    }
                    if stack.ze + rotated.z - packingsolver_instance::PSTOL > bin_z {
                        continue;
                    }
                    let stack_max_weight = bin_type.stack_maximum_weight(footprint_area);
                    if stack.weight + item_type.weight() - packingsolver_instance::PSTOL > stack_max_weight {
                        continue;
                    }
                    if stack.item_type_ids.len() as u32 >= stack.maximum_number_of_items {
                        continue;
                    }
                    if item_type.weight() - packingsolver_instance::PSTOL > stack.remaining_weight {
                        continue;
                    }

                    out.push(Candidate {
                        kind: Kind::Above { segment_index: idx },
                        item_type_id: t,
                        rotation,
                        xs: seg.xs,
                        ys: seg.ys,
                        w: footprint_w,
                        h: footprint_h,
                        height: rotated.z,
                        weight: item_type.weight(),
                        new_bin,
                    });
                }
            }
        }

        // Base / Left: start a new stack flush against the skyline.
        for item_type in self.instance.item_types() {
            let t = item_type.id();
            if !self.remaining(node, t) {
                continue;
            }
            if self.params.use_dominance && self.dominance.is_dominated(t, |i| self.remaining(node, i)) {
                continue;
            }
            let Some(size) = item_type.shape().as_box() else { continue };

            for rotation in item_type.rotations().allowed() {
                let rotated = size.rotated(rotation);
                let (w, h, zh) = (rotated.x, rotated.y, rotated.z);
                if zh - packingsolver_instance::PSTOL > bin_z {
                    continue;
                }

                for (idx, seg) in uncovered.iter().enumerate() {
                    let ys = seg.ys;
                    if ys + h - packingsolver_instance::PSTOL > bin_y {
                        continue;
                    }

                    // Base: flush against the tallest relevant edge.
                    let xs_base = uncovered.iter().filter(|s| s.ys < ys + h && s.ye > ys).map(|s| s.xe).fold(0.0_f64, f64::max);
                    // Left: flush against each individually lower segment.
                    let xs_candidates: Vec<(f64, Kind)> = std::iter::once((xs_base, Kind::Base))
                        .chain(uncovered.iter().filter(|s| s.ye <= ys).map(|s| (s.xe, Kind::Left)))
                        .collect();

                    for (xs_start, kind) in xs_candidates {
                        if idx > 0 && matches!(kind, Kind::Base) && xs_start <= uncovered[idx - 1].xs {
                            continue;
                        }

                        let mut xs = xs_start;
                        let mut slid = 0;
                        let xe_final = loop {
                            if xs + w - packingsolver_instance::PSTOL > bin_x {
                                break None;
                            }
                            let rect = kurbo::Rect::new(xs, ys, xs + w, ys + h);
                            match self.first_overlapping_defect_right(bin_type_id, rect) {
                                Some(right) if slid < MAX_DEFECT_SLIDES => {
                                    xs = right;
                                    slid += 1;
                                }
                                Some(_) => break None,
                                None => break Some(xs + w),
                            }
                        };
                        let Some(_xe) = xe_final else { continue };

                        if self.unloading_constraint_violated(node, uncovered, item_type.group_id(), ys, ys + h, xs) {
                            continue;
                        }

                        if bin_type.maximum_weight() > 0.0 {
                            let group = node.common.group(item_type.group_id());
                            if group.last_bin_weight + item_type.weight() > bin_type.maximum_weight() * (1.0 + packingsolver_instance::PSTOL) {
                                continue;
                            }
                        }

                        out.push(Candidate { kind, item_type_id: t, rotation, xs, ys, w, h, height: zh, weight: item_type.weight(), new_bin });
                    }
                }
            }
        }

        out
    }

    fn apply(&mut self, parent_key: NodeKey, candidate: Candidate) -> NodeKey {
        let parent = self.arena.get(parent_key).expect("parent key must resolve").clone();
        let item_type = self.instance.item_type(candidate.item_type_id);

        let mut child = if candidate.new_bin {
            let bin_type_id = self.next_bin_type_for(&parent);
            let size = self.instance.bin_type(bin_type_id).shape().as_box().expect("box-stacks scheme only opens box bins");
            let mut common = parent.common.clone();
            common.number_of_bins += 1;
            BoxStacksNode::new_bin(common, bin_type_id, size.x, size.y, size.z)
        } else {
            parent.clone()
        };

        match candidate.kind {
            Kind::Above { segment_index } => {
                child.splice_above(segment_index, candidate.item_type_id, candidate.height, candidate.weight, item_type.maximum_weight_above(), item_type.maximum_stackability());
            }
            Kind::Base | Kind::Left => {
                let stack = StackState {
                    item_type_ids: smallvec::smallvec![candidate.item_type_id],
                    weight: candidate.weight,
                    ze: candidate.height,
                    remaining_weight: item_type.maximum_weight_above(),
                    maximum_number_of_items: item_type.maximum_stackability(),
                };
                child.splice_base(candidate.item_type_id, candidate.xs, candidate.xs + candidate.w, candidate.ys, candidate.ys + candidate.h, stack);
            }
        }

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
            let bin_type = self.instance.bin_type(child.bin_type_id);
            let group = child.common.group_mut(group_id);
            group.last_bin_weight += weight;
            group.last_bin_weight_weighted_sum += x_centroid * weight;
            group.coordinate_min = if group.number_of_items == 0 { candidate.xs } else { group.coordinate_min.min(candidate.xs) };
            group.coordinate_max = group.coordinate_max.max(candidate.xs + candidate.w);
            group.number_of_items += 1;

            if let Some(stt) = bin_type.semi_trailer_truck() {
                if self.instance.group(group_id).check_weight_constraint {
                    let (middle, rear) = stt.compute_axle_weights(group.last_bin_weight_weighted_sum, group.last_bin_weight);
                    group.middle_axle_overweight = (middle - stt.middle_axle_maximum_weight).max(0.0);
                    group.rear_axle_overweight = (rear - stt.rear_axle_maximum_weight).max(0.0);
                }
            }
        }

        self.arena.insert(child)
    }

    fn next_bin_type_for(&self, parent: &BoxStacksNode) -> usize {
        let bin_pos = parent.common.number_of_bins as usize;
        let expanded = self.instance.bin_type_ids_expanded();
        if bin_pos < expanded.len() {
            expanded[bin_pos]
        } else {
            expanded.last().copied().unwrap_or(parent.bin_type_id)
        }
    }

    /// Total accumulated axle overweight across every group, used as a soft
    /// penalty by [`BranchingScheme::node_better`] until a group is
    /// completely packed, at which point [`BoxStacksScheme::bound`] rejects
    /// any remaining overweight outright.
    fn total_axle_overweight(&self, node: &BoxStacksNode) -> f64 {
        node.common.groups.iter().map(|g| g.middle_axle_overweight + g.rear_axle_overweight).sum()
    }
}

impl<'i> BranchingScheme<'i> for BoxStacksScheme<'i> {
    type Node = BoxStacksNode;
    type Hasher = BoxStacksHasher;

    fn root(&mut self) -> NodeKey {
        if let Some(key) = self.root_key {
            return key;
        }
        let bin_type_id = self.instance.bin_type_ids_expanded().first().copied().unwrap_or(0);
        let size = self.instance.bin_type(bin_type_id).shape().as_box().expect("box-stacks scheme requires box bins");
        let mut common = NodeCommon::root(self.instance.number_of_item_types(), self.instance.number_of_groups());
        common.number_of_bins = 1;
        common.current_area_or_volume = size.volume();
        let root = BoxStacksNode::new_bin(common, bin_type_id, size.x, size.y, size.z);
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
        tracing::trace!(parent = ?key, candidates = candidates.len(), "expanding box-stacks node");
        candidates
            .into_iter()
            .map(|c| self.apply(key, c))
            .filter(|&k| {
                let n = self.node(k);
                let fully_packed = self.instance.groups().iter().enumerate().all(|(gid, g)| {
                    let group_done = g.item_types.iter().all(|&t| {
                        let it = self.instance.item_type(t);
                        it.has_unlimited_copies() || n.common.item_number_of_copies[t] as i64 >= it.copies()
                    });
                    !group_done || n.common.groups[gid].middle_axle_overweight + n.common.groups[gid].rear_axle_overweight <= packingsolver_instance::PSTOL
                });
                fully_packed
            })
            .collect()
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
            Objective::BinPacking | Objective::VariableSizedBinPacking => node.common.number_of_bins > incumbent.number_of_bins() as u64,
            Objective::BinPackingWithLeftovers => node.common.waste >= incumbent.waste() && node.common.number_of_bins >= incumbent.number_of_bins() as u64,
            Objective::OpenDimensionX | Objective::OpenDimensionY | Objective::OpenDimensionZ => {
                node.filled_x_extent() >= incumbent.x_extent() || node.filled_x_extent() >= self.dominance.x_extent_upper_bound()
            }
        }
    }

    fn compare(&self, a: NodeKey, b: NodeKey) -> Ordering {
        let an = self.node(a);
        let bn = self.node(b);
        match self.objective {
            Objective::Default => bn
                .common
                .profit
                .partial_cmp(&an.common.profit)
                .unwrap_or(Ordering::Equal)
                .then_with(|| an.common.waste.partial_cmp(&bn.common.waste).unwrap_or(Ordering::Equal))
                .then_with(|| self.total_axle_overweight(an).partial_cmp(&self.total_axle_overweight(bn)).unwrap_or(Ordering::Equal)),
            Objective::Knapsack | Objective::SequentialOneDimensionalRectangleSubproblem => {
                bn.common.profit.partial_cmp(&an.common.profit).unwrap_or(Ordering::Equal)
            }
            Objective::BinPacking | Objective::VariableSizedBinPacking | Objective::BinPackingWithLeftovers => an
                .common
                .number_of_bins
                .cmp(&bn.common.number_of_bins)
                .then_with(|| an.common.waste.partial_cmp(&bn.common.waste).unwrap_or(Ordering::Equal)),
            Objective::OpenDimensionX | Objective::OpenDimensionY | Objective::OpenDimensionZ => {
                an.filled_x_extent().partial_cmp(&bn.filled_x_extent()).unwrap_or(Ordering::Equal)
            }
        }
    }

    fn node_better(&self, a: &Self::Node, b: &Self::Node) -> bool {
        if (a.common.profit - b.common.profit).abs() > packingsolver_instance::PSTOL {
            a.common.profit > b.common.profit
        } else if (a.common.waste - b.common.waste).abs() > packingsolver_instance::PSTOL {
            a.common.waste < b.common.waste
        } else {
            self.total_axle_overweight(a) < self.total_axle_overweight(b)
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
        let mut bin_pos: Option<usize> = None;
        let mut stack_ids: std::collections::HashMap<(usize, u64), usize> = std::collections::HashMap::new();
        for k in chain {
            let n = self.node(k);
            let Some(insertion) = n.common.insertion else { continue };
            if insertion.new_bin || bin_pos.is_none() {
                bin_pos = Some(sb.add_bin(n.bin_type_id, n.common.last_bin_direction));
            }
            let pos = bin_pos.expect("bin opened before first item");
            let Some(item_type_id) = insertion.item_type_id else { continue };

            // Find the segment this item landed on/started, keyed by its
            // footprint origin, to group placements into the same stack id.
            let key_bits = (insertion.x.to_bits() as u64) ^ (insertion.y.to_bits() as u64).rotate_left(1);
            let stack_id = *stack_ids.entry((pos, key_bits)).or_insert_with(|| {
                let seg = n.uncovered_items.iter().find(|s| (s.xs - insertion.x).abs() < packingsolver_instance::PSTOL && (s.ys - insertion.y).abs() < packingsolver_instance::PSTOL);
                let (x_range, y_range) = seg.map_or(((insertion.x, insertion.x), (insertion.y, insertion.y)), |s| ((s.xs, s.xe), (s.ys, s.ye)));
                sb.add_stack(pos, x_range, y_range)
            });

            sb.add_item(pos, item_type_id, Placement::Rect { x: insertion.x, y: insertion.y }, insertion.rotation, Some(stack_id));
        }
        let node = self.node(key);
        sb.set_current_area_or_volume(node.common.current_area_or_volume);
        sb.finish()
    }

    fn node_hasher(&self) -> Self::Hasher {
        BoxStacksHasher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packingsolver_instance::{InstanceBuilder, RotationMask, Size3, Trims};

    fn base_then_above_instance() -> Instance {
        let mut b = InstanceBuilder::new();
        b.add_box_item_type(Size3::new(4.0, 4.0, 2.0), RotationMask::CANONICAL_ONLY, 1, None, 10.0, 0, 0, 2, 100.0, 0.0).unwrap();
        b.add_box_item_type(Size3::new(4.0, 4.0, 1.0), RotationMask::CANONICAL_ONLY, 1, None, 2.0, 0, 0, 1, 50.0, 0.0).unwrap();
        b.add_box_bin_type(Size3::new(10.0, 10.0, 10.0), None, 1, 0, 0.0, 0.0, None).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn root_opens_first_bin() {
        let inst = base_then_above_instance();
        let mut scheme = BoxStacksScheme::new(&inst, BoxStacksParameters::default());
        let root = scheme.root();
        assert_eq!(scheme.node(root).common.number_of_bins, 1);
    }

    #[test]
    fn base_insertion_is_offered_first() {
        let inst = base_then_above_instance();
        let mut scheme = BoxStacksScheme::new(&inst, BoxStacksParameters::default());
        let root = scheme.root();
        let kids = scheme.children(root);
        assert!(!kids.is_empty());
    }

    #[test]
    fn above_insertion_stacks_onto_a_base() {
        let inst = base_then_above_instance();
        let mut scheme = BoxStacksScheme::new(&inst, BoxStacksParameters::default());
        let root = scheme.root();
        let base_candidates = scheme.insertions(scheme.node(root));
        let base = base_candidates.into_iter().find(|c| matches!(c.kind, Kind::Base) && c.item_type_id == 0).expect("a base candidate for item 0 exists");
        let after_base = scheme.apply(root, base);
        let next = scheme.insertions(scheme.node(after_base));
        assert!(next.iter().any(|c| matches!(c.kind, Kind::Above { .. })));
    }
}
