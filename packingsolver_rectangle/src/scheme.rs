//! The rectangle (free 2D) branching scheme: skyline insertion enumeration,
//! predecessor dominance, and the objective-dispatched `better`/`bound`
//! pair, wired into [`packingsolver_search::BranchingScheme`].

use std::cmp::Ordering;

use packingsolver_domination::{Arena, NodeKey};
use packingsolver_instance::{Instance, ItemTypeId, Objective, Rotation};
use packingsolver_search::BranchingScheme;
use packingsolver_solution::{Direction, InsertionRecord, NodeCommon, Placement, Solution, SolutionBuilder};

use crate::dominance::{DominanceTables, PredecessorStrategy};
use crate::node::{RectangleHasher, RectangleNode, oriented_bin_size};

/// Tuning knobs for one rectangle-scheme search.
#[derive(Clone, Debug)]
pub struct RectangleParameters {
    /// Predecessor strategy used to build the dominance tables.
    pub predecessor_strategy: PredecessorStrategy,
    /// Whether the staircase rule is enforced (no uncovered segment above
    /// the new item may have a greater `xe` than the new item's `xs`).
    pub staircase: bool,
    /// `x`-cutoff below which insertions are forbidden, used by the
    /// fixed-items replay mode (spec §4.C "Fixed-items mode"). `None`
    /// disables the restriction.
    pub fixed_x_max: Option<f64>,
}

impl Default for RectangleParameters {
    fn default() -> Self {
        Self {
            predecessor_strategy: PredecessorStrategy::ProfitLe,
            staircase: false,
            fixed_x_max: None,
        }
    }
}

/// One candidate insertion produced by [`RectangleScheme::insertions`].
#[derive(Clone, Copy, Debug)]
struct Candidate {
    item_type_id: ItemTypeId,
    rotation: Rotation,
    xs: f64,
    ys: f64,
    w: f64,
    h: f64,
    new_bin: bool,
}

/// The rectangle branching scheme.
pub struct RectangleScheme<'i> {
    instance: &'i Instance,
    arena: Arena<RectangleNode>,
    next_id: u64,
    dominance: DominanceTables,
    objective: Objective,
    params: RectangleParameters,
    root_key: Option<NodeKey>,
}

const MAX_DEFECT_SLIDES: u32 = 16;

impl<'i> RectangleScheme<'i> {
    /// Builds a scheme over `instance` with the given parameters.
    #[must_use]
    pub fn new(instance: &'i Instance, params: RectangleParameters) -> Self {
        let dominance = DominanceTables::build(instance, params.predecessor_strategy);
        Self {
            instance,
            arena: Arena::new(),
            next_id: 1,
            dominance,
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

    fn remaining(&self, node: &RectangleNode, item_type_id: ItemTypeId) -> bool {
        let it = self.instance.item_type(item_type_id);
        it.has_unlimited_copies() || (node.common.item_number_of_copies[item_type_id] as i64) < it.copies()
    }

    /// Whether `rect` overlaps any defect of `bin_type_id`, returning the
    /// defect's right edge if so (used to slide the candidate past it).
    fn first_overlapping_defect_right(&self, bin_type_id: usize, rect: kurbo::Rect) -> Option<f64> {
        self.instance
            .defects_of_bin_type(bin_type_id)
            .find(|d| d.rect_intersects(rect))
            .map(|d| d.rect().x1)
    }

    /// Whether placing a `group_id` item spanning `[ys, ye)` at `xs` would
    /// violate `instance.unloading_constraint()` (spec §4.A/§4.C).
    ///
    /// `OnlyXMovements`/`OnlyYMovements`: any already-placed item whose
    /// skyline segment overlaps the new item's y-range and belongs to an
    /// earlier-unloaded group would block that group's removal once the new
    /// (later-group) item is placed on top of it.
    ///
    /// `IncreasingX`/`IncreasingY`: additionally requires weakly monotone
    /// group coordinates — no later group may already reach further than
    /// `xs`, and no earlier group may already start beyond `xs`. Groups with
    /// no items placed yet (`number_of_items == 0`) don't constrain.
    fn unloading_constraint_violated(&self, node: &RectangleNode, uncovered: &[crate::node::UncoveredItem], group_id: usize, ys: f64, ye: f64, xs: f64) -> bool {
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

    /// Enumerates feasible insertions from `node`. If the current bin
    /// admits none and bin capacity remains, re-enumerates against a fresh
    /// bin's initial skyline (the insertion's `new_bin` flag is then set).
    fn insertions(&self, node: &RectangleNode) -> Vec<Candidate> {
        if node.common.all_items_packed(self.instance.item_types()) {
            return Vec::new();
        }
        let direct = self.insertions_in_bin(node, node.bin_type_id, &node.uncovered_items, node.bin_x, node.bin_y, false);
        if !direct.is_empty() {
            return direct;
        }

        // Current bin is exhausted for every remaining item; try a fresh
        // bin if the instance still has copies to offer.
        let bin_pos = node.common.number_of_bins as usize;
        let expanded = self.instance.bin_type_ids_expanded();
        let next_bin_type_id = if bin_pos < expanded.len() {
            Some(expanded[bin_pos])
        } else {
            expanded.last().copied().filter(|&id| self.instance.bin_type(id).has_unlimited_copies())
        };
        let Some(bin_type_id) = next_bin_type_id else {
            return Vec::new();
        };
        let size = match self.instance.bin_type(bin_type_id).shape().as_rectangle() {
            Some(s) => s,
            None => return Vec::new(),
        };
        let (bin_x, bin_y) = oriented_bin_size(size, node.common.last_bin_direction);
        let fresh = RectangleNode::new_bin(node.common.clone(), bin_type_id, bin_x, bin_y);
        self.insertions_in_bin(node, bin_type_id, &fresh.uncovered_items, bin_x, bin_y, true)
    }

    #[allow(clippy::too_many_arguments)]
    fn insertions_in_bin(
        &self,
        node: &RectangleNode,
        bin_type_id: usize,
        uncovered: &[crate::node::UncoveredItem],
        bin_x: f64,
        bin_y: f64,
        new_bin: bool,
    ) -> Vec<Candidate> {
        let mut out = Vec::new();
        let bin_type = self.instance.bin_type(bin_type_id);

        for item_type in self.instance.item_types() {
            let t = item_type.id();
            if !self.remaining(node, t) {
                continue;
            }
            if self.dominance.is_dominated(t, |i| self.remaining(node, i)) {
                continue;
            }
            let Some(size) = item_type.shape().as_rectangle() else { continue };

            for rotation in item_type.rotations().allowed() {
                let (w, h) = if rotation == Rotation::Xzy {
                    (size.height, size.width)
                } else {
                    (size.width, size.height)
                };

                for (idx, seg) in uncovered.iter().enumerate() {
                    let ys = seg.ys;
                    if ys + h - packingsolver_instance::PSTOL > bin_y {
                        continue;
                    }
                    let xs = uncovered
                        .iter()
                        .filter(|s| s.ys < ys + h && s.ye > ys)
                        .map(|s| s.xe)
                        .fold(0.0_f64, f64::max);

                    if idx > 0 && xs <= uncovered[idx - 1].xs {
                        // Duplicate of a left-flush attempt one segment up.
                        continue;
                    }

                    if self.unloading_constraint_violated(node, uncovered, item_type.group_id(), ys, ys + h, xs) {
                        continue;
                    }

                    let mut xs = xs;
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

                    if let Some(fixed_x_max) = self.params.fixed_x_max {
                        if xs < fixed_x_max {
                            continue;
                        }
                    }

                    if self.params.staircase {
                        let ye = ys + h;
                        if uncovered.iter().any(|s| s.ys >= ye && s.xe > xs) {
                            continue;
                        }
                    }

                    if bin_type.maximum_weight() > 0.0 {
                        let group = node.common.group(item_type.group_id());
                        if group.last_bin_weight + item_type.weight() > bin_type.maximum_weight() * (1.0 + packingsolver_instance::PSTOL) {
                            continue;
                        }
                    }

                    out.push(Candidate {
                        item_type_id: t,
                        rotation,
                        xs,
                        ys,
                        w,
                        h,
                        new_bin,
                    });
                }
            }
        }
        out
    }

    fn apply(&mut self, parent_key: NodeKey, candidate: Candidate) -> NodeKey {
        let parent = self.arena.get(parent_key).expect("parent key must resolve").clone();
        let item_type = self.instance.item_type(candidate.item_type_id);

        let mut child = if candidate.new_bin {
            let size = self
                .instance
                .bin_type(self.next_bin_type_for(&parent))
                .shape()
                .as_rectangle()
                .expect("rectangle scheme only opens rectangle bins");
            let (bin_x, bin_y) = oriented_bin_size(size, parent.common.last_bin_direction);
            let mut common = parent.common.clone();
            common.number_of_bins += 1;
            RectangleNode::new_bin(common, self.next_bin_type_for(&parent), bin_x, bin_y)
        } else {
            parent.clone()
        };

        child.splice(candidate.item_type_id, candidate.xs, candidate.xs + candidate.w, candidate.ys, candidate.ys + candidate.h);

        child.common.parent = Some(parent_key);
        child.common.id = self.next_id();
        child.common.number_of_items += 1;
        child.common.item_number_of_copies[candidate.item_type_id] += 1;
        child.common.item_area_or_volume += item_type.area_or_volume();
        child.common.profit += item_type.profit();

        let bin_pos = child.common.number_of_bins.saturating_sub(1) as usize;
        let previous_area = self.instance.previous_bin_area_or_volume(bin_pos);
        child.common.current_area_or_volume = previous_area + child.filled_x_extent() * child.bin_y;
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
            z: 0.0,
            new_bin: candidate.new_bin,
        });

        self.arena.insert(child)
    }

    fn next_bin_type_for(&self, parent: &RectangleNode) -> usize {
        let bin_pos = parent.common.number_of_bins as usize;
        let expanded = self.instance.bin_type_ids_expanded();
        if bin_pos < expanded.len() {
            expanded[bin_pos]
        } else {
            expanded.last().copied().unwrap_or(parent.bin_type_id)
        }
    }
}

impl<'i> BranchingScheme<'i> for RectangleScheme<'i> {
    type Node = RectangleNode;
    type Hasher = RectangleHasher;

    fn root(&mut self) -> NodeKey {
        if let Some(key) = self.root_key {
            return key;
        }
        let bin_type_id = self.instance.bin_type_ids_expanded().first().copied().unwrap_or(0);
        let size = self
            .instance
            .bin_type(bin_type_id)
            .shape()
            .as_rectangle()
            .expect("rectangle scheme requires rectangle bins");
        let mut common = NodeCommon::root(self.instance.number_of_item_types(), self.instance.number_of_groups());
        common.number_of_bins = 1;
        let (bin_x, bin_y) = oriented_bin_size(size, Direction::X);
        common.current_area_or_volume = bin_x * bin_y;
        let root = RectangleNode::new_bin(common, bin_type_id, bin_x, bin_y);
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
        tracing::trace!(parent = ?key, candidates = candidates.len(), "expanding rectangle node");
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
                let remaining_area = self.instance.item_area_or_volume() - node.common.item_area_or_volume;
                let efficiency = self
                    .instance
                    .largest_efficiency_item_type()
                    .map(|t| self.instance.item_type(t).efficiency())
                    .unwrap_or(0.0);
                node.common.profit + remaining_area.max(0.0) * efficiency < incumbent.profit()
            }
            Objective::BinPacking | Objective::VariableSizedBinPacking => {
                let remaining_area = self.instance.item_area_or_volume() - node.common.item_area_or_volume;
                let bin_area = self.instance.bin_type(node.bin_type_id).shape().area_or_volume();
                let extra_bins = if bin_area > 0.0 { (remaining_area / bin_area).ceil().max(0.0) } else { 0.0 };
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
            let n = self.node(k);
            chain.push(k);
            cursor = n.common.parent;
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
                    Placement::Rect { x: insertion.x, y: insertion.y },
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
        RectangleHasher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packingsolver_instance::{InstanceBuilder, RotationMask, Size, Trims};

    fn two_square_instance() -> Instance {
        let mut b = InstanceBuilder::new();
        b.add_rectangle_item_type(Size::new(4.0, 4.0), RotationMask::FREE_2D, 2, None, 0.0, 0).unwrap();
        b.add_rectangle_bin_type(Size::new(10.0, 10.0), None, packingsolver_instance::UNLIMITED_COPIES, 0, Trims::default()).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn root_opens_first_bin() {
        let inst = two_square_instance();
        let mut scheme = RectangleScheme::new(&inst, RectangleParameters::default());
        let root = scheme.root();
        assert_eq!(scheme.node(root).common.number_of_bins, 1);
        assert!(!scheme.leaf(root));
    }

    #[test]
    fn children_enumerates_both_squares() {
        let inst = two_square_instance();
        let mut scheme = RectangleScheme::new(&inst, RectangleParameters::default());
        let root = scheme.root();
        let kids = scheme.children(root);
        assert!(!kids.is_empty());
        for k in &kids {
            assert_eq!(scheme.depth(*k), 1);
        }
    }

    #[test]
    fn full_packing_reaches_a_leaf() {
        let inst = two_square_instance();
        let mut scheme = RectangleScheme::new(&inst, RectangleParameters::default());
        let root = scheme.root();
        let mut frontier = vec![root];
        let mut found_leaf = false;
        for _ in 0..4 {
            let mut next = Vec::new();
            for n in frontier {
                for c in scheme.children(n) {
                    if scheme.leaf(c) {
                        found_leaf = true;
                    }
                    next.push(c);
                }
            }
            frontier = next;
            if found_leaf {
                break;
            }
        }
        assert!(found_leaf);
    }
}
