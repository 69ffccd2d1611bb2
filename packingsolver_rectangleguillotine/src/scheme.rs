//! The rectangle-guillotine branching scheme: the staged-cut cursor state
//! machine of spec.md §4.D, wired into
//! [`packingsolver_search::BranchingScheme`].

use std::cmp::Ordering;

use packingsolver_domination::{Arena, NodeKey};
use packingsolver_instance::{Instance, ItemTypeId, Objective, Rotation};
use packingsolver_search::BranchingScheme;
use packingsolver_solution::{Direction, NodeCommon, Solution, SolutionBuilder};

use crate::node::{Df, Exactness, GuillotineHasher, GuillotineNode};

/// Tuning knobs for one rectangle-guillotine search.
#[derive(Clone, Debug)]
pub struct GuillotineParameters {
    /// 2-staged or 3-staged guillotine cut patterns.
    pub number_of_stages: u8,
    /// Minimum distance between consecutive 1-cuts (strip widths).
    pub minimum_distance_1_cuts: f64,
    /// Maximum distance between consecutive 1-cuts.
    pub maximum_distance_1_cuts: f64,
    /// Minimum distance between consecutive 2-cuts (slice heights).
    pub minimum_distance_2_cuts: f64,
    /// Maximum number of 2-cuts per 1-cut strip.
    pub maximum_number_2_cuts: u32,
    /// Minimum waste length: a cut closer than this to the previous one is
    /// pushed out to meet it exactly.
    pub minimum_waste_length: f64,
    /// Kerf width consumed by each cut.
    pub cut_thickness: f64,
    /// Whether the two-item ("Roadef2018") insertion variant is enabled.
    pub allow_two_item_variant: bool,
}

impl Default for GuillotineParameters {
    fn default() -> Self {
        Self {
            number_of_stages: 3,
            minimum_distance_1_cuts: 0.0,
            maximum_distance_1_cuts: f64::MAX,
            minimum_distance_2_cuts: 0.0,
            maximum_number_2_cuts: u32::MAX,
            minimum_waste_length: 0.0,
            cut_thickness: 0.0,
            allow_two_item_variant: true,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct PlacedItem {
    item_type_id: ItemTypeId,
    rotation: Rotation,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

#[derive(Clone, Debug)]
struct Candidate {
    df: Df,
    items: smallvec::SmallVec<[PlacedItem; 2]>,
    x1_prev: f64,
    x1_curr: f64,
    y2_prev: f64,
    y2_curr: f64,
    x3_curr: f64,
}

/// The rectangle-guillotine branching scheme.
pub struct GuillotineScheme<'i> {
    instance: &'i Instance,
    arena: Arena<GuillotineNode>,
    next_id: u64,
    objective: Objective,
    params: GuillotineParameters,
    root_key: Option<NodeKey>,
}

const MAX_DEFECT_SLIDES: u32 = 16;

impl<'i> GuillotineScheme<'i> {
    #[must_use]
    pub fn new(instance: &'i Instance, params: GuillotineParameters) -> Self {
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

    fn remaining(&self, node: &GuillotineNode, t: ItemTypeId) -> bool {
        let it = self.instance.item_type(t);
        it.has_unlimited_copies() || (node.common.item_number_of_copies[t] as i64) < it.copies()
    }

    fn right_trim_effective(&self, bin_type_id: usize) -> f64 {
        let t = self.instance.bin_type(bin_type_id).trims().right;
        if matches!(t.kind, packingsolver_instance::TrimKind::Hard) { t.width } else { 0.0 }
    }

    fn top_trim_effective(&self, bin_type_id: usize) -> f64 {
        let t = self.instance.bin_type(bin_type_id).trims().top;
        if matches!(t.kind, packingsolver_instance::TrimKind::Hard) { t.width } else { 0.0 }
    }

    fn defect_slide(&self, bin_type_id: usize, rect: &mut kurbo::Rect, axis_mut: &mut f64, horizontal: bool) -> bool {
        for _ in 0..MAX_DEFECT_SLIDES {
            let overlap = self.instance.defects_of_bin_type(bin_type_id).find(|d| d.rect_intersects(*rect));
            let Some(d) = overlap else { return true };
            let dr = d.rect();
            let shift = if horizontal { dr.x1 - rect.x0 } else { dr.y1 - rect.y0 };
            *axis_mut += shift;
            if horizontal {
                *rect = kurbo::Rect::new(rect.x0 + shift, rect.y0, rect.x1 + shift, rect.y1);
            } else {
                *rect = kurbo::Rect::new(rect.x0, rect.y0 + shift, rect.x1, rect.y1 + shift);
            }
        }
        false
    }

    /// Enumerates every feasible single-item insertion from `node`, for
    /// `df in {FirstStage, SecondStage, ThirdStage}`.
    fn insertions_single(&self, node: &GuillotineNode) -> Vec<Candidate> {
        let mut out = Vec::new();
        let bin_type_id = node.bin_type_id;
        let bin_type = self.instance.bin_type(bin_type_id);
        let started_first_stage = node.x1_curr > node.x1_prev || node.y2_curr > node.y2_prev;

        for item_type in self.instance.item_types() {
            let t = item_type.id();
            if !self.remaining(node, t) {
                continue;
            }
            let Some(size) = item_type.shape().as_rectangle() else { continue };

            for rotation in item_type.rotations().allowed() {
                let (w, h) = if rotation == Rotation::Xzy { (size.height, size.width) } else { (size.width, size.height) };

                for df in [Df::FirstStage, Df::SecondStage, Df::ThirdStage] {
                    if df == Df::ThirdStage && self.params.number_of_stages == 2 {
                        continue;
                    }
                    if df == Df::FirstStage && self.params.number_of_stages == 2 && started_first_stage {
                        // A 2-staged pattern makes exactly one 1-cut per bin.
                        continue;
                    }

                    let (mut x1_prev, mut y2_prev) = match df {
                        Df::FirstStage => (node.x1_curr + self.params.cut_thickness, self.bin_origin_y(bin_type_id)),
                        Df::SecondStage => (node.x1_prev, node.y2_curr + self.params.cut_thickness),
                        Df::ThirdStage => (node.x1_prev, node.y2_prev),
                        Df::NewBinHorizontal | Df::NewBinVertical => unreachable!(),
                    };
                    let x_start = if df == Df::ThirdStage { node.x3_curr + self.params.cut_thickness } else { x1_prev };

                    let mut rect = kurbo::Rect::new(x_start, y2_prev, x_start + w, y2_prev + h);
                    let mut x_shift_accum = x_start;
                    let slide_ok = if bin_type.cut_through_defects() {
                        true
                    } else if df == Df::SecondStage {
                        self.defect_slide(bin_type_id, &mut rect, &mut y2_prev, false)
                    } else {
                        self.defect_slide(bin_type_id, &mut rect, &mut x_shift_accum, true)
                    };
                    if !slide_ok {
                        continue;
                    }
                    let x_start = rect.x0;
                    if df != Df::ThirdStage {
                        x1_prev = x_start;
                    }
                    y2_prev = rect.y0;

                    if x_start + w - packingsolver_instance::PSTOL > node.x1_max {
                        continue;
                    }
                    if y2_prev + h - packingsolver_instance::PSTOL > node.y2_max {
                        continue;
                    }

                    let new_x1_curr = match df {
                        Df::FirstStage => x_start + w,
                        Df::SecondStage | Df::ThirdStage => node.x1_curr.max(x_start + w),
                        _ => unreachable!(),
                    };
                    let new_y2_curr = match df {
                        Df::FirstStage | Df::SecondStage => y2_prev + h,
                        Df::ThirdStage => node.y2_curr.max(y2_prev + h),
                        _ => unreachable!(),
                    };

                    match df {
                        Df::FirstStage => {
                            let strip_width = new_x1_curr - x1_prev;
                            if strip_width + packingsolver_instance::PSTOL < self.params.minimum_distance_1_cuts {
                                continue;
                            }
                            if strip_width - packingsolver_instance::PSTOL > self.params.maximum_distance_1_cuts {
                                continue;
                            }
                        }
                        Df::SecondStage => {
                            let slice_height = new_y2_curr - y2_prev;
                            if slice_height + packingsolver_instance::PSTOL < self.params.minimum_distance_2_cuts {
                                continue;
                            }
                            if node.subplate1curr_number_of_2_cuts + 1 > self.params.maximum_number_2_cuts {
                                continue;
                            }
                        }
                        Df::ThirdStage => {}
                        _ => unreachable!(),
                    }

                    if bin_type.maximum_weight() > 0.0 {
                        let group = node.common.group(item_type.group_id());
                        if group.last_bin_weight + item_type.weight() > bin_type.maximum_weight() * (1.0 + packingsolver_instance::PSTOL) {
                            continue;
                        }
                    }

                    let mut items = smallvec::SmallVec::new();
                    items.push(PlacedItem { item_type_id: t, rotation, x: x_start, y: y2_prev, w, h });
                    out.push(Candidate {
                        df,
                        items,
                        x1_prev,
                        x1_curr: new_x1_curr,
                        y2_prev,
                        y2_curr: new_y2_curr,
                        x3_curr: x_start + w,
                    });
                }
            }
        }

        if self.params.allow_two_item_variant {
            out.extend(self.insertions_two_item(node));
        }
        filter_dominated(out)
    }

    fn bin_origin_y(&self, bin_type_id: usize) -> f64 {
        self.instance.bin_type(bin_type_id).trims().bottom.width
    }

    /// The two-item ("Roadef2018") variant: two items of matching width
    /// stacked in the same 3-cut column, advancing search depth by two in
    /// one insertion.
    fn insertions_two_item(&self, node: &GuillotineNode) -> Vec<Candidate> {
        let mut out = Vec::new();
        let item_types: Vec<_> = self.instance.item_types().iter().filter(|it| it.shape().as_rectangle().is_some()).collect();
        for a in &item_types {
            if !self.remaining(node, a.id()) {
                continue;
            }
            let Some(sa) = a.shape().as_rectangle() else { continue };
            for b in &item_types {
                if b.id() == a.id() && !self.remaining(node, b.id()) {
                    continue;
                }
                if !self.remaining(node, b.id()) {
                    continue;
                }
                let Some(sb) = b.shape().as_rectangle() else { continue };
                if (sa.width - sb.width).abs() > packingsolver_instance::PSTOL {
                    continue;
                }
                let w = sa.width;
                let x_start = node.x1_prev;
                let y_start = node.y2_prev;
                if x_start + w - packingsolver_instance::PSTOL > node.x1_max {
                    continue;
                }
                if y_start + sa.height + sb.height - packingsolver_instance::PSTOL > node.y2_max {
                    continue;
                }
                let mut items = smallvec::SmallVec::new();
                items.push(PlacedItem { item_type_id: a.id(), rotation: Rotation::Xyz, x: x_start, y: y_start, w, h: sa.height });
                items.push(PlacedItem { item_type_id: b.id(), rotation: Rotation::Xyz, x: x_start, y: y_start + sa.height, w, h: sb.height });
                out.push(Candidate {
                    df: Df::SecondStage,
                    items,
                    x1_prev: x_start,
                    x1_curr: node.x1_curr.max(x_start + w),
                    y2_prev: y_start,
                    y2_curr: y_start + sa.height + sb.height,
                    x3_curr: x_start + w,
                });
            }
        }
        out
    }

    /// Enumerates feasible insertions from `node`, returning the candidates
    /// together with whether they belong to a freshly opened bin (the
    /// current bin admitting nothing and capacity remaining).
    fn insertions(&self, node: &GuillotineNode) -> (Vec<Candidate>, bool) {
        if node.common.all_items_packed(self.instance.item_types()) {
            return (Vec::new(), false);
        }
        let single = self.insertions_single(node);
        if !single.is_empty() {
            return (single, false);
        }
        let bin_pos = node.common.number_of_bins as usize;
        let expanded = self.instance.bin_type_ids_expanded();
        let next_bin_type_id = if bin_pos < expanded.len() {
            Some(expanded[bin_pos])
        } else {
            expanded.last().copied().filter(|&id| self.instance.bin_type(id).has_unlimited_copies())
        };
        let Some(bin_type_id) = next_bin_type_id else { return (Vec::new(), false) };
        let Some(size) = self.instance.bin_type(bin_type_id).shape().as_rectangle() else { return (Vec::new(), false) };
        let (bx, by) = (size.width, size.height);
        let x_origin = self.instance.bin_type(bin_type_id).trims().left.width;
        let y_origin = self.instance.bin_type(bin_type_id).trims().bottom.width;
        let x1_max = bx - self.right_trim_effective(bin_type_id);
        let y2_max = by - self.top_trim_effective(bin_type_id);
        let fresh = GuillotineNode::new_bin(node.common.clone(), bin_type_id, node.common.last_bin_direction, x1_max, y2_max, x_origin, y_origin);
        (self.insertions_single(&fresh), true)
    }

    fn apply(&mut self, parent_key: NodeKey, candidate: Candidate, new_bin: bool) -> NodeKey {
        let parent = self.node(parent_key).clone();
        let mut child = if new_bin {
            let bin_pos = parent.common.number_of_bins as usize;
            let expanded = self.instance.bin_type_ids_expanded();
            let bin_type_id = if bin_pos < expanded.len() { expanded[bin_pos] } else { expanded.last().copied().unwrap_or(parent.bin_type_id) };
            let size = self.instance.bin_type(bin_type_id).shape().as_rectangle().expect("rectangle bin");
            let x_origin = self.instance.bin_type(bin_type_id).trims().left.width;
            let y_origin = self.instance.bin_type(bin_type_id).trims().bottom.width;
            let x1_max = size.width - self.right_trim_effective(bin_type_id);
            let y2_max = size.height - self.top_trim_effective(bin_type_id);
            let mut common = parent.common.clone();
            common.number_of_bins += 1;
            GuillotineNode::new_bin(common, bin_type_id, parent.common.last_bin_direction, x1_max, y2_max, x_origin, y_origin)
        } else {
            parent.clone()
        };

        child.common.parent = Some(parent_key);
        child.common.id = self.next_id();
        child.x1_prev = candidate.x1_prev;
        child.x1_curr = candidate.x1_curr;
        child.y2_prev = candidate.y2_prev;
        child.y2_curr = candidate.y2_curr;
        child.x3_curr = candidate.x3_curr;
        child.df = Some(candidate.df);
        child.placed_items = candidate.items.iter().map(|p| (p.item_type_id, p.rotation)).collect();
        child.subplate1curr_number_of_2_cuts = match candidate.df {
            Df::FirstStage => 1,
            Df::SecondStage => parent.subplate1curr_number_of_2_cuts + 1,
            _ => parent.subplate1curr_number_of_2_cuts,
        };
        child.z1 = Exactness::Free;
        child.z2 = Exactness::Free;

        for placed in &candidate.items {
            let item_type = self.instance.item_type(placed.item_type_id);
            child.common.number_of_items += 1;
            child.common.item_number_of_copies[placed.item_type_id] += 1;
            child.common.item_area_or_volume += item_type.area_or_volume();
            child.common.profit += item_type.profit();
            let group_id = item_type.group_id();
            let weight = item_type.weight();
            let centroid = placed.x + placed.w / 2.0;
            let group = child.common.group_mut(group_id);
            group.last_bin_weight += weight;
            group.last_bin_weight_weighted_sum += centroid * weight;
            group.coordinate_min = if group.number_of_items == 0 { placed.x } else { group.coordinate_min.min(placed.x) };
            group.coordinate_max = group.coordinate_max.max(placed.x + placed.w);
            group.number_of_items += 1;
        }

        let bin_pos = child.common.number_of_bins.saturating_sub(1) as usize;
        let previous_area = self.instance.previous_bin_area_or_volume(bin_pos);
        let bin_area = self.instance.bin_type(child.bin_type_id).shape().area_or_volume();
        let filled_fraction = if child.x1_max > 0.0 && child.y2_max > 0.0 {
            (child.x1_curr.max(child.x3_curr) / child.x1_max).min(1.0)
        } else {
            0.0
        };
        child.common.current_area_or_volume = previous_area + bin_area * filled_fraction;
        child.common.waste = (child.common.current_area_or_volume - child.common.item_area_or_volume).max(0.0);

        self.arena.insert(child)
    }
}

fn filter_dominated(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    // Front = (x1_prev, x3_curr, x1_curr, y2_prev, y2_curr); drop any
    // candidate for the same item set that is component-wise dominated by
    // another (smaller is better on every coordinate).
    let mut keep = vec![true; candidates.len()];
    for i in 0..candidates.len() {
        if !keep[i] {
            continue;
        }
        for j in 0..candidates.len() {
            if i == j || !keep[j] {
                continue;
            }
            let same_items = candidates[i].items.iter().map(|p| p.item_type_id).collect::<Vec<_>>()
                == candidates[j].items.iter().map(|p| p.item_type_id).collect::<Vec<_>>();
            if !same_items {
                continue;
            }
            let a = &candidates[j];
            let b = &candidates[i];
            let dominates = a.x1_prev <= b.x1_prev
                && a.x3_curr <= b.x3_curr
                && a.x1_curr <= b.x1_curr
                && a.y2_prev <= b.y2_prev
                && a.y2_curr <= b.y2_curr
                && (a.x1_prev < b.x1_prev || a.x3_curr < b.x3_curr || a.x1_curr < b.x1_curr || a.y2_prev < b.y2_prev || a.y2_curr < b.y2_curr);
            if dominates {
                keep[i] = false;
                break;
            }
        }
    }
    candidates = candidates.into_iter().zip(keep).filter(|(_, k)| *k).map(|(c, _)| c).collect();
    candidates
}

impl<'i> BranchingScheme<'i> for GuillotineScheme<'i> {
    type Node = GuillotineNode;
    type Hasher = GuillotineHasher;

    fn root(&mut self) -> NodeKey {
        if let Some(key) = self.root_key {
            return key;
        }
        let bin_type_id = self.instance.bin_type_ids_expanded().first().copied().unwrap_or(0);
        let bin_type = self.instance.bin_type(bin_type_id);
        let size = bin_type.shape().as_rectangle().expect("guillotine scheme requires rectangle bins");
        let mut common = NodeCommon::root(self.instance.number_of_item_types(), self.instance.number_of_groups());
        common.number_of_bins = 1;
        common.current_area_or_volume = size.width * size.height;
        let x_origin = bin_type.trims().left.width;
        let y_origin = bin_type.trims().bottom.width;
        let x1_max = size.width - self.right_trim_effective(bin_type_id);
        let y2_max = size.height - self.top_trim_effective(bin_type_id);
        let root = GuillotineNode::new_bin(common, bin_type_id, Direction::X, x1_max, y2_max, x_origin, y_origin);
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
        let (candidates, new_bin) = self.insertions(&node);
        tracing::trace!(parent = ?key, candidates = candidates.len(), new_bin, "expanding guillotine node");
        candidates.into_iter().map(|c| self.apply(key, c, new_bin)).collect()
    }

    fn leaf(&self, key: NodeKey) -> bool {
        let node = self.node(key);
        node.common.all_items_packed(self.instance.item_types()) || self.insertions(node).0.is_empty()
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
                node.common.number_of_bins > incumbent.number_of_bins() as u64
            }
            Objective::BinPackingWithLeftovers => node.common.waste >= incumbent.waste() && node.common.number_of_bins >= incumbent.number_of_bins() as u64,
            Objective::OpenDimensionX | Objective::OpenDimensionY | Objective::OpenDimensionZ => {
                node.x1_curr.max(node.x3_curr) >= incumbent.x_extent()
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
            Objective::BinPacking | Objective::VariableSizedBinPacking | Objective::BinPackingWithLeftovers => {
                a.common.number_of_bins.cmp(&b.common.number_of_bins).then_with(|| a.common.waste.partial_cmp(&b.common.waste).unwrap_or(Ordering::Equal))
            }
            Objective::OpenDimensionX | Objective::OpenDimensionY | Objective::OpenDimensionZ => {
                a.x1_curr.partial_cmp(&b.x1_curr).unwrap_or(Ordering::Equal)
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
        let mut last_bin_type = None;
        for k in &chain {
            let n = self.node(*k);
            let Some(df) = n.df else { continue };
            if bin_pos.is_none() || last_bin_type != Some(n.bin_type_id) {
                bin_pos = Some(sb.add_bin(n.bin_type_id, n.first_stage_orientation));
                last_bin_type = Some(n.bin_type_id);
            }
            let pos = bin_pos.expect("bin opened before first cut");
            if matches!(df, Df::FirstStage) {
                sb.add_node(pos, 0, n.x1_curr);
            }
            if matches!(df, Df::FirstStage | Df::SecondStage) {
                sb.add_node(pos, 1, n.y2_curr);
            }
            for (item_type_id, _rotation) in &n.placed_items {
                sb.add_node(pos, 2, n.x3_curr);
                sb.set_last_node_item(*item_type_id);
            }
        }
        let node = self.node(key);
        sb.set_current_area_or_volume(node.common.current_area_or_volume);
        sb.finish()
    }

    fn node_hasher(&self) -> Self::Hasher {
        GuillotineHasher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packingsolver_instance::{InstanceBuilder, RotationMask, Size, Trims};

    fn two_panel_instance() -> Instance {
        let mut b = InstanceBuilder::new();
        b.add_rectangle_item_type(Size::new(3000.0, 3210.0), RotationMask::CANONICAL_ONLY, 1, None, 0.0, 0).unwrap();
        b.add_rectangle_item_type(Size::new(3000.0, 500.0), RotationMask::CANONICAL_ONLY, 1, None, 0.0, 0).unwrap();
        b.add_rectangle_bin_type(Size::new(6000.0, 3210.0), None, 1, 0, Trims::default()).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn root_parks_cursor_at_origin() {
        let inst = two_panel_instance();
        let mut scheme = GuillotineScheme::new(&inst, GuillotineParameters::default());
        let root = scheme.root();
        let node = scheme.node(root);
        assert_eq!(node.x1_prev, 0.0);
        assert_eq!(node.y2_prev, 0.0);
    }

    #[test]
    fn two_panels_are_insertable() {
        let inst = two_panel_instance();
        let mut scheme = GuillotineScheme::new(&inst, GuillotineParameters::default());
        let root = scheme.root();
        let kids = scheme.children(root);
        assert!(!kids.is_empty());
    }
}
