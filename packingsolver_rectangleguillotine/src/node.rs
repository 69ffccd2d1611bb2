//! The staged-cut cursor: the rectangle-guillotine scheme's frontier.

use packingsolver_instance::{BinTypeId, ItemTypeId, Rotation};
use packingsolver_solution::{Direction, NodeCommon};

/// Which transition produced a node, tagging the depth the insertion
/// advances: `-2`/`-1` open a new bin, `0` starts a new 1-cut, `1` starts a
/// new 2-cut, `2` extends the current 3-cut column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Df {
    NewBinHorizontal,
    NewBinVertical,
    FirstStage,
    SecondStage,
    ThirdStage,
}

impl Df {
    #[must_use]
    pub fn opens_new_bin(self) -> bool {
        matches!(self, Self::NewBinHorizontal | Self::NewBinVertical)
    }
}

/// Exactness flag for a cursor coordinate: whether a cut may still slide
/// (`Free`), has been pushed to the minimum-waste distance and may still
/// slide further (`MinimumWaste`), or is pinned (`Exact`, e.g. at the bin
/// edge or a hard trim).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Exactness {
    #[default]
    Free,
    MinimumWaste,
    Exact,
}

/// A rectangle-guillotine partial-placement node.
#[derive(Clone, Debug)]
pub struct GuillotineNode {
    pub common: NodeCommon,
    pub bin_type_id: BinTypeId,
    pub first_stage_orientation: Direction,
    /// Start / current right edge of the active 1st-stage strip.
    pub x1_prev: f64,
    pub x1_curr: f64,
    /// Start / current top edge of the active 2nd-stage slice.
    pub y2_prev: f64,
    pub y2_curr: f64,
    /// Current right edge of the active 3rd-stage column cursor.
    pub x3_curr: f64,
    /// Bin edges the cursor may not cross (bin width/height minus trims).
    pub x1_max: f64,
    pub y2_max: f64,
    pub z1: Exactness,
    pub z2: Exactness,
    pub subplate1curr_number_of_2_cuts: u32,
    pub subplate2curr_items_above_defect: u32,
    /// Transition that produced this node, and the item(s) it placed, kept
    /// for [`crate::scheme::GuillotineScheme::to_solution`] replay.
    pub df: Option<Df>,
    pub placed_items: smallvec::SmallVec<[(ItemTypeId, Rotation); 2]>,
}

impl GuillotineNode {
    /// A fresh bin, cursor parked at its left/bottom trim with nothing cut
    /// yet.
    #[must_use]
    pub fn new_bin(
        common: NodeCommon,
        bin_type_id: BinTypeId,
        first_stage_orientation: Direction,
        x1_max: f64,
        y2_max: f64,
        x_origin: f64,
        y_origin: f64,
    ) -> Self {
        Self {
            common,
            bin_type_id,
            first_stage_orientation,
            x1_prev: x_origin,
            x1_curr: x_origin,
            y2_prev: y_origin,
            y2_curr: y_origin,
            x3_curr: x_origin,
            x1_max,
            y2_max,
            z1: Exactness::Free,
            z2: Exactness::Free,
            subplate1curr_number_of_2_cuts: 0,
            subplate2curr_items_above_defect: 0,
            df: None,
            placed_items: smallvec::SmallVec::new(),
        }
    }
}

/// Frontier-equality hasher over the cursor state only.
#[derive(Clone, Copy, Debug, Default)]
pub struct GuillotineHasher;

impl packingsolver_domination::NodeHasher<GuillotineNode> for GuillotineHasher {
    fn frontier_hash(&self, node: &GuillotineNode) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        node.common.number_of_bins.hash(&mut hasher);
        node.x1_prev.to_bits().hash(&mut hasher);
        node.x1_curr.to_bits().hash(&mut hasher);
        node.y2_prev.to_bits().hash(&mut hasher);
        node.y2_curr.to_bits().hash(&mut hasher);
        node.x3_curr.to_bits().hash(&mut hasher);
        hasher.finish()
    }

    fn frontier_eq(&self, a: &GuillotineNode, b: &GuillotineNode) -> bool {
        let eq = |x: f64, y: f64| (x - y).abs() < packingsolver_instance::PSTOL;
        a.common.number_of_bins == b.common.number_of_bins
            && eq(a.x1_prev, b.x1_prev)
            && eq(a.x1_curr, b.x1_curr)
            && eq(a.y2_prev, b.y2_prev)
            && eq(a.y2_curr, b.y2_curr)
            && eq(a.x3_curr, b.x3_curr)
    }
}
