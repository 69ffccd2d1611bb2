//! Fields shared by every branching scheme's partial-placement node.
//!
//! Each concrete scheme (`packingsolver_rectangle` and its siblings) wraps
//! [`NodeCommon`] together with its own variant-specific geometric frontier
//! (a skyline, a guillotine cursor, three projected rectangle lists, ...).
//! Keeping the shared accumulators in one place means every scheme updates
//! `item_area`, `waste`, `profit`, and the per-group accumulators the same
//! way, and the iterative-beam-search driver can read them without knowing
//! which concrete frontier it is looking at.

use packingsolver_instance::GroupId;

/// Growth axis of the current bin's strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    /// Strip grows along x.
    #[default]
    X,
    /// Strip grows along y.
    Y,
    /// Strip grows along z (box schemes only).
    Z,
}

/// Per-group running totals needed for unloading-constraint and
/// axle-weight checks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroupAccumulator {
    /// Total weight of items from this group packed in the current bin.
    pub last_bin_weight: f64,
    /// `sum(x_position * weight)` over items from this group in the
    /// current bin, used to derive the weight centroid for axle balancing.
    pub last_bin_weight_weighted_sum: f64,
    /// Minimum x/y coordinate occupied by this group in the current bin.
    pub coordinate_min: f64,
    /// Maximum x/y coordinate occupied by this group in the current bin.
    pub coordinate_max: f64,
    /// Number of items from this group packed so far (any bin).
    pub number_of_items: u64,
    /// Accumulated overweight above the middle axle's limit (soft penalty
    /// until the group is fully packed, a hard constraint after).
    pub middle_axle_overweight: f64,
    /// Accumulated overweight above the rear axle's limit.
    pub rear_axle_overweight: f64,
}

/// A lightweight record of the insertion that produced a node, used to
/// materialize the final solution and to replay "fixed items" roots
///.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InsertionRecord {
    /// Item type placed by this insertion, or `None` for a
    /// cursor-only/defect-skipping insertion.
    pub item_type_id: Option<packingsolver_instance::ItemTypeId>,
    /// Rotation applied to the placed item.
    pub rotation: packingsolver_instance::Rotation,
    /// x-coordinate of the placement.
    pub x: f64,
    /// y-coordinate of the placement.
    pub y: f64,
    /// z-coordinate of the placement (box schemes only; 0.0 otherwise).
    pub z: f64,
    /// Whether this insertion opened a new bin.
    pub new_bin: bool,
}

/// Fields every branching-scheme `Node` carries, independent of its
/// geometric frontier.
#[derive(Clone, Debug, Default)]
pub struct NodeCommon {
    /// Parent node, or `None` at the root.
    pub parent: Option<packingsolver_domination::NodeKey>,
    /// Stable id, monotonically increasing within one search invocation.
    pub id: u64,
    /// Number of items packed so far.
    pub number_of_items: u64,
    /// Number of bins opened so far.
    pub number_of_bins: u64,
    /// Packed copies per item type, indexed by item-type id.
    pub item_number_of_copies: Vec<u64>,
    /// Total area (2D) or volume (3D) of packed items.
    pub item_area_or_volume: f64,
    /// Area/volume of the convex hull of the packed region (i.e. including
    /// waste), across all opened bins.
    pub current_area_or_volume: f64,
    /// `current_area_or_volume - item_area_or_volume`; must stay `>= 0`
    ///.
    pub waste: f64,
    /// Total profit of packed items.
    pub profit: f64,
    /// Per-group accumulators, indexed by group id.
    pub groups: Vec<GroupAccumulator>,
    /// Growth axis of the bin currently being filled.
    pub last_bin_direction: Direction,
    /// The insertion that produced this node from its parent (`None` at the
    /// root).
    pub insertion: Option<InsertionRecord>,
}

impl NodeCommon {
    /// A fresh root node's common fields for an instance with
    /// `number_of_item_types` item types and `number_of_groups` groups.
    #[must_use]
    pub fn root(number_of_item_types: usize, number_of_groups: usize) -> Self {
        Self {
            parent: None,
            id: 0,
            number_of_items: 0,
            number_of_bins: 0,
            item_number_of_copies: vec![0; number_of_item_types],
            item_area_or_volume: 0.0,
            current_area_or_volume: 0.0,
            waste: 0.0,
            profit: 0.0,
            groups: vec![GroupAccumulator::default(); number_of_groups],
            last_bin_direction: Direction::X,
            insertion: None,
        }
    }

    /// Accumulator for a given group id.
    #[must_use]
    pub fn group(&self, id: GroupId) -> &GroupAccumulator {
        &self.groups[id]
    }

    /// Mutable accumulator for a given group id.
    pub fn group_mut(&mut self, id: GroupId) -> &mut GroupAccumulator {
        &mut self.groups[id]
    }

    /// Whether every copy of every item type has been packed (a complete
    /// packing, as opposed to an infeasible dead end with items left over).
    #[must_use]
    pub fn all_items_packed(&self, item_types: &[packingsolver_instance::ItemType]) -> bool {
        item_types.iter().all(|it| {
            it.has_unlimited_copies() || self.item_number_of_copies[it.id()] as i64 >= it.copies()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_zeroed_accumulators() {
        let n = NodeCommon::root(3, 2);
        assert_eq!(n.item_number_of_copies, vec![0, 0, 0]);
        assert_eq!(n.groups.len(), 2);
        assert_eq!(n.waste, 0.0);
    }
}
