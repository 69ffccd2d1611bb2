//! Finished and in-progress placements.

use packingsolver_instance::{BinTypeId, Instance, ItemTypeId, Rotation};

use crate::node::Direction;

/// Where a placed item sits. Rectangle/box schemes record a point
/// directly; rectangle-guillotine records a leaf in the cut tree instead
/// (see [`CutNode`]) and attaches the item type to that leaf.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// 2D position (rectangle, box-stacks skyline placements).
    Rect { x: f64, y: f64 },
    /// 3D position (box scheme).
    Box { x: f64, y: f64, z: f64 },
    /// A leaf of the rectangle-guillotine cut tree, identified by index
    /// into [`Solution::cut_tree`].
    GuillotineLeaf { node_index: usize },
}

/// One placed item copy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedItem {
    /// Index into [`Solution::bins`].
    pub bin_pos: usize,
    /// Which item type was placed.
    pub item_type_id: ItemTypeId,
    /// Where it was placed.
    pub placement: Placement,
    /// Orientation it was placed in.
    pub rotation: Rotation,
    /// Stack it belongs to (box-stacks only).
    pub stack_id: Option<usize>,
}

/// One opened bin instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinInstance {
    /// Which bin type this is a copy of.
    pub bin_type_id: BinTypeId,
    /// The axis the bin's strip grows along.
    pub cut_orientation: Direction,
}

/// A node of the rectangle-guillotine cut tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CutNode {
    /// Bin this node belongs to.
    pub bin_pos: usize,
    /// Cut stage: 0 = first-stage (1-cut), 1 = second-stage (2-cut),
    /// 2 = third-stage (3-cut).
    pub depth: u32,
    /// Position of the cut along the strip axis for this node's stage.
    pub cut_position: f64,
    /// The item type attached to this node, if it is a leaf.
    pub item_type_id: Option<ItemTypeId>,
}

/// A box-stacks stack: a vertical column of items sharing an x/y
/// footprint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stack {
    /// Bin this stack belongs to.
    pub bin_pos: usize,
    /// Footprint along x.
    pub x_range: (f64, f64),
    /// Footprint along y.
    pub y_range: (f64, f64),
}

/// A finished or in-progress placement.
///
/// Derived quantities (area/volume, waste, extents, per-group weights, axle
/// loads) are recomputed incrementally as items are added by
/// [`SolutionBuilder`]; `Solution` itself exposes only read accessors, so a
/// finished solution is always internally consistent with what was built.
#[derive(Clone, Debug)]
pub struct Solution<'i> {
    pub(crate) instance: &'i Instance,
    pub(crate) bins: Vec<BinInstance>,
    pub(crate) items: Vec<PlacedItem>,
    pub(crate) cut_tree: Vec<CutNode>,
    pub(crate) stacks: Vec<Stack>,
    pub(crate) item_area_or_volume: f64,
    pub(crate) current_area_or_volume: f64,
    pub(crate) profit: f64,
}

impl<'i> Solution<'i> {
    /// The instance this solution packs.
    #[must_use]
    pub fn instance(&self) -> &'i Instance {
        self.instance
    }

    /// Opened bins, in the order they were added.
    #[must_use]
    pub fn bins(&self) -> &[BinInstance] {
        &self.bins
    }

    /// Placed items.
    #[must_use]
    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    /// Rectangle-guillotine cut tree rows.
    #[must_use]
    pub fn cut_tree(&self) -> &[CutNode] {
        &self.cut_tree
    }

    /// Box-stacks stacks.
    #[must_use]
    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    /// Number of opened bins.
    #[must_use]
    pub fn number_of_bins(&self) -> usize {
        self.bins.len()
    }

    /// Number of placed item copies.
    #[must_use]
    pub fn number_of_items(&self) -> usize {
        self.items.len()
    }

    /// Total area/volume of packed items.
    #[must_use]
    pub fn item_area_or_volume(&self) -> f64 {
        self.item_area_or_volume
    }

    /// `current_area_or_volume - item_area_or_volume`.
    #[must_use]
    pub fn waste(&self) -> f64 {
        self.current_area_or_volume - self.item_area_or_volume
    }

    /// Total profit of packed items.
    #[must_use]
    pub fn profit(&self) -> f64 {
        self.profit
    }

    /// Whether every item type has had all its copies packed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.instance.item_types().iter().all(|it| {
            if it.has_unlimited_copies() {
                return true;
            }
            let packed = self
                .items
                .iter()
                .filter(|p| p.item_type_id == it.id())
                .count() as i64;
            packed >= it.copies()
        })
    }

    /// The bounding x-extent across every placed item (used by the
    /// `OpenDimensionX` objective).
    #[must_use]
    pub fn x_extent(&self) -> f64 {
        self.items
            .iter()
            .map(|p| match p.placement {
                Placement::Rect { x, .. } | Placement::Box { x, .. } => x,
                Placement::GuillotineLeaf { node_index } => self.cut_tree[node_index].cut_position,
            })
            .fold(0.0_f64, f64::max)
    }
}

/// Append-only builder for a [`Solution`]. All derived
/// quantities are recomputed on every `add_*` call so a partially built
/// solution is always queryable.
#[derive(Clone, Debug)]
pub struct SolutionBuilder<'i> {
    solution: Solution<'i>,
}

impl<'i> SolutionBuilder<'i> {
    /// Starts an empty solution for the given instance.
    #[must_use]
    pub fn new(instance: &'i Instance) -> Self {
        Self {
            solution: Solution {
                instance,
                bins: Vec::new(),
                items: Vec::new(),
                cut_tree: Vec::new(),
                stacks: Vec::new(),
                item_area_or_volume: 0.0,
                current_area_or_volume: 0.0,
                profit: 0.0,
            },
        }
    }

    /// Opens a new bin. Returns its position (index into
    /// [`Solution::bins`]).
    pub fn add_bin(&mut self, bin_type_id: BinTypeId, cut_orientation: Direction) -> usize {
        self.solution.bins.push(BinInstance {
            bin_type_id,
            cut_orientation,
        });
        self.solution.bins.len() - 1
    }

    /// Places an item at a 2D/3D position (rectangle and box schemes).
    pub fn add_item(
        &mut self,
        bin_pos: usize,
        item_type_id: ItemTypeId,
        placement: Placement,
        rotation: Rotation,
        stack_id: Option<usize>,
    ) {
        let item_type = self.solution.instance.item_type(item_type_id);
        self.solution.item_area_or_volume += item_type.area_or_volume();
        self.solution.profit += item_type.profit();
        self.solution.items.push(PlacedItem {
            bin_pos,
            item_type_id,
            placement,
            rotation,
            stack_id,
        });
    }

    /// Appends a cut-tree node (rectangle-guillotine). Returns its index.
    pub fn add_node(&mut self, bin_pos: usize, depth: u32, cut_position: f64) -> usize {
        self.solution.cut_tree.push(CutNode {
            bin_pos,
            depth,
            cut_position,
            item_type_id: None,
        });
        self.solution.cut_tree.len() - 1
    }

    /// Attaches an item type to the last-appended cut-tree leaf.
    pub fn set_last_node_item(&mut self, item_type_id: ItemTypeId) {
        if let Some(last) = self.solution.cut_tree.last_mut() {
            last.item_type_id = Some(item_type_id);
        }
        let item_type = self.solution.instance.item_type(item_type_id);
        self.solution.item_area_or_volume += item_type.area_or_volume();
        self.solution.profit += item_type.profit();
    }

    /// Starts a new box-stacks stack. Returns its id.
    pub fn add_stack(&mut self, bin_pos: usize, x_range: (f64, f64), y_range: (f64, f64)) -> usize {
        self.solution.stacks.push(Stack {
            bin_pos,
            x_range,
            y_range,
        });
        self.solution.stacks.len() - 1
    }

    /// Records the currently-occupied area/volume across all bins,
    /// recomputed by the caller from its frontier (rather than
    /// re-derivable purely from placed items, since it also covers waste
    /// between items). Schemes call this after each `add_*`.
    pub fn set_current_area_or_volume(&mut self, value: f64) {
        self.solution.current_area_or_volume = value;
    }

    /// Finishes the build, returning the resulting [`Solution`].
    #[must_use]
    pub fn finish(self) -> Solution<'i> {
        self.solution
    }

    /// Read-only view of the solution built so far.
    #[must_use]
    pub fn as_solution(&self) -> &Solution<'i> {
        &self.solution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packingsolver_instance::{InstanceBuilder, RotationMask, Size, Trims};

    fn instance() -> Instance {
        let mut b = InstanceBuilder::new();
        b.add_rectangle_item_type(Size::new(4.0, 3.0), RotationMask::FREE_2D, 2, None, 1.0, 0)
            .unwrap();
        b.add_rectangle_bin_type(Size::new(10.0, 10.0), None, 1, 0, Trims::default())
            .unwrap();
        b.build().unwrap()
    }

    #[test]
    fn add_item_updates_area_and_profit() {
        let inst = instance();
        let mut sb = SolutionBuilder::new(&inst);
        let bin = sb.add_bin(0, Direction::X);
        sb.add_item(bin, 0, Placement::Rect { x: 0.0, y: 0.0 }, Rotation::Xyz, None);
        sb.set_current_area_or_volume(100.0);
        let sol = sb.finish();
        assert_eq!(sol.number_of_items(), 1);
        assert!((sol.item_area_or_volume() - 12.0).abs() < 1e-9);
        assert!((sol.waste() - 88.0).abs() < 1e-9);
        assert!(!sol.is_complete());
    }
}
