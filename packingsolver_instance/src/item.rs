//! Item types: the kinds of piece being packed.

use crate::geometry::{RotationMask, Size, Size3};

/// Stable identity of an [`ItemType`] within an [`crate::Instance`].
pub type ItemTypeId = usize;

/// Stable identity of a [`crate::Group`] (unloading order / per-group weight
/// constraints).
pub type GroupId = usize;

/// A "copies" quantity, where `-1` means effectively unlimited.
pub type Copies = i64;

/// Sentinel for an unlimited quantity of copies.
pub const UNLIMITED_COPIES: Copies = -1;

/// Geometry of an item type, shared across the three shape families the
/// core understands (the fourth, irregular polygons, is prepared upstream
/// and out of scope here).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ItemShape {
    /// A 2D rectangle `(w, h)`.
    Rectangle(Size),
    /// A 3D box `(x, y, z)`.
    Box(Size3),
}

impl ItemShape {
    /// The rectangle variant's size, if this is a rectangle.
    #[must_use]
    pub fn as_rectangle(&self) -> Option<Size> {
        match self {
            Self::Rectangle(s) => Some(*s),
            Self::Box(_) => None,
        }
    }

    /// The box variant's size, if this is a box.
    #[must_use]
    pub fn as_box(&self) -> Option<Size3> {
        match self {
            Self::Rectangle(_) => None,
            Self::Box(s) => Some(*s),
        }
    }

    /// Area (rectangle) or volume (box).
    #[must_use]
    pub fn area_or_volume(&self) -> f64 {
        match self {
            Self::Rectangle(s) => s.width * s.height,
            Self::Box(s) => s.volume(),
        }
    }
}

/// A kind of piece to pack.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemType {
    id: ItemTypeId,
    shape: ItemShape,
    rotations: RotationMask,
    copies: Copies,
    profit: f64,
    weight: f64,
    group_id: GroupId,
    stackability_id: usize,
    maximum_stackability: u32,
    maximum_weight_above: f64,
    nesting_height: f64,
}

impl ItemType {
    pub(crate) fn new(
        id: ItemTypeId,
        shape: ItemShape,
        rotations: RotationMask,
        copies: Copies,
        profit: f64,
        weight: f64,
        group_id: GroupId,
        stackability_id: usize,
        maximum_stackability: u32,
        maximum_weight_above: f64,
        nesting_height: f64,
    ) -> Self {
        Self {
            id,
            shape,
            rotations,
            copies,
            profit,
            weight,
            group_id,
            stackability_id,
            maximum_stackability,
            maximum_weight_above,
            nesting_height,
        }
    }

    /// Stable integer id.
    #[must_use]
    pub const fn id(&self) -> ItemTypeId {
        self.id
    }

    /// Geometry of this item type.
    #[must_use]
    pub const fn shape(&self) -> ItemShape {
        self.shape
    }

    /// Allowed orientations.
    #[must_use]
    pub const fn rotations(&self) -> RotationMask {
        self.rotations
    }

    /// Whether the item may be placed in more than one orientation.
    #[must_use]
    pub fn oriented(&self) -> bool {
        self.rotations == RotationMask::CANONICAL_ONLY
    }

    /// Number of available copies, or [`UNLIMITED_COPIES`].
    #[must_use]
    pub const fn copies(&self) -> Copies {
        self.copies
    }

    /// Profit earned by packing one copy of this item (defaults to
    /// area/volume at build time if not set explicitly).
    #[must_use]
    pub const fn profit(&self) -> f64 {
        self.profit
    }

    /// Weight of one copy.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Group used for unloading order and per-group weight constraints.
    #[must_use]
    pub const fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Stackability class (box-stacks only).
    #[must_use]
    pub const fn stackability_id(&self) -> usize {
        self.stackability_id
    }

    /// Maximum number of items of a compatible stackability class that may
    /// sit on top of one copy of this item (box-stacks only).
    #[must_use]
    pub const fn maximum_stackability(&self) -> u32 {
        self.maximum_stackability
    }

    /// Maximum total weight that may rest on top of one copy of this item
    /// (box-stacks only).
    #[must_use]
    pub const fn maximum_weight_above(&self) -> f64 {
        self.maximum_weight_above
    }

    /// Height consumed inside the stack below this item when nested
    /// (box-stacks only).
    #[must_use]
    pub const fn nesting_height(&self) -> f64 {
        self.nesting_height
    }

    /// Area (rectangle items) or volume (box items) of one copy.
    #[must_use]
    pub fn area_or_volume(&self) -> f64 {
        self.shape.area_or_volume()
    }

    /// Profit-per-area(-or-volume) efficiency, used to pick the "largest
    /// efficiency" item type for bounds.
    #[must_use]
    pub fn efficiency(&self) -> f64 {
        let denom = self.area_or_volume();
        if denom > 0.0 {
            self.profit / denom
        } else {
            0.0
        }
    }

    /// Whether `copies` represents an unlimited supply.
    #[must_use]
    pub fn has_unlimited_copies(&self) -> bool {
        self.copies == UNLIMITED_COPIES
    }
}

/// A group of item types sharing an unloading/weight-balance constraint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    /// Item types belonging to this group, in instance order.
    pub item_types: Vec<ItemTypeId>,
    /// Total number of item copies (summed over `item_types`) belonging to
    /// this group.
    pub number_of_items: u64,
    /// Whether the axle/weight constraint is actively checked for this
    /// group (`parameters.csv`'s `no-check-weight-constraints` column can
    /// exclude a group).
    pub check_weight_constraint: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(profit: f64, w: f64, h: f64) -> ItemType {
        ItemType::new(0, ItemShape::Rectangle(Size::new(w, h)), RotationMask::CANONICAL_ONLY, 1, profit, 0.0, 0, 0, u32::MAX, f64::MAX, 0.0)
    }

    #[test]
    fn efficiency_is_profit_per_area() {
        let it = item(20.0, 4.0, 5.0);
        assert_eq!(it.area_or_volume(), 20.0);
        assert_eq!(it.efficiency(), 1.0);
    }

    #[test]
    fn efficiency_of_a_degenerate_zero_area_item_is_zero_not_nan() {
        let it = item(5.0, 0.0, 0.0);
        assert_eq!(it.efficiency(), 0.0);
    }

    #[test]
    fn unlimited_copies_sentinel() {
        let mut it = item(1.0, 1.0, 1.0);
        assert!(!it.has_unlimited_copies());
        it = ItemType::new(0, it.shape(), it.rotations(), UNLIMITED_COPIES, 1.0, 0.0, 0, 0, u32::MAX, f64::MAX, 0.0);
        assert!(it.has_unlimited_copies());
    }

    #[test]
    fn oriented_reflects_canonical_only_rotation_mask() {
        let it = item(1.0, 2.0, 3.0);
        assert!(it.oriented());
    }
}
