//! The read-only [`Instance`] and its [`InstanceBuilder`].

use crate::bin::{BinShape, BinType, BinTypeId, SemiTrailerTruckData, Trims};
use crate::error::{PackingError, Result};
use crate::geometry::{Size, Size3};
use crate::item::{Copies, Group, GroupId, ItemShape, ItemType, ItemTypeId, RotationMask};
use crate::objective::{Objective, UnloadingConstraint};

/// Derived, once-computed quantities kept alongside the raw item/bin lists.
#[derive(Clone, Debug, Default)]
struct Derived {
    item_area_or_volume: f64,
    largest_item_profit: f64,
    largest_efficiency_item_type: Option<ItemTypeId>,
    bin_area_or_volume: f64,
    bin_weight: f64,
    bin_type_ids_expanded: Vec<BinTypeId>,
    previous_bin_area_or_volume: Vec<f64>,
    smallest_item_width: f64,
    smallest_item_height: f64,
    total_item_width: f64,
    total_item_height: f64,
    groups: Vec<Group>,
}

/// Immutable description of items, bins, defects, groups, and
/// side-constraint parameters. Built once by
/// [`InstanceBuilder`] and shared read-only across every branching-scheme
/// search.
#[derive(Clone, Debug)]
pub struct Instance {
    item_types: Vec<ItemType>,
    bin_types: Vec<BinType>,
    defects: Vec<crate::bin::Defect>,
    objective: Objective,
    unloading_constraint: UnloadingConstraint,
    derived: Derived,
}

impl Instance {
    /// All item types, in id order.
    #[must_use]
    pub fn item_types(&self) -> &[ItemType] {
        &self.item_types
    }

    /// The item type with the given id.
    #[must_use]
    pub fn item_type(&self, id: ItemTypeId) -> &ItemType {
        &self.item_types[id]
    }

    /// Number of distinct item types.
    #[must_use]
    pub fn number_of_item_types(&self) -> usize {
        self.item_types.len()
    }

    /// All bin types, in id order.
    #[must_use]
    pub fn bin_types(&self) -> &[BinType] {
        &self.bin_types
    }

    /// The bin type with the given id.
    #[must_use]
    pub fn bin_type(&self, id: BinTypeId) -> &BinType {
        &self.bin_types[id]
    }

    /// Number of distinct bin types.
    #[must_use]
    pub fn number_of_bin_types(&self) -> usize {
        self.bin_types.len()
    }

    /// All defects, in insertion order.
    #[must_use]
    pub fn defects(&self) -> &[crate::bin::Defect] {
        &self.defects
    }

    /// Defects belonging to a given bin type.
    pub fn defects_of_bin_type(&self, bin_type_id: BinTypeId) -> impl Iterator<Item = &crate::bin::Defect> {
        self.defects.iter().filter(move |d| d.bin_type_id == bin_type_id)
    }

    /// The configured objective.
    #[must_use]
    pub const fn objective(&self) -> Objective {
        self.objective
    }

    /// The configured unloading constraint.
    #[must_use]
    pub const fn unloading_constraint(&self) -> UnloadingConstraint {
        self.unloading_constraint
    }

    /// Total area (2D) or volume (3D) across one copy of every item type
    /// weighted by its number of copies (unlimited-copy types contribute
    /// zero, since their total is unbounded).
    #[must_use]
    pub fn item_area_or_volume(&self) -> f64 {
        self.derived.item_area_or_volume
    }

    /// Highest single-copy profit over all item types.
    #[must_use]
    pub fn largest_item_profit(&self) -> f64 {
        self.derived.largest_item_profit
    }

    /// Item type maximizing profit per unit area/volume, used by
    /// knapsack-style bounds.
    #[must_use]
    pub fn largest_efficiency_item_type(&self) -> Option<ItemTypeId> {
        self.derived.largest_efficiency_item_type
    }

    /// Total area (2D) or volume (3D) across one copy of every bin type
    /// weighted by its number of copies (unlimited bin types contribute
    /// zero).
    #[must_use]
    pub fn bin_area_or_volume(&self) -> f64 {
        self.derived.bin_area_or_volume
    }

    /// Sum of `copies * maximum_weight` over every bin type with a finite
    /// copy count.
    #[must_use]
    pub fn bin_weight(&self) -> f64 {
        self.derived.bin_weight
    }

    /// Bin type ids expanded by copies: `bin_type_ids[bin_pos]` is the id of
    /// the bin type used for the `bin_pos`-th bin, in non-decreasing area
    /// order. Finite prefix only; unlimited-copy bin types are represented
    /// once and may be reused past the prefix.
    #[must_use]
    pub fn bin_type_ids_expanded(&self) -> &[BinTypeId] {
        &self.derived.bin_type_ids_expanded
    }

    /// Cumulative area/volume of bins strictly before `bin_pos` in
    /// [`Self::bin_type_ids_expanded`] order.
    #[must_use]
    pub fn previous_bin_area_or_volume(&self, bin_pos: usize) -> f64 {
        self.derived
            .previous_bin_area_or_volume
            .get(bin_pos)
            .copied()
            .unwrap_or(self.derived.bin_area_or_volume)
    }

    /// Number of distinct groups referenced by any item type.
    #[must_use]
    pub fn number_of_groups(&self) -> usize {
        self.derived.groups.len()
    }

    /// The group with the given id.
    #[must_use]
    pub fn group(&self, id: GroupId) -> &Group {
        &self.derived.groups[id]
    }

    /// All groups, in id order.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.derived.groups
    }

    /// Smallest item width across all rectangle/box item types.
    #[must_use]
    pub fn smallest_item_width(&self) -> f64 {
        self.derived.smallest_item_width
    }

    /// Smallest item height across all rectangle/box item types.
    #[must_use]
    pub fn smallest_item_height(&self) -> f64 {
        self.derived.smallest_item_height
    }

    /// Sum of item widths weighted by copies.
    #[must_use]
    pub fn total_item_width(&self) -> f64 {
        self.derived.total_item_width
    }

    /// Sum of item heights weighted by copies.
    #[must_use]
    pub fn total_item_height(&self) -> f64 {
        self.derived.total_item_height
    }
}

/// Builder for [`Instance`]. Operations append-only; validation runs in
/// [`InstanceBuilder::build`] so partially-built (and therefore
/// cross-referencing) state never needs to be re-checked on every call.
#[derive(Clone, Debug, Default)]
pub struct InstanceBuilder {
    item_types: Vec<ItemType>,
    bin_types: Vec<BinType>,
    defects: Vec<crate::bin::Defect>,
    objective: Objective,
    unloading_constraint: UnloadingConstraint,
    excluded_weight_groups: Vec<GroupId>,
}

impl InstanceBuilder {
    /// Creates an empty builder with the [`Objective::Default`] objective.
    #[must_use]
    pub fn new() -> Self {
        Self {
            objective: Objective::Default,
            ..Self::default()
        }
    }

    /// Sets the objective.
    pub fn set_objective(&mut self, objective: Objective) -> &mut Self {
        self.objective = objective;
        self
    }

    /// Sets the unloading constraint.
    pub fn set_unloading_constraint(&mut self, constraint: UnloadingConstraint) -> &mut Self {
        self.unloading_constraint = constraint;
        self
    }

    /// Excludes a group from axle/weight-constraint checking
    /// (`parameters.csv`'s `no-check-weight-constraints`).
    pub fn exclude_group_from_weight_constraint(&mut self, group_id: GroupId) -> &mut Self {
        self.excluded_weight_groups.push(group_id);
        self
    }

    /// Adds a rectangle item type. Returns its id.
    #[allow(clippy::too_many_arguments)]
    pub fn add_rectangle_item_type(
        &mut self,
        size: Size,
        rotations: RotationMask,
        copies: Copies,
        profit: Option<f64>,
        weight: f64,
        group_id: GroupId,
    ) -> Result<ItemTypeId> {
        if size.width <= 0.0 || size.height <= 0.0 {
            return Err(PackingError::Configuration(format!(
                "item dimensions must be > 0; got ({}, {})",
                size.width, size.height
            )));
        }
        if copies != crate::item::UNLIMITED_COPIES && copies < 1 {
            return Err(PackingError::Configuration(format!(
                "item 'copies' must be >= 1 (or == -1); got {copies}"
            )));
        }
        let profit = profit.unwrap_or(size.width * size.height);
        let id = self.item_types.len();
        self.item_types.push(ItemType::new(
            id,
            ItemShape::Rectangle(size),
            rotations,
            copies,
            profit,
            weight,
            group_id,
            0,
            u32::MAX,
            f64::MAX,
            0.0,
        ));
        Ok(id)
    }

    /// Adds a box item type, with the box-stacks-specific stacking
    /// attributes. Returns its id.
    #[allow(clippy::too_many_arguments)]
    pub fn add_box_item_type(
        &mut self,
        size: Size3,
        rotations: RotationMask,
        copies: Copies,
        profit: Option<f64>,
        weight: f64,
        group_id: GroupId,
        stackability_id: usize,
        maximum_stackability: u32,
        maximum_weight_above: f64,
        nesting_height: f64,
    ) -> Result<ItemTypeId> {
        if size.x <= 0.0 || size.y <= 0.0 || size.z <= 0.0 {
            return Err(PackingError::Configuration(format!(
                "item dimensions must be > 0; got ({}, {}, {})",
                size.x, size.y, size.z
            )));
        }
        if copies != crate::item::UNLIMITED_COPIES && copies < 1 {
            return Err(PackingError::Configuration(format!(
                "item 'copies' must be >= 1 (or == -1); got {copies}"
            )));
        }
        let profit = profit.unwrap_or(size.volume());
        let id = self.item_types.len();
        self.item_types.push(ItemType::new(
            id,
            ItemShape::Box(size),
            rotations,
            copies,
            profit,
            weight,
            group_id,
            stackability_id,
            maximum_stackability,
            maximum_weight_above,
            nesting_height,
        ));
        Ok(id)
    }

    /// Adds a rectangle bin type. Returns its id.
    pub fn add_rectangle_bin_type(
        &mut self,
        size: Size,
        cost: Option<f64>,
        copies: Copies,
        copies_min: i64,
        trims: Trims,
    ) -> Result<BinTypeId> {
        self.validate_bin_dims(&[size.width, size.height], cost, copies, copies_min)?;
        let cost = cost.unwrap_or(size.width * size.height);
        let id = self.bin_types.len();
        self.bin_types.push(BinType::new(
            id,
            BinShape::Rectangle(size),
            cost,
            copies,
            copies_min,
            trims,
            0.0,
            f64::MAX,
            None,
            false,
        ));
        Ok(id)
    }

    /// Adds a box bin type. Returns its id.
    #[allow(clippy::too_many_arguments)]
    pub fn add_box_bin_type(
        &mut self,
        size: Size3,
        cost: Option<f64>,
        copies: Copies,
        copies_min: i64,
        maximum_weight: f64,
        maximum_stack_density: f64,
        semi_trailer_truck: Option<SemiTrailerTruckData>,
    ) -> Result<BinTypeId> {
        self.validate_bin_dims(&[size.x, size.y, size.z], cost, copies, copies_min)?;
        let cost = cost.unwrap_or(size.volume());
        let id = self.bin_types.len();
        self.bin_types.push(BinType::new(
            id,
            BinShape::Box(size),
            cost,
            copies,
            copies_min,
            Trims::default(),
            maximum_weight,
            if maximum_stack_density > 0.0 {
                maximum_stack_density
            } else {
                f64::MAX
            },
            semi_trailer_truck,
            false,
        ));
        Ok(id)
    }

    /// Sets a bin type's maximum total item weight.
    pub fn set_bin_type_maximum_weight(&mut self, bin_type_id: BinTypeId, maximum_weight: f64) -> Result<&mut Self> {
        let bt = self
            .bin_types
            .get_mut(bin_type_id)
            .ok_or_else(|| PackingError::Configuration(format!("invalid bin_type_id {bin_type_id}")))?;
        *bt = BinType::new(
            bt.id(),
            bt.shape(),
            bt.cost(),
            bt.copies(),
            bt.copies_min(),
            bt.trims(),
            maximum_weight,
            bt.maximum_stack_density(),
            bt.semi_trailer_truck(),
            bt.cut_through_defects(),
        );
        Ok(self)
    }

    /// Sets whether cuts may cross defects for a bin type
    /// (rectangle-guillotine only).
    pub fn set_bin_type_cut_through_defects(&mut self, bin_type_id: BinTypeId, allowed: bool) -> Result<&mut Self> {
        let bt = self
            .bin_types
            .get_mut(bin_type_id)
            .ok_or_else(|| PackingError::Configuration(format!("invalid bin_type_id {bin_type_id}")))?;
        *bt = BinType::new(
            bt.id(),
            bt.shape(),
            bt.cost(),
            bt.copies(),
            bt.copies_min(),
            bt.trims(),
            bt.maximum_weight(),
            bt.maximum_stack_density(),
            bt.semi_trailer_truck(),
            allowed,
        );
        Ok(self)
    }

    /// Adds a defect to a bin type.
    pub fn add_defect(&mut self, bin_type_id: BinTypeId, position: crate::geometry::Point, size: Size) -> Result<&mut Self> {
        if bin_type_id >= self.bin_types.len() {
            return Err(PackingError::Configuration(format!("invalid bin_type_id {bin_type_id}")));
        }
        if size.width <= 0.0 || size.height <= 0.0 {
            return Err(PackingError::Configuration(
                "defect dimensions must be > 0".to_string(),
            ));
        }
        self.defects.push(crate::bin::Defect {
            bin_type_id,
            position,
            size,
        });
        Ok(self)
    }

    fn validate_bin_dims(&self, dims: &[f64], cost: Option<f64>, copies: Copies, copies_min: i64) -> Result<()> {
        for d in dims {
            if *d <= 0.0 {
                return Err(PackingError::Configuration(format!(
                    "bin dimensions must be > 0; got {d}"
                )));
            }
        }
        if let Some(cost) = cost {
            if cost <= 0.0 {
                return Err(PackingError::Configuration(format!(
                    "bin 'cost' must be > 0; got {cost}"
                )));
            }
        }
        if copies_min < 0 {
            return Err(PackingError::Configuration(format!(
                "bin 'copies_min' must be >= 0; got {copies_min}"
            )));
        }
        if copies != crate::item::UNLIMITED_COPIES {
            if copies <= 0 {
                return Err(PackingError::Configuration(format!(
                    "bin 'copies' must be > 0 (or == -1); got {copies}"
                )));
            }
            if copies_min > copies {
                return Err(PackingError::Configuration(format!(
                    "bin 'copies_min' ({copies_min}) must be <= 'copies' ({copies})"
                )));
            }
        }
        Ok(())
    }

    /// Validates the accumulated state and computes derived fields,
    /// producing the final read-only [`Instance`].
    pub fn build(self) -> Result<Instance> {
        if self.item_types.is_empty() {
            return Err(PackingError::Configuration("instance has no item types".to_string()));
        }
        if self.bin_types.is_empty() {
            return Err(PackingError::Configuration("instance has no bin types".to_string()));
        }
        if self.objective.requires_single_bin() {
            let total_bin_positions: i64 = self
                .bin_types
                .iter()
                .map(|b| if b.has_unlimited_copies() { 2 } else { b.copies() })
                .sum();
            if self.bin_types.len() != 1 || total_bin_positions != 1 {
                return Err(PackingError::Configuration(format!(
                    "objective {} requires exactly one bin",
                    self.objective.name()
                )));
            }
        }

        let derived = compute_derived(&self.item_types, &self.bin_types, &self.excluded_weight_groups);

        Ok(Instance {
            item_types: self.item_types,
            bin_types: self.bin_types,
            defects: self.defects,
            objective: self.objective,
            unloading_constraint: self.unloading_constraint,
            derived,
        })
    }
}

fn compute_derived(item_types: &[ItemType], bin_types: &[BinType], excluded_weight_groups: &[GroupId]) -> Derived {
    let mut item_area_or_volume = 0.0;
    let mut largest_item_profit = 0.0;
    let mut largest_efficiency_item_type = None;
    let mut largest_efficiency = f64::MIN;
    let mut smallest_item_width = f64::MAX;
    let mut smallest_item_height = f64::MAX;
    let mut total_item_width = 0.0;
    let mut total_item_height = 0.0;

    let mut max_group_id = 0usize;
    for it in item_types {
        max_group_id = max_group_id.max(it.group_id());
        if !it.has_unlimited_copies() {
            item_area_or_volume += it.area_or_volume() * it.copies() as f64;
        }
        largest_item_profit = largest_item_profit.max(it.profit());
        let eff = it.efficiency();
        if eff > largest_efficiency {
            largest_efficiency = eff;
            largest_efficiency_item_type = Some(it.id());
        }
        let (w, h) = match it.shape() {
            ItemShape::Rectangle(s) => (s.width, s.height),
            ItemShape::Box(s) => (s.x, s.y),
        };
        smallest_item_width = smallest_item_width.min(w);
        smallest_item_height = smallest_item_height.min(h);
        if !it.has_unlimited_copies() {
            total_item_width += w * it.copies() as f64;
            total_item_height += h * it.copies() as f64;
        }
    }

    let mut bin_area_or_volume = 0.0;
    let mut bin_weight = 0.0;
    let mut bin_type_ids_expanded = Vec::new();
    let mut previous_bin_area_or_volume = Vec::new();
    let mut sorted_bin_ids: Vec<BinTypeId> = (0..bin_types.len()).collect();
    sorted_bin_ids.sort_by(|&a, &b| {
        bin_types[a]
            .shape()
            .area_or_volume()
            .partial_cmp(&bin_types[b].shape().area_or_volume())
            .unwrap()
    });
    for &id in &sorted_bin_ids {
        let bt = &bin_types[id];
        if bt.has_unlimited_copies() {
            bin_type_ids_expanded.push(id);
            previous_bin_area_or_volume.push(bin_area_or_volume);
            continue;
        }
        for _ in 0..bt.copies() {
            previous_bin_area_or_volume.push(bin_area_or_volume);
            bin_type_ids_expanded.push(id);
            bin_area_or_volume += bt.shape().area_or_volume();
        }
        if bt.maximum_weight() > 0.0 {
            bin_weight += bt.maximum_weight() * bt.copies() as f64;
        }
    }

    let mut groups = vec![Group::default(); max_group_id + 1];
    for it in item_types {
        let g = &mut groups[it.group_id()];
        g.item_types.push(it.id());
        if !it.has_unlimited_copies() {
            g.number_of_items += it.copies() as u64;
        }
    }
    for (id, g) in groups.iter_mut().enumerate() {
        g.check_weight_constraint = !excluded_weight_groups.contains(&id);
    }

    Derived {
        item_area_or_volume,
        largest_item_profit,
        largest_efficiency_item_type,
        bin_area_or_volume,
        bin_weight,
        bin_type_ids_expanded,
        previous_bin_area_or_volume,
        smallest_item_width: if smallest_item_width.is_finite() { smallest_item_width } else { 0.0 },
        smallest_item_height: if smallest_item_height.is_finite() { smallest_item_height } else { 0.0 },
        total_item_width,
        total_item_height,
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn rect_item(b: &mut InstanceBuilder, w: f64, h: f64) -> ItemTypeId {
        b.add_rectangle_item_type(Size::new(w, h), RotationMask::FREE_2D, 1, None, 0.0, 0)
            .unwrap()
    }

    #[test]
    fn build_minimal_rectangle_instance() {
        let mut b = InstanceBuilder::new();
        rect_item(&mut b, 10.0, 5.0);
        b.add_rectangle_bin_type(Size::new(100.0, 100.0), None, crate::item::UNLIMITED_COPIES, 0, Trims::default())
            .unwrap();
        let inst = b.build().unwrap();
        assert_eq!(inst.number_of_item_types(), 1);
        assert_eq!(inst.number_of_bin_types(), 1);
        assert!((inst.item_type(0).profit() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn negative_dimension_is_configuration_error() {
        let mut b = InstanceBuilder::new();
        let err = b
            .add_rectangle_item_type(Size::new(-1.0, 5.0), RotationMask::FREE_2D, 1, None, 0.0, 0)
            .unwrap_err();
        assert!(matches!(err, PackingError::Configuration(_)));
    }

    #[test]
    fn copies_min_greater_than_copies_is_rejected() {
        let mut b = InstanceBuilder::new();
        rect_item(&mut b, 1.0, 1.0);
        let err = b
            .add_rectangle_bin_type(Size::new(10.0, 10.0), None, 2, 3, Trims::default())
            .unwrap_err();
        assert!(matches!(err, PackingError::Configuration(_)));
    }

    #[test]
    fn open_dimension_x_requires_single_bin() {
        let mut b = InstanceBuilder::new();
        rect_item(&mut b, 1.0, 1.0);
        b.add_rectangle_bin_type(Size::new(10.0, 10.0), None, 2, 0, Trims::default())
            .unwrap();
        b.set_objective(Objective::OpenDimensionX);
        assert!(b.build().is_err());
    }

    #[test]
    fn defect_rect_intersects_is_open() {
        let mut b = InstanceBuilder::new();
        rect_item(&mut b, 1.0, 1.0);
        b.add_rectangle_bin_type(Size::new(10.0, 10.0), None, 1, 0, Trims::default())
            .unwrap();
        b.add_defect(0, Point::new(5.0, 5.0), Size::new(2.0, 2.0)).unwrap();
        let inst = b.build().unwrap();
        let d = &inst.defects()[0];
        // Touching at a single point (corner) must not count as intersecting.
        assert!(!d.rect_intersects(crate::geometry::Rect::new(3.0, 3.0, 5.0, 5.0)));
        assert!(d.rect_intersects(crate::geometry::Rect::new(3.0, 3.0, 5.5, 5.5)));
    }

    #[test]
    fn groups_accumulate_item_types() {
        let mut b = InstanceBuilder::new();
        b.add_rectangle_item_type(Size::new(1.0, 1.0), RotationMask::FREE_2D, 3, None, 0.0, 0)
            .unwrap();
        b.add_rectangle_item_type(Size::new(2.0, 2.0), RotationMask::FREE_2D, 2, None, 0.0, 1)
            .unwrap();
        b.add_rectangle_bin_type(Size::new(10.0, 10.0), None, 1, 0, Trims::default())
            .unwrap();
        let inst = b.build().unwrap();
        assert_eq!(inst.number_of_groups(), 2);
        assert_eq!(inst.group(0).number_of_items, 3);
        assert_eq!(inst.group(1).number_of_items, 2);
    }
}
