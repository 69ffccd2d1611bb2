//! Bin types: container kinds, their trims, and defects.

use crate::geometry::{Box3, Point, Rect, Size, Size3};
use crate::item::Copies;

/// Stable identity of a [`BinType`] within an [`crate::Instance`].
pub type BinTypeId = usize;

/// Geometry of a bin type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BinShape {
    /// A 2D rectangle.
    Rectangle(Size),
    /// A 3D box.
    Box(Size3),
}

impl BinShape {
    /// Area (rectangle) or volume (box).
    #[must_use]
    pub fn area_or_volume(&self) -> f64 {
        match self {
            Self::Rectangle(s) => s.width * s.height,
            Self::Box(s) => s.volume(),
        }
    }

    /// The rectangle variant, if this is one.
    #[must_use]
    pub fn as_rectangle(&self) -> Option<Size> {
        match self {
            Self::Rectangle(s) => Some(*s),
            Self::Box(_) => None,
        }
    }

    /// The box variant, if this is one.
    #[must_use]
    pub fn as_box(&self) -> Option<Size3> {
        match self {
            Self::Rectangle(_) => None,
            Self::Box(s) => Some(*s),
        }
    }
}

/// Whether a guillotine cut may cross a bin's trim band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TrimKind {
    /// The cut may never cross into the trim.
    #[default]
    Hard,
    /// The cut may extend into the trim, provided doing so produces no
    /// waste (i.e. the trim is fully consumed by the extension).
    Soft,
}

/// Border strip reserved around a packable region on one edge of a bin.
/// Rectangle-guillotine is the only scheme that enforces trims as a
/// first-class cut constraint; the other schemes treat a trim as dead
/// space pre-subtracted from the packable rectangle/box.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Trim {
    /// Width of the reserved strip.
    pub width: f64,
    /// Whether cuts may cross this trim.
    pub kind: TrimKind,
}

impl Trim {
    /// A zero-width trim (no reserved border).
    pub const NONE: Self = Self {
        width: 0.0,
        kind: TrimKind::Hard,
    };
}

/// Per-edge trims of a rectangular bin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Trims {
    /// Left-edge trim.
    pub left: Trim,
    /// Right-edge trim.
    pub right: Trim,
    /// Bottom-edge trim.
    pub bottom: Trim,
    /// Top-edge trim.
    pub top: Trim,
}

/// Geometry describing a semi-trailer truck's axle layout, used to derive
/// front/rear axle loads from a weighted-position sum
///.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SemiTrailerTruckData {
    /// Maximum weight tolerated on the middle (drive) axle group.
    pub middle_axle_maximum_weight: f64,
    /// Maximum weight tolerated on the rear axle group.
    pub rear_axle_maximum_weight: f64,
    /// Distance from the front of the trailer to the middle axle group.
    pub middle_axle_position: f64,
    /// Distance from the front of the trailer to the rear axle group.
    pub rear_axle_position: f64,
}

impl SemiTrailerTruckData {
    /// Distributes a weighted-position sum and total weight across the two
    /// tracked axle groups, returning `(middle_axle_weight, rear_axle_weight)`.
    ///
    /// This is a 1D lever-balance computation: treating the trailer as a
    /// rigid beam supported at the two axle positions, each load `w` placed
    /// at position `x` contributes `w * (axle_position - x) / axle_span` to
    /// the *other* axle's reaction and the complement to its own.
    #[must_use]
    pub fn compute_axle_weights(&self, weighted_sum: f64, total_weight: f64) -> (f64, f64) {
        let span = self.rear_axle_position - self.middle_axle_position;
        if span.abs() < f64::EPSILON || total_weight <= 0.0 {
            return (0.0, total_weight);
        }
        // weighted_sum = sum of (position * weight); centroid position:
        let centroid = weighted_sum / total_weight;
        let rear_share = ((centroid - self.middle_axle_position) / span).clamp(0.0, 1.0);
        let rear = total_weight * rear_share;
        let middle = total_weight - rear;
        (middle, rear)
    }
}

/// A forbidden axis-aligned rectangle inside a bin. Items must not overlap it; by default guillotine cuts must
/// not cross it either.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Defect {
    /// Bin type the defect belongs to.
    pub bin_type_id: BinTypeId,
    /// Top-left corner.
    pub position: Point,
    /// Width/height of the forbidden rectangle.
    pub size: Size,
}

impl Defect {
    /// The defect's rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.size.width,
            self.position.y + self.size.height,
        )
    }

    /// Whether a rectangle intersects this defect, using an *open*
    /// intersection test: a shared edge or corner does not count
    ///.
    #[must_use]
    pub fn rect_intersects(&self, other: Rect) -> bool {
        let d = self.rect();
        d.x0 < other.x1 && d.x1 > other.x0 && d.y0 < other.y1 && d.y1 > other.y0
    }
}

/// A container kind.
#[derive(Clone, Debug, PartialEq)]
pub struct BinType {
    id: BinTypeId,
    shape: BinShape,
    cost: f64,
    copies: Copies,
    copies_min: i64,
    trims: Trims,
    maximum_weight: f64,
    maximum_stack_density: f64,
    semi_trailer_truck: Option<SemiTrailerTruckData>,
    cut_through_defects: bool,
}

impl BinType {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: BinTypeId,
        shape: BinShape,
        cost: f64,
        copies: Copies,
        copies_min: i64,
        trims: Trims,
        maximum_weight: f64,
        maximum_stack_density: f64,
        semi_trailer_truck: Option<SemiTrailerTruckData>,
        cut_through_defects: bool,
    ) -> Self {
        Self {
            id,
            shape,
            cost,
            copies,
            copies_min,
            trims,
            maximum_weight,
            maximum_stack_density,
            semi_trailer_truck,
            cut_through_defects,
        }
    }

    /// Stable integer id.
    #[must_use]
    pub const fn id(&self) -> BinTypeId {
        self.id
    }

    /// Geometry of this bin type.
    #[must_use]
    pub const fn shape(&self) -> BinShape {
        self.shape
    }

    /// Cost of using one copy of this bin (defaults to area/volume).
    #[must_use]
    pub const fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of available copies, or [`crate::item::UNLIMITED_COPIES`].
    #[must_use]
    pub const fn copies(&self) -> Copies {
        self.copies
    }

    /// Minimum number of copies that must be used.
    #[must_use]
    pub const fn copies_min(&self) -> i64 {
        self.copies_min
    }

    /// Per-edge trims.
    #[must_use]
    pub const fn trims(&self) -> Trims {
        self.trims
    }

    /// Maximum total item weight per bin copy (0.0 = unconstrained).
    #[must_use]
    pub const fn maximum_weight(&self) -> f64 {
        self.maximum_weight
    }

    /// Maximum weight-per-footprint-area density for a box-stacks stack.
    #[must_use]
    pub const fn maximum_stack_density(&self) -> f64 {
        self.maximum_stack_density
    }

    /// Truck axle geometry, if this bin type models a semi-trailer truck.
    #[must_use]
    pub const fn semi_trailer_truck(&self) -> Option<SemiTrailerTruckData> {
        self.semi_trailer_truck
    }

    /// Whether a guillotine cut is allowed to cross a defect.
    #[must_use]
    pub const fn cut_through_defects(&self) -> bool {
        self.cut_through_defects
    }

    /// The packable rectangle after subtracting per-edge trims (rectangle
    /// bins only).
    #[must_use]
    pub fn packable_rect(&self) -> Option<Rect> {
        let size = self.shape.as_rectangle()?;
        Some(Rect::new(
            self.trims.left.width,
            self.trims.bottom.width,
            size.width - self.trims.right.width,
            size.height - self.trims.top.width,
        ))
    }

    /// Whether this bin type represents an unlimited supply.
    #[must_use]
    pub fn has_unlimited_copies(&self) -> bool {
        self.copies == crate::item::UNLIMITED_COPIES
    }

    /// Maximum weight the box may take above floor `w` units before the
    /// uniform-density stack constraint (`maximum_stack_density * area`)
    /// binds, for a stack footprint of the given area.
    #[must_use]
    pub fn stack_maximum_weight(&self, footprint_area: f64) -> f64 {
        let density_limit = self.maximum_stack_density * footprint_area;
        if self.maximum_weight > 0.0 {
            self.maximum_weight.min(density_limit)
        } else {
            density_limit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defect(x: f64, y: f64, lx: f64, ly: f64) -> Defect {
        Defect { bin_type_id: 0, position: Point::new(x, y), size: Size::new(lx, ly) }
    }

    #[test]
    fn rect_intersects_defect_uses_open_intersection() {
        let d = defect(10.0, 10.0, 5.0, 5.0);
        // Touching along the right edge only (shared edge, no area overlap).
        assert!(!d.rect_intersects(Rect::new(15.0, 10.0, 20.0, 15.0)));
        // Touching at a single corner point only.
        assert!(!d.rect_intersects(Rect::new(15.0, 15.0, 20.0, 20.0)));
        // Genuine overlap.
        assert!(d.rect_intersects(Rect::new(12.0, 12.0, 17.0, 17.0)));
        // Fully disjoint.
        assert!(!d.rect_intersects(Rect::new(0.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn packable_rect_subtracts_trims() {
        let mut trims = Trims::default();
        trims.left.width = 1.0;
        trims.right.width = 2.0;
        trims.bottom.width = 3.0;
        trims.top.width = 4.0;
        let bin = BinType::new(0, BinShape::Rectangle(Size::new(100.0, 50.0)), 0.0, 1, 0, trims, 0.0, 0.0, None, true);
        let rect = bin.packable_rect().unwrap();
        assert_eq!(rect.x0, 1.0);
        assert_eq!(rect.y0, 3.0);
        assert_eq!(rect.x1, 98.0);
        assert_eq!(rect.y1, 46.0);
    }

    #[test]
    fn box_shapes_have_no_packable_rect() {
        let bin = BinType::new(0, BinShape::Box(Size3::new(1.0, 1.0, 1.0)), 0.0, 1, 0, Trims::default(), 0.0, 0.0, None, true);
        assert!(bin.packable_rect().is_none());
    }

    #[test]
    fn axle_weights_split_by_centroid_position() {
        let truck = SemiTrailerTruckData {
            middle_axle_maximum_weight: 1000.0,
            rear_axle_maximum_weight: 1000.0,
            middle_axle_position: 0.0,
            rear_axle_position: 10.0,
        };
        // A single 100kg load at the middle axle position goes entirely to
        // the middle axle.
        let (middle, rear) = truck.compute_axle_weights(0.0 * 100.0, 100.0);
        assert_eq!(middle, 100.0);
        assert_eq!(rear, 0.0);

        // A load exactly at the rear axle position goes entirely rear.
        let (middle, rear) = truck.compute_axle_weights(10.0 * 100.0, 100.0);
        assert_eq!(middle, 0.0);
        assert_eq!(rear, 100.0);

        // A load at the midpoint splits evenly.
        let (middle, rear) = truck.compute_axle_weights(5.0 * 100.0, 100.0);
        assert!((middle - 50.0).abs() < 1e-9);
        assert!((rear - 50.0).abs() < 1e-9);
    }

    #[test]
    fn stack_maximum_weight_prefers_the_tighter_of_weight_and_density_limits() {
        let mut trims = Trims::default();
        trims.left = Trim::NONE;
        let bin = BinType::new(0, BinShape::Rectangle(Size::new(10.0, 10.0)), 0.0, 1, 0, trims, 50.0, 2.0, None, true);
        // density_limit = 2.0 * 10.0 = 20.0, tighter than maximum_weight=50.0.
        assert_eq!(bin.stack_maximum_weight(10.0), 20.0);

        let unconstrained = BinType::new(0, BinShape::Rectangle(Size::new(10.0, 10.0)), 0.0, 1, 0, Trims::default(), 0.0, 2.0, None, true);
        assert_eq!(unconstrained.stack_maximum_weight(10.0), 20.0);
    }
}
