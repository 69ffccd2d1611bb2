//! Geometric primitives shared by every branching scheme.
//!
//! 2D shapes reuse [`kurbo::Point`] / [`kurbo::Rect`]; 3D has no ecosystem
//! equivalent in `kurbo`, so [`Point3`] / [`Size3`] are small local types in
//! the same spirit as `kurbo`'s own primitives.

use core::fmt;

pub use kurbo::{Point, Rect, Size};

/// Numeric tolerance used for every floating-point geometry comparison
/// (weight limits, axle loads, dimensional checks). On the order of the
/// spec's suggested 1e-9 relative / 1e-6 absolute; integer geometry is
/// compared exactly and never goes through this constant.
pub const PSTOL: f64 = 1e-6;

/// `a <= b`, allowing for [`PSTOL`] slack.
#[inline]
pub fn le_tol(a: f64, b: f64) -> bool {
    a <= b + PSTOL.max(b.abs() * 1e-9)
}

/// `a >= b`, allowing for [`PSTOL`] slack.
#[inline]
pub fn ge_tol(a: f64, b: f64) -> bool {
    le_tol(b, a)
}

/// `a == b`, allowing for [`PSTOL`] slack.
#[inline]
pub fn eq_tol(a: f64, b: f64) -> bool {
    (a - b).abs() <= PSTOL.max(a.abs().max(b.abs()) * 1e-9)
}

/// A point in 3D space.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Point3 {
    /// x-coordinate.
    pub x: f64,
    /// y-coordinate.
    pub y: f64,
    /// z-coordinate.
    pub z: f64,
}

impl Point3 {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A size (width/height/depth) in 3D space.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Size3 {
    /// Extent along x.
    pub x: f64,
    /// Extent along y.
    pub y: f64,
    /// Extent along z.
    pub z: f64,
}

impl Size3 {
    /// Creates a new size.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Volume `x * y * z`.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.x * self.y * self.z
    }

    /// The length of the longest edge.
    #[must_use]
    pub fn max_edge(&self) -> f64 {
        self.x.max(self.y).max(self.z)
    }

    /// Returns this size permuted by one of the six axis-aligned
    /// orientations.
    #[must_use]
    pub fn rotated(&self, rotation: Rotation) -> Self {
        match rotation {
            Rotation::Xyz => Self::new(self.x, self.y, self.z),
            Rotation::Xzy => Self::new(self.x, self.z, self.y),
            Rotation::Yxz => Self::new(self.y, self.x, self.z),
            Rotation::Yzx => Self::new(self.y, self.z, self.x),
            Rotation::Zxy => Self::new(self.z, self.x, self.y),
            Rotation::Zyx => Self::new(self.z, self.y, self.x),
        }
    }
}

/// An axis-aligned box in 3D space, the 3D analogue of [`Rect`].
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Box3 {
    /// Minimum corner.
    pub min: Point3,
    /// Size along each axis.
    pub size: Size3,
}

impl Box3 {
    /// Creates a box from its minimum corner and size.
    #[must_use]
    pub const fn new(min: Point3, size: Size3) -> Self {
        Self { min, size }
    }

    /// Maximum corner (`min + size`).
    #[must_use]
    pub fn max(&self) -> Point3 {
        Point3::new(
            self.min.x + self.size.x,
            self.min.y + self.size.y,
            self.min.z + self.size.z,
        )
    }

    /// Whether this box overlaps another (shared faces do not count as
    /// overlap, matching the open-intersection rule used for defects).
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x
            && a_max.x > other.min.x
            && self.min.y < b_max.y
            && a_max.y > other.min.y
            && self.min.z < b_max.z
            && a_max.z > other.min.z
    }
}

/// One of the six axis-aligned orientations a box-shaped item can take.
///
/// `Xyz` is the canonical (unrotated) orientation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Rotation {
    /// Canonical orientation: `(x, y, z)`.
    Xyz,
    /// `(x, z, y)`.
    Xzy,
    /// `(y, x, z)`.
    Yxz,
    /// `(y, z, x)`.
    Yzx,
    /// `(z, x, y)`.
    Zxy,
    /// `(z, y, x)`.
    Zyx,
}

impl Rotation {
    /// All six orientations, in bit order matching [`RotationMask`].
    pub const ALL: [Self; 6] = [
        Self::Xyz,
        Self::Xzy,
        Self::Yxz,
        Self::Yzx,
        Self::Zxy,
        Self::Zyx,
    ];

    /// The single bit that represents this orientation in a [`RotationMask`].
    #[must_use]
    pub fn bit(self) -> RotationMask {
        match self {
            Self::Xyz => RotationMask::XYZ,
            Self::Xzy => RotationMask::XZY,
            Self::Yxz => RotationMask::YXZ,
            Self::Yzx => RotationMask::YZX,
            Self::Zxy => RotationMask::ZXY,
            Self::Zyx => RotationMask::ZYX,
        }
    }
}

bitflags::bitflags! {
    /// A 6-bit mask over the six axis-aligned box orientations
    ///. For 2D items this degenerates to
    /// `XYZ` (not rotated) and `XZY` (90-degree rotation, width/height
    /// swapped).
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    pub struct RotationMask: u8 {
        /// Canonical orientation, always allowed.
        const XYZ = 0b0000_0001;
        /// Width/height swapped (the only rotation 2D items use).
        const XZY = 0b0000_0010;
        const YXZ = 0b0000_0100;
        const YZX = 0b0000_1000;
        const ZXY = 0b0001_0000;
        const ZYX = 0b0010_0000;
    }
}

impl RotationMask {
    /// Only the canonical orientation (`oriented = true` for 2D items).
    pub const CANONICAL_ONLY: Self = Self::XYZ;

    /// Canonical orientation plus the 90-degree width/height swap, the mask
    /// used by unoriented 2D items.
    pub const FREE_2D: Self = Self::XYZ.union(Self::XZY);

    /// All six 3D orientations.
    pub const FREE_3D: Self = Self::all();

    /// Iterates the orientations allowed by this mask.
    pub fn allowed(self) -> impl Iterator<Item = Rotation> + 'static {
        Rotation::ALL.into_iter().filter(move |r| self.contains(r.bit()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_mask_free_2d_allows_two_orientations() {
        let allowed: Vec<_> = RotationMask::FREE_2D.allowed().collect();
        assert_eq!(allowed, vec![Rotation::Xyz, Rotation::Xzy]);
    }

    #[test]
    fn box3_shared_face_is_not_overlap() {
        let a = Box3::new(Point3::new(0.0, 0.0, 0.0), Size3::new(1.0, 1.0, 1.0));
        let b = Box3::new(Point3::new(1.0, 0.0, 0.0), Size3::new(1.0, 1.0, 1.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn size3_rotated_permutes_axes() {
        let s = Size3::new(2.0, 3.0, 5.0);
        assert_eq!(s.rotated(Rotation::Yzx), Size3::new(3.0, 5.0, 2.0));
    }

    #[test]
    fn eq_tol_accepts_small_slack() {
        assert!(eq_tol(1.0, 1.0 + PSTOL / 2.0));
        assert!(!eq_tol(1.0, 1.1));
    }
}
