// SPDX-License-Identifier: MIT

//! Immutable instance model for the cutting-and-packing branching-scheme
//! family: item types, bin types, defects, groups, and the objective /
//! unloading-constraint parameters that select a branching scheme's
//! comparison and bound predicates.
//!
//! Built once by [`InstanceBuilder`] and shared read-only across every
//! search. See the crate's sibling crates for the mutable
//! solution model (`packingsolver_solution`) and the concrete branching
//! schemes (`packingsolver_rectangle` and friends).

mod bin;
mod error;
mod geometry;
mod instance;
mod item;
mod objective;

pub use bin::{BinShape, BinType, BinTypeId, Defect, SemiTrailerTruckData, Trim, TrimKind, Trims};
pub use error::{PackingError, Result};
pub use geometry::{le_tol, ge_tol, eq_tol, Box3, Point, Point3, Rect, Rotation, RotationMask, Size, Size3, PSTOL};
pub use instance::{Instance, InstanceBuilder};
pub use item::{Copies, Group, GroupId, ItemShape, ItemType, ItemTypeId, UNLIMITED_COPIES};
pub use objective::{Objective, UnloadingConstraint};
