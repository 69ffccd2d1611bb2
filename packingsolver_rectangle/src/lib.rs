// SPDX-License-Identifier: MIT

//! Rectangle (free 2D) branching scheme: a skyline-style left-justified
//! packing of axis-aligned rectangles into a rectangular bin.
//!
//! The frontier is a staircase decomposition of the top of the currently
//! placed region ([`node::UncoveredItem`]); insertion enumeration,
//! predecessor dominance ([`dominance::DominanceTables`]), and the
//! objective-dispatched `better`/`bound` pair are wired into
//! [`packingsolver_search::BranchingScheme`] by [`scheme::RectangleScheme`].

mod dominance;
mod node;
mod scheme;

pub use dominance::{DominanceTables, DominanceVariant, PredecessorStrategy};
pub use node::{RectangleHasher, RectangleNode, UncoveredItem, oriented_bin_size};
pub use scheme::{RectangleParameters, RectangleScheme};
