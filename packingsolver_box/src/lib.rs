// SPDX-License-Identifier: MIT

//! Box (3D) branching scheme: three linked 2D staircase frontiers, one per
//! projection plane, of spec.md §4.E.
//!
//! [`node::BoxNode`] tracks the `x_uncovered`/`y_uncovered`/`z_uncovered`
//! rectangle partitions; [`scheme::BoxScheme`] enumerates feasible box
//! insertions over pairs of `(y_uncovered, z_uncovered)` anchors and wires
//! them into [`packingsolver_search::BranchingScheme`].

mod node;
mod scheme;

pub use node::{BoxHasher, BoxNode, UncoveredRect};
pub use scheme::{BoxParameters, BoxScheme};
