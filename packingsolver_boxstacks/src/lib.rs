// SPDX-License-Identifier: MIT

//! Box-stacks branching scheme: the rectangle skyline of
//! `packingsolver_rectangle` generalized with a per-footprint vertical
//! stack, stackability/weight/axle constraints, and an expected-trajectory
//! heuristic (spec.md §4.F).
//!
//! [`node::BoxStacksNode`] tracks the skyline together with each
//! [`node::UncoveredItem`]'s [`node::StackState`]; [`dominance::StackDominance`]
//! precomputes the may-dominate relation the pre-search stack-composition
//! DFS seeds; [`trajectory::ExpectedTrajectory`] is the informational 1D
//! expected-length/expected-axle-weight curve; [`scheme::BoxStacksScheme`]
//! wires the whole thing into [`packingsolver_search::BranchingScheme`].

mod dominance;
mod node;
mod scheme;
mod trajectory;

pub use dominance::StackDominance;
pub use node::{BoxStacksHasher, BoxStacksNode, StackState, UncoveredItem};
pub use scheme::{BoxStacksParameters, BoxStacksScheme};
pub use trajectory::{ExpectedTrajectory, GroupTrajectory};
