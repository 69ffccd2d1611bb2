// SPDX-License-Identifier: MIT

//! Mutable solution model: the append-only [`SolutionBuilder`], the shared
//! [`node::NodeCommon`] accumulators every branching-scheme node embeds,
//! objective-dispatched comparison, and the concurrent [`SolutionPool`].

pub mod compare;
pub mod node;
pub mod pool;
pub mod solution;

pub use compare::solution_is_better;
pub use node::{Direction, GroupAccumulator, InsertionRecord, NodeCommon};
pub use pool::SolutionPool;
pub use solution::{BinInstance, CutNode, Placement, PlacedItem, Solution, SolutionBuilder, Stack};
