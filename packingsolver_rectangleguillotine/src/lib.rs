// SPDX-License-Identifier: MIT

//! Rectangle-guillotine branching scheme: the staged-cut cursor state
//! machine (1st/2nd/3rd-stage cuts, `df in {-2,-1,0,1,2}`) of spec.md §4.D.
//!
//! Unlike the free-placement rectangle scheme, every cut here must span the
//! full width (1st stage) or height (2nd stage) of its parent strip/slice;
//! [`node::GuillotineNode`] tracks the cursor coordinates that encode the
//! partially built cut tree, and [`scheme::GuillotineScheme`] enumerates the
//! feasible next cuts and wires them into
//! [`packingsolver_search::BranchingScheme`].

mod node;
mod scheme;

pub use node::{Df, Exactness, GuillotineHasher, GuillotineNode};
pub use scheme::{GuillotineParameters, GuillotineScheme};
