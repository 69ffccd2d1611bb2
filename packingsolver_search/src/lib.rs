// SPDX-License-Identifier: MIT

//! Generic iterative beam search: the driver that repeatedly expands,
//! ranks, bounds, and deduplicates a branching scheme's partial-placement
//! nodes, independent of any particular scheme's geometry.
//!
//! A concrete scheme (the rectangle, rectangle-guillotine, box, or
//! box-stacks crate) implements [`BranchingScheme`]; everything here --
//! the queue rotation, the growing beam width, cancellation, and parallel
//! fan-out over one shared solution pool -- is shared.

mod cancellation;
mod frontier;
mod ibs;
mod parallel;
mod scheme;

pub use cancellation::CancellationToken;
pub use ibs::{IbsOutput, IbsParameters, iterative_beam_search};
pub use parallel::run_parallel;
pub use scheme::BranchingScheme;
