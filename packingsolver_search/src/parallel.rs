//! Runs several independent search invocations concurrently, all adding
//! into one shared [`SolutionPool`].
//!
//! Each invocation gets its own scheme instance (its own node arena and
//! per-depth history) and its own [`IbsParameters`] -- typically differing
//! only in `thread_id` and an initial `queue_size_min`, so a pool of worker
//! threads explores the tree with different beam widths rather than
//! repeating identical work. Cancelling the shared [`CancellationToken`]
//! stops every invocation at its next node pop.

use packingsolver_solution::SolutionPool;
use rayon::prelude::*;

use crate::cancellation::CancellationToken;
use crate::ibs::{IbsOutput, IbsParameters, iterative_beam_search};
use crate::scheme::BranchingScheme;

/// Runs `iterative_beam_search` once per `(scheme, params)` pair in
/// `invocations`, in parallel, all writing into `pool`. Returns one
/// [`IbsOutput`] per invocation, in the same order as `invocations`.
pub fn run_parallel<'i, S: BranchingScheme<'i> + Send>(
    invocations: Vec<(S, IbsParameters)>,
    pool: &SolutionPool<'i>,
    cancel: &CancellationToken,
) -> Vec<IbsOutput>
where
    S::Node: Send,
{
    invocations
        .into_par_iter()
        .map(|(mut scheme, params)| {
            let span = tracing::info_span!("ibs_invocation", thread_id = params.thread_id);
            let _enter = span.enter();
            iterative_beam_search(&mut scheme, pool, &params, cancel)
        })
        .collect()
}
