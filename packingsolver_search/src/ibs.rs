//! The iterative beam search driver: repeated best-first sweeps over a
//! scheme's search tree with a queue width that grows geometrically between
//! sweeps, each sweep maintaining three depth-ordered queues so an
//! insertion that advances depth by one or by two is routed correctly.

use std::cmp::Ordering;

use packingsolver_domination::History;
use packingsolver_solution::SolutionPool;

use crate::cancellation::CancellationToken;
use crate::frontier::Frontier;
use crate::scheme::BranchingScheme;

/// Tuning knobs for one [`iterative_beam_search`] invocation.
#[derive(Clone, Debug)]
pub struct IbsParameters {
    /// Identifies this invocation in logs when several run concurrently
    /// (`crate::run_parallel` assigns one id per thread).
    pub thread_id: usize,
    /// Factor the queue width is multiplied by between sweeps.
    pub growth_factor: f64,
    /// Starting queue width.
    pub queue_size_min: u64,
    /// Sweeps stop growing the queue past this width; the search itself
    /// still keeps running sweeps at this width until one sweep truncates
    /// nothing.
    pub queue_size_max: u64,
    /// Stops the search once this many nodes have been popped from a
    /// queue, across all sweeps. `None` means unbounded.
    pub node_number_max: Option<u64>,
}

impl Default for IbsParameters {
    fn default() -> Self {
        Self {
            thread_id: 0,
            growth_factor: 1.5,
            queue_size_min: 1,
            queue_size_max: 100_000_000,
            node_number_max: None,
        }
    }
}

/// What happened during a completed (possibly cancelled) search.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IbsOutput {
    /// Total nodes popped from a queue across every sweep.
    pub node_number: u64,
    /// The widest queue width reached.
    pub queue_size_max_reached: u64,
    /// Whether the search stopped because of a cancellation request rather
    /// than converging or hitting `node_number_max`.
    pub cancelled: bool,
}

/// Runs iterative beam search from `scheme`'s root, offering every child
/// node's solution to `pool` (not only leaves, since objectives such as
/// `Knapsack`/`Default` can score a partial packing) and expanding the ones
/// that aren't leaves.
///
/// Each sweep processes queue `q` depth by depth: expanding a node's
/// children, discarding any the scheme's `bound` rejects, offering every
/// child's solution to `pool`, and routing non-leaf children into `q_next`
/// or `q_next_2` depending on how far the insertion advanced depth. A depth
/// layer's queue is deduplicated by the scheme's frontier hash before a
/// node is admitted, and capped at the sweep's current queue width, evicting
/// the worst-ranked node when over capacity. If any layer overflowed its cap
/// during the sweep, the queue width is grown by `growth_factor` and the
/// whole search restarts from the root; otherwise the sweep was exhaustive
/// and the search stops.
pub fn iterative_beam_search<'i, S: BranchingScheme<'i>>(
    scheme: &mut S,
    pool: &SolutionPool<'i>,
    params: &IbsParameters,
    cancel: &CancellationToken,
) -> IbsOutput {
    let mut node_number: u64 = 0;
    let mut queue_size_max = params.queue_size_min.max(1);
    let mut widest_reached = queue_size_max;

    loop {
        let mut q = Frontier::new();
        let root = scheme.root();
        q.insert_sorted(root, &|a, b| scheme.compare(a, b));

        let mut q_next = Frontier::new();
        let mut q_next_2 = Frontier::new();
        let mut history_next: History<packingsolver_domination::NodeKey> = History::new();
        let mut history_next_2: History<packingsolver_domination::NodeKey> = History::new();
        let mut truncated = false;
        let mut depth: u32 = 0;

        'sweep: loop {
            while let Some(n) = q.pop_best() {
                node_number += 1;
                if cancel.is_cancelled() {
                    return IbsOutput {
                        node_number,
                        queue_size_max_reached: widest_reached,
                        cancelled: true,
                    };
                }
                if let Some(limit) = params.node_number_max {
                    if node_number > limit {
                        return IbsOutput {
                            node_number,
                            queue_size_max_reached: widest_reached,
                            cancelled: false,
                        };
                    }
                }

                let incumbent = pool.best();
                if scheme.bound(n, incumbent.as_ref()) {
                    continue;
                }

                for child in scheme.children(n) {
                    let incumbent = pool.best();
                    if scheme.bound(child, incumbent.as_ref()) {
                        continue;
                    }

                    // Every child is offered to the pool, not just leaves:
                    // some objectives (Knapsack, Default) score partial
                    // packings directly, so the best node along a branch
                    // may never reach a terminal state.
                    pool.add(scheme.to_solution(child));

                    if scheme.leaf(child) {
                        continue;
                    }

                    let child_depth = scheme.depth(child);
                    let (target, target_history) = if child_depth == depth + 1 {
                        (&mut q_next, &mut history_next)
                    } else {
                        (&mut q_next_2, &mut history_next_2)
                    };

                    let hasher = scheme.node_hasher();
                    let resolve = |k: packingsolver_domination::NodeKey| scheme.node(k).clone();
                    let is_better =
                        |a: &S::Node, b: &S::Node| scheme.node_better(a, b);
                    if target_history.insert_unique(child, &hasher, &resolve, &is_better).is_err() {
                        continue;
                    }

                    target.insert_sorted(child, &|a, b| scheme.compare(a, b));
                    if target.len() as u64 > queue_size_max {
                        target.pop_worst();
                        truncated = true;
                    }
                }
            }

            if q_next.is_empty() && q_next_2.is_empty() {
                break 'sweep;
            }
            q = std::mem::replace(&mut q_next, Frontier::new());
            for key in q_next_2.drain() {
                q_next.insert_sorted(key, &|a, b| scheme.compare(a, b));
            }
            history_next = std::mem::take(&mut history_next_2);
            depth += 1;
        }

        if !truncated {
            return IbsOutput {
                node_number,
                queue_size_max_reached: widest_reached,
                cancelled: false,
            };
        }

        let grown = (queue_size_max as f64) * params.growth_factor;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mut next_queue_size_max = grown as u64;
        // Reproduces the reference implementation's rounding-fixed-point
        // bump verbatim: `as u64` truncation can leave the width unchanged
        // for small values even though `growth_factor > 1.0`, which would
        // otherwise loop forever at the same width.
        if next_queue_size_max == queue_size_max {
            next_queue_size_max += 1;
        }
        queue_size_max = next_queue_size_max;
        widest_reached = widest_reached.max(queue_size_max);
        tracing::debug!(thread_id = params.thread_id, queue_size_max, node_number, "sweep truncated, growing queue");
    }
}
