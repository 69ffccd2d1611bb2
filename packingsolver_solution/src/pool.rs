//! Bounded, lock-protected set of the best solutions seen so far.

use std::sync::Mutex;

use packingsolver_instance::{Instance, Objective};

use crate::compare::solution_is_better;
use crate::solution::Solution;

/// A bounded set of the best complete solutions found, supporting an
/// atomic "add if strictly better under the objective" used by parallel
/// search invocations.
///
/// `size` is typically 1 (keep only the incumbent); a larger size keeps a
/// short ranked list, which some callers use to report near-optimal
/// alternatives.
pub struct SolutionPool<'i> {
    instance: &'i Instance,
    objective: Objective,
    capacity: usize,
    solutions: Mutex<Vec<Solution<'i>>>,
}

impl<'i> SolutionPool<'i> {
    /// Creates an empty pool bounded to `capacity` solutions.
    #[must_use]
    pub fn new(instance: &'i Instance, capacity: usize) -> Self {
        Self {
            instance,
            objective: instance.objective(),
            capacity: capacity.max(1),
            solutions: Mutex::new(Vec::new()),
        }
    }

    /// The instance this pool holds solutions for.
    #[must_use]
    pub fn instance(&self) -> &'i Instance {
        self.instance
    }

    /// Attempts to add `candidate`. Acquires the pool's lock, compares
    /// `candidate` against the current worst-kept solution (or accepts
    /// unconditionally if the pool has spare capacity), and installs it if
    /// strictly better. Returns whether the incumbent (best-ranked
    /// solution) changed.
    pub fn add(&self, candidate: Solution<'i>) -> bool {
        let mut solutions = self.solutions.lock().expect("solution pool mutex poisoned");
        if solutions.len() < self.capacity {
            let becomes_incumbent = solutions
                .first()
                .is_none_or(|incumbent| solution_is_better(self.objective, &candidate, incumbent));
            solutions.push(candidate);
            solutions.sort_by(|a, b| {
                if solution_is_better(self.objective, a, b) {
                    std::cmp::Ordering::Less
                } else if solution_is_better(self.objective, b, a) {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            });
            if becomes_incumbent {
                tracing::debug!(bins = solutions[0].number_of_bins(), profit = solutions[0].profit(), "new incumbent");
            }
            return becomes_incumbent;
        }

        let worst_index = solutions.len() - 1;
        if solution_is_better(self.objective, &candidate, &solutions[worst_index]) {
            let becomes_incumbent = solution_is_better(self.objective, &candidate, &solutions[0]);
            solutions[worst_index] = candidate;
            solutions.sort_by(|a, b| {
                if solution_is_better(self.objective, a, b) {
                    std::cmp::Ordering::Less
                } else if solution_is_better(self.objective, b, a) {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            });
            if becomes_incumbent {
                tracing::debug!(bins = solutions[0].number_of_bins(), profit = solutions[0].profit(), "new incumbent");
            }
            becomes_incumbent
        } else {
            false
        }
    }

    /// The current best (incumbent) solution, if any has been added.
    #[must_use]
    pub fn best(&self) -> Option<Solution<'i>> {
        self.solutions.lock().expect("solution pool mutex poisoned").first().cloned()
    }

    /// Number of solutions currently kept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.solutions.lock().expect("solution pool mutex poisoned").len()
    }

    /// Whether the pool holds no solutions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Direction;
    use crate::solution::{Placement, SolutionBuilder};
    use packingsolver_instance::{InstanceBuilder, Rotation, RotationMask, Size, Trims};

    fn instance() -> Instance {
        let mut b = InstanceBuilder::new();
        b.add_rectangle_item_type(Size::new(2.0, 2.0), RotationMask::FREE_2D, 4, None, 1.0, 0)
            .unwrap();
        b.add_rectangle_bin_type(Size::new(10.0, 10.0), None, packingsolver_instance::UNLIMITED_COPIES, 0, Trims::default())
            .unwrap();
        b.build().unwrap()
    }

    #[test]
    fn add_strictly_better_replaces_incumbent() {
        let inst = instance();
        let pool = SolutionPool::new(&inst, 1);

        let empty = SolutionBuilder::new(&inst).finish();
        assert!(pool.add(empty));

        let mut sb = SolutionBuilder::new(&inst);
        let bin = sb.add_bin(0, Direction::X);
        sb.add_item(bin, 0, Placement::Rect { x: 0.0, y: 0.0 }, Rotation::Xyz, None);
        let with_item = sb.finish();
        assert!(pool.add(with_item));
        assert_eq!(pool.len(), 1);
        assert!((pool.best().unwrap().profit() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn add_is_idempotent_on_identical_solution() {
        let inst = instance();
        let pool = SolutionPool::new(&inst, 1);
        let mut sb = SolutionBuilder::new(&inst);
        let bin = sb.add_bin(0, Direction::X);
        sb.add_item(bin, 0, Placement::Rect { x: 0.0, y: 0.0 }, Rotation::Xyz, None);
        let sol = sb.finish();
        assert!(pool.add(sol.clone()));
        // Re-inserting the same solution must not be treated as strictly better.
        assert!(!pool.add(sol));
        assert_eq!(pool.len(), 1);
    }
}
