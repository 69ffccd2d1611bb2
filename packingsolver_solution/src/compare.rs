//! Objective-dispatched comparison between two *complete* solutions.
//!
//! Branching schemes additionally need a node-level `better`/`bound` pair
//! that reasons about *partial* nodes and is therefore scheme-specific;
//! this module only covers the solution-level comparison the pool needs,
//! which every scheme's leaf comparison must agree with.

use packingsolver_instance::Objective;

use crate::solution::Solution;

/// Returns `true` iff `candidate` is strictly preferred to `incumbent`
/// under `objective`.
#[must_use]
pub fn solution_is_better(objective: Objective, candidate: &Solution<'_>, incumbent: &Solution<'_>) -> bool {
    match objective {
        Objective::Default => {
            if candidate.profit() != incumbent.profit() {
                candidate.profit() > incumbent.profit()
            } else {
                candidate.waste() < incumbent.waste()
            }
        }
        Objective::Knapsack => candidate.profit() > incumbent.profit(),
        Objective::BinPacking | Objective::VariableSizedBinPacking => {
            match (candidate.is_complete(), incumbent.is_complete()) {
                (true, false) => true,
                (false, true) => false,
                _ => candidate.number_of_bins() < incumbent.number_of_bins(),
            }
        }
        Objective::BinPackingWithLeftovers => {
            match (candidate.is_complete(), incumbent.is_complete()) {
                (true, false) => true,
                (false, true) => false,
                _ => {
                    if candidate.number_of_bins() != incumbent.number_of_bins() {
                        candidate.number_of_bins() < incumbent.number_of_bins()
                    } else {
                        candidate.waste() < incumbent.waste()
                    }
                }
            }
        }
        Objective::OpenDimensionX | Objective::OpenDimensionY | Objective::OpenDimensionZ => {
            match (candidate.is_complete(), incumbent.is_complete()) {
                (true, false) => true,
                (false, true) => false,
                _ => candidate.x_extent() < incumbent.x_extent(),
            }
        }
        Objective::SequentialOneDimensionalRectangleSubproblem => {
            if candidate.profit() != incumbent.profit() {
                candidate.profit() > incumbent.profit()
            } else {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Direction;
    use crate::solution::{Placement, SolutionBuilder};
    use packingsolver_instance::{InstanceBuilder, Rotation, RotationMask, Size, Trims};

    fn instance() -> packingsolver_instance::Instance {
        let mut b = InstanceBuilder::new();
        b.add_rectangle_item_type(Size::new(2.0, 2.0), RotationMask::FREE_2D, 4, None, 0.0, 0)
            .unwrap();
        b.add_rectangle_bin_type(Size::new(10.0, 10.0), None, packingsolver_instance::UNLIMITED_COPIES, 0, Trims::default())
            .unwrap();
        b.build().unwrap()
    }

    #[test]
    fn default_objective_prefers_higher_profit() {
        let inst = instance();
        let mut a = SolutionBuilder::new(&inst);
        let bin = a.add_bin(0, Direction::X);
        a.add_item(bin, 0, Placement::Rect { x: 0.0, y: 0.0 }, Rotation::Xyz, None);
        let a = a.finish();

        let b = SolutionBuilder::new(&inst).finish();

        assert!(solution_is_better(Objective::Default, &a, &b));
        assert!(!solution_is_better(Objective::Default, &b, &a));
    }

    #[test]
    fn bin_packing_prefers_fewer_bins_among_complete_solutions() {
        let inst = instance();
        let mut a = SolutionBuilder::new(&inst);
        let bin = a.add_bin(0, Direction::X);
        for (x, y) in [(0.0, 0.0), (2.0, 0.0), (4.0, 0.0), (6.0, 0.0)] {
            a.add_item(bin, 0, Placement::Rect { x, y }, Rotation::Xyz, None);
        }
        let a = a.finish();
        assert!(a.is_complete());

        let mut b = SolutionBuilder::new(&inst);
        let bin1 = b.add_bin(0, Direction::X);
        let bin2 = b.add_bin(0, Direction::X);
        b.add_item(bin1, 0, Placement::Rect { x: 0.0, y: 0.0 }, Rotation::Xyz, None);
        b.add_item(bin1, 0, Placement::Rect { x: 2.0, y: 0.0 }, Rotation::Xyz, None);
        b.add_item(bin2, 0, Placement::Rect { x: 0.0, y: 0.0 }, Rotation::Xyz, None);
        b.add_item(bin2, 0, Placement::Rect { x: 2.0, y: 0.0 }, Rotation::Xyz, None);
        let b = b.finish();
        assert!(b.is_complete());

        assert!(solution_is_better(Objective::BinPacking, &a, &b));
    }
}
