//! Predecessor-dominance tables (spec.md §4.C).
//!
//! For each ordered pair of item types `(i, j)`, precompute whether `i` is a
//! *predecessor* of `j`: if `i` still has a remaining copy at a node, `j`'s
//! insertions are skipped there, since any placement of `j` could be
//! replaced by a placement of `i` without making the packing worse under
//! the active strategy.

use packingsolver_instance::{Instance, ItemShape, ItemTypeId};

/// Which comparison between a candidate predecessor `i` and successor `j`
/// must hold, besides the geometric containment check, for `i` to dominate
/// `j`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PredecessorStrategy {
    /// `profit(i) <= profit(j)`.
    ProfitLe,
    /// `profit(i) <= profit(j)` and `weight(i) >= weight(j)`.
    ProfitLeWeightGe,
    /// `profit(i) <= profit(j)` and `weight(i) == weight(j)`.
    ProfitLeWeightEq,
}

/// Geometric dominance variant: whether `i`'s rectangle fits inside `j`'s
/// as-is, with a width/height swap (only meaningful when both item types
/// allow rotation), or compared after swapping the successor's role
/// (a "weight-swap" variant, which additionally allows the
/// predecessor and successor to trade weight roles when ids tie-break).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DominanceVariant {
    Plain,
    WidthSwap,
    WeightSwap,
}

/// `dominates[strategy][variant][i][j]` is `true` iff item type `i`
/// dominates item type `j` as a predecessor under that strategy/variant.
#[derive(Clone, Debug)]
pub struct DominanceTables {
    n: usize,
    plain: Vec<Vec<bool>>,
    width_swap: Vec<Vec<bool>>,
    weight_swap: Vec<Vec<bool>>,
}

impl DominanceTables {
    /// Precomputes all three dominance relations for `strategy` over every
    /// pair of item types in `instance`.
    #[must_use]
    pub fn build(instance: &Instance, strategy: PredecessorStrategy) -> Self {
        let n = instance.number_of_item_types();
        let mut plain = vec![vec![false; n]; n];
        let mut width_swap = vec![vec![false; n]; n];
        let mut weight_swap = vec![vec![false; n]; n];

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let it_i = instance.item_type(i);
                let it_j = instance.item_type(j);
                if !economics_ok(strategy, it_i.profit(), it_j.profit(), it_i.weight(), it_j.weight()) {
                    continue;
                }
                let Some(si) = it_i.shape().as_rectangle() else { continue };
                let Some(sj) = it_j.shape().as_rectangle() else { continue };

                if si.width <= sj.width && si.height <= sj.height {
                    plain[i][j] = true;
                }
                let both_oriented_free = !it_i.oriented() && !it_j.oriented();
                if both_oriented_free && si.width <= sj.height && si.height <= sj.width {
                    width_swap[i][j] = true;
                }
                // Weight-swap: same geometric containment as plain, but
                // breaks ties by id when profit/weight are equal so that
                // exactly one of a pair of otherwise-identical types
                // survives as the predecessor.
                if plain[i][j] && economics_tied(it_i.profit(), it_j.profit(), it_i.weight(), it_j.weight()) {
                    weight_swap[i][j] = i < j;
                } else {
                    weight_swap[i][j] = plain[i][j];
                }
            }
        }

        Self {
            n,
            plain,
            width_swap,
            weight_swap,
        }
    }

    /// Whether `i` dominates `j` under `variant`.
    #[must_use]
    pub fn dominates(&self, variant: DominanceVariant, i: ItemTypeId, j: ItemTypeId) -> bool {
        debug_assert!(i < self.n && j < self.n);
        match variant {
            DominanceVariant::Plain => self.plain[i][j],
            DominanceVariant::WidthSwap => self.width_swap[i][j],
            DominanceVariant::WeightSwap => self.weight_swap[i][j],
        }
    }

    /// Whether `j` has any remaining, un-dominated predecessor among item
    /// types that still have a copy available at this node
    /// (`item_number_of_copies[t] < copies[t]`, or unlimited).
    #[must_use]
    pub fn is_dominated(&self, j: ItemTypeId, remaining: impl Fn(ItemTypeId) -> bool) -> bool {
        (0..self.n).any(|i| {
            i != j
                && remaining(i)
                && (self.plain[i][j] || self.width_swap[i][j] || self.weight_swap[i][j])
        })
    }
}

fn economics_ok(strategy: PredecessorStrategy, profit_i: f64, profit_j: f64, weight_i: f64, weight_j: f64) -> bool {
    match strategy {
        PredecessorStrategy::ProfitLe => profit_i <= profit_j,
        PredecessorStrategy::ProfitLeWeightGe => profit_i <= profit_j && weight_i >= weight_j,
        PredecessorStrategy::ProfitLeWeightEq => profit_i <= profit_j && (weight_i - weight_j).abs() < packingsolver_instance::PSTOL,
    }
}

fn economics_tied(profit_i: f64, profit_j: f64, weight_i: f64, weight_j: f64) -> bool {
    (profit_i - profit_j).abs() < packingsolver_instance::PSTOL && (weight_i - weight_j).abs() < packingsolver_instance::PSTOL
}

#[cfg(test)]
mod tests {
    use super::*;
    use packingsolver_instance::{InstanceBuilder, RotationMask, Size, Trims};

    #[test]
    fn identical_geometry_cheaper_profit_is_dominated() {
        let mut b = InstanceBuilder::new();
        let cheap = b.add_rectangle_item_type(Size::new(2.0, 2.0), RotationMask::CANONICAL_ONLY, 1, Some(1.0), 0.0, 0).unwrap();
        let rich = b.add_rectangle_item_type(Size::new(2.0, 2.0), RotationMask::CANONICAL_ONLY, 1, Some(5.0), 0.0, 0).unwrap();
        b.add_rectangle_bin_type(Size::new(10.0, 10.0), None, 1, 0, Trims::default()).unwrap();
        let inst = b.build().unwrap();

        let tables = DominanceTables::build(&inst, PredecessorStrategy::ProfitLe);
        assert!(tables.dominates(DominanceVariant::Plain, rich, cheap));
        assert!(!tables.dominates(DominanceVariant::Plain, cheap, rich));
    }
}
