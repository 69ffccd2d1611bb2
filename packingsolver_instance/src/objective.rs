//! Objective and unloading-constraint enumerations.

/// The optimization objective an [`crate::Instance`] is built for. Each
/// variant fixes both the node comparison (`better`) and the prune
/// predicate (`bound`) a branching scheme must evaluate against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Objective {
    /// Knapsack-like multi-objective: maximize profit, then minimize waste.
    Default,
    /// Minimize the number of bins used (fixed bin sizes).
    BinPacking,
    /// Minimize the number of bins used, choosing among several bin sizes.
    VariableSizedBinPacking,
    /// Minimize the value of unused ("leftover") bin space.
    BinPackingWithLeftovers,
    /// Minimize the enclosing extent along x, with exactly one bin.
    OpenDimensionX,
    /// Minimize the enclosing extent along y, with exactly one bin.
    OpenDimensionY,
    /// Minimize the enclosing extent along z, with exactly one bin.
    OpenDimensionZ,
    /// Maximize packed profit subject to a fixed set of bins.
    Knapsack,
    /// Sequential 1D rectangle subproblem: maximize profit, tie-break on
    /// axle overweight.
    SequentialOneDimensionalRectangleSubproblem,
}

impl Objective {
    /// Whether this objective requires the instance to have exactly one bin
    /// (type, with a single copy), as the `OpenDimension*` family does.
    #[must_use]
    pub fn requires_single_bin(self) -> bool {
        matches!(
            self,
            Self::OpenDimensionX | Self::OpenDimensionY | Self::OpenDimensionZ
        )
    }

    /// Human-readable name, used in [`crate::PackingError::UnsupportedObjective`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::BinPacking => "BinPacking",
            Self::VariableSizedBinPacking => "VariableSizedBinPacking",
            Self::BinPackingWithLeftovers => "BinPackingWithLeftovers",
            Self::OpenDimensionX => "OpenDimensionX",
            Self::OpenDimensionY => "OpenDimensionY",
            Self::OpenDimensionZ => "OpenDimensionZ",
            Self::Knapsack => "Knapsack",
            Self::SequentialOneDimensionalRectangleSubproblem => {
                "SequentialOneDimensionalRectangleSubproblem"
            }
        }
    }
}

impl core::str::FromStr for Objective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" | "Default" => Ok(Self::Default),
            "bin-packing" | "BinPacking" => Ok(Self::BinPacking),
            "variable-sized-bin-packing" | "VariableSizedBinPacking" => {
                Ok(Self::VariableSizedBinPacking)
            }
            "bin-packing-with-leftovers" | "BinPackingWithLeftovers" => {
                Ok(Self::BinPackingWithLeftovers)
            }
            "open-dimension-x" | "OpenDimensionX" => Ok(Self::OpenDimensionX),
            "open-dimension-y" | "OpenDimensionY" => Ok(Self::OpenDimensionY),
            "open-dimension-z" | "OpenDimensionZ" => Ok(Self::OpenDimensionZ),
            "knapsack" | "Knapsack" => Ok(Self::Knapsack),
            "sequential-onedimensional-rectangle-subproblem"
            | "SequentialOneDimensionalRectangleSubproblem" => {
                Ok(Self::SequentialOneDimensionalRectangleSubproblem)
            }
            other => Err(format!("unknown objective: {other}")),
        }
    }
}

/// How a group of items must be removable from a packed bin
///.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum UnloadingConstraint {
    /// No unloading constraint.
    #[default]
    None,
    /// Items of a group must be removable by translating along x only.
    OnlyXMovements,
    /// Items of a group must be removable by translating along y only.
    OnlyYMovements,
    /// `OnlyXMovements`, plus groups must appear in weakly increasing x
    /// order.
    IncreasingX,
    /// `OnlyYMovements`, plus groups must appear in weakly increasing y
    /// order.
    IncreasingY,
}

impl UnloadingConstraint {
    /// Whether group coordinates must additionally be weakly monotone.
    #[must_use]
    pub fn requires_monotone_groups(self) -> bool {
        matches!(self, Self::IncreasingX | Self::IncreasingY)
    }

    /// Whether the constraint restricts movement to the x axis.
    #[must_use]
    pub fn is_x_axis(self) -> bool {
        matches!(self, Self::OnlyXMovements | Self::IncreasingX)
    }

    /// Whether the constraint restricts movement to the y axis.
    #[must_use]
    pub fn is_y_axis(self) -> bool {
        matches!(self, Self::OnlyYMovements | Self::IncreasingY)
    }
}

impl core::str::FromStr for UnloadingConstraint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "None" => Ok(Self::None),
            "only-x-movements" | "OnlyXMovements" => Ok(Self::OnlyXMovements),
            "only-y-movements" | "OnlyYMovements" => Ok(Self::OnlyYMovements),
            "increasing-x" | "IncreasingX" => Ok(Self::IncreasingX),
            "increasing-y" | "IncreasingY" => Ok(Self::IncreasingY),
            other => Err(format!("unknown unloading constraint: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objective_from_str_accepts_both_cases() {
        assert_eq!("BinPacking".parse::<Objective>().unwrap(), Objective::BinPacking);
        assert_eq!("bin-packing".parse::<Objective>().unwrap(), Objective::BinPacking);
        assert!("not-an-objective".parse::<Objective>().is_err());
    }

    #[test]
    fn only_open_dimension_objectives_require_a_single_bin() {
        assert!(Objective::OpenDimensionX.requires_single_bin());
        assert!(Objective::OpenDimensionY.requires_single_bin());
        assert!(Objective::OpenDimensionZ.requires_single_bin());
        assert!(!Objective::BinPacking.requires_single_bin());
        assert!(!Objective::Knapsack.requires_single_bin());
    }

    #[test]
    fn unloading_constraint_from_str_and_axis_predicates() {
        assert_eq!("IncreasingX".parse::<UnloadingConstraint>().unwrap(), UnloadingConstraint::IncreasingX);
        assert!("bogus".parse::<UnloadingConstraint>().is_err());

        assert!(UnloadingConstraint::IncreasingX.requires_monotone_groups());
        assert!(UnloadingConstraint::IncreasingX.is_x_axis());
        assert!(!UnloadingConstraint::IncreasingX.is_y_axis());

        assert!(UnloadingConstraint::OnlyYMovements.is_y_axis());
        assert!(!UnloadingConstraint::OnlyYMovements.requires_monotone_groups());

        assert_eq!(UnloadingConstraint::default(), UnloadingConstraint::None);
    }
}
