//! Expected trajectory model (spec.md §4.F, last paragraph).
//!
//! At construction, derives informational `(expected_length,
//! expected_axle_weight)` curves per group: a linear 1D distribution model
//! assuming each group's items spread evenly across the bin's x-extent.
//! These curves aren't used for feasibility, only as a heuristic guide for
//! the driver's `better` tie-breaks.

use packingsolver_instance::{GroupId, Instance};

/// One group's expected trajectory: `length_at_fraction(f)` /
/// `axle_weight_at_fraction(f)` give the expected packed length and axle
/// weight once a fraction `f` of that group's total weight has been placed.
#[derive(Clone, Debug)]
pub struct GroupTrajectory {
    pub group_id: GroupId,
    pub total_weight: f64,
    pub expected_bin_x: f64,
}

impl GroupTrajectory {
    /// Expected x-extent once `weight_so_far` of this group's total weight
    /// has been packed, assuming uniform density along x.
    #[must_use]
    pub fn expected_length(&self, weight_so_far: f64) -> f64 {
        if self.total_weight <= 0.0 {
            return 0.0;
        }
        (weight_so_far / self.total_weight).clamp(0.0, 1.0) * self.expected_bin_x
    }
}

/// Expected trajectories for every group of an instance, computed once.
#[derive(Clone, Debug)]
pub struct ExpectedTrajectory {
    groups: Vec<GroupTrajectory>,
}

impl ExpectedTrajectory {
    #[must_use]
    pub fn build(instance: &Instance) -> Self {
        let expected_bin_x = instance
            .bin_types()
            .first()
            .and_then(|b| b.shape().as_box())
            .map_or(0.0, |s| s.x);
        let groups = (0..instance.number_of_groups())
            .map(|group_id| {
                let group = instance.group(group_id);
                let total_weight = group.item_types.iter().map(|&t| instance.item_type(t).weight() * instance.item_type(t).copies().max(1) as f64).sum();
                GroupTrajectory { group_id, total_weight, expected_bin_x }
            })
            .collect();
        Self { groups }
    }

    #[must_use]
    pub fn group(&self, group_id: GroupId) -> &GroupTrajectory {
        &self.groups[group_id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packingsolver_instance::{InstanceBuilder, RotationMask, Size3, Trims};

    #[test]
    fn expected_length_scales_with_weight_fraction() {
        let mut b = InstanceBuilder::new();
        b.add_box_item_type(Size3::new(1.0, 1.0, 1.0), RotationMask::CANONICAL_ONLY, 4, None, 2.0, 0, 0, u32::MAX, f64::MAX, 0.0).unwrap();
        b.add_box_bin_type(Size3::new(20.0, 2.0, 2.0), None, 1, 0, 0.0, 0.0, None).unwrap();
        let inst = b.build().unwrap();
        let traj = ExpectedTrajectory::build(&inst);
        let g = traj.group(0);
        assert!((g.expected_length(g.total_weight / 2.0) - 10.0).abs() < 1e-9);
    }
}
